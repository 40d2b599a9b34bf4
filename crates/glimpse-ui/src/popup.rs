use std::rc::Rc;
use std::time::Duration;

use glimpse_types::StreamUpdate;
use kanal::AsyncReceiver;
use slint::ComponentHandle;

use crate::ResultPopup;
use crate::focus;
use crate::state::UiState;

const COPIED_FEEDBACK: Duration = Duration::from_millis(1500);

fn build_popup(state: &Rc<UiState>, title: &str, text: &str, status: &str) -> anyhow::Result<(u64, ResultPopup)> {
    let popup = ResultPopup::new()?;
    popup.set_heading(title.into());
    popup.set_body(text.into());
    popup.set_status(status.into());
    popup.window().set_size(slint::LogicalSize::new(
        state.config.popup_width as f32,
        state.config.popup_height as f32,
    ));

    let weak = popup.as_weak();
    popup.on_copy(move || {
        let Some(popup) = weak.upgrade() else {
            return;
        };
        match glimpse_io::copy_text(&popup.get_body()) {
            Ok(()) => {
                popup.set_copy_label("Copied".into());
                let weak = popup.as_weak();
                slint::Timer::single_shot(COPIED_FEEDBACK, move || {
                    if let Some(popup) = weak.upgrade() {
                        popup.set_copy_label("Copy".into());
                    }
                });
            }
            Err(e) => {
                tracing::warn!("Copy to clipboard failed: {e:#}");
                popup.set_copy_label("Copy failed".into());
            }
        }
    });

    let id = state.next_id();
    let close = {
        let weak = popup.as_weak();
        let state = state.clone();
        move || {
            if let Some(popup) = weak.upgrade() {
                popup.hide().ok();
            }
            let state = state.clone();
            slint::Timer::single_shot(Duration::ZERO, move || {
                state.popups.borrow_mut().remove(&id);
            });
        }
    };
    popup.on_close(close.clone());
    popup.window().on_close_requested(move || {
        close();
        slint::CloseRequestResponse::HideWindow
    });

    popup.show()?;
    focus::raise(popup.window(), "result popup");
    Ok((id, popup))
}

/// Scrollable popup with the final text
pub(crate) fn show_popup(state: &Rc<UiState>, title: &str, text: &str) -> anyhow::Result<()> {
    let (id, popup) = build_popup(state, title, text, "")?;
    state.popups.borrow_mut().insert(id, popup);
    Ok(())
}

/// Popup that follows a streaming reply. Closing it early only stops the
/// display; updates keep being drained so the sender never blocks.
pub(crate) fn open_stream(
    state: &Rc<UiState>,
    title: &str,
    updates: AsyncReceiver<StreamUpdate>,
) -> anyhow::Result<()> {
    let (id, popup) = build_popup(state, title, "", "Waiting for reply...")?;
    let weak = popup.as_weak();
    state.popups.borrow_mut().insert(id, popup);

    slint::spawn_local(async move {
        let mut snapshots = 0usize;
        while let Ok(update) = updates.recv().await {
            let popup = weak.upgrade();
            match update {
                StreamUpdate::Text(text) => {
                    snapshots += 1;
                    if let Some(popup) = popup {
                        popup.set_body(text.into());
                        popup.set_status("Receiving...".into());
                    }
                }
                StreamUpdate::Done => {
                    if let Some(popup) = popup {
                        popup.set_status("Done".into());
                    }
                    break;
                }
                StreamUpdate::Failed(message) => {
                    if let Some(popup) = popup {
                        popup.set_status(format!("Failed: {message}").into());
                    }
                    break;
                }
            }
        }
        tracing::debug!("Stream popup finished after {snapshots} update(s)");
    })?;

    Ok(())
}
