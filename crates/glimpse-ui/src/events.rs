use std::rc::Rc;

use slint::ComponentHandle;

use crate::handle::UiRequest;
use crate::state::UiState;
use crate::{popup, selector};

/// Serve one request on the GUI thread. Returns `false` once the loop should stop.
pub fn handle_request(state: &Rc<UiState>, request: UiRequest) -> bool {
    tracing::debug!("[SLINT] {:?}", request);

    match request {
        UiRequest::SelectRegion {
            screenshot,
            origin,
            label,
            annotate,
            reply,
        } => {
            let failure_reply = reply.clone();
            if let Err(e) = selector::open_selector(state, screenshot, origin, label, annotate, reply) {
                tracing::error!("[SLINT] Failed to open selector: {e:#}");
                let _ = failure_reply.try_send(Err(format!("{e:#}")));
            }
        }
        UiRequest::ShowPopup { title, text } => {
            if let Err(e) = popup::show_popup(state, &title, &text) {
                tracing::error!("[SLINT] Failed to show popup: {e:#}");
            }
        }
        UiRequest::OpenStream { title, updates } => {
            if let Err(e) = popup::open_stream(state, &title, updates) {
                tracing::error!("[SLINT] Failed to open stream popup: {e:#}");
            }
        }
        UiRequest::Shutdown => {
            let selector = state.selector.borrow_mut().take();
            if let Some((_, window)) = selector {
                window.invoke_cancel();
                window.hide().ok();
            }
            for (_, popup) in state.popups.borrow_mut().drain() {
                popup.hide().ok();
            }
            return false;
        }
    }

    true
}
