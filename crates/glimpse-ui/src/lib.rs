use std::rc::Rc;

use glimpse_config::ui::UiConfig;
use kanal::AsyncReceiver;

mod events;
mod focus;
mod handle;
mod mapping;
mod notifier;
mod popup;
mod selector;
mod state;

pub use focus::NativeWindow;
pub use handle::{SelectionReply, UiHandle, UiRequest, ui_channel};
pub use mapping::ViewMapping;
pub use notifier::{DesktopToaster, Notifier, Toaster};

slint::include_modules!();

/// Run the GUI on the current thread until a shutdown request arrives or the
/// request channel closes. Must be called from the main thread.
pub fn run_ui(requests: AsyncReceiver<UiRequest>, config: UiConfig) -> anyhow::Result<()> {
    let state = Rc::new(state::UiState::new(config));

    slint::spawn_local(async move {
        while let Ok(request) = requests.recv().await {
            if !events::handle_request(&state, request) {
                break;
            }
        }
        tracing::info!("[SLINT] Request loop finished");
        slint::quit_event_loop().ok();
    })?;

    slint::run_event_loop_until_quit()?;
    Ok(())
}
