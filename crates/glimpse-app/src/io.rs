use std::thread::JoinHandle;
use std::time::Duration;

use glimpse_capture::HotkeyBindings;
use glimpse_types::AppEvent;
use kanal::Sender;
use tokio_util::sync::CancellationToken;

/// Watch for hotkey presses on a dedicated thread and forward them as events.
/// The hotkeys themselves stay registered on the GUI thread.
pub fn spawn_hotkey_listener(
    bindings: HotkeyBindings,
    poll: Duration,
    event_tx: Sender<AppEvent>,
    cancel: CancellationToken,
) -> std::io::Result<JoinHandle<()>> {
    std::thread::Builder::new()
        .name("glimpse-hotkeys".to_string())
        .spawn(move || {
            tracing::info!("Hotkey listener started");

            while !cancel.is_cancelled() {
                let Some(profile) = bindings.wait_timeout(poll) else {
                    continue;
                };

                tracing::info!("Hotkey pressed for profile #{profile}");
                if let Err(e) = event_tx.send(AppEvent::HotkeyPressed { profile }) {
                    tracing::error!("Failed to forward hotkey press: {}", e);
                    break;
                }
            }

            tracing::info!("Hotkey listener stopping");
        })
}
