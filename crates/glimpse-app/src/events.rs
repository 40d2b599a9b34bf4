use glimpse_types::AppEvent;
use kanal::AsyncReceiver;
use tokio_util::sync::CancellationToken;

use crate::context::ActivationContext;

pub mod activation;

use activation::handle_hotkey;

/// App's main loop. Every hotkey press runs as its own task so a slow
/// request never blocks the next activation.
pub async fn event_loop(
    context: ActivationContext,
    events_rx: AsyncReceiver<AppEvent>,
    cancel: CancellationToken,
) -> anyhow::Result<()> {
    tracing::info!("[EVENT_LOOP] Waiting for hotkeys");

    loop {
        let event = tokio::select! {
            _ = cancel.cancelled() => break,
            event = events_rx.recv() => event?,
        };

        if !handle_event(&context, event).await {
            break;
        }
    }

    tracing::info!("[EVENT_LOOP] Stopped");
    Ok(())
}

/// Returns `false` when the loop should stop
async fn handle_event(context: &ActivationContext, event: AppEvent) -> bool {
    match event {
        AppEvent::HotkeyPressed { profile } => {
            let known = context.state.config.read().await.hotkeys.len();
            if profile >= known {
                tracing::warn!("Hotkey for unknown profile #{profile} ignored");
                return true;
            }
            tokio::spawn(handle_hotkey(context.clone(), profile));
            true
        }
        AppEvent::Shutdown => {
            tracing::info!("Shutdown requested");
            false
        }
    }
}
