use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use glimpse_config::notification::NotificationConfig;
use glimpse_core::{GlimpseError, Presentation, choose_presentation};
use glimpse_types::StreamUpdate;
use kanal::AsyncReceiver;

use crate::handle::UiHandle;

/// Desktop notification backend
pub trait Toaster: Send + Sync {
    fn toast(&self, title: &str, body: &str) -> anyhow::Result<()>;
}

/// System notifications through notify-rust
pub struct DesktopToaster {
    app_name: String,
}

impl DesktopToaster {
    pub fn new(app_name: impl Into<String>) -> Self {
        Self {
            app_name: app_name.into(),
        }
    }
}

impl Toaster for DesktopToaster {
    fn toast(&self, title: &str, body: &str) -> anyhow::Result<()> {
        notify_rust::Notification::new()
            .appname(&self.app_name)
            .summary(title)
            .body(body)
            .show()
            .map(|_| ())
            .context("Failed to show notification")
    }
}

/// Shows results to the user: a toast when the text fits, the popup
/// otherwise or when toasts keep failing
#[derive(Clone)]
pub struct Notifier {
    ui: UiHandle,
    toaster: Arc<dyn Toaster>,
    config: NotificationConfig,
}

impl Notifier {
    pub fn new(ui: UiHandle, toaster: Arc<dyn Toaster>, config: NotificationConfig) -> Self {
        Self { ui, toaster, config }
    }

    /// Returns how the text ended up being shown
    pub async fn notify(&self, title: &str, text: &str) -> anyhow::Result<Presentation> {
        if choose_presentation(text, &self.config) == Presentation::Toast {
            if self.toast_with_retry(title, text).await {
                return Ok(Presentation::Toast);
            }
            tracing::warn!(
                "Toast failed after {} attempt(s), using popup",
                self.config.max_attempts
            );
        }

        self.ui.show_popup(title, text).await?;
        Ok(Presentation::Popup)
    }

    /// Hand a stream of display-ready snapshots to a live popup
    pub async fn notify_streaming(
        &self,
        title: &str,
        updates: AsyncReceiver<StreamUpdate>,
    ) -> anyhow::Result<()> {
        self.ui.open_stream(title, updates).await
    }

    /// Surface an activation failure, unless it is one the user need not see
    pub async fn notify_error(&self, error: &GlimpseError) {
        if !error.is_user_facing() {
            return;
        }
        if let Err(e) = self.notify(error.title(), &error.to_string()).await {
            tracing::error!("Could not report error to the user: {e:#}");
        }
    }

    async fn toast_with_retry(&self, title: &str, text: &str) -> bool {
        let toaster = self.toaster.clone();
        let attempts = self.config.max_attempts.max(1);
        let delay = Duration::from_millis(self.config.retry_delay_ms);
        let (title, text) = (title.to_string(), text.to_string());

        let delivered = tokio::task::spawn_blocking(move || {
            for attempt in 1..=attempts {
                match toaster.toast(&title, &text) {
                    Ok(()) => return true,
                    Err(e) => {
                        tracing::debug!("Toast attempt {attempt}/{attempts} failed: {e:#}");
                        if attempt < attempts {
                            std::thread::sleep(delay);
                        }
                    }
                }
            }
            false
        })
        .await;

        delivered.unwrap_or_else(|e| {
            tracing::error!("Toast task panicked: {e}");
            false
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicU32, Ordering};

    use tokio::time::timeout;

    use super::*;
    use crate::handle::{UiRequest, ui_channel};

    /// Fails the first `failures` calls, then records what it shows
    struct FlakyToaster {
        failures: u32,
        calls: AtomicU32,
        shown: Mutex<Vec<(String, String)>>,
    }

    impl FlakyToaster {
        fn new(failures: u32) -> Arc<Self> {
            Arc::new(Self {
                failures,
                calls: AtomicU32::new(0),
                shown: Mutex::new(Vec::new()),
            })
        }
    }

    impl Toaster for FlakyToaster {
        fn toast(&self, title: &str, body: &str) -> anyhow::Result<()> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            anyhow::ensure!(call >= self.failures, "notification service busy");
            self.shown
                .lock()
                .unwrap()
                .push((title.to_string(), body.to_string()));
            Ok(())
        }
    }

    fn config(max_attempts: u32) -> NotificationConfig {
        NotificationConfig {
            max_attempts,
            retry_delay_ms: 1,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_short_text_is_toasted() {
        let (ui, _rx) = ui_channel();
        let toaster = FlakyToaster::new(0);
        let notifier = Notifier::new(ui, toaster.clone(), config(3));

        let shown = notifier.notify("Answer", "42").await.unwrap();
        assert_eq!(shown, Presentation::Toast);
        assert_eq!(
            toaster.shown.lock().unwrap().as_slice(),
            &[("Answer".to_string(), "42".to_string())]
        );
    }

    #[tokio::test]
    async fn test_toast_retries_until_success() {
        let (ui, _rx) = ui_channel();
        let toaster = FlakyToaster::new(2);
        let notifier = Notifier::new(ui, toaster.clone(), config(5));

        assert_eq!(notifier.notify("Answer", "B").await.unwrap(), Presentation::Toast);
        assert_eq!(toaster.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_toast_exhaustion_falls_back_to_popup() {
        let (ui, rx) = ui_channel();
        let toaster = FlakyToaster::new(u32::MAX);
        let notifier = Notifier::new(ui, toaster.clone(), config(4));

        let shown = notifier.notify("Answer", "B").await.unwrap();
        assert_eq!(shown, Presentation::Popup);
        assert_eq!(toaster.calls.load(Ordering::SeqCst), 4);

        match timeout(Duration::from_secs(1), rx.recv()).await.unwrap().unwrap() {
            UiRequest::ShowPopup { title, text } => {
                assert_eq!(title, "Answer");
                assert_eq!(text, "B");
            }
            other => panic!("unexpected request: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_long_text_goes_straight_to_popup() {
        let (ui, rx) = ui_channel();
        let toaster = FlakyToaster::new(0);
        let notifier = Notifier::new(ui, toaster.clone(), config(3));

        let long = "word ".repeat(40);
        assert_eq!(notifier.notify("Explain", &long).await.unwrap(), Presentation::Popup);
        assert_eq!(toaster.calls.load(Ordering::SeqCst), 0);
        assert!(matches!(rx.recv().await.unwrap(), UiRequest::ShowPopup { .. }));
    }

    #[tokio::test]
    async fn test_invalid_selection_is_not_reported() {
        let (ui, _rx) = ui_channel();
        let toaster = FlakyToaster::new(0);
        let notifier = Notifier::new(ui, toaster.clone(), config(3));

        notifier
            .notify_error(&GlimpseError::SelectionInvalid { width: 1, height: 40 })
            .await;
        assert_eq!(toaster.calls.load(Ordering::SeqCst), 0);

        notifier
            .notify_error(&GlimpseError::RequestFailed("timeout".into()))
            .await;
        assert_eq!(toaster.shown.lock().unwrap()[0].0, "API error");
    }

    #[tokio::test]
    async fn test_streaming_hands_receiver_to_ui() {
        let (ui, rx) = ui_channel();
        let notifier = Notifier::new(ui, FlakyToaster::new(0), config(3));

        let (tx, updates) = kanal::unbounded_async();
        notifier.notify_streaming("Transcribe", updates).await.unwrap();
        tx.send(StreamUpdate::Text("partial".into())).await.unwrap();

        match rx.recv().await.unwrap() {
            UiRequest::OpenStream { title, updates } => {
                assert_eq!(title, "Transcribe");
                assert_eq!(updates.recv().await.unwrap(), StreamUpdate::Text("partial".into()));
            }
            other => panic!("unexpected request: {other:?}"),
        }
    }
}
