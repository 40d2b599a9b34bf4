use std::sync::Arc;

use glimpse_core::GlimpseError;
use glimpse_types::{Point, SelectionResult, StreamUpdate};
use image::RgbaImage;
use kanal::{AsyncReceiver, AsyncSender};

/// Outcome the selector sends back: `Ok(None)` when the user cancelled
pub type SelectionReply = Result<Option<SelectionResult>, String>;

/// Work handed to the GUI thread
pub enum UiRequest {
    SelectRegion {
        screenshot: Arc<RgbaImage>,
        origin: Point,
        label: String,
        annotate: bool,
        reply: AsyncSender<SelectionReply>,
    },
    ShowPopup {
        title: String,
        text: String,
    },
    /// Popup fed by display-ready cumulative snapshots until a terminal update
    OpenStream {
        title: String,
        updates: AsyncReceiver<StreamUpdate>,
    },
    Shutdown,
}

impl std::fmt::Debug for UiRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UiRequest::SelectRegion { label, annotate, .. } => f
                .debug_struct("SelectRegion")
                .field("label", label)
                .field("annotate", annotate)
                .finish_non_exhaustive(),
            UiRequest::ShowPopup { title, .. } => {
                f.debug_struct("ShowPopup").field("title", title).finish_non_exhaustive()
            }
            UiRequest::OpenStream { title, .. } => {
                f.debug_struct("OpenStream").field("title", title).finish_non_exhaustive()
            }
            UiRequest::Shutdown => f.write_str("Shutdown"),
        }
    }
}

/// Request channel to the GUI thread
pub fn ui_channel() -> (UiHandle, AsyncReceiver<UiRequest>) {
    let (tx, rx) = kanal::bounded_async(16);
    (UiHandle { tx }, rx)
}

/// Cloneable sender side used by activations to reach the GUI thread
#[derive(Clone)]
pub struct UiHandle {
    tx: AsyncSender<UiRequest>,
}

impl UiHandle {
    /// Run the selector overlay on the GUI thread and wait for its result
    pub async fn select_region(
        &self,
        screenshot: Arc<RgbaImage>,
        origin: Point,
        label: String,
        annotate: bool,
    ) -> Result<Option<SelectionResult>, GlimpseError> {
        let (reply, reply_rx) = kanal::bounded_async(1);

        self.tx
            .send(UiRequest::SelectRegion {
                screenshot,
                origin,
                label,
                annotate,
                reply,
            })
            .await
            .map_err(|_| GlimpseError::SelectionFailed("UI thread is not running".to_string()))?;

        match reply_rx.recv().await {
            Ok(Ok(selection)) => Ok(selection),
            Ok(Err(message)) => Err(GlimpseError::SelectionFailed(message)),
            Err(_) => Err(GlimpseError::SelectionFailed(
                "Selector closed without a result".to_string(),
            )),
        }
    }

    pub async fn show_popup(&self, title: &str, text: &str) -> anyhow::Result<()> {
        self.tx
            .send(UiRequest::ShowPopup {
                title: title.to_string(),
                text: text.to_string(),
            })
            .await?;
        Ok(())
    }

    pub async fn open_stream(
        &self,
        title: &str,
        updates: AsyncReceiver<StreamUpdate>,
    ) -> anyhow::Result<()> {
        self.tx
            .send(UiRequest::OpenStream {
                title: title.to_string(),
                updates,
            })
            .await?;
        Ok(())
    }

    /// Ask the GUI thread to quit its event loop
    pub async fn shutdown(&self) {
        let _ = self.tx.send(UiRequest::Shutdown).await;
    }
}
