use std::sync::Arc;

use glimpse_capture::HighlightStyle;
use glimpse_config::hotkeys::HotkeyProfile;
use glimpse_core::{Analysis, GlimpseError, Presentation};
use glimpse_types::{BoundingBox, StreamUpdate};
use glimpse_vision::{VisionClient, VisionRequest};
use kanal::{AsyncReceiver, AsyncSender};
use tracing::Instrument;

use crate::context::ActivationContext;

/// How an activation ended, short of an error
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Cancelled,
    Answered(ActivationSummary),
    /// The streaming popup already shows the failure
    StreamFailed(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ActivationSummary {
    pub profile: String,
    pub model: String,
    pub crop: BoundingBox,
    pub highlights: usize,
    pub answer: Option<String>,
    pub raw: String,
    /// `None` when the reply was streamed into a popup
    pub presentation: Option<Presentation>,
}

impl ActivationSummary {
    fn log(&self) {
        tracing::info!(
            "{} via {}: crop {}x{}, {} highlight(s), answer {:?}",
            self.profile,
            self.model,
            self.crop.width(),
            self.crop.height(),
            self.highlights,
            self.answer.as_deref().unwrap_or("<none>")
        );
        tracing::debug!("Raw reply:\n{}", self.raw);
    }
}

/// One hotkey press, from screen grab to shown answer. Never fails: errors
/// are logged and, when the user should know, notified.
pub async fn handle_hotkey(context: ActivationContext, profile_index: usize) -> Option<Outcome> {
    let profile = context
        .state
        .config
        .read()
        .await
        .hotkeys
        .get(profile_index)
        .cloned()?;

    let span = tracing::info_span!(
        "activation",
        id = %uuid::Uuid::new_v4(),
        profile = %profile.name
    );

    async move {
        match run_activation(&context, &profile).await {
            Ok(outcome) => {
                match &outcome {
                    Outcome::Cancelled => tracing::info!("Cancelled by user"),
                    Outcome::Answered(summary) => summary.log(),
                    Outcome::StreamFailed(e) => tracing::error!("Streaming request failed: {e}"),
                }
                Some(outcome)
            }
            Err(e) => {
                if e.is_user_facing() {
                    tracing::error!("{e}");
                } else {
                    tracing::warn!("{e}");
                }
                context.notifier.notify_error(&e).await;
                None
            }
        }
    }
    .instrument(span)
    .await
}

pub async fn run_activation(
    context: &ActivationContext,
    profile: &HotkeyProfile,
) -> Result<Outcome, GlimpseError> {
    let (capture, provider) = {
        let config = context.state.config.read().await;
        (config.capture.clone(), config.provider_for(profile).to_string())
    };
    let client = context
        .state
        .client(&provider)
        .ok_or_else(|| GlimpseError::RequestFailed(format!("Unknown provider '{provider}'")))?;

    // Capture
    let screen = context.state.screen.clone();
    let shot = tokio::task::spawn_blocking(move || screen.capture())
        .await
        .map_err(|e| GlimpseError::CaptureUnavailable(e.to_string()))?
        .map_err(|e| GlimpseError::CaptureUnavailable(format!("{e:#}")))?;
    tracing::debug!(
        "Screenshot {}x{} at {:?}",
        shot.image.width(),
        shot.image.height(),
        shot.origin
    );
    let origin = shot.origin;
    let screenshot = Arc::new(shot.image);

    // Select
    let Some(selection) = context
        .ui
        .select_region(screenshot.clone(), origin, profile.name.clone(), profile.draw_box)
        .await?
    else {
        return Ok(Outcome::Cancelled);
    };

    let crop = selection.crop_box();
    if crop.is_degenerate() {
        return Err(GlimpseError::SelectionInvalid {
            width: crop.width(),
            height: crop.height(),
        });
    }
    let highlights = selection.highlight_boxes().len();

    // Crop and encode
    let style = HighlightStyle::from(&capture);
    let quality = capture.jpeg_quality;
    let image_data_url = tokio::task::spawn_blocking(move || {
        glimpse_capture::crop_and_encode(&screenshot, &selection, quality, style)
    })
    .await
    .map_err(|e| GlimpseError::EncodingFailed(e.to_string()))?
    .map_err(|e| GlimpseError::EncodingFailed(format!("{e:#}")))?;

    let request = VisionRequest {
        image_data_url,
        prompt: profile.prompt.clone(),
        model: profile.model.clone(),
    };
    tracing::info!("Asking {} ({}), stream: {}", client.name(), request.model, profile.stream);

    // Ask and present
    let (analysis, presentation) = if profile.stream {
        match stream_reply(context, client.as_ref(), &request, &profile.name).await {
            Ok(raw) => (Analysis::from_raw(raw), None),
            Err(message) => return Ok(Outcome::StreamFailed(message)),
        }
    } else {
        let raw = client
            .ask(&request)
            .await
            .map_err(|e| GlimpseError::RequestFailed(e.to_string()))?;
        let analysis = Analysis::from_raw(raw);
        let presentation = match context
            .notifier
            .notify(&profile.name, analysis.display_text())
            .await
        {
            Ok(presentation) => Some(presentation),
            Err(e) => {
                tracing::error!("Could not show the answer: {e:#}");
                None
            }
        };
        (analysis, presentation)
    };

    Ok(Outcome::Answered(ActivationSummary {
        profile: profile.name.clone(),
        model: profile.model.clone(),
        crop,
        highlights,
        answer: analysis.extracted,
        raw: analysis.raw,
        presentation,
    }))
}

/// Stream the reply into a live popup, showing the extracted answer of each
/// snapshot as it arrives
async fn stream_reply(
    context: &ActivationContext,
    client: &dyn VisionClient,
    request: &VisionRequest,
    title: &str,
) -> Result<String, String> {
    let (raw_tx, raw_rx) = kanal::unbounded_async();
    let (display_tx, display_rx) = kanal::unbounded_async();

    if let Err(e) = context.notifier.notify_streaming(title, display_rx).await {
        tracing::error!("Could not open the streaming popup: {e:#}");
    }

    let forwarder = tokio::spawn(forward_display(raw_rx, display_tx));
    let result = client.ask_streaming(request, raw_tx).await;
    if let Err(e) = forwarder.await {
        tracing::error!("Stream forwarder panicked: {e}");
    }

    result.map_err(|e| e.to_string())
}

/// Map raw cumulative snapshots to what the popup should display
async fn forward_display(raw: AsyncReceiver<StreamUpdate>, display: AsyncSender<StreamUpdate>) {
    while let Ok(update) = raw.recv().await {
        let update = match update {
            StreamUpdate::Text(text) => {
                StreamUpdate::Text(Analysis::from_raw(text).display_text().to_string())
            }
            other => other,
        };
        let terminal = update.is_terminal();
        // The popup may already be closed
        let _ = display.send(update).await;
        if terminal {
            break;
        }
    }
}
