/// Failures that end a single hotkey activation. None of them stop the app.
///
/// User cancellation is not an error; it is reported as `Ok(None)`.
#[derive(Debug, thiserror::Error)]
pub enum GlimpseError {
    #[error("Screen capture unavailable: {0}")]
    CaptureUnavailable(String),

    #[error("Region selection failed: {0}")]
    SelectionFailed(String),

    #[error("Selected region is too small ({width}x{height})")]
    SelectionInvalid { width: u32, height: u32 },

    #[error("Vision request failed: {0}")]
    RequestFailed(String),

    #[error("Failed to crop or encode image: {0}")]
    EncodingFailed(String),
}

impl GlimpseError {
    /// Notification title for user-facing failures
    pub fn title(&self) -> &'static str {
        match self {
            GlimpseError::CaptureUnavailable(_) => "Capture failed",
            GlimpseError::SelectionFailed(_) => "Selection failed",
            GlimpseError::SelectionInvalid { .. } => "Selection too small",
            GlimpseError::RequestFailed(_) => "API error",
            GlimpseError::EncodingFailed(_) => "Encoding failed",
        }
    }

    /// Whether the user should see a notification for this failure
    pub fn is_user_facing(&self) -> bool {
        !matches!(self, GlimpseError::SelectionInvalid { .. })
    }
}
