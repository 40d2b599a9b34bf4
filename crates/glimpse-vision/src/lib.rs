mod client;
mod sse;

pub use client::{OpenAiCompatibleClient, build_request_body, parse_completion};
pub use sse::{SseDecoder, SseEvent, parse_sse_line};

use glimpse_types::StreamUpdate;

/// Image plus instruction sent to a vision model
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisionRequest {
    /// `data:image/jpeg;base64,...`
    pub image_data_url: String,
    pub prompt: String,
    pub model: String,
}

/// Vision model provider interface
#[async_trait::async_trait]
pub trait VisionClient: Send + Sync {
    /// Send the request and wait for the whole reply
    async fn ask(&self, request: &VisionRequest) -> Result<String, VisionError>;

    /// Send the request and forward cumulative text snapshots to `updates`,
    /// ending with [`StreamUpdate::Done`] or [`StreamUpdate::Failed`].
    ///
    /// Returns the complete reply. A closed `updates` channel does not abort
    /// the request.
    async fn ask_streaming(
        &self,
        request: &VisionRequest,
        updates: kanal::AsyncSender<StreamUpdate>,
    ) -> Result<String, VisionError> {
        match self.ask(request).await {
            Ok(text) => {
                let _ = updates.send(StreamUpdate::Text(text.clone())).await;
                let _ = updates.send(StreamUpdate::Done).await;
                Ok(text)
            }
            Err(e) => {
                let _ = updates.send(StreamUpdate::Failed(e.to_string())).await;
                Err(e)
            }
        }
    }

    /// Provider name, for logs
    fn name(&self) -> &str;
}

#[derive(Debug, thiserror::Error)]
pub enum VisionError {
    #[error("API error (HTTP {status}): {body}")]
    ApiError { status: u16, body: String },

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("Request timed out after {0}s")]
    Timeout(u64),

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    #[error("Authentication error")]
    AuthenticationError,

    #[error("No API key configured for provider '{0}'")]
    MissingApiKey(String),
}
