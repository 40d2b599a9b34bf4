use std::time::Duration;

use async_trait::async_trait;
use futures_util::StreamExt;
use glimpse_config::api::{ApiConfig, ProviderConfig};
use glimpse_types::StreamUpdate;
use reqwest::StatusCode;

use crate::sse::{SseDecoder, SseEvent};
use crate::{VisionClient, VisionError, VisionRequest};

/// Chat completions client for OpenRouter and other OpenAI-compatible APIs
#[derive(Clone)]
pub struct OpenAiCompatibleClient {
    client: reqwest::Client,
    name: String,
    api_url: String,
    api_key: String,
    referer: String,
    app_title: String,
    max_tokens: u32,
    timeout: Duration,
}

impl OpenAiCompatibleClient {
    pub fn new(provider: &ProviderConfig, api: &ApiConfig) -> Result<Self, VisionError> {
        let timeout = Duration::from_secs(api.timeout_seconds);
        let client = reqwest::Client::builder().connect_timeout(timeout).build()?;

        Ok(Self {
            client,
            name: provider.name.clone(),
            api_url: provider.api_url.clone(),
            api_key: provider.api_key.clone(),
            referer: api.referer.clone(),
            app_title: api.app_title.clone(),
            max_tokens: api.max_tokens,
            timeout,
        })
    }

    fn post(&self, request: &VisionRequest, stream: bool) -> Result<reqwest::RequestBuilder, VisionError> {
        if self.api_key.is_empty() {
            return Err(VisionError::MissingApiKey(self.name.clone()));
        }

        Ok(self
            .client
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .header("HTTP-Referer", &self.referer)
            .header("X-Title", &self.app_title)
            .json(&build_request_body(request, self.max_tokens, stream)))
    }

    async fn send(&self, builder: reqwest::RequestBuilder) -> Result<reqwest::Response, VisionError> {
        let response = tokio::time::timeout(self.timeout, builder.send())
            .await
            .map_err(|_| VisionError::Timeout(self.timeout.as_secs()))??;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        Err(status_error(status, body))
    }

    async fn stream_into(
        &self,
        request: &VisionRequest,
        updates: &kanal::AsyncSender<StreamUpdate>,
    ) -> Result<String, VisionError> {
        let response = self.send(self.post(request, true)?).await?;
        let mut body = response.bytes_stream();
        let mut decoder = SseDecoder::new();
        let mut text = String::new();
        let mut chunks = 0usize;

        'read: loop {
            let next = tokio::time::timeout(self.timeout, body.next())
                .await
                .map_err(|_| VisionError::Timeout(self.timeout.as_secs()))?;

            let (events, exhausted) = match next {
                Some(bytes) => (decoder.push(&bytes?), false),
                None => (decoder.finish().into_iter().collect::<Vec<_>>(), true),
            };

            for event in events {
                match event {
                    SseEvent::Delta(delta) => {
                        text.push_str(&delta);
                        chunks += 1;
                        // A closed popup must not stop the request
                        let _ = updates.send(StreamUpdate::Text(text.clone())).await;
                    }
                    SseEvent::Done => break 'read,
                }
            }

            if exhausted {
                break;
            }
        }

        tracing::debug!("{}: stream finished after {} chunk(s)", self.name, chunks);
        Ok(text)
    }
}

#[async_trait]
impl VisionClient for OpenAiCompatibleClient {
    async fn ask(&self, request: &VisionRequest) -> Result<String, VisionError> {
        tracing::debug!("{}: requesting {}", self.name, request.model);
        let response = self.send(self.post(request, false)?).await?;

        // The send timeout only covers the headers
        let json: serde_json::Value = tokio::time::timeout(self.timeout, response.json())
            .await
            .map_err(|_| VisionError::Timeout(self.timeout.as_secs()))?
            .map_err(|e| VisionError::MalformedResponse(format!("Failed to parse response: {e}")))?;

        parse_completion(&json)
    }

    async fn ask_streaming(
        &self,
        request: &VisionRequest,
        updates: kanal::AsyncSender<StreamUpdate>,
    ) -> Result<String, VisionError> {
        tracing::debug!("{}: streaming {}", self.name, request.model);
        match self.stream_into(request, &updates).await {
            Ok(text) => {
                let _ = updates.send(StreamUpdate::Done).await;
                Ok(text)
            }
            Err(e) => {
                let _ = updates.send(StreamUpdate::Failed(e.to_string())).await;
                Err(e)
            }
        }
    }

    fn name(&self) -> &str {
        &self.name
    }
}

fn status_error(status: StatusCode, body: String) -> VisionError {
    match status {
        StatusCode::TOO_MANY_REQUESTS => VisionError::RateLimitExceeded,
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => VisionError::AuthenticationError,
        _ => VisionError::ApiError {
            status: status.as_u16(),
            body,
        },
    }
}

/// JSON body of a chat completions request with one text and one image part
pub fn build_request_body(request: &VisionRequest, max_tokens: u32, stream: bool) -> serde_json::Value {
    let mut body = serde_json::json!({
        "model": request.model,
        "messages": [{
            "role": "user",
            "content": [
                { "type": "text", "text": request.prompt },
                { "type": "image_url", "image_url": { "url": request.image_data_url } },
            ],
        }],
        "max_tokens": max_tokens,
    });

    if stream {
        body["stream"] = serde_json::Value::Bool(true);
    }
    body
}

/// `choices[0].message.content` of a non-streaming reply
pub fn parse_completion(json: &serde_json::Value) -> Result<String, VisionError> {
    json["choices"]
        .get(0)
        .and_then(|choice| choice["message"]["content"].as_str())
        .map(str::to_string)
        .ok_or_else(|| VisionError::MalformedResponse("No message content in response".to_string()))
}
