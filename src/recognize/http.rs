//! `HttpRecognizer` — OCR through an OpenAI-compatible vision endpoint.
//!
//! The image is sent as a base64 PNG data URL inside a
//! `/v1/chat/completions` request.  Works with Ollama, LM Studio, vLLM and
//! hosted APIs that accept `image_url` content parts.  All connection details
//! come from [`RecognizerConfig`].

use async_trait::async_trait;
use base64::{engine::general_purpose, Engine as _};

use crate::clipboard::CapturedImage;
use crate::config::RecognizerConfig;

use super::{RecognitionEngine, RecognitionError};

impl From<reqwest::Error> for RecognitionError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            RecognitionError::Timeout
        } else {
            RecognitionError::Request(e.to_string())
        }
    }
}

/// Vision-model OCR over HTTP.
pub struct HttpRecognizer {
    client: reqwest::Client,
    endpoint: reqwest::Url,
    api_key: Option<String>,
    model: String,
    prompt: String,
}

impl HttpRecognizer {
    /// Build from config.
    ///
    /// # Errors
    ///
    /// [`RecognitionError::Config`] when `base_url` is not an http(s) URL or
    /// `model` is empty.
    pub fn from_config(config: &RecognizerConfig) -> Result<Self, RecognitionError> {
        let base = reqwest::Url::parse(config.base_url.trim_end_matches('/'))
            .map_err(|e| RecognitionError::Config(format!("base_url: {e}")))?;
        if !matches!(base.scheme(), "http" | "https") {
            return Err(RecognitionError::Config(format!(
                "base_url must be http(s), got {}",
                base.scheme()
            )));
        }
        if config.model.trim().is_empty() {
            return Err(RecognitionError::Config("model must not be empty".into()));
        }

        let endpoint = reqwest::Url::parse(&format!(
            "{}/v1/chat/completions",
            base.as_str().trim_end_matches('/')
        ))
        .map_err(|e| RecognitionError::Config(e.to_string()))?;

        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .unwrap_or_else(|e| {
                log::warn!(
                    "recognizer: HTTP client setup failed ({e}); using defaults without the {} s timeout",
                    config.timeout_secs
                );
                reqwest::Client::new()
            });

        Ok(Self {
            client,
            endpoint,
            api_key: config.api_key.clone().filter(|k| !k.is_empty()),
            model: config.model.clone(),
            prompt: config.prompt.clone(),
        })
    }

    pub fn endpoint(&self) -> &str {
        self.endpoint.as_str()
    }

    fn request_body(&self, png: &[u8]) -> serde_json::Value {
        let data_url = format!(
            "data:image/png;base64,{}",
            general_purpose::STANDARD.encode(png)
        );
        serde_json::json!({
            "model": self.model,
            "messages": [{
                "role": "user",
                "content": [
                    { "type": "text", "text": self.prompt },
                    { "type": "image_url", "image_url": { "url": data_url } }
                ]
            }],
            "stream": false,
            "temperature": 0.0
        })
    }
}

/// Pull the first choice's text out of a chat-completions response.
fn extract_text(json: &serde_json::Value) -> Result<String, RecognitionError> {
    let text = json["choices"][0]["message"]["content"]
        .as_str()
        .ok_or(RecognitionError::EmptyResponse)?
        .trim()
        .to_string();

    if text.is_empty() {
        return Err(RecognitionError::EmptyResponse);
    }
    Ok(text)
}

#[async_trait]
impl RecognitionEngine for HttpRecognizer {
    async fn recognize(&self, image: &CapturedImage) -> Result<String, RecognitionError> {
        let png = image
            .to_png()
            .map_err(|e| RecognitionError::Encode(e.to_string()))?;

        let mut req = self
            .client
            .post(self.endpoint.clone())
            .json(&self.request_body(&png));
        if let Some(key) = &self.api_key {
            req = req.bearer_auth(key);
        }

        let response = req.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(RecognitionError::Engine(format!("HTTP {status}")));
        }

        let json: serde_json::Value = response
            .json()
            .await
            .map_err(|e| RecognitionError::Request(e.to_string()))?;

        extract_text(&json)
    }
}
