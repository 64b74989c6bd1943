//! Image → text recognition.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │               RecognitionEngine (trait)                 │
//! │                                                         │
//! │   ┌────────────────┐        ┌──────────────────┐        │
//! │   │ HttpRecognizer │        │ CommandRecognizer│        │
//! │   │ vision chat API│        │ PNG → stdin      │        │
//! │   └───────┬────────┘        └────────┬─────────┘        │
//! │           └──────────┬───────────────┘                  │
//! │                      ▼                                  │
//! │            recognize(&CapturedImage) → String           │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! The model itself is external; this module only speaks to it.  Pick the
//! backend with [`build_recognizer`].

pub mod command;
pub mod http;

pub use command::CommandRecognizer;
pub use http::HttpRecognizer;

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::clipboard::CapturedImage;
use crate::config::{RecognizerConfig, RecognizerProvider};

// ---------------------------------------------------------------------------
// RecognitionError
// ---------------------------------------------------------------------------

/// Errors from a recognition backend.
#[derive(Debug, Clone, Error)]
pub enum RecognitionError {
    /// The backend cannot be built from the given configuration.
    #[error("invalid recognizer configuration: {0}")]
    Config(String),

    /// The image could not be encoded for the backend.
    #[error("failed to encode image: {0}")]
    Encode(String),

    /// Transport failure talking to the backend.
    #[error("recognition request failed: {0}")]
    Request(String),

    /// The backend did not answer in time.
    #[error("recognition request timed out")]
    Timeout,

    /// The backend ran but reported a failure.
    #[error("recognition engine failed: {0}")]
    Engine(String),

    /// The backend answered with no text.
    #[error("recognition engine returned no text")]
    EmptyResponse,
}

// ---------------------------------------------------------------------------
// RecognitionEngine trait
// ---------------------------------------------------------------------------

/// Async interface for image → text backends.
///
/// Implementations must be `Send + Sync` so they can be held behind an
/// `Arc<dyn RecognitionEngine>`.  No latency bound is assumed; a call may
/// take seconds.
#[async_trait]
pub trait RecognitionEngine: Send + Sync {
    async fn recognize(&self, image: &CapturedImage) -> Result<String, RecognitionError>;
}

const _: fn() = || {
    fn _assert_object_safe(_: Box<dyn RecognitionEngine>) {}
};

// ---------------------------------------------------------------------------
// build_recognizer
// ---------------------------------------------------------------------------

/// Build the backend selected by `config.provider`.
///
/// # Errors
///
/// [`RecognitionError::Config`] when the selected backend is misconfigured.
/// The application treats this as a fatal startup failure.
pub fn build_recognizer(
    config: &RecognizerConfig,
) -> Result<Arc<dyn RecognitionEngine>, RecognitionError> {
    match config.provider {
        RecognizerProvider::Http => Ok(Arc::new(HttpRecognizer::from_config(config)?)),
        RecognizerProvider::Command => Ok(Arc::new(CommandRecognizer::from_config(config)?)),
    }
}

// ---------------------------------------------------------------------------
// MockRecognizer  (test-only)
// ---------------------------------------------------------------------------

/// Returns a pre-configured response and counts how often it was called.
#[cfg(test)]
pub struct MockRecognizer {
    response: Result<String, RecognitionError>,
    delay: std::time::Duration,
    calls: std::sync::atomic::AtomicUsize,
}

#[cfg(test)]
impl MockRecognizer {
    pub fn ok(text: impl Into<String>) -> Self {
        Self {
            response: Ok(text.into()),
            delay: std::time::Duration::ZERO,
            calls: std::sync::atomic::AtomicUsize::new(0),
        }
    }

    pub fn err(error: RecognitionError) -> Self {
        Self {
            response: Err(error),
            delay: std::time::Duration::ZERO,
            calls: std::sync::atomic::AtomicUsize::new(0),
        }
    }

    /// Make every call take `delay` before answering.
    pub fn with_delay(mut self, delay: std::time::Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(std::sync::atomic::Ordering::SeqCst)
    }
}

#[cfg(test)]
#[async_trait]
impl RecognitionEngine for MockRecognizer {
    async fn recognize(&self, _image: &CapturedImage) -> Result<String, RecognitionError> {
        self.calls.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.response.clone()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn mock_ok_returns_text_and_counts() {
        let mock = MockRecognizer::ok("こんにちは");
        let img = CapturedImage::solid(2, 2, [0, 0, 0, 255]);
        assert_eq!(mock.recognize(&img).await.unwrap(), "こんにちは");
        assert_eq!(mock.calls(), 1);
    }

    #[tokio::test]
    async fn mock_err_returns_error() {
        let mock = MockRecognizer::err(RecognitionError::EmptyResponse);
        let img = CapturedImage::solid(2, 2, [0, 0, 0, 255]);
        assert!(matches!(
            mock.recognize(&img).await,
            Err(RecognitionError::EmptyResponse)
        ));
    }

    #[test]
    fn builds_http_by_default() {
        assert!(build_recognizer(&RecognizerConfig::default()).is_ok());
    }

    #[test]
    fn builds_command_backend() {
        let cfg = RecognizerConfig {
            provider: RecognizerProvider::Command,
            ..RecognizerConfig::default()
        };
        assert!(build_recognizer(&cfg).is_ok());
    }

    #[test]
    fn misconfiguration_is_a_config_error() {
        let cfg = RecognizerConfig {
            provider: RecognizerProvider::Command,
            command: "   ".into(),
            ..RecognizerConfig::default()
        };
        assert!(matches!(
            build_recognizer(&cfg),
            Err(RecognitionError::Config(_))
        ));
    }

    #[test]
    fn error_display_timeout() {
        assert!(RecognitionError::Timeout.to_string().contains("timed out"));
    }
}
