//! OS clipboard backed by the `arboard` crate.
//!
//! Every call creates a short-lived [`arboard::Clipboard`] handle rather than
//! sharing one, because the handle is not `Send` on all platforms and is
//! cheap to create.  Dropping the handle releases the clipboard, so it is
//! released on every return path, early or not.

use arboard::Clipboard;

use crate::config::ClipboardConfig;

use super::{read_with_retry, CapturedImage, ClipboardError, ClipboardPort, RetryPolicy};

/// The real system clipboard.
#[derive(Debug, Clone, Default)]
pub struct SystemClipboard {
    policy: RetryPolicy,
}

impl SystemClipboard {
    pub fn new(policy: RetryPolicy) -> Self {
        Self { policy }
    }

    pub fn from_config(config: &ClipboardConfig) -> Self {
        Self::new(RetryPolicy::from_config(config))
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// One read attempt.  `Ok(None)` for anything that is not a usable image.
    fn try_read_image() -> Result<Option<CapturedImage>, ClipboardError> {
        let mut clipboard =
            Clipboard::new().map_err(|e| ClipboardError::Busy(e.to_string()))?;

        match clipboard.get_image() {
            Ok(data) => {
                let (width, height) = (data.width, data.height);
                let image = CapturedImage::from_rgba(width, height, data.bytes.into_owned());
                if image.is_none() {
                    log::debug!("clipboard: undecodable {width}x{height} image, ignoring");
                }
                Ok(image)
            }
            Err(e) => classify_read_error(e),
        }
    }
}

impl ClipboardPort for SystemClipboard {
    fn read_image(&self) -> Option<CapturedImage> {
        read_with_retry(&self.policy, Self::try_read_image)
    }

    fn write_text(&self, text: &str) -> Result<(), ClipboardError> {
        let mut clipboard =
            Clipboard::new().map_err(|e| ClipboardError::Access(e.to_string()))?;
        clipboard
            .clear()
            .map_err(|e| ClipboardError::Set(e.to_string()))?;
        clipboard
            .set_text(text)
            .map_err(|e| ClipboardError::Set(e.to_string()))
    }
}

/// Sort `arboard` read errors into "no image" and "try again".
fn classify_read_error(err: arboard::Error) -> Result<Option<CapturedImage>, ClipboardError> {
    match err {
        arboard::Error::ContentNotAvailable
        | arboard::Error::ClipboardNotSupported
        | arboard::Error::ConversionFailure => Ok(None),
        other => Err(ClipboardError::Busy(other.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_content_is_no_image() {
        assert!(matches!(
            classify_read_error(arboard::Error::ContentNotAvailable),
            Ok(None)
        ));
    }

    #[test]
    fn conversion_failure_is_no_image() {
        assert!(matches!(
            classify_read_error(arboard::Error::ConversionFailure),
            Ok(None)
        ));
    }

    #[test]
    fn occupied_is_transient() {
        let err = classify_read_error(arboard::Error::ClipboardOccupied).unwrap_err();
        assert!(err.is_transient());
    }

    #[test]
    fn from_config_uses_configured_policy() {
        let cfg = ClipboardConfig {
            max_attempts: 2,
            retry_delay_ms: 10,
        };
        let cb = SystemClipboard::from_config(&cfg);
        assert_eq!(cb.policy().attempts, 2);
    }

    #[test]
    fn system_clipboard_is_a_port() {
        let port: Box<dyn ClipboardPort> = Box::new(SystemClipboard::default());
        drop(port);
    }
}
