//! Clipboard access — image capture in, normalised text out.
//!
//! # Overview
//!
//! [`ClipboardPort`] is the seam the monitor loop talks to.  The production
//! implementation, [`SystemClipboard`], wraps `arboard` and opens a fresh
//! handle for every call so the OS clipboard is never held across cycles.
//!
//! Reading is best-effort: lock contention is retried a bounded number of
//! times (see [`RetryPolicy`]) and every "nothing usable" case collapses to
//! `None`.  Writing reports failures as [`ClipboardError`]; the caller decides
//! whether to care.
//!
//! # Usage
//!
//! ```no_run
//! use clipboard_ocr::clipboard::{ClipboardPort, RetryPolicy, SystemClipboard};
//!
//! let clipboard = SystemClipboard::new(RetryPolicy::default());
//! if let Some(image) = clipboard.read_image() {
//!     println!("{}x{} image, fingerprint {}", image.width(), image.height(), image.fingerprint());
//!     let _ = clipboard.write_text("認識結果");
//! }
//! ```

pub mod captured;
pub mod retry;
pub mod system;

pub use captured::CapturedImage;
pub use retry::{read_with_retry, RetryPolicy};
pub use system::SystemClipboard;

use thiserror::Error;

// ---------------------------------------------------------------------------
// ClipboardError
// ---------------------------------------------------------------------------

/// Errors that can surface while talking to the OS clipboard.
#[derive(Debug, Error)]
pub enum ClipboardError {
    /// Another process holds the clipboard, or the handle could not be
    /// acquired right now.  Worth retrying.
    #[error("clipboard is busy: {0}")]
    Busy(String),

    /// Could not open the system clipboard at all.
    #[error("cannot access clipboard: {0}")]
    Access(String),

    /// Could not clear the clipboard or write text into it.
    #[error("cannot set clipboard text: {0}")]
    Set(String),
}

impl ClipboardError {
    /// `true` for contention errors that a short wait may resolve.
    pub fn is_transient(&self) -> bool {
        matches!(self, ClipboardError::Busy(_))
    }
}

// ---------------------------------------------------------------------------
// ClipboardPort
// ---------------------------------------------------------------------------

/// Thread-safe interface to the clipboard.
///
/// Implementations are called from tokio's blocking pool, so they may block
/// (retry sleeps, OS calls) but must be `Send + Sync`.
pub trait ClipboardPort: Send + Sync {
    /// Return the image currently on the clipboard, if any.
    ///
    /// Never fails: no image, an undecodable image, and exhausted retries all
    /// yield `None`.
    fn read_image(&self) -> Option<CapturedImage>;

    /// Replace the clipboard content with `text`.
    fn write_text(&self, text: &str) -> Result<(), ClipboardError>;
}

const _: fn() = || {
    fn _assert_object_safe(_: Box<dyn ClipboardPort>) {}
};

// ---------------------------------------------------------------------------
// FakeClipboard  (test-only)
// ---------------------------------------------------------------------------

/// In-memory clipboard used by the monitor tests.
///
/// Holds at most one image.  Writing text replaces the image, as on a real
/// clipboard.
#[cfg(test)]
#[derive(Default)]
pub struct FakeClipboard {
    image: std::sync::Mutex<Option<CapturedImage>>,
    written: std::sync::Mutex<Vec<String>>,
    reads: std::sync::atomic::AtomicUsize,
    fail_writes: std::sync::atomic::AtomicBool,
}

#[cfg(test)]
impl FakeClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_image(&self, image: CapturedImage) {
        *self.image.lock().unwrap() = Some(image);
    }

    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes
            .store(fail, std::sync::atomic::Ordering::SeqCst);
    }

    pub fn reads(&self) -> usize {
        self.reads.load(std::sync::atomic::Ordering::SeqCst)
    }

    pub fn written(&self) -> Vec<String> {
        self.written.lock().unwrap().clone()
    }
}

#[cfg(test)]
impl ClipboardPort for FakeClipboard {
    fn read_image(&self) -> Option<CapturedImage> {
        self.reads.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        self.image.lock().unwrap().clone()
    }

    fn write_text(&self, text: &str) -> Result<(), ClipboardError> {
        if self.fail_writes.load(std::sync::atomic::Ordering::SeqCst) {
            return Err(ClipboardError::Set("simulated failure".into()));
        }
        *self.image.lock().unwrap() = None;
        self.written.lock().unwrap().push(text.to_string());
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_busy_is_transient() {
        assert!(ClipboardError::Busy("x".into()).is_transient());
        assert!(!ClipboardError::Access("x".into()).is_transient());
        assert!(!ClipboardError::Set("x".into()).is_transient());
    }

    #[test]
    fn error_display_carries_cause() {
        let e = ClipboardError::Set("denied".into());
        assert!(e.to_string().contains("denied"));
    }

    #[test]
    fn fake_write_replaces_image() {
        let fake = FakeClipboard::new();
        fake.set_image(CapturedImage::solid(2, 2, [9, 9, 9, 255]));
        assert!(fake.read_image().is_some());

        fake.write_text("テキスト").unwrap();
        assert!(fake.read_image().is_none());
        assert_eq!(fake.written(), vec!["テキスト".to_string()]);
        assert_eq!(fake.reads(), 2);
    }
}
