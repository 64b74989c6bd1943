//! Text normalisation — converts recognised text to Japanese typesetting
//! conventions.
//!
//! # Stages
//!
//! 1. [`map_punctuation`] — Western punctuation → full-width equivalents.
//! 2. [`strip_spaces`] — remove ASCII spaces (Japanese has no inter-word
//!    spacing).  Tabs, newlines and U+3000 are left alone.
//! 3. [`alternate_quotes`] — `"` → 〝 / 〟 by position.
//!
//! Normalisation never fails; empty input yields an empty string.
//!
//! ```
//! use clipboard_ocr::normalize::normalize_text;
//!
//! assert_eq!(normalize_text("Hello, world!"), "Hello、world！");
//! ```

pub mod punctuation;
pub mod quotes;

pub use punctuation::map_punctuation;
pub use quotes::{alternate_quotes, CLOSE_QUOTE, OPEN_QUOTE};

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Remove every ASCII space from `text`.
pub fn strip_spaces(text: &str) -> String {
    text.replace(' ', "")
}

/// Run all three normalisation stages over `text`.
pub fn normalize_text(text: &str) -> String {
    let mapped = map_punctuation(text);
    let compact = strip_spaces(&mapped);
    alternate_quotes(&compact)
}

// ---------------------------------------------------------------------------
// TextNormalizer
// ---------------------------------------------------------------------------

/// Stateless handle over [`normalize_text`], held by the monitor loop.
///
/// Every call starts with fresh quote state; nothing carries over between
/// texts.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextNormalizer;

impl TextNormalizer {
    pub fn new() -> Self {
        Self
    }

    pub fn normalize(&self, text: &str) -> String {
        normalize_text(text)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
