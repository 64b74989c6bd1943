//! Clipboard OCR — watches the clipboard for copied images, recognises the
//! text in them, normalises it to Japanese full-width punctuation and puts
//! the result back on the clipboard.
//!
//! ```text
//! clipboard ──▶ fingerprint ──▶ recognize ──▶ normalize ──▶ clipboard
//!                   ▲
//!   Controller ─────┘ (enable flag, stop signal)
//! ```

pub mod clipboard;
pub mod config;
pub mod fingerprint;
pub mod hotkey;
pub mod monitor;
pub mod normalize;
pub mod recognize;
