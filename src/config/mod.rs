//! Configuration module for Clipboard OCR.
//!
//! Provides `AppConfig` (top-level settings), sub-configs for each subsystem,
//! `AppPaths` for cross-platform config directories, and TOML persistence via
//! `AppConfig::load` / `AppConfig::save`.

pub mod paths;
pub mod settings;

pub use paths::AppPaths;
pub use settings::{
    AppConfig, ClipboardConfig, HotkeyConfig, MonitorConfig, RecognizerConfig, RecognizerProvider,
};
