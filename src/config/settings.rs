//! Application settings structs, defaults and TOML persistence.
//!
//! All structs implement `Serialize`, `Deserialize`, `Default` and `Clone`
//! so they can be round-tripped through TOML files and shared across threads.
//! Every field has a default, so a partial `settings.toml` is valid.

use anyhow::Result;
use serde::{Deserialize, Serialize};

use super::AppPaths;

// ---------------------------------------------------------------------------
// MonitorConfig
// ---------------------------------------------------------------------------

/// Settings for the clipboard polling loop.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    /// Milliseconds between clipboard polls.
    pub poll_interval_ms: u64,
    /// Whether monitoring is active right after startup.
    pub start_enabled: bool,
}

impl MonitorConfig {
    /// Poll interval as a `Duration`, never shorter than 10 ms.
    pub fn poll_interval(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.poll_interval_ms.max(10))
    }
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: 500,
            start_enabled: true,
        }
    }
}

// ---------------------------------------------------------------------------
// ClipboardConfig
// ---------------------------------------------------------------------------

/// Retry behaviour when the clipboard is held by another process.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClipboardConfig {
    /// Read attempts per poll before treating the clipboard as empty.
    pub max_attempts: u32,
    /// Milliseconds to wait between attempts.
    pub retry_delay_ms: u64,
}

impl Default for ClipboardConfig {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            retry_delay_ms: 100,
        }
    }
}

// ---------------------------------------------------------------------------
// RecognizerProvider / RecognizerConfig
// ---------------------------------------------------------------------------

/// Selects which backend turns images into text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RecognizerProvider {
    /// OpenAI-compatible vision chat endpoint (Ollama, LM Studio, vLLM,
    /// hosted APIs).
    Http,
    /// Local OCR program that reads a PNG on stdin and prints text on stdout.
    Command,
}

impl Default for RecognizerProvider {
    fn default() -> Self {
        Self::Http
    }
}

/// Settings for the recognition backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RecognizerConfig {
    /// Which backend to use.
    pub provider: RecognizerProvider,
    /// Base URL of the vision endpoint (Http only).
    pub base_url: String,
    /// API key, `None` for local servers.
    pub api_key: Option<String>,
    /// Model identifier sent to the endpoint (Http only).
    pub model: String,
    /// Instruction sent alongside the image (Http only).
    pub prompt: String,
    /// Seconds to wait for an HTTP response.
    pub timeout_secs: u64,
    /// Program to run (Command only).
    pub command: String,
    /// Arguments passed to `command`.
    pub args: Vec<String>,
}

impl Default for RecognizerConfig {
    fn default() -> Self {
        Self {
            provider: RecognizerProvider::default(),
            base_url: "http://localhost:11434".into(),
            api_key: None,
            model: "qwen2.5vl:3b".into(),
            prompt: "Transcribe the Japanese text in this image exactly. \
                     Reply with the text only."
                .into(),
            timeout_secs: 30,
            command: "tesseract".into(),
            args: vec![
                "stdin".into(),
                "stdout".into(),
                "-l".into(),
                "jpn_vert".into(),
            ],
        }
    }
}

// ---------------------------------------------------------------------------
// HotkeyConfig
// ---------------------------------------------------------------------------

/// Global hotkey bindings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HotkeyConfig {
    /// Key that toggles monitoring on and off (e.g. `"F8"`).
    pub toggle_key: String,
    /// Key that shuts the application down.
    pub exit_key: String,
}

impl Default for HotkeyConfig {
    fn default() -> Self {
        Self {
            toggle_key: "F8".into(),
            exit_key: "Pause".into(),
        }
    }
}

// ---------------------------------------------------------------------------
// AppConfig  (top-level)
// ---------------------------------------------------------------------------

/// Top-level application configuration, serialised as `settings.toml`.
///
/// # Persistence
///
/// ```rust,no_run
/// use clipboard_ocr::config::AppConfig;
///
/// // Load (returns Default when file is missing)
/// let config = AppConfig::load().unwrap();
///
/// // Leave a template for the user on first run
/// let path = clipboard_ocr::config::AppPaths::new().settings_file;
/// config.save_if_missing(&path).unwrap();
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Polling loop settings.
    pub monitor: MonitorConfig,
    /// Clipboard retry settings.
    pub clipboard: ClipboardConfig,
    /// Recognition backend settings.
    pub recognizer: RecognizerConfig,
    /// Global hotkey bindings.
    pub hotkey: HotkeyConfig,
}

impl AppConfig {
    /// Load configuration from the platform-appropriate `settings.toml`.
    ///
    /// Returns `Ok(AppConfig::default())` when the file does not exist yet
    /// (first-run scenario).
    pub fn load() -> Result<Self> {
        Self::load_from(&AppPaths::new().settings_file)
    }

    /// Load from an explicit path.
    pub fn load_from(path: &std::path::Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save to an explicit path.
    pub fn save_to(&self, path: &std::path::Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Write `self` to `path` unless a file is already there, leaving an
    /// editable template on first run.  Returns `true` if a file was written.
    pub fn save_if_missing(&self, path: &std::path::Path) -> Result<bool> {
        if path.exists() {
            return Ok(false);
        }
        self.save_to(path)?;
        Ok(true)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
