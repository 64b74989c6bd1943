//! Global hotkeys — the user's controls for the monitor, backed by `rdev`.
//!
//! Two keys are watched: one toggles monitoring, one exits the application.
//! [`HotkeyListener::start`] runs `rdev::listen` on a dedicated OS thread and
//! forwards [`HotkeyEvent`]s over a `tokio::sync::mpsc` channel; the main
//! thread routes them to the [`Controller`](crate::monitor::Controller).
//!
//! # Usage
//!
//! ```no_run
//! use tokio::sync::mpsc;
//! use clipboard_ocr::config::HotkeyConfig;
//! use clipboard_ocr::hotkey::{HotkeyBindings, HotkeyEvent, HotkeyListener};
//!
//! let (tx, mut rx) = mpsc::channel(16);
//! let bindings = HotkeyBindings::from_config(&HotkeyConfig::default());
//! let _listener = HotkeyListener::start(bindings, tx).expect("listener thread");
//!
//! while let Some(event) = rx.blocking_recv() {
//!     if event == HotkeyEvent::Exit {
//!         break;
//!     }
//! }
//! ```

pub mod listener;

pub use listener::HotkeyListener;

use rdev::Key;

use crate::config::HotkeyConfig;

// ---------------------------------------------------------------------------
// HotkeyEvent
// ---------------------------------------------------------------------------

/// Events emitted by the hotkey listener thread.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HotkeyEvent {
    /// Switch clipboard monitoring on or off.
    ToggleMonitoring,
    /// Stop monitoring and quit.
    Exit,
}

// ---------------------------------------------------------------------------
// HotkeyBindings
// ---------------------------------------------------------------------------

/// Which physical keys trigger which [`HotkeyEvent`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HotkeyBindings {
    pub toggle: Key,
    pub exit: Key,
}

impl Default for HotkeyBindings {
    fn default() -> Self {
        Self {
            toggle: Key::F8,
            exit: Key::Pause,
        }
    }
}

impl HotkeyBindings {
    /// Resolve key names from config, falling back to the defaults for names
    /// that [`parse_key`] does not know.
    pub fn from_config(config: &HotkeyConfig) -> Self {
        let defaults = Self::default();
        let resolve = |name: &str, fallback: Key| {
            parse_key(name).unwrap_or_else(|| {
                log::warn!("hotkey: unknown key {name:?}, using {fallback:?}");
                fallback
            })
        };

        let bindings = Self {
            toggle: resolve(&config.toggle_key, defaults.toggle),
            exit: resolve(&config.exit_key, defaults.exit),
        };
        if bindings.toggle == bindings.exit {
            log::warn!(
                "hotkey: toggle and exit share {:?}; the key will exit",
                bindings.exit
            );
        }
        bindings
    }

    /// The event a press of `key` should produce, if any.
    pub fn event_for(&self, key: Key) -> Option<HotkeyEvent> {
        if key == self.exit {
            Some(HotkeyEvent::Exit)
        } else if key == self.toggle {
            Some(HotkeyEvent::ToggleMonitoring)
        } else {
            None
        }
    }
}

// ---------------------------------------------------------------------------
// parse_key
// ---------------------------------------------------------------------------

const FUNCTION_KEYS: [Key; 12] = [
    Key::F1,
    Key::F2,
    Key::F3,
    Key::F4,
    Key::F5,
    Key::F6,
    Key::F7,
    Key::F8,
    Key::F9,
    Key::F10,
    Key::F11,
    Key::F12,
];

const LETTER_KEYS: [Key; 26] = [
    Key::KeyA,
    Key::KeyB,
    Key::KeyC,
    Key::KeyD,
    Key::KeyE,
    Key::KeyF,
    Key::KeyG,
    Key::KeyH,
    Key::KeyI,
    Key::KeyJ,
    Key::KeyK,
    Key::KeyL,
    Key::KeyM,
    Key::KeyN,
    Key::KeyO,
    Key::KeyP,
    Key::KeyQ,
    Key::KeyR,
    Key::KeyS,
    Key::KeyT,
    Key::KeyU,
    Key::KeyV,
    Key::KeyW,
    Key::KeyX,
    Key::KeyY,
    Key::KeyZ,
];

const NAMED_KEYS: &[(&str, Key)] = &[
    ("escape", Key::Escape),
    ("esc", Key::Escape),
    ("space", Key::Space),
    ("tab", Key::Tab),
    ("insert", Key::Insert),
    ("ins", Key::Insert),
    ("delete", Key::Delete),
    ("del", Key::Delete),
    ("home", Key::Home),
    ("end", Key::End),
    ("pageup", Key::PageUp),
    ("pagedown", Key::PageDown),
    ("capslock", Key::CapsLock),
    ("numlock", Key::NumLock),
    ("scrolllock", Key::ScrollLock),
    ("printscreen", Key::PrintScreen),
    ("pause", Key::Pause),
];

/// Parse a key name from the config file into an [`rdev::Key`].
///
/// Accepts `F1`–`F12`, single letters, and a handful of named keys
/// (`Pause`, `ScrollLock`, `Insert`, …), case-insensitively.  Modifier
/// combinations are not supported.
///
/// ```
/// use clipboard_ocr::hotkey::parse_key;
///
/// assert_eq!(parse_key("F8"), Some(rdev::Key::F8));
/// assert_eq!(parse_key("pause"), Some(rdev::Key::Pause));
/// assert_eq!(parse_key("q"), Some(rdev::Key::KeyQ));
/// assert_eq!(parse_key("Ctrl+V"), None);
/// ```
pub fn parse_key(key_str: &str) -> Option<Key> {
    let name = key_str.trim().to_ascii_lowercase();

    if let Some(n) = name.strip_prefix('f').and_then(|n| n.parse::<usize>().ok()) {
        return n.checked_sub(1).and_then(|i| FUNCTION_KEYS.get(i)).copied();
    }

    let mut chars = name.chars();
    if let (Some(c), None) = (chars.next(), chars.next()) {
        if c.is_ascii_lowercase() {
            return Some(LETTER_KEYS[(c as u8 - b'a') as usize]);
        }
    }

    NAMED_KEYS
        .iter()
        .find(|(n, _)| *n == name)
        .map(|(_, key)| *key)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
