//! Monitor phase machine and the state shared with the controller.
//!
//! [`MonitorState`] is the only mutable data shared between the foreground
//! (hotkeys / controller) and the background monitor task.  The enable flag is
//! an atomic; the last fingerprint and phase sit behind short-lived mutexes
//! that are never held across an `.await`.  The stop signal is not stored
//! here, it travels over the controller's `watch` channel.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::fingerprint::Fingerprint;

// ---------------------------------------------------------------------------
// MonitorPhase
// ---------------------------------------------------------------------------

/// States of the monitor loop.
///
/// ```text
/// Polling ──image with new fingerprint──▶ Processing ──done / failed──▶ Polling
/// Polling ──disabled──▶ Idle ──enabled──▶ Polling
/// any ──stop signal (between cycles)──▶ Stopped
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonitorPhase {
    /// Monitoring is switched off; the clipboard is not read.
    Idle,

    /// Waiting for the next poll.
    Polling,

    /// Recognition, normalisation and the clipboard write are in flight.
    Processing,

    /// The loop has exited.  Terminal.
    Stopped,
}

impl MonitorPhase {
    /// `true` while a recognition cycle is in flight.
    ///
    /// ```
    /// use clipboard_ocr::monitor::MonitorPhase;
    ///
    /// assert!(MonitorPhase::Processing.is_busy());
    /// assert!(!MonitorPhase::Polling.is_busy());
    /// ```
    pub fn is_busy(&self) -> bool {
        matches!(self, MonitorPhase::Processing)
    }

    /// A short human-readable label for log lines.
    pub fn label(&self) -> &'static str {
        match self {
            MonitorPhase::Idle => "Paused",
            MonitorPhase::Polling => "Watching",
            MonitorPhase::Processing => "Recognising",
            MonitorPhase::Stopped => "Stopped",
        }
    }
}

impl Default for MonitorPhase {
    fn default() -> Self {
        MonitorPhase::Polling
    }
}

// ---------------------------------------------------------------------------
// MonitorState
// ---------------------------------------------------------------------------

/// Process-wide monitor state.
#[derive(Debug)]
pub struct MonitorState {
    enabled: AtomicBool,
    last_fingerprint: Mutex<Option<Fingerprint>>,
    phase: Mutex<MonitorPhase>,
}

impl MonitorState {
    /// Initial phase is `Polling` when `enabled`, `Idle` otherwise.
    pub fn new(enabled: bool) -> Self {
        let phase = if enabled {
            MonitorPhase::Polling
        } else {
            MonitorPhase::Idle
        };
        Self {
            enabled: AtomicBool::new(enabled),
            last_fingerprint: Mutex::new(None),
            phase: Mutex::new(phase),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::SeqCst)
    }

    pub fn set_enabled(&self, enabled: bool) {
        self.enabled.store(enabled, Ordering::SeqCst);
    }

    /// Flip the enable flag and return the new value.
    pub fn toggle(&self) -> bool {
        !self.enabled.fetch_xor(true, Ordering::SeqCst)
    }

    /// Fingerprint of the last image that was recognised.
    pub fn last_fingerprint(&self) -> Option<Fingerprint> {
        *lock(&self.last_fingerprint)
    }

    pub(crate) fn set_last_fingerprint(&self, fingerprint: Fingerprint) {
        *lock(&self.last_fingerprint) = Some(fingerprint);
    }

    pub fn phase(&self) -> MonitorPhase {
        *lock(&self.phase)
    }

    pub(crate) fn set_phase(&self, phase: MonitorPhase) {
        *lock(&self.phase) = phase;
    }
}

impl Default for MonitorState {
    fn default() -> Self {
        Self::new(true)
    }
}

/// A poisoned lock still holds a valid `Option`/enum; keep using it.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

// ---------------------------------------------------------------------------
// SharedMonitorState
// ---------------------------------------------------------------------------

/// Thread-safe handle to [`MonitorState`].  Cheap to clone.
pub type SharedMonitorState = Arc<MonitorState>;

/// Construct a new [`SharedMonitorState`].
pub fn new_shared_state(enabled: bool) -> SharedMonitorState {
    Arc::new(MonitorState::new(enabled))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
