//! Monitor loop — drives the clipboard → recognise → normalise → clipboard
//! cycle.
//!
//! # Cycle
//!
//! ```text
//! enabled? ──no──▶ Idle                               [Disabled]
//!    │yes
//! spawn_blocking(read_image) ──None──▶ Polling        [NoImage]
//!    │Some(image)
//! fingerprint == last? ──yes──▶ Polling               [Duplicate]
//!    │no
//! recognize (async)            [Processing]
//!    ├─ Err ──▶ Polling, fingerprint untouched         [RecognitionFailed]
//!    └─ Ok  ──▶ normalize → spawn_blocking(write_text)
//!               → remember fingerprint → Polling       [Written | WriteFailed]
//! ```
//!
//! Between cycles the loop sleeps for the poll interval, waking early when
//! the stop signal changes.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;

use crate::clipboard::ClipboardPort;
use crate::fingerprint::Fingerprint;
use crate::normalize::TextNormalizer;
use crate::recognize::RecognitionEngine;

use super::state::{MonitorPhase, SharedMonitorState};

// ---------------------------------------------------------------------------
// CycleOutcome
// ---------------------------------------------------------------------------

/// What a single poll cycle did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleOutcome {
    /// Monitoring is off; the clipboard was not touched.
    Disabled,
    /// The clipboard held no usable image.
    NoImage,
    /// Same image as the last recognised one.
    Duplicate,
    /// The recognition engine failed; the image will be tried again.
    RecognitionFailed,
    /// Normalised text was written to the clipboard.
    Written,
    /// Text was recognised but the clipboard write failed.
    WriteFailed,
}

// ---------------------------------------------------------------------------
// MonitorLoop
// ---------------------------------------------------------------------------

/// The background polling loop.
///
/// Create with [`MonitorLoop::new`], then hand it to
/// [`Controller::spawn`](super::Controller::spawn).
pub struct MonitorLoop {
    state: SharedMonitorState,
    clipboard: Arc<dyn ClipboardPort>,
    recognizer: Arc<dyn RecognitionEngine>,
    normalizer: TextNormalizer,
    interval: Duration,
    /// Last image the engine failed on, so repeated failures log quietly.
    last_failed: Option<Fingerprint>,
}

impl MonitorLoop {
    pub fn new(
        state: SharedMonitorState,
        clipboard: Arc<dyn ClipboardPort>,
        recognizer: Arc<dyn RecognitionEngine>,
        interval: Duration,
    ) -> Self {
        Self {
            state,
            clipboard,
            recognizer,
            normalizer: TextNormalizer::new(),
            interval,
            last_failed: None,
        }
    }

    pub fn state(&self) -> SharedMonitorState {
        Arc::clone(&self.state)
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    // -----------------------------------------------------------------------
    // Main async loop
    // -----------------------------------------------------------------------

    /// Poll until `stop_rx` carries `true` or its sender is dropped.
    ///
    /// The stop signal is checked between cycles only; a cycle that is
    /// already recognising runs to completion first.
    pub async fn run(mut self, mut stop_rx: watch::Receiver<bool>) {
        log::info!(
            "monitor: started (interval {} ms, {})",
            self.interval.as_millis(),
            self.state.phase().label()
        );

        loop {
            if *stop_rx.borrow_and_update() {
                break;
            }

            let outcome = self.run_cycle().await;
            log::trace!("monitor: cycle finished: {outcome:?}");

            tokio::select! {
                _ = tokio::time::sleep(self.interval) => {}
                changed = stop_rx.changed() => {
                    if changed.is_err() {
                        log::debug!("monitor: controller dropped, stopping");
                        break;
                    }
                }
            }
        }

        self.state.set_phase(MonitorPhase::Stopped);
        log::info!("monitor: stopped");
    }

    // -----------------------------------------------------------------------
    // One cycle
    // -----------------------------------------------------------------------

    /// Run a single poll cycle.
    pub async fn run_cycle(&mut self) -> CycleOutcome {
        if !self.state.is_enabled() {
            self.state.set_phase(MonitorPhase::Idle);
            return CycleOutcome::Disabled;
        }
        self.state.set_phase(MonitorPhase::Polling);

        // ── 1. Read (blocking → thread pool) ─────────────────────────────
        let clipboard = Arc::clone(&self.clipboard);
        let image = match tokio::task::spawn_blocking(move || clipboard.read_image()).await {
            Ok(Some(image)) => image,
            Ok(None) => return CycleOutcome::NoImage,
            Err(e) => {
                log::warn!("monitor: clipboard read task failed: {e}");
                return CycleOutcome::NoImage;
            }
        };

        // ── 2. Dedup ─────────────────────────────────────────────────────
        let fingerprint = image.fingerprint();
        if self.state.last_fingerprint() == Some(fingerprint) {
            log::debug!("monitor: image {} unchanged, skipping", fingerprint.short());
            return CycleOutcome::Duplicate;
        }

        // ── 3. Recognise ─────────────────────────────────────────────────
        log::info!(
            "monitor: new {}x{} image {}",
            image.width(),
            image.height(),
            fingerprint.short()
        );
        self.state.set_phase(MonitorPhase::Processing);

        let result = self.recognizer.recognize(&image).await;
        drop(image);

        let raw_text = match result {
            Ok(text) => {
                self.last_failed = None;
                text
            }
            Err(e) => {
                if self.last_failed == Some(fingerprint) {
                    log::debug!("monitor: recognition failed again for {}: {e}", fingerprint.short());
                } else {
                    log::warn!("monitor: recognition failed for {}: {e}", fingerprint.short());
                    self.last_failed = Some(fingerprint);
                }
                self.state.set_phase(MonitorPhase::Polling);
                return CycleOutcome::RecognitionFailed;
            }
        };

        // ── 4. Normalise ─────────────────────────────────────────────────
        let text = self.normalizer.normalize(&raw_text);
        log::debug!("monitor: recognised {raw_text:?} → {text:?}");

        // ── 5. Write (blocking → thread pool) ────────────────────────────
        let clipboard = Arc::clone(&self.clipboard);
        let write_result = tokio::task::spawn_blocking(move || clipboard.write_text(&text)).await;

        self.state.set_last_fingerprint(fingerprint);
        self.state.set_phase(MonitorPhase::Polling);

        match write_result {
            Ok(Ok(())) => CycleOutcome::Written,
            Ok(Err(e)) => {
                log::warn!("monitor: clipboard write failed: {e}");
                CycleOutcome::WriteFailed
            }
            Err(e) => {
                log::warn!("monitor: clipboard write task failed: {e}");
                CycleOutcome::WriteFailed
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
