//! Clipboard monitor — the background loop and its controller.
//!
//! # Architecture
//!
//! ```text
//! HotkeyEvent (mpsc) ──▶ main thread ──▶ Controller
//!                                          │ toggle(): enabled flag
//!                                          │ shutdown(): watch stop + join
//!                                          ▼
//!                              MonitorLoop::run()  ← tokio task
//!                                          │ every poll interval
//!                                          ├─ spawn_blocking(read_image)
//!                                          ├─ fingerprint dedup
//!                                          ├─ RecognitionEngine::recognize
//!                                          ├─ TextNormalizer::normalize
//!                                          └─ spawn_blocking(write_text)
//!
//! SharedMonitorState (Arc<MonitorState>) ←── read by the controller
//! ```

pub mod controller;
pub mod runner;
pub mod state;

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use controller::Controller;
pub use runner::{CycleOutcome, MonitorLoop};
pub use state::{new_shared_state, MonitorPhase, MonitorState, SharedMonitorState};
