//! Controller — the foreground's handle on the running monitor.
//!
//! Owns the stop signal and the monitor task's join handle.  `toggle` only
//! flips the enable flag; `shutdown` signals the loop and waits for it to
//! exit.

use tokio::runtime::Handle;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use super::runner::MonitorLoop;
use super::state::{MonitorPhase, SharedMonitorState};

/// Handle to a running [`MonitorLoop`].
///
/// ```rust,no_run
/// # use std::sync::Arc;
/// # use std::time::Duration;
/// # use clipboard_ocr::clipboard::{ClipboardPort, SystemClipboard};
/// # use clipboard_ocr::recognize::RecognitionEngine;
/// # use clipboard_ocr::monitor::{new_shared_state, Controller, MonitorLoop};
/// # fn make_recognizer() -> Arc<dyn RecognitionEngine> { unimplemented!() }
/// let rt = tokio::runtime::Runtime::new().unwrap();
/// let clipboard: Arc<dyn ClipboardPort> = Arc::new(SystemClipboard::default());
/// let monitor = MonitorLoop::new(
///     new_shared_state(true),
///     clipboard,
///     make_recognizer(),
///     Duration::from_millis(500),
/// );
///
/// let controller = Controller::spawn(monitor, rt.handle());
/// controller.toggle(); // pause
/// controller.toggle(); // resume
/// rt.block_on(controller.shutdown());
/// ```
pub struct Controller {
    state: SharedMonitorState,
    stop_tx: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl Controller {
    /// Start `monitor` on `runtime` and return its controller.
    pub fn spawn(monitor: MonitorLoop, runtime: &Handle) -> Self {
        let (stop_tx, stop_rx) = watch::channel(false);
        let state = monitor.state();
        let task = runtime.spawn(monitor.run(stop_rx));
        Self {
            state,
            stop_tx,
            task,
        }
    }

    /// Flip monitoring on/off and return the new setting.
    ///
    /// A cycle that is already recognising finishes normally.
    pub fn toggle(&self) -> bool {
        let enabled = self.state.toggle();
        log::info!(
            "controller: monitoring {}",
            if enabled { "enabled" } else { "paused" }
        );
        enabled
    }

    pub fn is_enabled(&self) -> bool {
        self.state.is_enabled()
    }

    pub fn phase(&self) -> MonitorPhase {
        self.state.phase()
    }

    pub fn state(&self) -> SharedMonitorState {
        SharedMonitorState::clone(&self.state)
    }

    /// `false` once the monitor task has exited.
    pub fn is_running(&self) -> bool {
        !self.task.is_finished()
    }

    /// Ask the loop to stop and wait until it has exited.
    ///
    /// An in-flight recognition is not cancelled; the current cycle finishes
    /// first.
    pub async fn shutdown(self) {
        log::info!("controller: shutdown requested");
        // Err only means the loop is already gone.
        let _ = self.stop_tx.send(true);

        match self.task.await {
            Ok(()) => log::info!("controller: monitor joined"),
            Err(e) => log::warn!("controller: monitor task ended abnormally: {e}"),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::{Duration, Instant};

    use super::*;
    use crate::clipboard::{CapturedImage, ClipboardPort, FakeClipboard};
    use crate::monitor::state::new_shared_state;
    use crate::recognize::{MockRecognizer, RecognitionEngine};

    fn spawn(
        interval: Duration,
        recognizer: Arc<MockRecognizer>,
    ) -> (Controller, Arc<FakeClipboard>) {
        let clipboard = Arc::new(FakeClipboard::new());
        let monitor = MonitorLoop::new(
            new_shared_state(true),
            Arc::clone(&clipboard) as Arc<dyn ClipboardPort>,
            recognizer as Arc<dyn RecognitionEngine>,
            interval,
        );
        (Controller::spawn(monitor, &Handle::current()), clipboard)
    }

    async fn wait_until(mut cond: impl FnMut() -> bool) {
        let deadline = Instant::now() + Duration::from_secs(5);
        while !cond() {
            assert!(Instant::now() < deadline, "condition not reached in time");
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    }

    #[tokio::test]
    async fn toggle_twice_restores_enabled() {
        let (controller, _clipboard) =
            spawn(Duration::from_millis(10), Arc::new(MockRecognizer::ok("x")));

        assert!(controller.is_enabled());
        assert!(!controller.toggle());
        assert!(controller.toggle());
        assert!(controller.is_enabled());

        controller.shutdown().await;
    }

    #[tokio::test]
    async fn paused_monitor_does_not_read() {
        let (controller, clipboard) =
            spawn(Duration::from_millis(10), Arc::new(MockRecognizer::ok("x")));

        controller.toggle();
        // Let any cycle that started before the toggle settle.
        tokio::time::sleep(Duration::from_millis(30)).await;
        let before = clipboard.reads();
        tokio::time::sleep(Duration::from_millis(100)).await;

        assert_eq!(clipboard.reads(), before);
        assert_eq!(controller.phase(), MonitorPhase::Idle);
        controller.shutdown().await;
    }

    #[tokio::test]
    async fn loop_processes_copied_image() {
        let mock = Arc::new(MockRecognizer::ok("\"Yes\" he said."));
        let (controller, clipboard) = spawn(Duration::from_millis(10), Arc::clone(&mock));

        clipboard.set_image(CapturedImage::solid(3, 3, [10, 20, 30, 255]));
        wait_until(|| !clipboard.written().is_empty()).await;

        assert_eq!(clipboard.written(), vec!["〝Yes〟hesaid・".to_string()]);
        controller.shutdown().await;
        assert_eq!(mock.calls(), 1);
    }

    #[tokio::test]
    async fn shutdown_joins_and_stops_reads() {
        let (controller, clipboard) =
            spawn(Duration::from_millis(10), Arc::new(MockRecognizer::ok("x")));
        let state = controller.state();

        wait_until(|| clipboard.reads() >= 2).await;
        controller.shutdown().await;

        assert_eq!(state.phase(), MonitorPhase::Stopped);
        let reads = clipboard.reads();
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(clipboard.reads(), reads);
    }

    #[tokio::test]
    async fn stop_is_observed_within_one_interval() {
        let interval = Duration::from_millis(500);
        let (controller, clipboard) = spawn(interval, Arc::new(MockRecognizer::ok("x")));

        // First cycle has run and the loop is now sleeping.
        wait_until(|| clipboard.reads() >= 1).await;
        let started = Instant::now();
        controller.shutdown().await;

        assert!(started.elapsed() < interval, "took {:?}", started.elapsed());
    }

    #[tokio::test]
    async fn shutdown_waits_for_in_flight_recognition() {
        let mock = Arc::new(MockRecognizer::ok("遅い").with_delay(Duration::from_millis(200)));
        let (controller, clipboard) = spawn(Duration::from_millis(10), Arc::clone(&mock));
        let state = controller.state();

        clipboard.set_image(CapturedImage::solid(2, 2, [1, 1, 1, 255]));
        wait_until(|| state.phase() == MonitorPhase::Processing).await;
        controller.shutdown().await;

        assert_eq!(clipboard.written(), vec!["遅い".to_string()]);
        assert_eq!(state.phase(), MonitorPhase::Stopped);
    }

    #[tokio::test]
    async fn pausing_does_not_interrupt_in_flight_recognition() {
        let mock = Arc::new(MockRecognizer::ok("続き").with_delay(Duration::from_millis(100)));
        let (controller, clipboard) = spawn(Duration::from_millis(10), Arc::clone(&mock));
        let state = controller.state();

        clipboard.set_image(CapturedImage::solid(2, 2, [5, 5, 5, 255]));
        wait_until(|| state.phase() == MonitorPhase::Processing).await;
        controller.toggle();
        wait_until(|| !clipboard.written().is_empty()).await;

        assert_eq!(clipboard.written(), vec!["続き".to_string()]);
        assert!(!controller.is_enabled());
        controller.shutdown().await;
    }

    #[tokio::test]
    async fn is_running_reflects_task() {
        let (controller, _clipboard) =
            spawn(Duration::from_millis(10), Arc::new(MockRecognizer::ok("x")));
        assert!(controller.is_running());
        controller.shutdown().await;
    }
}
