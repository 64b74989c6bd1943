//! Dedicated OS-thread hotkey listener using `rdev::listen`.
//!
//! `rdev::listen` is a blocking call that must live on its own OS thread.
//! [`HotkeyListener`] owns that thread and a stop flag; dropping it sets the
//! flag so the callback silently ignores further events.
//!
//! # Shutdown caveat
//!
//! `rdev::listen` has no graceful shutdown API.  The thread stays blocked in
//! the rdev event loop until the process exits, which is harmless.
//!
//! rdev stores the callback (and with it the event sender) in a global before
//! it opens the display, so a failed `listen` never drops the sender and the
//! receiver would wait forever.  The thread therefore keeps its own clone of
//! the sender and reports a failed listen as [`HotkeyEvent::Exit`].

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use tokio::sync::mpsc;

use super::{HotkeyBindings, HotkeyEvent};

/// Handle to a running hotkey listener thread.
pub struct HotkeyListener {
    stop: Arc<AtomicBool>,
    /// Never joined: `rdev::listen` does not return while healthy.
    _thread: std::thread::JoinHandle<()>,
}

impl HotkeyListener {
    /// Spawn the listener thread.  Key presses matching `bindings` are sent on
    /// `tx` with `blocking_send`; key releases are ignored.
    ///
    /// # Errors
    ///
    /// Returns the I/O error if the OS refuses to create the thread.
    pub fn start(
        bindings: HotkeyBindings,
        tx: mpsc::Sender<HotkeyEvent>,
    ) -> std::io::Result<Self> {
        let stop = Arc::new(AtomicBool::new(false));
        let stop_clone = Arc::clone(&stop);
        let fail_tx = tx.clone();

        let thread = std::thread::Builder::new()
            .name("hotkey-listener".into())
            .spawn(move || {
                let result = rdev::listen(move |event| {
                    if stop_clone.load(Ordering::Relaxed) {
                        return;
                    }
                    if let rdev::EventType::KeyPress(key) = event.event_type {
                        if let Some(hotkey) = bindings.event_for(key) {
                            log::debug!("hotkey-listener: {key:?} → {hotkey:?}");
                            let _ = tx.blocking_send(hotkey);
                        }
                    }
                });

                exit_on_listen_error(result, &fail_tx);
            })?;

        log::info!(
            "hotkey-listener: toggle = {:?}, exit = {:?}",
            bindings.toggle,
            bindings.exit
        );

        Ok(Self {
            stop,
            _thread: thread,
        })
    }
}

impl Drop for HotkeyListener {
    fn drop(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
    }
}

/// Turn a failed `rdev::listen` into an [`HotkeyEvent::Exit`] so the
/// dispatch loop shuts down instead of waiting on a channel that never
/// closes.  Returns `true` when the exit event was sent.
fn exit_on_listen_error<E: std::fmt::Debug>(
    result: Result<(), E>,
    tx: &mpsc::Sender<HotkeyEvent>,
) -> bool {
    match result {
        Ok(()) => false,
        Err(e) => {
            log::error!("hotkey-listener: rdev::listen exited with error: {e:?}");
            tx.blocking_send(HotkeyEvent::Exit).is_ok()
        }
    }
}
