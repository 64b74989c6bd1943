//! Application entry point — Clipboard OCR.
//!
//! # Startup sequence
//!
//! 1. Initialise logging.
//! 2. Load [`AppConfig`] from disk; on first run write the defaults there.
//! 3. Create the [`tokio`] runtime (multi-thread, 2 workers).
//! 4. Build the recognition backend.  Failure here is fatal: `main` returns
//!    the error and the process exits non-zero before monitoring starts.
//! 5. Spawn the monitor loop and get its [`Controller`].
//! 6. Spawn the hotkey listener thread.
//! 7. Dispatch hotkey events on the main thread until Exit.
//! 8. Shut the monitor down, wait for it, exit 0.

use std::sync::Arc;

use anyhow::Context;
use tokio::sync::mpsc;

use clipboard_ocr::{
    clipboard::{ClipboardPort, SystemClipboard},
    config::{AppConfig, AppPaths},
    hotkey::{HotkeyBindings, HotkeyEvent, HotkeyListener},
    monitor::{new_shared_state, Controller, MonitorLoop},
    recognize::build_recognizer,
};

fn main() -> anyhow::Result<()> {
    // 1. Logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Clipboard OCR starting up");

    // 2. Configuration
    let paths = AppPaths::new();
    let config = AppConfig::load().unwrap_or_else(|e| {
        log::warn!("Failed to load config ({e}); using defaults");
        AppConfig::default()
    });
    match config.save_if_missing(&paths.settings_file) {
        Ok(true) => log::info!("Wrote default settings to {}", paths.settings_file.display()),
        Ok(false) => {}
        Err(e) => log::warn!("Could not write default settings: {e}"),
    }

    // 3. Tokio runtime
    let rt = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .build()
        .context("failed to create tokio runtime")?;

    // 4. Recognition backend
    let recognizer = build_recognizer(&config.recognizer)
        .context("recognition engine unavailable")?;
    log::info!("Recognizer ready ({:?})", config.recognizer.provider);

    // 5. Monitor loop
    let clipboard: Arc<dyn ClipboardPort> =
        Arc::new(SystemClipboard::from_config(&config.clipboard));
    let monitor = MonitorLoop::new(
        new_shared_state(config.monitor.start_enabled),
        clipboard,
        recognizer,
        config.monitor.poll_interval(),
    );
    let controller = Controller::spawn(monitor, rt.handle());

    // 6. Hotkey listener
    let (hotkey_tx, mut hotkey_rx) = mpsc::channel::<HotkeyEvent>(16);
    let bindings = HotkeyBindings::from_config(&config.hotkey);
    let _hotkey_listener = HotkeyListener::start(bindings, hotkey_tx)
        .context("failed to spawn hotkey-listener thread")?;

    // 7. Foreground dispatch
    loop {
        match hotkey_rx.blocking_recv() {
            Some(HotkeyEvent::ToggleMonitoring) => {
                controller.toggle();
            }
            Some(HotkeyEvent::Exit) => {
                log::info!("Exit requested");
                break;
            }
            None => {
                log::warn!("Hotkey listener stopped; shutting down");
                break;
            }
        }
    }

    // 8. Shutdown
    rt.block_on(controller.shutdown());
    log::info!("Clipboard OCR stopped");
    Ok(())
}
