//! Start/stop control signal
//!
//! Two monotonic flags (started, stopped) shared between the keyboard
//! listener and the capture loop. Flags are only ever set, never cleared.
//! The capture loop parks on a condvar while idle so a start request is
//! observed immediately; the idle poll interval bounds the wait if a
//! wakeup is missed.

use crate::recorder::error::CaptureResult;
use parking_lot::{Condvar, Mutex as ParkingMutex};
use std::io::Read;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Upper bound on how long the idle loop sleeps between flag checks
pub const IDLE_POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Effect of a single keypress
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Started,
    Stopped,
    Ignored,
}

#[derive(Default)]
struct Shared {
    started: AtomicBool,
    stopped: AtomicBool,
    lock: ParkingMutex<()>,
    wake: Condvar,
}

/// Cloneable handle to the shared start/stop flags
#[derive(Clone, Default)]
pub struct ControlSignal {
    shared: Arc<Shared>,
}

impl ControlSignal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the start flag. Returns true only for the call that set it.
    pub fn request_start(&self) -> bool {
        let first = !self.shared.started.swap(true, Ordering::AcqRel);
        if first {
            self.notify();
        }
        first
    }

    /// Set the stop flag. Returns true only for the call that set it.
    pub fn request_stop(&self) -> bool {
        let first = !self.shared.stopped.swap(true, Ordering::AcqRel);
        if first {
            self.notify();
        }
        first
    }

    pub fn is_started(&self) -> bool {
        self.shared.started.load(Ordering::Acquire)
    }

    pub fn is_stopped(&self) -> bool {
        self.shared.stopped.load(Ordering::Acquire)
    }

    /// Block until capture is started, or until a stop arrives first.
    ///
    /// Returns true once started, false if the session was stopped before
    /// it ever started.
    pub fn wait_for_start(&self) -> bool {
        let mut guard = self.shared.lock.lock();
        loop {
            if self.is_started() {
                return true;
            }
            if self.is_stopped() {
                return false;
            }
            self.shared.wake.wait_for(&mut guard, IDLE_POLL_INTERVAL);
        }
    }

    /// Apply one byte of keyboard input.
    ///
    /// ENTER starts capture (once). `q` stops it (once), and only after it
    /// has started. Everything else is ignored.
    pub fn handle_key(&self, byte: u8) -> KeyAction {
        match byte {
            b'\n' if self.request_start() => KeyAction::Started,
            b'q' if self.is_started() && self.request_stop() => KeyAction::Stopped,
            _ => KeyAction::Ignored,
        }
    }

    fn notify(&self) {
        let _guard = self.shared.lock.lock();
        self.shared.wake.notify_all();
    }
}

/// Read single bytes from `input` and drive `signal` until input ends.
///
/// End of input (or a read error) is treated as a stop request so a closed
/// stdin never leaves the capture loop waiting forever.
pub fn listen_for_keys<R: Read>(input: R, signal: &ControlSignal) {
    for byte in input.bytes() {
        let byte = match byte {
            Ok(b) => b,
            Err(e) => {
                tracing::warn!("Keyboard input failed: {}", e);
                break;
            }
        };

        match signal.handle_key(byte) {
            KeyAction::Started => println!("Program started capturing."),
            KeyAction::Stopped => println!("Capturing stopped. Exiting."),
            KeyAction::Ignored => {}
        }
    }

    if signal.request_stop() {
        tracing::info!("Keyboard input closed, stopping capture");
    }
}

/// Spawn the keyboard listener on its own thread.
///
/// The thread blocks on input and is never joined; it ends with the process.
pub fn spawn_keyboard_listener<R>(
    input: R,
    signal: ControlSignal,
) -> CaptureResult<std::thread::JoinHandle<()>>
where
    R: Read + Send + 'static,
{
    let handle = std::thread::Builder::new()
        .name("keyboard".to_string())
        .spawn(move || listen_for_keys(input, &signal))?;
    Ok(handle)
}
