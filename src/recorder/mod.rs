//! Capture session recording
//!
//! The keyboard-driven control signal, the sampling loop that turns runtime
//! snapshots into pose records, and the writer that persists a finished
//! session.

pub mod capture_loop;
pub mod control;
pub mod error;
pub mod session;

pub use capture_loop::{CaptureLoop, CaptureStats};
pub use control::{spawn_keyboard_listener, ControlSignal, KeyAction};
pub use error::{CaptureError, CaptureResult};
pub use session::{read_session, write_session, SessionBuffer};
