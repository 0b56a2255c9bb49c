//! VR runtime backends
//!
//! The capture loop only sees the `TrackingRuntime` trait. OpenVR is the one
//! real backend and needs the `openvr` cargo feature; without it opening the
//! runtime fails with `RuntimeUnavailable`.

pub mod runtime;
pub mod scripted;

#[cfg(feature = "openvr")]
pub mod openvr;

#[cfg(not(feature = "openvr"))]
pub mod unsupported;

pub use runtime::{open_runtime, TrackingRuntime};
pub use scripted::ScriptedRuntime;
