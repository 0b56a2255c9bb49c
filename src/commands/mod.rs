//! Command handlers
//!
//! Each handler opens the VR runtime, does its work, and lets the runtime
//! shut down when it goes out of scope.

pub mod capture;
pub mod probe;
