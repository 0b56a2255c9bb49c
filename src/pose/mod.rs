//! Pose data model
//!
//! Raw per-device poses as reported by the VR runtime, the transforms
//! extracted from them, and the timestamped records a capture session
//! accumulates.

pub mod convert;
pub mod record;
pub mod schema;
pub mod select;
pub mod types;

pub use convert::convert_matrix;
pub use record::build_pose_record;
pub use select::select_controllers;
pub use types::{DeviceClass, DeviceIndex, PoseRecord, RawDevicePose, Transform, HMD_INDEX};
