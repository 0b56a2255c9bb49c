use std::collections::BTreeMap;

/// Index of a tracked device, stable for the lifetime of a runtime session
pub type DeviceIndex = u32;

/// Device index reserved for the head-mounted display
pub const HMD_INDEX: DeviceIndex = 0;

/// 3x4 device-to-absolute-tracking matrix, row-major.
/// The leading 3x3 block is rotation, the last column is translation.
pub type Matrix34 = [[f32; 4]; 3];

/// One device's entry in a runtime pose snapshot
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawDevicePose {
    pub device_to_absolute_tracking: Matrix34,
    pub is_connected: bool,
    pub is_valid: bool,
}

impl RawDevicePose {
    pub fn new(matrix: Matrix34, is_connected: bool, is_valid: bool) -> Self {
        Self {
            device_to_absolute_tracking: matrix,
            is_connected,
            is_valid,
        }
    }

    /// Empty slot: identity rotation, origin, not connected, not valid
    pub fn disconnected() -> Self {
        Self::new(
            [
                [1.0, 0.0, 0.0, 0.0],
                [0.0, 1.0, 0.0, 0.0],
                [0.0, 0.0, 1.0, 0.0],
            ],
            false,
            false,
        )
    }
}

/// Device classification as reported by the runtime
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceClass {
    Invalid,
    Hmd,
    Controller,
    GenericTracker,
    TrackingReference,
    DisplayRedirect,
}

impl std::fmt::Display for DeviceClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DeviceClass::Invalid => write!(f, "invalid"),
            DeviceClass::Hmd => write!(f, "hmd"),
            DeviceClass::Controller => write!(f, "controller"),
            DeviceClass::GenericTracker => write!(f, "generic-tracker"),
            DeviceClass::TrackingReference => write!(f, "tracking-reference"),
            DeviceClass::DisplayRedirect => write!(f, "display-redirect"),
        }
    }
}

/// Rigid transform extracted from a device matrix
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub translation: [f32; 3],
    /// Row-major 3x3 rotation
    pub rotation: [[f32; 3]; 3],
}

/// One timestamped pose snapshot
#[derive(Debug, Clone, PartialEq)]
pub struct PoseRecord {
    /// Seconds since capture start, rounded to milliseconds
    pub elapsed_time: f64,
    pub hmd_transform: Transform,
    pub controller_transforms: BTreeMap<DeviceIndex, Transform>,
}
