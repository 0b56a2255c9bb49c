//! Controller selection over a runtime pose snapshot

use crate::pose::types::{DeviceClass, DeviceIndex, RawDevicePose, HMD_INDEX};

/// Indices of connected, validly-tracked controllers, ascending.
///
/// The HMD slot is never considered. Classification is asked of the
/// runtime per index through `classify` and used as-is.
pub fn select_controllers<F>(poses: &[RawDevicePose], classify: F) -> Vec<DeviceIndex>
where
    F: Fn(DeviceIndex) -> DeviceClass,
{
    poses
        .iter()
        .enumerate()
        .skip(HMD_INDEX as usize + 1)
        .filter(|(_, pose)| pose.is_connected && pose.is_valid)
        .map(|(i, _)| i as DeviceIndex)
        .filter(|&i| classify(i) == DeviceClass::Controller)
        .collect()
}
