//! PoseRecord construction from a runtime snapshot

use crate::pose::convert::convert_matrix;
use crate::pose::select::select_controllers;
use crate::pose::types::{DeviceClass, DeviceIndex, PoseRecord, RawDevicePose, HMD_INDEX};

/// Whether the snapshot carries a valid head pose
pub fn hmd_pose_is_valid(poses: &[RawDevicePose]) -> bool {
    poses
        .get(HMD_INDEX as usize)
        .map(|pose| pose.is_valid)
        .unwrap_or(false)
}

/// Build the record for one tick.
///
/// An invalid head pose is logged and stored anyway; consumers filter on
/// replay. A snapshot with no HMD slot at all stores the identity transform.
pub fn build_pose_record<F>(elapsed_time: f64, poses: &[RawDevicePose], classify: F) -> PoseRecord
where
    F: Fn(DeviceIndex) -> DeviceClass,
{
    if !hmd_pose_is_valid(poses) {
        tracing::warn!("Caught invalid HMD pose for time {:.3}", elapsed_time);
    }

    let hmd = poses
        .get(HMD_INDEX as usize)
        .copied()
        .unwrap_or_else(RawDevicePose::disconnected);

    let controller_transforms = select_controllers(poses, classify)
        .into_iter()
        .map(|i| (i, convert_matrix(&poses[i as usize].device_to_absolute_tracking)))
        .collect();

    PoseRecord {
        elapsed_time,
        hmd_transform: convert_matrix(&hmd.device_to_absolute_tracking),
        controller_transforms,
    }
}
