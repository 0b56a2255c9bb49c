//! Versioned JSON schema for session files
//!
//! Output shape (version 1), one object per record:
//!
//! ```json
//! {
//!     "t": 0.05,
//!     "hmd_pose": [[tx, ty, tz], [[r00, r01, r02], [r10, r11, r12], [r20, r21, r22]]],
//!     "controller_poses": { "3": [[...], [[...], [...], [...]]] }
//! }
//! ```
//!
//! The in-memory model never derives `Serialize` itself so the file layout
//! only changes through this module.

use crate::pose::types::{DeviceIndex, PoseRecord, Transform};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const SCHEMA_VERSION: u32 = 1;

/// `[translation, rotation]` pair
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TransformV1(pub [f32; 3], pub [[f32; 3]; 3]);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoseRecordV1 {
    pub t: f64,
    pub hmd_pose: TransformV1,
    /// Keys serialize as stringified device indices
    pub controller_poses: BTreeMap<DeviceIndex, TransformV1>,
}

impl From<&Transform> for TransformV1 {
    fn from(t: &Transform) -> Self {
        TransformV1(t.translation, t.rotation)
    }
}

impl From<TransformV1> for Transform {
    fn from(t: TransformV1) -> Self {
        Transform {
            translation: t.0,
            rotation: t.1,
        }
    }
}

impl From<&PoseRecord> for PoseRecordV1 {
    fn from(record: &PoseRecord) -> Self {
        PoseRecordV1 {
            t: record.elapsed_time,
            hmd_pose: TransformV1::from(&record.hmd_transform),
            controller_poses: record
                .controller_transforms
                .iter()
                .map(|(i, t)| (*i, TransformV1::from(t)))
                .collect(),
        }
    }
}

impl From<PoseRecordV1> for PoseRecord {
    fn from(record: PoseRecordV1) -> Self {
        PoseRecord {
            elapsed_time: record.t,
            hmd_transform: record.hmd_pose.into(),
            controller_transforms: record
                .controller_poses
                .into_iter()
                .map(|(i, t)| (i, t.into()))
                .collect(),
        }
    }
}

/// Map a buffer of records onto the current schema
pub fn to_schema(records: &[PoseRecord]) -> Vec<PoseRecordV1> {
    records.iter().map(PoseRecordV1::from).collect()
}
