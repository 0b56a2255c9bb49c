//! OpenVR (SteamVR) backend
//!
//! Poses come from the compositor's `WaitGetPoses`, which blocks until the
//! runtime has the next pose set ready. The render poses are used.

use crate::capture::runtime::TrackingRuntime;
use crate::pose::types::{DeviceClass, DeviceIndex, RawDevicePose};
use crate::recorder::error::{CaptureError, CaptureResult};
use ::openvr::{ApplicationType, Compositor, Context, System, TrackedDeviceClass};

pub struct OpenVrRuntime {
    system: System,
    compositor: Compositor,
    // Dropped last; dropping the context shuts the runtime down
    _context: Context,
}

pub fn open() -> CaptureResult<Box<dyn TrackingRuntime>> {
    let context = unsafe { ::openvr::init(ApplicationType::Scene) }
        .map_err(|e| CaptureError::RuntimeUnavailable(format!("OpenVR init failed: {:?}", e)))?;
    let system = context
        .system()
        .map_err(|e| CaptureError::RuntimeUnavailable(format!("IVRSystem unavailable: {:?}", e)))?;
    let compositor = context.compositor().map_err(|e| {
        CaptureError::RuntimeUnavailable(format!("IVRCompositor unavailable: {:?}", e))
    })?;

    Ok(Box::new(OpenVrRuntime {
        system,
        compositor,
        _context: context,
    }))
}

impl TrackingRuntime for OpenVrRuntime {
    fn id(&self) -> &str {
        "openvr"
    }

    fn wait_get_poses(&mut self) -> CaptureResult<Vec<RawDevicePose>> {
        let poses = self
            .compositor
            .wait_get_poses()
            .map_err(|e| CaptureError::PoseFetchFailure(format!("WaitGetPoses: {:?}", e)))?;

        Ok(poses
            .render
            .iter()
            .map(|pose| {
                RawDevicePose::new(
                    *pose.device_to_absolute_tracking(),
                    pose.device_is_connected(),
                    pose.pose_is_valid(),
                )
            })
            .collect())
    }

    fn device_class(&self, index: DeviceIndex) -> DeviceClass {
        match self.system.tracked_device_class(index) {
            TrackedDeviceClass::HMD => DeviceClass::Hmd,
            TrackedDeviceClass::Controller => DeviceClass::Controller,
            TrackedDeviceClass::GenericTracker => DeviceClass::GenericTracker,
            TrackedDeviceClass::TrackingReference => DeviceClass::TrackingReference,
            TrackedDeviceClass::DisplayRedirect => DeviceClass::DisplayRedirect,
            _ => DeviceClass::Invalid,
        }
    }
}

impl Drop for OpenVrRuntime {
    fn drop(&mut self) {
        tracing::info!("Shutting down OpenVR runtime");
    }
}
