use crate::pose::types::{DeviceClass, DeviceIndex, RawDevicePose};
use crate::recorder::error::CaptureResult;

#[cfg(feature = "openvr")]
use crate::capture::openvr as backend;

#[cfg(not(feature = "openvr"))]
use crate::capture::unsupported as backend;

/// Source of tracked-device poses.
///
/// Implementations own the runtime session and shut it down on drop.
pub trait TrackingRuntime {
    /// Backend identifier used in logs (e.g., "openvr", "scripted")
    fn id(&self) -> &str;

    /// Block until the runtime's next pose set is ready and return one entry
    /// per device slot, indexed by device index.
    fn wait_get_poses(&mut self) -> CaptureResult<Vec<RawDevicePose>>;

    /// Classification of the device at `index`
    fn device_class(&self, index: DeviceIndex) -> DeviceClass;
}

/// Initialize the VR runtime compiled into this build
pub fn open_runtime() -> CaptureResult<Box<dyn TrackingRuntime>> {
    let runtime = backend::open()?;
    tracing::info!("VR runtime initialized (backend={})", runtime.id());
    Ok(runtime)
}
