use crate::capture::runtime::TrackingRuntime;
use crate::recorder::error::{CaptureError, CaptureResult};

pub fn open() -> CaptureResult<Box<dyn TrackingRuntime>> {
    Err(CaptureError::RuntimeUnavailable(
        "built without OpenVR support (rebuild with `--features openvr`)".to_string(),
    ))
}
