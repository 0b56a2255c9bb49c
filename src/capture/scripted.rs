//! Scripted in-memory runtime
//!
//! Replays a fixed list of pose snapshots. Used to drive the capture loop
//! without a headset attached.

use crate::capture::runtime::TrackingRuntime;
use crate::pose::types::{DeviceClass, DeviceIndex, RawDevicePose, HMD_INDEX};
use crate::recorder::control::ControlSignal;
use crate::recorder::error::{CaptureError, CaptureResult};
use std::collections::{HashMap, VecDeque};

/// What happens once every scripted snapshot has been handed out
enum Exhausted {
    /// Further fetches fail with `PoseFetchFailure`
    Fail,
    /// The fetch that returns the last snapshot also requests a stop
    Stop(ControlSignal),
}

pub struct ScriptedRuntime {
    frames: VecDeque<Vec<RawDevicePose>>,
    classes: HashMap<DeviceIndex, DeviceClass>,
    on_exhausted: Exhausted,
    fetch_count: usize,
}

impl ScriptedRuntime {
    pub fn new(frames: Vec<Vec<RawDevicePose>>) -> Self {
        let mut classes = HashMap::new();
        classes.insert(HMD_INDEX, DeviceClass::Hmd);
        Self {
            frames: frames.into(),
            classes,
            on_exhausted: Exhausted::Fail,
            fetch_count: 0,
        }
    }

    /// Report `class` for the device at `index` (unlisted devices are `Invalid`)
    pub fn with_device_class(mut self, index: DeviceIndex, class: DeviceClass) -> Self {
        self.classes.insert(index, class);
        self
    }

    /// Request a stop on `signal` when the last snapshot is fetched
    pub fn stop_when_exhausted(mut self, signal: ControlSignal) -> Self {
        self.on_exhausted = Exhausted::Stop(signal);
        self
    }

    /// Number of successful fetches so far
    pub fn fetch_count(&self) -> usize {
        self.fetch_count
    }
}

impl TrackingRuntime for ScriptedRuntime {
    fn id(&self) -> &str {
        "scripted"
    }

    fn wait_get_poses(&mut self) -> CaptureResult<Vec<RawDevicePose>> {
        let frame = self.frames.pop_front().ok_or_else(|| {
            CaptureError::PoseFetchFailure("scripted runtime has no more snapshots".to_string())
        })?;
        self.fetch_count += 1;

        if self.frames.is_empty() {
            if let Exhausted::Stop(signal) = &self.on_exhausted {
                signal.request_stop();
            }
        }

        Ok(frame)
    }

    fn device_class(&self, index: DeviceIndex) -> DeviceClass {
        self.classes
            .get(&index)
            .copied()
            .unwrap_or(DeviceClass::Invalid)
    }
}
