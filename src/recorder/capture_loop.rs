//! Pose capture sampling loop
//!
//! `Idle -> Capturing -> Stopped`. While idle nothing is polled. While
//! capturing, each tick fetches the runtime's next pose set, stamps it with
//! the time since capture start and appends a record, then sleeps for the
//! rest of the sampling period. The stop flag is checked once per tick,
//! before fetching, so a tick that has begun always completes.

use crate::capture::runtime::TrackingRuntime;
use crate::pose::record::{build_pose_record, hmd_pose_is_valid};
use crate::pose::types::DeviceIndex;
use crate::recorder::control::ControlSignal;
use crate::recorder::error::{CaptureError, CaptureResult};
use crate::recorder::session::SessionBuffer;
use std::collections::BTreeSet;
use std::time::{Duration, Instant};

/// Default sampling frequency in Hz
pub const DEFAULT_FREQUENCY_HZ: f64 = 20.0;

/// Counters for one capture session
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CaptureStats {
    pub ticks: usize,
    /// Ticks whose HMD pose was flagged invalid (recorded anyway)
    pub invalid_hmd_ticks: usize,
    /// Ticks whose fetch and processing took longer than the period
    pub overrun_ticks: usize,
}

/// Round seconds to millisecond precision
pub fn round_millis(secs: f64) -> f64 {
    (secs * 1000.0).round() / 1000.0
}

/// Sampling period for a target frequency
pub fn sampling_period(frequency_hz: f64) -> CaptureResult<Duration> {
    if !frequency_hz.is_finite() || frequency_hz <= 0.0 {
        return Err(CaptureError::ConfigurationError(format!(
            "sampling frequency must be a positive number of Hz, got {}",
            frequency_hz
        )));
    }
    Duration::try_from_secs_f64(1.0 / frequency_hz).map_err(|e| {
        CaptureError::ConfigurationError(format!(
            "sampling frequency of {} Hz gives an unusable period: {}",
            frequency_hz, e
        ))
    })
}

pub struct CaptureLoop<'a, R: TrackingRuntime + ?Sized> {
    runtime: &'a mut R,
    signal: ControlSignal,
    period: Duration,
    max_duration: Option<Duration>,
    stats: CaptureStats,
    tracked_controllers: BTreeSet<DeviceIndex>,
}

impl<'a, R: TrackingRuntime + ?Sized> CaptureLoop<'a, R> {
    pub fn new(runtime: &'a mut R, signal: ControlSignal, frequency_hz: f64) -> CaptureResult<Self> {
        Ok(Self {
            runtime,
            signal,
            period: sampling_period(frequency_hz)?,
            max_duration: None,
            stats: CaptureStats::default(),
            tracked_controllers: BTreeSet::new(),
        })
    }

    /// Stop on its own once this much capture time has elapsed
    pub fn with_max_duration(mut self, max_duration: Duration) -> Self {
        self.max_duration = Some(max_duration);
        self
    }

    pub fn stats(&self) -> CaptureStats {
        self.stats
    }

    /// Run the session to completion, appending records to `buffer`.
    ///
    /// Returns false if the session was stopped before capture ever started.
    /// Records captured before a pose-fetch failure stay in `buffer`; the
    /// error is returned without retrying.
    pub fn run(&mut self, buffer: &mut SessionBuffer) -> CaptureResult<bool> {
        if !self.signal.wait_for_start() {
            tracing::info!("Capture stopped before it started");
            return Ok(false);
        }

        let start = Instant::now();
        tracing::info!(
            "Capture started (runtime={}, period={:?})",
            self.runtime.id(),
            self.period
        );

        loop {
            if self.signal.is_stopped() {
                break;
            }
            if let Some(limit) = self.max_duration {
                if start.elapsed() >= limit {
                    tracing::info!("Capture duration of {:?} reached", limit);
                    self.signal.request_stop();
                    break;
                }
            }

            let tick_start = Instant::now();
            self.tick(start, buffer)?;

            let work = tick_start.elapsed();
            if work < self.period {
                std::thread::sleep(self.period - work);
            } else {
                self.stats.overrun_ticks += 1;
                tracing::debug!("Tick overran sampling period ({:?} > {:?})", work, self.period);
            }
        }

        tracing::info!(
            "Capture stopped (ticks={}, invalid_hmd={}, overruns={})",
            self.stats.ticks,
            self.stats.invalid_hmd_ticks,
            self.stats.overrun_ticks
        );
        Ok(true)
    }

    fn tick(&mut self, start: Instant, buffer: &mut SessionBuffer) -> CaptureResult<()> {
        let poses = self.runtime.wait_get_poses()?;
        let t = round_millis(start.elapsed().as_secs_f64());

        if !hmd_pose_is_valid(&poses) {
            self.stats.invalid_hmd_ticks += 1;
        }

        let runtime: &R = &*self.runtime;
        let record = build_pose_record(t, &poses, |i| runtime.device_class(i));

        let current: BTreeSet<DeviceIndex> = record.controller_transforms.keys().copied().collect();
        for &i in current.difference(&self.tracked_controllers) {
            tracing::info!(
                "Device tracked (index={}, class={}, t={:.3})",
                i,
                runtime.device_class(i),
                t
            );
        }
        for &i in self.tracked_controllers.difference(&current) {
            tracing::info!("Device lost (index={}, t={:.3})", i, t);
        }
        self.tracked_controllers = current;

        buffer.push(record);
        self.stats.ticks += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::scripted::ScriptedRuntime;
    use crate::pose::types::{DeviceClass, RawDevicePose};

    fn hmd(valid: bool) -> RawDevicePose {
        RawDevicePose::new(
            [
                [1.0, 0.0, 0.0, 0.0],
                [0.0, 1.0, 0.0, 1.7],
                [0.0, 0.0, 1.0, 0.0],
            ],
            true,
            valid,
        )
    }

    fn controller(x: f32) -> RawDevicePose {
        RawDevicePose::new(
            [
                [1.0, 0.0, 0.0, x],
                [0.0, 1.0, 0.0, 1.0],
                [0.0, 0.0, 1.0, -0.2],
            ],
            true,
            true,
        )
    }

    fn started_signal() -> ControlSignal {
        let signal = ControlSignal::new();
        signal.request_start();
        signal
    }

    #[test]
    fn test_round_millis() {
        assert_eq!(round_millis(0.0), 0.0);
        assert_eq!(round_millis(0.0504), 0.05);
        assert_eq!(round_millis(1.23456), 1.235);
    }

    #[test]
    fn test_rejects_bad_frequency() {
        for hz in [0.0, -5.0, f64::NAN, f64::INFINITY] {
            assert!(matches!(
                sampling_period(hz),
                Err(CaptureError::ConfigurationError(_))
            ));
        }
        assert_eq!(sampling_period(20.0).unwrap(), Duration::from_millis(50));
    }

    #[test]
    fn test_rejects_frequency_with_overflowing_period() {
        assert!(matches!(
            sampling_period(1e-300),
            Err(CaptureError::ConfigurationError(_))
        ));
    }

    #[test]
    fn test_three_ticks_at_twenty_hz() {
        let signal = started_signal();
        let frames = vec![vec![hmd(true)]; 3];
        let mut runtime = ScriptedRuntime::new(frames).stop_when_exhausted(signal.clone());
        let mut buffer = SessionBuffer::new();

        let mut capture = CaptureLoop::new(&mut runtime, signal, 20.0).unwrap();
        capture.run(&mut buffer).unwrap();
        assert_eq!(capture.stats().ticks, 3);

        let times: Vec<f64> = buffer.records().iter().map(|r| r.elapsed_time).collect();
        assert_eq!(times.len(), 3);
        assert!(times[0] < 0.05, "first tick at {}", times[0]);
        assert!(times[1] >= 0.05 && times[1] < 1.0, "second tick at {}", times[1]);
        assert!(times[2] >= 0.1 && times[2] < 1.0, "third tick at {}", times[2]);
        assert!(times.windows(2).all(|w| w[0] <= w[1]));
        assert!(buffer
            .records()
            .iter()
            .all(|r| r.controller_transforms.is_empty()));
    }

    #[test]
    fn test_no_tick_after_stop_observed() {
        let signal = started_signal();
        let frames = vec![vec![hmd(true)]; 2];
        // A third fetch would fail, so a clean run proves no tick started after stop
        let mut runtime = ScriptedRuntime::new(frames).stop_when_exhausted(signal.clone());
        let mut buffer = SessionBuffer::new();

        CaptureLoop::new(&mut runtime, signal, 200.0)
            .unwrap()
            .run(&mut buffer)
            .unwrap();

        assert_eq!(buffer.len(), 2);
        assert_eq!(runtime.fetch_count(), 2);
    }

    #[test]
    fn test_stopped_before_start_never_polls() {
        let signal = ControlSignal::new();
        signal.request_stop();
        let mut runtime = ScriptedRuntime::new(vec![vec![hmd(true)]]);
        let mut buffer = SessionBuffer::new();

        let captured = CaptureLoop::new(&mut runtime, signal, 20.0)
            .unwrap()
            .run(&mut buffer)
            .unwrap();

        assert!(!captured);
        assert!(buffer.is_empty());
        assert_eq!(runtime.fetch_count(), 0);
    }

    #[test]
    fn test_invalid_hmd_tick_is_kept() {
        let signal = started_signal();
        let frames = vec![vec![hmd(true)], vec![hmd(false)], vec![hmd(true)]];
        let mut runtime = ScriptedRuntime::new(frames).stop_when_exhausted(signal.clone());
        let mut buffer = SessionBuffer::new();

        let mut capture = CaptureLoop::new(&mut runtime, signal, 200.0).unwrap();
        capture.run(&mut buffer).unwrap();

        assert_eq!(buffer.len(), 3);
        assert_eq!(capture.stats().invalid_hmd_ticks, 1);
        assert_eq!(buffer.records()[1].hmd_transform.translation, [0.0, 1.7, 0.0]);
    }

    #[test]
    fn test_controllers_follow_connectivity() {
        let signal = started_signal();
        let mut unplugged = controller(0.4);
        unplugged.is_connected = false;
        let frames = vec![
            vec![hmd(true), controller(-0.4), controller(0.4)],
            vec![hmd(true), controller(-0.4), unplugged],
        ];
        let mut runtime = ScriptedRuntime::new(frames)
            .with_device_class(1, DeviceClass::Controller)
            .with_device_class(2, DeviceClass::Controller)
            .stop_when_exhausted(signal.clone());
        let mut buffer = SessionBuffer::new();

        CaptureLoop::new(&mut runtime, signal, 200.0)
            .unwrap()
            .run(&mut buffer)
            .unwrap();

        let records = buffer.records();
        assert_eq!(records[0].controller_transforms.len(), 2);
        assert_eq!(records[0].controller_transforms[&2].translation, [0.4, 1.0, -0.2]);
        assert_eq!(records[1].controller_transforms.len(), 1);
        assert!(records[1].controller_transforms.contains_key(&1));
    }

    #[test]
    fn test_fetch_failure_keeps_captured_records() {
        let signal = started_signal();
        let mut runtime = ScriptedRuntime::new(vec![vec![hmd(true)]; 2]);
        let mut buffer = SessionBuffer::new();

        let err = CaptureLoop::new(&mut runtime, signal, 200.0)
            .unwrap()
            .run(&mut buffer)
            .unwrap_err();

        assert!(matches!(err, CaptureError::PoseFetchFailure(_)));
        assert_eq!(buffer.len(), 2);
    }

    #[test]
    fn test_max_duration_stops_capture() {
        let signal = started_signal();
        let mut runtime = ScriptedRuntime::new(vec![vec![hmd(true)]; 100]);
        let mut buffer = SessionBuffer::new();

        CaptureLoop::new(&mut runtime, signal.clone(), 50.0)
            .unwrap()
            .with_max_duration(Duration::from_millis(100))
            .run(&mut buffer)
            .unwrap();

        assert!(signal.is_stopped());
        assert!(!buffer.is_empty());
        assert!(buffer.len() < 100);
        assert!(buffer.records().iter().all(|r| r.elapsed_time < 0.2));
    }

    #[test]
    fn test_waits_for_start_signal() {
        let signal = ControlSignal::new();
        let remote = signal.clone();
        let mut runtime =
            ScriptedRuntime::new(vec![vec![hmd(true)]]).stop_when_exhausted(signal.clone());
        let mut buffer = SessionBuffer::new();

        let starter = std::thread::spawn(move || {
            std::thread::sleep(Duration::from_millis(30));
            remote.request_start();
        });

        CaptureLoop::new(&mut runtime, signal, 20.0)
            .unwrap()
            .run(&mut buffer)
            .unwrap();
        starter.join().unwrap();

        assert_eq!(buffer.len(), 1);
        // Time is measured from the start signal, not from loop entry
        assert!(buffer.records()[0].elapsed_time < 0.03);
    }

    #[test]
    fn test_sampling_rate_over_fixed_duration() {
        let signal = started_signal();
        // More snapshots than the session can consume
        let mut runtime = ScriptedRuntime::new(vec![vec![hmd(true)]; 1000]);
        let mut buffer = SessionBuffer::new();

        let captured = CaptureLoop::new(&mut runtime, signal, 50.0)
            .unwrap()
            .with_max_duration(Duration::from_millis(200))
            .run(&mut buffer)
            .unwrap();
        assert!(captured);

        // 200 ms at 50 Hz is about 10 ticks
        let times: Vec<f64> = buffer.records().iter().map(|r| r.elapsed_time).collect();
        assert!(
            (7..=11).contains(&times.len()),
            "expected about 10 records, got {}: {:?}",
            times.len(),
            times
        );

        assert!(times[0] < 0.01, "first tick at {}", times[0]);
        for pair in times.windows(2) {
            let gap = pair[1] - pair[0];
            assert!(gap >= 0.019, "gap {} shorter than the period in {:?}", gap, times);
        }
        let mean_gap = (times[times.len() - 1] - times[0]) / (times.len() - 1) as f64;
        assert!(
            (0.018..=0.03).contains(&mean_gap),
            "mean gap {} far from 20 ms in {:?}",
            mean_gap,
            times
        );

        let last = times[times.len() - 1];
        assert!(last >= 0.14 && last <= 0.21, "last tick at {}", last);
    }
}
