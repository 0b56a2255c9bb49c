//! Runtime probe command
//!
//! Fetches poses at a fixed rate without recording, to check how long the
//! runtime's blocking fetch takes and whether consecutive fetches actually
//! deliver a new head pose.

use crate::capture::runtime::{open_runtime, TrackingRuntime};
use crate::config::ProbeConfig;
use crate::pose::convert::convert_matrix;
use crate::pose::record::hmd_pose_is_valid;
use crate::pose::types::HMD_INDEX;
use crate::recorder::capture_loop::sampling_period;
use crate::recorder::error::CaptureResult;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, PartialEq)]
pub struct ProbeReport {
    pub iterations: usize,
    /// Fetches whose HMD translation matched the previous fetch exactly
    pub stale_hmd: usize,
    pub invalid_hmd: usize,
    pub min_latency_ms: f64,
    pub mean_latency_ms: f64,
    pub max_latency_ms: f64,
}

impl std::fmt::Display for ProbeReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "iterations:  {}", self.iterations)?;
        writeln!(f, "stale HMD:   {}", self.stale_hmd)?;
        writeln!(f, "invalid HMD: {}", self.invalid_hmd)?;
        write!(
            f,
            "fetch ms:    min {:.3} / mean {:.3} / max {:.3}",
            self.min_latency_ms, self.mean_latency_ms, self.max_latency_ms
        )
    }
}

pub fn run(config: ProbeConfig) -> CaptureResult<ProbeReport> {
    let mut runtime = open_runtime()?;
    let report = probe_runtime(&mut *runtime, &config)?;
    println!("{}", report);
    Ok(report)
}

pub fn probe_runtime<R>(runtime: &mut R, config: &ProbeConfig) -> CaptureResult<ProbeReport>
where
    R: TrackingRuntime + ?Sized,
{
    let period = sampling_period(config.frequency_hz)?;
    let mut latencies = Vec::with_capacity(config.iterations);
    let mut previous: Option<[f32; 3]> = None;
    let mut stale_hmd = 0;
    let mut invalid_hmd = 0;

    for i in 0..config.iterations {
        let fetch_start = Instant::now();
        let poses = runtime.wait_get_poses()?;
        let latency = fetch_start.elapsed();
        latencies.push(latency);

        if !hmd_pose_is_valid(&poses) {
            invalid_hmd += 1;
        }

        let translation = poses
            .get(HMD_INDEX as usize)
            .map(|pose| convert_matrix(&pose.device_to_absolute_tracking).translation);
        if translation.is_some() && translation == previous {
            stale_hmd += 1;
            tracing::debug!("HMD pose unchanged since last fetch (iteration={})", i);
        }
        previous = translation;

        let work = fetch_start.elapsed();
        if work < period {
            std::thread::sleep(period - work);
        }
    }

    Ok(summarize(&latencies, stale_hmd, invalid_hmd))
}

fn summarize(latencies: &[Duration], stale_hmd: usize, invalid_hmd: usize) -> ProbeReport {
    let ms: Vec<f64> = latencies.iter().map(|d| d.as_secs_f64() * 1000.0).collect();
    let min = ms.iter().copied().fold(f64::INFINITY, f64::min);
    let max = ms.iter().copied().fold(0.0, f64::max);
    let mean = if ms.is_empty() {
        0.0
    } else {
        ms.iter().sum::<f64>() / ms.len() as f64
    };

    ProbeReport {
        iterations: latencies.len(),
        stale_hmd,
        invalid_hmd,
        min_latency_ms: if min.is_finite() { min } else { 0.0 },
        mean_latency_ms: mean,
        max_latency_ms: max,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::scripted::ScriptedRuntime;
    use crate::pose::types::RawDevicePose;
    use crate::recorder::error::CaptureError;

    fn hmd_at(y: f32, valid: bool) -> Vec<RawDevicePose> {
        vec![RawDevicePose::new(
            [
                [1.0, 0.0, 0.0, 0.0],
                [0.0, 1.0, 0.0, y],
                [0.0, 0.0, 1.0, 0.0],
            ],
            true,
            valid,
        )]
    }

    #[test]
    fn test_counts_stale_and_invalid_poses() {
        let mut runtime = ScriptedRuntime::new(vec![
            hmd_at(1.6, true),
            hmd_at(1.6, true),
            hmd_at(1.7, false),
            hmd_at(1.7, true),
        ]);
        let config = ProbeConfig {
            frequency_hz: 1000.0,
            iterations: 4,
        };

        let report = probe_runtime(&mut runtime, &config).unwrap();
        assert_eq!(report.iterations, 4);
        assert_eq!(report.stale_hmd, 2);
        assert_eq!(report.invalid_hmd, 1);
        assert!(report.min_latency_ms <= report.mean_latency_ms + 1e-9);
        assert!(report.mean_latency_ms <= report.max_latency_ms + 1e-9);
    }

    #[test]
    fn test_fetch_failure_propagates() {
        let mut runtime = ScriptedRuntime::new(vec![hmd_at(1.6, true)]);
        let config = ProbeConfig {
            frequency_hz: 1000.0,
            iterations: 2,
        };
        assert!(matches!(
            probe_runtime(&mut runtime, &config),
            Err(CaptureError::PoseFetchFailure(_))
        ));
    }

    #[test]
    fn test_summary_of_known_latencies() {
        let report = summarize(
            &[
                Duration::from_millis(2),
                Duration::from_millis(4),
                Duration::from_millis(6),
            ],
            0,
            0,
        );
        assert!((report.min_latency_ms - 2.0).abs() < 1e-9);
        assert!((report.mean_latency_ms - 4.0).abs() < 1e-9);
        assert!((report.max_latency_ms - 6.0).abs() < 1e-9);
    }
}
