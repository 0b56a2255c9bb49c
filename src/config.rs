//! Command-line configuration

use crate::recorder::capture_loop::{sampling_period, DEFAULT_FREQUENCY_HZ};
use crate::recorder::error::{CaptureError, CaptureResult};
use crate::recorder::session::DEFAULT_OUTPUT_PATH;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;

/// Default probe rate in Hz
pub const DEFAULT_PROBE_FREQUENCY_HZ: f64 = 40.0;

/// Default number of probe iterations
pub const DEFAULT_PROBE_ITERATIONS: usize = 200;

/// Capture HMD and controller poses from the VR runtime.
///
/// Press ENTER to start capturing and `q` (then ENTER) to stop.
#[derive(Debug, Parser)]
#[command(name = "vr-pose-capture", version)]
pub struct Cli {
    #[command(flatten)]
    pub capture: CaptureArgs,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Optional diagnostic: measure pose fetch latency and stale head poses
    /// without recording (capture runs when no subcommand is given)
    Probe(ProbeArgs),
}

#[derive(Debug, Args)]
pub struct CaptureArgs {
    /// Target sampling frequency in Hz
    #[arg(long, default_value_t = DEFAULT_FREQUENCY_HZ)]
    pub frequency: f64,

    /// Session output file
    #[arg(short, long, default_value = DEFAULT_OUTPUT_PATH)]
    pub output: PathBuf,

    /// Optional: stop automatically after this many seconds of capture
    /// (capture otherwise stops on q)
    #[arg(long)]
    pub duration: Option<f64>,
}

#[derive(Debug, Args)]
pub struct ProbeArgs {
    /// Probe rate in Hz
    #[arg(long, default_value_t = DEFAULT_PROBE_FREQUENCY_HZ)]
    pub frequency: f64,

    /// Number of pose fetches
    #[arg(long, default_value_t = DEFAULT_PROBE_ITERATIONS)]
    pub iterations: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CaptureConfig {
    pub frequency_hz: f64,
    pub output_path: PathBuf,
    pub max_duration: Option<Duration>,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            frequency_hz: DEFAULT_FREQUENCY_HZ,
            output_path: PathBuf::from(DEFAULT_OUTPUT_PATH),
            max_duration: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProbeConfig {
    pub frequency_hz: f64,
    pub iterations: usize,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            frequency_hz: DEFAULT_PROBE_FREQUENCY_HZ,
            iterations: DEFAULT_PROBE_ITERATIONS,
        }
    }
}

impl TryFrom<CaptureArgs> for CaptureConfig {
    type Error = CaptureError;

    fn try_from(args: CaptureArgs) -> CaptureResult<Self> {
        sampling_period(args.frequency)?;

        let max_duration = match args.duration {
            None => None,
            Some(secs) if secs.is_finite() && secs > 0.0 => {
                let limit = Duration::try_from_secs_f64(secs).map_err(|e| {
                    CaptureError::ConfigurationError(format!(
                        "capture duration of {} seconds is out of range: {}",
                        secs, e
                    ))
                })?;
                Some(limit)
            }
            Some(secs) => {
                return Err(CaptureError::ConfigurationError(format!(
                    "capture duration must be a positive number of seconds, got {}",
                    secs
                )))
            }
        };

        Ok(Self {
            frequency_hz: args.frequency,
            output_path: args.output,
            max_duration,
        })
    }
}

impl TryFrom<ProbeArgs> for ProbeConfig {
    type Error = CaptureError;

    fn try_from(args: ProbeArgs) -> CaptureResult<Self> {
        sampling_period(args.frequency)?;
        if args.iterations == 0 {
            return Err(CaptureError::ConfigurationError(
                "probe needs at least one iteration".to_string(),
            ));
        }
        Ok(Self {
            frequency_hz: args.frequency,
            iterations: args.iterations,
        })
    }
}
