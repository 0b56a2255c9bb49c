//! Capture command

use crate::capture::runtime::{open_runtime, TrackingRuntime};
use crate::config::CaptureConfig;
use crate::recorder::capture_loop::CaptureLoop;
use crate::recorder::control::{spawn_keyboard_listener, ControlSignal};
use crate::recorder::error::CaptureResult;
use crate::recorder::session::{write_session, SessionBuffer};

/// Open the runtime, wait for ENTER on stdin and capture until `q`
pub fn run(config: CaptureConfig) -> CaptureResult<usize> {
    let mut runtime = open_runtime()?;

    let signal = ControlSignal::new();
    println!("Press ENTER key to start, q to stop");
    spawn_keyboard_listener(std::io::stdin(), signal.clone())?;

    capture_session(&mut *runtime, &config, signal)
}

/// Run one capture session against `runtime` and write it out.
///
/// If the runtime fails mid-capture, whatever was captured is still written
/// before the failure is returned. A session stopped before it ever started
/// writes nothing, so an existing output file is left untouched.
pub fn capture_session<R>(
    runtime: &mut R,
    config: &CaptureConfig,
    signal: ControlSignal,
) -> CaptureResult<usize>
where
    R: TrackingRuntime + ?Sized,
{
    let mut buffer = SessionBuffer::new();

    let mut capture = CaptureLoop::new(runtime, signal, config.frequency_hz)?;
    if let Some(limit) = config.max_duration {
        capture = capture.with_max_duration(limit);
    }
    let outcome = capture.run(&mut buffer);

    if let Ok(false) = outcome {
        tracing::info!(
            "Nothing was captured; {} left untouched",
            config.output_path.display()
        );
        println!("No poses captured.");
        return Ok(0);
    }

    if let Err(e) = &outcome {
        tracing::error!(
            "Capture aborted: {} (flushing {} captured poses)",
            e,
            buffer.len()
        );
    }

    let written = match write_session(&config.output_path, &buffer) {
        Ok(n) => n,
        Err(write_err) => {
            // Report the capture failure first if there was one
            return match outcome {
                Err(e) => {
                    tracing::error!("{}", write_err);
                    Err(e)
                }
                Ok(_) => Err(write_err),
            };
        }
    };
    println!(
        "{} poses are saved in: {}",
        written,
        config.output_path.display()
    );

    outcome.map(|_| written)
}
