//! VR pose capture - record head-mounted display and controller poses.
//!
//! Polls the VR runtime's tracked-device poses at a fixed rate once the user
//! presses ENTER, buffers timestamped records until `q`, and writes the
//! session to a JSON file.

pub mod capture;
pub mod commands;
pub mod config;
pub mod pose;
pub mod recorder;

use clap::Parser;
use config::{CaptureConfig, Cli, Command, ProbeConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Run the command-line application
pub fn run() -> anyhow::Result<()> {
    // Initialize tracing/logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "vr_pose_capture_lib=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    tracing::info!("Starting vr-pose-capture v{}", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Some(Command::Probe(args)) => {
            commands::probe::run(ProbeConfig::try_from(args)?)?;
        }
        None => {
            commands::capture::run(CaptureConfig::try_from(cli.capture)?)?;
        }
    }

    Ok(())
}
