use std::process::ExitCode;

use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::api::{plot_motion_regressors, register_images_with_ants};
use crate::core::params::{PlotParams, RegistrationParams};
use crate::error::Result;

use super::args::{MotionPlotArgs, RegistrationArgs};

/// Log to stderr, filtered by `RUST_LOG` (default `warn`).
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Print a failed run as `Error: <message>` on stderr and map it to exit status 1.
pub fn exit_status(result: Result<()>) -> ExitCode {
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

pub fn run_registration(args: RegistrationArgs) -> Result<()> {
    info!("Input: {:?}", args.input);
    info!("Reference: {:?}", args.reference);
    info!("Output prefix: {:?}", args.out);

    let result = register_images_with_ants(
        &args.input,
        &args.reference,
        &args.out,
        &RegistrationParams::default(),
    )?;

    info!(
        "Successfully registered {:?} -> {:?}",
        args.input, result.warped_moving
    );
    Ok(())
}

pub fn run_motion_plot(args: MotionPlotArgs) -> Result<()> {
    let motion = plot_motion_regressors(&args.input, &args.output, &PlotParams::default())?;
    info!(
        "Successfully plotted {} samples: {:?} -> {:?}",
        motion.samples(),
        args.input,
        args.output
    );
    Ok(())
}
