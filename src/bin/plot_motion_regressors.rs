//! `plot-motion-regressors` entrypoint: parse the two positionals and render
//! the motion figure.

use std::process::ExitCode;

use clap::Parser;
use neuroprep::cli;

fn main() -> ExitCode {
    let args = cli::MotionPlotArgs::parse();
    cli::init_logging();
    cli::exit_status(cli::run_motion_plot(args))
}
