//! `antsreg` entrypoint: parse the three positionals and run SyN registration.

use std::process::ExitCode;

use clap::Parser;
use neuroprep::cli;

fn main() -> ExitCode {
    let args = cli::RegistrationArgs::parse();
    cli::init_logging();
    cli::exit_status(cli::run_registration(args))
}
