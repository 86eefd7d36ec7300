//! Command Line Interface (CLI) layer shared by the two binaries.
//!
//! This module defines argument parsing (`args`) and the orchestration logic
//! (`runner`) for the registration and motion-plot programs. It wires the
//! positional arguments to the library functionality exposed via
//! `neuroprep::api`.
pub mod args;
pub mod runner;

pub use args::{MotionPlotArgs, RegistrationArgs};
pub use runner::{exit_status, init_logging, run_motion_plot, run_registration};
