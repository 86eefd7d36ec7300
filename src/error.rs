//! Crate-level error type and `Result` alias.
//! Converts underlying I/O, NIfTI and JSON errors, and provides semantic variants
//! for input validation, external tool failures and rendering.
use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("NIfTI error: {0}")]
    Nifti(#[from] nifti::NiftiError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("File not found: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("Incompatible images: {reason}")]
    IncompatibleImages { reason: String },

    #[error("Parse error in {}, line {line}: {message}", path.display())]
    Parse {
        path: PathBuf,
        line: usize,
        message: String,
    },

    #[error("Expected at least {expected} columns, found {found}")]
    Shape { expected: usize, found: usize },

    #[error("Unsupported output format: {0}")]
    UnsupportedFormat(String),

    #[error("Invalid argument: {arg}={value}")]
    InvalidArgument { arg: &'static str, value: String },

    #[error("Failed to launch {tool}: {source}")]
    ExternalTool {
        tool: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Registration failed ({status}): {stderr}")]
    RegistrationFailed { status: String, stderr: String },

    #[error("Expected registration output is missing: {}", path.display())]
    MissingArtifact { path: PathBuf },

    #[error("Rendering error: {0}")]
    Render(String),
}

impl Error {
    pub fn render<E: std::fmt::Display>(e: E) -> Self {
        Error::Render(e.to_string())
    }
}
