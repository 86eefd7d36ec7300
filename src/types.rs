//! Shared types and enums used across neuroprep.
//! Includes the similarity `Metric` used by the registration stages and the
//! `PlotFormat` inferred from an output path.
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Image similarity metric understood by `antsRegistration -m`.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Debug, Serialize, Deserialize)]
pub enum Metric {
    /// Mattes mutual information; the sampling parameter is the histogram bin count.
    Mattes,
    /// Neighbourhood cross-correlation; the sampling parameter is the radius.
    Cc,
    MeanSquares,
    Demons,
}

impl Metric {
    pub fn as_ants(&self) -> &'static str {
        match self {
            Metric::Mattes => "mattes",
            Metric::Cc => "CC",
            Metric::MeanSquares => "meansquares",
            Metric::Demons => "demons",
        }
    }
}

impl std::fmt::Display for Metric {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_ants())
    }
}

#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Debug, Serialize, Deserialize)]
pub enum PlotFormat {
    Png,
    Jpeg,
    Bmp,
    Svg,
}

impl PlotFormat {
    /// Infer the output format from the file extension (case-insensitive).
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_ascii_lowercase();

        match ext.as_str() {
            "png" => Ok(PlotFormat::Png),
            "jpg" | "jpeg" => Ok(PlotFormat::Jpeg),
            "bmp" => Ok(PlotFormat::Bmp),
            "svg" => Ok(PlotFormat::Svg),
            "" => Err(Error::UnsupportedFormat(format!(
                "{} has no file extension",
                path.display()
            ))),
            other => Err(Error::UnsupportedFormat(other.to_string())),
        }
    }

    pub fn is_vector(&self) -> bool {
        matches!(self, PlotFormat::Svg)
    }
}

impl std::fmt::Display for PlotFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PlotFormat::Png => write!(f, "PNG"),
            PlotFormat::Jpeg => write!(f, "JPEG"),
            PlotFormat::Bmp => write!(f, "BMP"),
            PlotFormat::Svg => write!(f, "SVG"),
        }
    }
}
