use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::core::registration::{RegistrationRequest, TransformResult};
use crate::error::Result;
use crate::io::volume::ImageVolume;

/// JSON sidecar describing a registration run, written next to its transforms.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegistrationManifest {
    pub tool: String,
    pub transform_type: String,
    /// Reference volume and its geometry at registration time
    pub fixed: ImageVolume,
    /// Input volume and its geometry at registration time
    pub moving: ImageVolume,
    pub output_prefix: String,
    #[serde(flatten)]
    pub result: TransformResult,
}

impl RegistrationManifest {
    pub fn new(request: &RegistrationRequest, result: &TransformResult) -> Self {
        Self {
            tool: format!("neuroprep {}", env!("CARGO_PKG_VERSION")),
            transform_type: "SyN".to_string(),
            fixed: request.fixed.clone(),
            moving: request.moving.clone(),
            output_prefix: request.output_prefix.clone(),
            result: result.clone(),
        }
    }
}

pub fn manifest_path(output_prefix: &str) -> PathBuf {
    PathBuf::from(format!("{}transforms.json", output_prefix))
}

/// Write `{prefix}transforms.json` and return its path.
pub fn write_manifest(manifest: &RegistrationManifest) -> Result<PathBuf> {
    let path = manifest_path(&manifest.output_prefix);
    write_json(&path, manifest)?;
    info!("Registration manifest written to {:?}", path);
    Ok(path)
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut writer, value)?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}

pub fn read_manifest<P: AsRef<Path>>(path: P) -> Result<RegistrationManifest> {
    let file = File::open(path)?;
    Ok(serde_json::from_reader(std::io::BufReader::new(file))?)
}
