//! SyN registration through the ANTs `antsRegistration` executable.
//!
//! The crate never estimates a transform itself. It validates the two volumes,
//! turns [`RegistrationParams`] into the argument list ANTsPy would use for its
//! `'SyN'` preset, runs the tool and checks what it wrote under the prefix.
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::core::params::RegistrationParams;
use crate::error::{Error, Result};
use crate::io::volume::ImageVolume;

pub const ANTS_REGISTRATION: &str = "antsRegistration";

/// Lines of stderr kept in `Error::RegistrationFailed`.
const STDERR_TAIL_LINES: usize = 20;

/// One validated fixed/moving pair and where to write the result.
#[derive(Debug, Clone)]
pub struct RegistrationRequest {
    pub fixed: ImageVolume,
    pub moving: ImageVolume,
    pub output_prefix: String,
    pub params: RegistrationParams,
}

impl RegistrationRequest {
    pub fn new(
        fixed: ImageVolume,
        moving: ImageVolume,
        output_prefix: &Path,
        params: RegistrationParams,
    ) -> Result<Self> {
        if fixed.dimension != moving.dimension {
            return Err(Error::IncompatibleImages {
                reason: format!(
                    "reference is {}D but input is {}D",
                    fixed.dimension, moving.dimension
                ),
            });
        }
        if !(2..=4).contains(&fixed.dimension) {
            return Err(Error::IncompatibleImages {
                reason: format!("{}D images are not supported", fixed.dimension),
            });
        }
        for volume in [&fixed, &moving] {
            if !volume.is_scalar() {
                return Err(Error::IncompatibleImages {
                    reason: format!(
                        "{} has non-scalar voxels ({})",
                        volume.path.display(),
                        volume.datatype_name()
                    ),
                });
            }
        }

        let output_prefix = path_str(output_prefix, "out")?.to_string();
        if output_prefix.is_empty() {
            return Err(Error::InvalidArgument {
                arg: "out",
                value: output_prefix,
            });
        }

        Ok(Self {
            fixed,
            moving,
            output_prefix,
            params,
        })
    }

    fn artifact(&self, suffix: &str) -> PathBuf {
        PathBuf::from(format!("{}{}", self.output_prefix, suffix))
    }

    /// Directory that has to exist before ANTs can write under the prefix.
    pub fn output_dir(&self) -> Option<PathBuf> {
        if self.output_prefix.ends_with(std::path::is_separator) {
            return Some(PathBuf::from(&self.output_prefix));
        }
        Path::new(&self.output_prefix)
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map(Path::to_path_buf)
    }

    pub fn warped_moving_path(&self) -> PathBuf {
        self.artifact("Warped.nii.gz")
    }

    pub fn warped_fixed_path(&self) -> PathBuf {
        self.artifact("InverseWarped.nii.gz")
    }

    /// Files `antsRegistration` writes for this request.
    pub fn expected_result(&self) -> TransformResult {
        let affine = self.artifact("0GenericAffine.mat");
        let warp = self.artifact("1Warp.nii.gz");
        let inverse_warp = self.artifact("1InverseWarp.nii.gz");
        TransformResult {
            forward_transforms: vec![warp, affine.clone()],
            inverse_transforms: vec![affine, inverse_warp],
            warped_moving: self.warped_moving_path(),
            warped_fixed: self.warped_fixed_path(),
        }
    }
}

/// Artifacts of a successful registration, in application order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransformResult {
    /// Moving to fixed: deformation first, then affine
    pub forward_transforms: Vec<PathBuf>,
    /// Fixed to moving: inverse affine, then inverse deformation
    pub inverse_transforms: Vec<PathBuf>,
    /// Moving image resampled into the fixed space
    pub warped_moving: PathBuf,
    /// Fixed image resampled into the moving space
    pub warped_fixed: PathBuf,
}

impl TransformResult {
    pub fn artifacts(&self) -> Vec<&Path> {
        let mut paths: Vec<&Path> = Vec::new();
        for p in self
            .forward_transforms
            .iter()
            .chain(&self.inverse_transforms)
            .chain([&self.warped_moving, &self.warped_fixed])
        {
            if !paths.contains(&p.as_path()) {
                paths.push(p.as_path());
            }
        }
        paths
    }

    /// Fail on the first artifact that was not written.
    pub fn verify(&self) -> Result<()> {
        for path in self.artifacts() {
            if !path.is_file() {
                return Err(Error::MissingArtifact {
                    path: path.to_path_buf(),
                });
            }
        }
        Ok(())
    }
}

/// Backend that estimates the transform for a request.
pub trait Registrar {
    fn register(&self, request: &RegistrationRequest) -> Result<TransformResult>;
}

/// Runs the ANTs command-line tool.
#[derive(Debug, Clone)]
pub struct AntsRegistrar {
    executable: PathBuf,
}

impl AntsRegistrar {
    pub fn new<P: Into<PathBuf>>(executable: P) -> Self {
        Self {
            executable: executable.into(),
        }
    }

    /// Use `$ANTSPATH/antsRegistration` when `ANTSPATH` is set, otherwise rely on `PATH`.
    pub fn from_env() -> Self {
        Self::from_antspath(std::env::var_os("ANTSPATH"))
    }

    pub fn from_antspath(antspath: Option<OsString>) -> Self {
        match antspath {
            Some(dir) if !dir.is_empty() => Self::new(PathBuf::from(dir).join(ANTS_REGISTRATION)),
            _ => Self::new(ANTS_REGISTRATION),
        }
    }

    pub fn executable(&self) -> &Path {
        &self.executable
    }
}

impl Default for AntsRegistrar {
    fn default() -> Self {
        Self::from_env()
    }
}

impl Registrar for AntsRegistrar {
    fn register(&self, request: &RegistrationRequest) -> Result<TransformResult> {
        let created_dir = match request.output_dir() {
            Some(dir) => create_output_dir(&dir)?,
            None => None,
        };

        let args = syn_arguments(request)?;
        info!(
            "Running {} on fixed={:?} moving={:?}",
            self.executable.display(),
            request.fixed.path,
            request.moving.path
        );
        debug!("{} {}", self.executable.display(), args.join(" "));

        let stdout = if request.params.verbose {
            Stdio::inherit()
        } else {
            Stdio::null()
        };
        let output = Command::new(&self.executable)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(stdout)
            .stderr(Stdio::piped())
            .output()
            .map_err(|e| {
                // The tool never started; drop the directories made for it.
                if let Some(dir) = &created_dir {
                    let _ = std::fs::remove_dir_all(dir);
                }
                Error::ExternalTool {
                    tool: self.executable.display().to_string(),
                    source: e,
                }
            })?;

        if !output.status.success() {
            return Err(Error::RegistrationFailed {
                status: output.status.to_string(),
                stderr: stderr_tail(&output.stderr),
            });
        }

        let result = request.expected_result();
        result.verify()?;
        Ok(result)
    }
}

/// `antsRegistration` arguments for an affine stage followed by a SyN stage.
pub fn syn_arguments(request: &RegistrationRequest) -> Result<Vec<String>> {
    let p = &request.params;
    let fixed = path_str(&request.fixed.path, "reference")?;
    let moving = path_str(&request.moving.path, "input")?;
    let warped_moving = request.warped_moving_path();
    let warped_fixed = request.warped_fixed_path();

    let args = vec![
        "-d".to_string(),
        request.fixed.dimension.to_string(),
        "-r".to_string(),
        format!("[{},{},1]", fixed, moving),
        // Affine stage
        "-m".to_string(),
        format!(
            "{}[{},{},1,{},regular,{}]",
            p.aff_metric, fixed, moving, p.aff_sampling, p.aff_random_sampling_rate
        ),
        "-t".to_string(),
        format!("Affine[{}]", p.aff_gradient_step),
        "-c".to_string(),
        join_levels(&p.aff_iterations),
        "-s".to_string(),
        join_levels(&p.aff_smoothing_sigmas),
        "-f".to_string(),
        join_levels(&p.aff_shrink_factors),
        "-x".to_string(),
        "[NA,NA]".to_string(),
        // Deformable stage
        "-m".to_string(),
        format!("{}[{},{},1,{}]", p.syn_metric, fixed, moving, p.syn_sampling),
        "-t".to_string(),
        format!("SyN[{},{},{}]", p.grad_step, p.flow_sigma, p.total_sigma),
        "-c".to_string(),
        format!(
            "[{},{:e},{}]",
            join_levels(&p.reg_iterations),
            p.convergence_threshold,
            p.convergence_window
        ),
        "-s".to_string(),
        join_levels(&p.syn_smoothing_sigmas),
        "-f".to_string(),
        join_levels(&p.syn_shrink_factors),
        "-x".to_string(),
        "[NA,NA]".to_string(),
        // Outputs
        "-u".to_string(),
        flag(p.use_histogram_matching),
        "-z".to_string(),
        flag(p.collapse_output_transforms),
        "-o".to_string(),
        format!(
            "[{},{},{}]",
            request.output_prefix,
            warped_moving.display(),
            warped_fixed.display()
        ),
        "--float".to_string(),
        flag(p.float_precision),
        "--write-composite-transform".to_string(),
        "0".to_string(),
        "-v".to_string(),
        flag(p.verbose),
    ];
    Ok(args)
}

/// Create `dir` and return the outermost directory that did not exist before.
fn create_output_dir(dir: &Path) -> Result<Option<PathBuf>> {
    let created = dir
        .ancestors()
        .take_while(|p| !p.as_os_str().is_empty() && !p.exists())
        .last()
        .map(Path::to_path_buf);
    std::fs::create_dir_all(dir)?;
    Ok(created)
}

fn join_levels(levels: &[u32]) -> String {
    levels
        .iter()
        .map(|l| l.to_string())
        .collect::<Vec<_>>()
        .join("x")
}

fn flag(on: bool) -> String {
    let value = if on { "1" } else { "0" };
    value.to_string()
}

fn path_str<'a>(path: &'a Path, arg: &'static str) -> Result<&'a str> {
    path.to_str().ok_or_else(|| Error::InvalidArgument {
        arg,
        value: path.display().to_string(),
    })
}

fn stderr_tail(stderr: &[u8]) -> String {
    let text = String::from_utf8_lossy(stderr);
    let lines: Vec<&str> = text.lines().collect();
    let start = lines.len().saturating_sub(STDERR_TAIL_LINES);
    lines[start..].join("\n")
}
