//! High-level library API: one call per command-line program. Prefer these
//! entrypoints over the lower-level `core` and `io` modules when embedding
//! neuroprep in another pipeline.
use std::path::Path;

use tracing::info;

use crate::core::motion::MotionRegressors;
use crate::core::params::{PlotParams, RegistrationParams};
use crate::core::plot::render_motion_plot;
use crate::core::registration::{AntsRegistrar, Registrar, RegistrationRequest, TransformResult};
use crate::error::Result;
use crate::io::manifest::{RegistrationManifest, write_manifest};
use crate::io::matrix::load_matrix;
use crate::io::volume::read_image;

/// Register `input` (moving) onto `reference` (fixed), writing under `out`.
///
/// Both volumes are loaded and checked before the registrar runs, so a bad
/// input never leaves artifacts behind. On success a `{out}transforms.json`
/// manifest is written alongside the transforms.
pub fn register_images(
    input: &Path,
    reference: &Path,
    out: &Path,
    params: &RegistrationParams,
    registrar: &dyn Registrar,
) -> Result<TransformResult> {
    let moving = read_image(input)?;
    let fixed = read_image(reference)?;
    info!(
        "Loaded input {:?} ({}D) and reference {:?} ({}D)",
        moving.path, moving.dimension, fixed.path, fixed.dimension
    );

    let request = RegistrationRequest::new(fixed, moving, out, params.clone())?;
    let result = registrar.register(&request)?;
    write_manifest(&RegistrationManifest::new(&request, &result))?;

    info!("Forward transforms: {:?}", result.forward_transforms);
    info!("Inverse transforms: {:?}", result.inverse_transforms);
    Ok(result)
}

/// [`register_images`] with the ANTs command-line backend.
pub fn register_images_with_ants(
    input: &Path,
    reference: &Path,
    out: &Path,
    params: &RegistrationParams,
) -> Result<TransformResult> {
    register_images(input, reference, out, params, &AntsRegistrar::from_env())
}

/// Load a motion parameter file and render the translation/rotation figure.
pub fn plot_motion_regressors(
    input: &Path,
    output: &Path,
    params: &PlotParams,
) -> Result<MotionRegressors> {
    let matrix = load_matrix(input)?;
    let motion = MotionRegressors::from_matrix(&matrix)?;
    render_motion_plot(&motion, output, params)?;
    Ok(motion)
}
