use serde::{Deserialize, Serialize};

use crate::types::{Metric, PlotFormat};

/// SyN registration settings. `Default` reproduces the ANTsPy `'SyN'` preset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegistrationParams {
    /// Metric of the affine stage
    pub aff_metric: Metric,
    /// Bins (Mattes) or radius (CC) of the affine metric
    pub aff_sampling: u32,
    /// Fraction of voxels sampled by the affine metric
    pub aff_random_sampling_rate: f64,
    pub aff_gradient_step: f64,
    pub aff_iterations: Vec<u32>,
    pub aff_smoothing_sigmas: Vec<u32>,
    pub aff_shrink_factors: Vec<u32>,

    /// Metric of the deformable stage
    pub syn_metric: Metric,
    pub syn_sampling: u32,
    pub grad_step: f64,
    /// Regularisation of the update field (voxels)
    pub flow_sigma: f64,
    /// Regularisation of the total field (voxels)
    pub total_sigma: f64,
    pub reg_iterations: Vec<u32>,
    pub syn_smoothing_sigmas: Vec<u32>,
    pub syn_shrink_factors: Vec<u32>,
    pub convergence_threshold: f64,
    pub convergence_window: u32,

    pub use_histogram_matching: bool,
    pub collapse_output_transforms: bool,
    /// Run the registration in single precision
    pub float_precision: bool,
    pub verbose: bool,
}

impl Default for RegistrationParams {
    fn default() -> Self {
        Self {
            aff_metric: Metric::Mattes,
            aff_sampling: 32,
            aff_random_sampling_rate: 0.2,
            aff_gradient_step: 0.25,
            aff_iterations: vec![2100, 1200, 1200, 0],
            aff_smoothing_sigmas: vec![3, 2, 1, 0],
            aff_shrink_factors: vec![4, 2, 2, 1],
            syn_metric: Metric::Mattes,
            syn_sampling: 32,
            grad_step: 0.2,
            flow_sigma: 3.0,
            total_sigma: 0.0,
            reg_iterations: vec![40, 20, 0],
            syn_smoothing_sigmas: vec![2, 1, 0],
            syn_shrink_factors: vec![4, 2, 1],
            convergence_threshold: 1e-7,
            convergence_window: 8,
            use_histogram_matching: false,
            collapse_output_transforms: true,
            float_precision: true,
            verbose: false,
        }
    }
}

/// Figure settings for the motion regressor plot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlotParams {
    /// Figure width in inches
    pub width_in: f64,
    /// Figure height in inches
    pub height_in: f64,
    /// Raster resolution; vector output always uses 72 units per inch
    pub dpi: u32,
}

impl Default for PlotParams {
    fn default() -> Self {
        Self {
            width_in: 8.0,
            height_in: 8.0,
            dpi: 600,
        }
    }
}

impl PlotParams {
    /// Units per inch for the given output format.
    pub fn resolution(&self, format: PlotFormat) -> f64 {
        if format.is_vector() {
            72.0
        } else {
            self.dpi as f64
        }
    }

    /// Canvas size in backend units (pixels for rasters, points for SVG).
    pub fn canvas_size(&self, format: PlotFormat) -> (u32, u32) {
        let res = self.resolution(format);
        (
            (self.width_in * res).round().max(1.0) as u32,
            (self.height_in * res).round().max(1.0) as u32,
        )
    }

    /// Scale factor turning typographic points into backend units.
    pub fn point_scale(&self, format: PlotFormat) -> f64 {
        self.resolution(format) / 72.0
    }
}
