use ndarray::{Array2, ArrayView2, s};
use tracing::warn;

use crate::error::{Error, Result};

/// Columns of a motion parameter file: three translations then three rotations.
pub const MOTION_COLUMNS: usize = 6;

/// Rigid-body motion estimates, one row per volume.
#[derive(Debug, Clone, PartialEq)]
pub struct MotionRegressors {
    translation: Array2<f64>,
    rotation: Array2<f64>,
}

impl MotionRegressors {
    /// Split a loaded matrix into translation (mm) and rotation (deg) blocks.
    ///
    /// Fewer than six columns is a shape error; columns past the sixth are
    /// ignored.
    pub fn from_matrix(matrix: &Array2<f64>) -> Result<Self> {
        let found = matrix.ncols();
        if found < MOTION_COLUMNS {
            return Err(Error::Shape {
                expected: MOTION_COLUMNS,
                found,
            });
        }
        if found > MOTION_COLUMNS {
            warn!(
                "Motion file has {} columns; plotting the first {} and ignoring the rest",
                found, MOTION_COLUMNS
            );
        }

        Ok(Self {
            translation: matrix.slice(s![.., 0..3]).to_owned(),
            rotation: matrix.slice(s![.., 3..6]).to_owned(),
        })
    }

    pub fn samples(&self) -> usize {
        self.translation.nrows()
    }

    pub fn translation(&self) -> ArrayView2<'_, f64> {
        self.translation.view()
    }

    pub fn rotation(&self) -> ArrayView2<'_, f64> {
        self.rotation.view()
    }
}
