use std::path::{Path, PathBuf};

use nifti::{NiftiHeader, NiftiObject, ReaderOptions};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};

/// A NIfTI volume loaded for registration, described by its geometry.
///
/// The voxel data is read (so truncated or corrupt files fail here) but only
/// the geometry is kept: the registration backend reads the file itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageVolume {
    pub path: PathBuf,
    /// Number of axes after trimming trailing singleton axes beyond the third
    pub dimension: usize,
    /// Voxels along each axis
    pub size: Vec<usize>,
    /// Voxel spacing along each axis
    pub spacing: Vec<f64>,
    /// World coordinate of the first voxel
    pub origin: [f64; 3],
    /// Direction cosines, one column per spatial axis
    pub direction: [[f64; 3]; 3],
    /// NIfTI datatype code
    pub datatype: i16,
}

impl ImageVolume {
    pub fn voxel_count(&self) -> usize {
        self.size.iter().product()
    }

    pub fn datatype_name(&self) -> &'static str {
        datatype_name(self.datatype)
    }

    /// Complex and RGB volumes cannot be registered.
    pub fn is_scalar(&self) -> bool {
        !matches!(self.datatype, 32 | 128 | 1792 | 2048 | 2304)
    }
}

/// Read a NIfTI-1 volume (`.nii`, `.nii.gz` or `.hdr`/`.img` pair).
pub fn read_image<P: AsRef<Path>>(path: P) -> Result<ImageVolume> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(Error::NotFound {
            path: path.to_path_buf(),
        });
    }

    let obj = ReaderOptions::new().read_file(path)?;
    let volume = volume_from_header(path, obj.header());
    debug!(
        "Loaded {:?}: {}D {:?} voxels, spacing {:?}, {}",
        path,
        volume.dimension,
        volume.size,
        volume.spacing,
        volume.datatype_name()
    );
    Ok(volume)
}

fn volume_from_header(path: &Path, header: &NiftiHeader) -> ImageVolume {
    let ndim = (header.dim[0] as usize).clamp(1, 7);
    let raw_size: Vec<usize> = (1..=ndim).map(|i| (header.dim[i] as usize).max(1)).collect();
    let size = trim_trailing_singletons(&raw_size);
    let spacing = (1..=size.len())
        .map(|i| {
            let d = header.pixdim[i] as f64;
            if d > 0.0 { d } else { 1.0 }
        })
        .collect();

    let (origin, direction) = spatial_frame(header);

    ImageVolume {
        path: path.to_path_buf(),
        dimension: size.len(),
        size,
        spacing,
        origin,
        direction,
        datatype: header.datatype as i16,
    }
}

/// Drop trailing axes of length one past the third (a 3D volume stored with
/// `dim[0] = 4, dim[4] = 1` is still 3D).
fn trim_trailing_singletons(size: &[usize]) -> Vec<usize> {
    let mut size = size.to_vec();
    while size.len() > 3 && size.last() == Some(&1) {
        size.pop();
    }
    size
}

// sform takes precedence over qform; with neither, the frame is the identity.
fn spatial_frame(header: &NiftiHeader) -> ([f64; 3], [[f64; 3]; 3]) {
    if header.sform_code > 0 {
        let rows = [header.srow_x, header.srow_y, header.srow_z];
        let origin = [rows[0][3] as f64, rows[1][3] as f64, rows[2][3] as f64];
        let mut direction = [[0.0; 3]; 3];
        for col in 0..3 {
            let column = [rows[0][col] as f64, rows[1][col] as f64, rows[2][col] as f64];
            let norm = column.iter().map(|v| v * v).sum::<f64>().sqrt();
            for row in 0..3 {
                direction[row][col] = if norm > 1e-9 {
                    column[row] / norm
                } else if row == col {
                    1.0
                } else {
                    0.0
                };
            }
        }
        (origin, direction)
    } else if header.qform_code > 0 {
        let b = header.quatern_b as f64;
        let c = header.quatern_c as f64;
        let d = header.quatern_d as f64;
        let a = (1.0 - (b * b + c * c + d * d)).max(0.0).sqrt();
        let qfac = if header.pixdim[0] < 0.0 { -1.0 } else { 1.0 };
        let (aa, bb, cc, dd) = (a * a, b * b, c * c, d * d);
        let direction = [
            [aa + bb - cc - dd, 2.0 * (b * c - a * d), qfac * 2.0 * (b * d + a * c)],
            [2.0 * (b * c + a * d), aa + cc - bb - dd, qfac * 2.0 * (c * d - a * b)],
            [2.0 * (b * d - a * c), 2.0 * (c * d + a * b), qfac * (aa + dd - cc - bb)],
        ];
        let origin = [
            header.quatern_x as f64,
            header.quatern_y as f64,
            header.quatern_z as f64,
        ];
        (origin, direction)
    } else {
        (
            [0.0; 3],
            [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]],
        )
    }
}

pub fn datatype_name(code: i16) -> &'static str {
    match code {
        2 => "uint8",
        4 => "int16",
        8 => "int32",
        16 => "float32",
        32 => "complex64",
        64 => "float64",
        128 => "rgb24",
        256 => "int8",
        512 => "uint16",
        768 => "uint32",
        1024 => "int64",
        1280 => "uint64",
        1536 => "float128",
        1792 => "complex128",
        2048 => "complex256",
        2304 => "rgba32",
        _ => "unknown",
    }
}
