//! I/O layer: NIfTI volume loading, whitespace-delimited matrix loading and
//! the JSON manifest written after registration.
pub mod manifest;
pub use manifest::{RegistrationManifest, read_manifest, write_manifest};

pub mod matrix;
pub use matrix::{load_matrix, parse_matrix};

pub mod volume;
pub use volume::{ImageVolume, read_image};
