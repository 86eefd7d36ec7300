#![doc = r#"
neuroprep: small command-line stages of a neuroimaging preprocessing pipeline.

The crate backs two programs and exposes the same operations as a library:

- `antsreg <input> <reference> <out>` runs deformable (SyN) registration of a
  moving volume onto a reference volume with ANTs, writing the transforms under
  the `out` prefix.
- `plot-motion-regressors <input> <output>` renders estimated head-motion
  translations (mm) and rotations (deg) as two stacked line charts.

Neither program implements its algorithm: registration is delegated to the
`antsRegistration` executable and drawing to `plotters`. The crate validates
inputs up front, builds the collaborator calls and reports failures through a
single [`Error`] type.

Requirements
------------
- ANTs installed, with `antsRegistration` on `PATH` or in `$ANTSPATH`.
- A system sans-serif font for rendering plot text.

Register two volumes
--------------------
```rust,no_run
use std::path::Path;
use neuroprep::{register_images_with_ants, RegistrationParams};

fn main() -> neuroprep::Result<()> {
    let result = register_images_with_ants(
        Path::new("sub-01_T1w.nii.gz"),
        Path::new("MNI152_T1_1mm.nii.gz"),
        Path::new("out/sub-01_"),
        &RegistrationParams::default(),
    )?;
    println!("forward: {:?}", result.forward_transforms);
    Ok(())
}
```

Plot motion regressors
----------------------
```rust,no_run
use std::path::Path;
use neuroprep::{plot_motion_regressors, PlotParams};

fn main() -> neuroprep::Result<()> {
    let params = PlotParams { dpi: 150, ..PlotParams::default() };
    plot_motion_regressors(
        Path::new("prefiltered_func_data_mcf.par"),
        Path::new("motion.png"),
        &params,
    )?;
    Ok(())
}
```

Error handling
--------------
All public functions return `neuroprep::Result<T>`:

```rust,no_run
use std::path::Path;
use neuroprep::{plot_motion_regressors, Error, PlotParams};

fn main() {
    match plot_motion_regressors(Path::new("rp.txt"), Path::new("rp.png"), &PlotParams::default()) {
        Ok(_) => {}
        Err(Error::Shape { found, .. }) => eprintln!("need 6 motion columns, got {found}"),
        Err(other) => eprintln!("{other}"),
    }
}
```

Useful modules
--------------
- [`api`]: one entry point per program.
- [`core`]: registration requests/backends, motion validation, rendering.
- [`io`]: NIfTI, matrix and manifest I/O.
- [`error`]: crate-level `Error` and `Result`.
"#]

pub mod api;
pub mod cli;
pub mod core;
pub mod error;
pub mod io;
pub mod types;

// Types
pub use crate::core::motion::{MOTION_COLUMNS, MotionRegressors};
pub use crate::core::params::{PlotParams, RegistrationParams};
pub use crate::core::registration::{
    AntsRegistrar, Registrar, RegistrationRequest, TransformResult, syn_arguments,
};
pub use error::{Error, Result};
pub use types::{Metric, PlotFormat};

// Readers
pub use io::{ImageVolume, load_matrix, read_image};

// High-level API re-exports
pub use api::{plot_motion_regressors, register_images, register_images_with_ants};
