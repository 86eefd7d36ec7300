use clap::Parser;
use std::path::PathBuf;

/// Deformable (SyN) registration of an input volume onto a reference volume
/// using ANTs.
#[derive(Parser, Debug)]
#[command(name = "antsreg", version)]
pub struct RegistrationArgs {
    /// Moving image (NIfTI)
    pub input: PathBuf,

    /// Fixed reference image (NIfTI)
    pub reference: PathBuf,

    /// Output prefix for the transform files (e.g. out/sub-01_)
    pub out: PathBuf,
}

/// Plot estimated head-motion translation and rotation traces.
#[derive(Parser, Debug)]
#[command(name = "plot-motion-regressors", version)]
pub struct MotionPlotArgs {
    /// Whitespace-delimited motion parameters: 3 translations (mm) then 3 rotations (deg)
    pub input: PathBuf,

    /// Image to write; the format follows the extension (png, jpg, bmp, svg)
    pub output: PathBuf,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn argument_definitions_are_valid() {
        RegistrationArgs::command().debug_assert();
        MotionPlotArgs::command().debug_assert();
    }

    #[test]
    fn registration_takes_three_positionals() {
        let args =
            RegistrationArgs::try_parse_from(["antsreg", "mov.nii", "ref.nii", "out/s_"]).unwrap();
        assert_eq!(args.input, PathBuf::from("mov.nii"));
        assert_eq!(args.reference, PathBuf::from("ref.nii"));
        assert_eq!(args.out, PathBuf::from("out/s_"));

        assert!(RegistrationArgs::try_parse_from(["antsreg", "mov.nii", "ref.nii"]).is_err());
        assert!(RegistrationArgs::try_parse_from(["antsreg", "a", "b", "c", "d"]).is_err());
    }

    #[test]
    fn motion_plot_takes_two_positionals() {
        let args = MotionPlotArgs::try_parse_from(["plot", "rp.txt", "rp.png"]).unwrap();
        assert_eq!(args.input, PathBuf::from("rp.txt"));
        assert_eq!(args.output, PathBuf::from("rp.png"));

        assert!(MotionPlotArgs::try_parse_from(["plot", "rp.txt"]).is_err());
    }
}
