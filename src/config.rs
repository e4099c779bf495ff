use clap::Parser;
use std::path::PathBuf;

use crate::export::DEFAULT_OBJ_PATH;
use crate::math::InterpolationMode;
use crate::math::tessellate::{DEFAULT_STEPS, MAX_STEPS, MIN_STEPS};

/// Ruled surface modeller
///
/// Sketch a profile in the "XY Plane" window and watch it revolve around the
/// vertical axis. The resulting mesh can be saved as a Wavefront OBJ file.
#[derive(Debug, Parser)]
#[command(version)]
pub struct Args {
    /// File written by "Save OBJ".
    #[arg(short, long, env = "RULED3D_OUTPUT", default_value = DEFAULT_OBJ_PATH)]
    pub output: PathBuf,

    /// Axial and angular subdivisions of the surface.
    #[arg(
        short,
        long,
        env = "RULED3D_STEPS",
        default_value_t = DEFAULT_STEPS,
        value_parser = clap::value_parser!(u32).range(MIN_STEPS as i64..=MAX_STEPS as i64),
    )]
    pub steps: u32,

    /// How profile points are joined.
    #[arg(short, long, env = "RULED3D_MODE", value_enum, default_value_t = InterpolationMode::Piecewise)]
    pub mode: InterpolationMode,

    /// Start with a named preset profile instead of an empty sketch.
    #[arg(short, long, env = "RULED3D_PRESET")]
    pub preset: Option<String>,

    /// Wait for vertical sync when presenting frames.
    #[arg(long, env = "RULED3D_VSYNC")]
    pub vsync: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let args = Args::try_parse_from(["ruled3d"]).expect("parse");

        assert_eq!(args.output, PathBuf::from("geometry.obj"));
        assert_eq!(args.steps, 12);
        assert_eq!(args.mode, InterpolationMode::Piecewise);
        assert!(args.preset.is_none());
    }

    #[test]
    fn explicit_values() {
        let args = Args::try_parse_from([
            "ruled3d", "--output", "out/vase.obj", "--steps", "40", "--mode", "segments", "--preset", "vase",
        ])
        .expect("parse");

        assert_eq!(args.output, PathBuf::from("out/vase.obj"));
        assert_eq!(args.steps, 40);
        assert_eq!(args.mode, InterpolationMode::Segments);
        assert_eq!(args.preset.as_deref(), Some("vase"));
    }

    #[test]
    fn rejects_out_of_range_steps() {
        assert!(Args::try_parse_from(["ruled3d", "--steps", "0"]).is_err());
        assert!(Args::try_parse_from(["ruled3d", "--steps", "101"]).is_err());
    }

    #[test]
    fn command_is_well_formed() {
        use clap::CommandFactory;
        Args::command().debug_assert();
    }
}
