//! # Simplified3D
//!
//! A G-code generator for ultrasonic additive printing. Toolpath primitives
//! (blocks, cylinders, first-layer lines, zig-zag fills, rotations and a
//! layer slicer) are emitted with an optional waveform modulation of the path.
//!
//! ## Architecture
//!
//! Simplified3D is organized as a workspace with multiple crates:
//!
//! 1. **simplified3d-core** - Points, axes, G-code commands and number formatting
//! 2. **simplified3d-camtools** - Waveform strategies and the pattern generators
//! 3. **simplified3d-parser** - Coordinate extraction from G-code text
//! 4. **simplified3d-settings** - Machine, waveform, output and logging settings
//! 5. **simplified3d-cli** - Command-line front end tying the crates together
//! 6. **simplified3d** - Binary entry point, version stamp and logging setup

pub use simplified3d_cli as cli;

pub use simplified3d_core::{
    format_coordinate, format_natural, Axis, CoordinateFormat, GcodeError, MotionCommand, Move,
    Point,
};

pub use simplified3d_camtools::{
    CamToolError, CamToolResult, CleanBlockGenerator, CleanBlockParameters, CleanSweep,
    CommandSink, GcodeWriter, PrintBlockGenerator, PrintBlockParameters, PrintCylinderGenerator,
    PrintCylinderParameters, PrintLayer0Generator, PrintLayer0Parameters, PrintZigZagGenerator,
    PrintZigZagParameters, RotateAxisGenerator, RotateAxisParameters, RotateGenerator,
    RotateParameters, SlicerGenerator, SlicerParameters, UltrasoundState, Waveform, WaveformKind,
    WriterSink,
};

pub use simplified3d_parser::{extract, get_x, get_y, get_z, parse_program, LineCoordinates};

pub use simplified3d_settings::{Config, LoggingSettings, SettingsError};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build date (set at compile time)
pub const BUILD_DATE: &str = env!("SIMPLIFIED3D_BUILD_DATE");

/// Version string shown by `--version`
pub const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (built ",
    env!("SIMPLIFIED3D_BUILD_DATE"),
    ")"
);

/// Initialize logging from the logging settings
///
/// Sets up structured logging with:
/// - Output on stderr, leaving stdout for G-code
/// - RUST_LOG environment variable support, falling back to `settings.level`
/// - JSON records when `settings.json` is set
pub fn init_logging(settings: &LoggingSettings) -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter =
        EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(&settings.level))?;
    let registry = tracing_subscriber::registry().with(env_filter);

    if settings.json {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .try_init()?;
    } else {
        registry
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .with_level(true),
            )
            .try_init()?;
    }

    Ok(())
}
