//! # Simplified3D CAM Tools
//!
//! Toolpath pattern generators that turn machining and printing intents into
//! ordered G-code command sequences.
//!
//! ## Generators
//!
//! - **Clean Block / Clean No Tool Block**: rapid-and-dwell cleaning, optionally
//!   sweeping between two points
//! - **Print Block**: Z lift, A-axis rotation and a block outline, threading the
//!   ultrasound state through the call
//! - **Print Cylinder**: circular ring approximated by line segments
//! - **Print Layer0**: single raster line for the first layer
//! - **Print ZigZag**: boustrophedon raster fill
//! - **Rotate**: derived-XY rotation and direct A-axis rotation
//! - **Slicer**: per-layer orchestration of Print Layer0
//!
//! Every generator accepts a waveform tag (`default`, `sawtooth`, `square`).
//! Unknown tags fall back to the straight path and leave a warning comment in
//! the output.

pub mod clean_block;
pub mod error;
pub mod print_block;
pub mod print_cylinder;
pub mod print_layer0;
pub mod print_zigzag;
pub mod rotate;
pub mod sink;
pub mod slicer;
pub mod waveform;

pub use clean_block::{CleanBlockGenerator, CleanBlockParameters, CleanSweep};
pub use error::{CamToolError, CamToolResult};
pub use print_block::{PrintBlockGenerator, PrintBlockParameters, UltrasoundState};
pub use print_cylinder::{PrintCylinderGenerator, PrintCylinderParameters};
pub use print_layer0::{PrintLayer0Generator, PrintLayer0Parameters};
pub use print_zigzag::{PrintZigZagGenerator, PrintZigZagParameters};
pub use rotate::{RotateAxisGenerator, RotateAxisParameters, RotateGenerator, RotateParameters};
pub use sink::{CommandSink, GcodeWriter, WriterSink};
pub use slicer::{layer_count, SlicerGenerator, SlicerParameters};
pub use waveform::{generate_segment, generate_sweep, Waveform, WaveformKind};
