//! Layer orchestration.
//!
//! The slicer steps through Z layers and prints one boundary line of the
//! bounding rectangle per layer using the first-layer generator. It does not
//! fill the rectangle.

use crate::error::{ensure_finite, CamToolResult};
use crate::print_layer0::{PrintLayer0Generator, PrintLayer0Parameters};
use crate::sink::{CommandSink, GcodeWriter};
use crate::waveform::{Waveform, WaveformKind};
use serde::{Deserialize, Serialize};
use simplified3d_core::{CoordinateFormat, MotionCommand, Move};
use tracing::{debug, info};

const LABEL: &str = "Slicer";

fn default_amplitude() -> f64 {
    0.5
}

/// Number of whole layers of `layer_thickness` that fit in `z_height`.
///
/// Non-positive or non-finite inputs yield zero layers.
pub fn layer_count(z_height: f64, layer_thickness: f64) -> usize {
    if !layer_thickness.is_finite() || !z_height.is_finite() || layer_thickness <= 0.0 {
        return 0;
    }
    let layers = (z_height / layer_thickness).floor();
    if layers <= 0.0 {
        0
    } else {
        layers as usize
    }
}

/// Parameters for slicing a bounding box into layers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlicerParameters {
    /// Total object height (mm)
    pub z_height: f64,
    /// Fill density (percent), recorded in the header
    pub fill_density: f64,
    /// Layer thickness (mm)
    pub layer_thickness: f64,
    /// Nozzle diameter (mm), recorded in the header
    pub nozzle_diameter: f64,
    /// Feed rate of the layer change (mm/min)
    pub g0_feed: f64,
    /// Feed rate of the printed line (mm/min)
    pub g1_feed: f64,
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
    /// Waveform tag forwarded to every layer
    pub waveform: String,
    /// Tooth height of the sawtooth layer line (mm)
    #[serde(default = "default_amplitude")]
    pub amplitude: f64,
}

impl Default for SlicerParameters {
    fn default() -> Self {
        Self {
            z_height: 1.0,
            fill_density: 20.0,
            layer_thickness: 0.2,
            nozzle_diameter: 0.4,
            g0_feed: 1500.0,
            g1_feed: 1200.0,
            x_min: 0.0,
            x_max: 20.0,
            y_min: 0.0,
            y_max: 20.0,
            waveform: WaveformKind::Default.name().to_string(),
            amplitude: default_amplitude(),
        }
    }
}

impl SlicerParameters {
    pub fn validate(&self) -> CamToolResult<()> {
        ensure_finite("z_height", self.z_height)?;
        ensure_finite("layer_thickness", self.layer_thickness)?;
        ensure_finite("g0_feed", self.g0_feed)?;
        ensure_finite("g1_feed", self.g1_feed)?;
        ensure_finite("x_min", self.x_min)?;
        ensure_finite("x_max", self.x_max)?;
        ensure_finite("y_min", self.y_min)?;
        ensure_finite("y_max", self.y_max)?;
        ensure_finite("amplitude", self.amplitude)
    }
}

/// Generator for layer-by-layer output
pub struct SlicerGenerator {
    params: SlicerParameters,
}

impl SlicerGenerator {
    pub fn new(params: SlicerParameters) -> Self {
        Self { params }
    }

    /// Emit every layer and return the number of layers written.
    pub fn generate(&self, sink: &mut dyn CommandSink) -> CamToolResult<usize> {
        let p = &self.params;
        let wave = Waveform::resolve(&p.waveform);
        let layer_wave = Waveform::from(wave.kind());
        let layers = layer_count(p.z_height, p.layer_thickness);

        let mut writer = GcodeWriter::new(sink);
        writer.start_section(LABEL, &wave)?;
        writer.comment(format!(
            "Layers: {}, fill density {}%, nozzle diameter {}",
            layers, p.fill_density, p.nozzle_diameter
        ))?;

        for layer in 0..layers {
            let z = (layer + 1) as f64 * p.layer_thickness;
            debug!("Layer {} at height {:.3}", layer + 1, z);
            writer.comment(format!("Layer {} at height {:.3}", layer + 1, z))?;
            writer.emit(
                &MotionCommand::rapid(Move::new().with_z(z).with_feed(p.g0_feed)),
                CoordinateFormat::Fixed3,
            )?;

            let line = PrintLayer0Generator::new(PrintLayer0Parameters {
                x_start: p.x_min,
                y_start: p.y_min,
                x_end: p.x_max,
                y_end: p.y_min,
                z_value: z,
                feedrate: p.g1_feed,
                waveform: wave.kind().name().to_string(),
                amplitude: p.amplitude,
            });
            line.write(&mut writer, &layer_wave, CoordinateFormat::Fixed3)?;
        }

        writer.end_section(LABEL, &wave)?;
        info!("Sliced {} layers in {} lines", layers, writer.emitted());
        Ok(layers)
    }
}
