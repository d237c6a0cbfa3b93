use crate::error::{ensure_finite, CamToolResult};
use crate::sink::{CommandSink, GcodeWriter};
use crate::waveform::{generate_segment, Waveform, WaveformKind};
use serde::{Deserialize, Serialize};
use simplified3d_core::{CoordinateFormat, MotionCommand, Move, Point};
use tracing::debug;

/// Number of teeth on a sawtooth first-layer line.
pub const LAYER0_TEETH: usize = 10;

const LABEL: &str = "Print Layer0";

fn default_amplitude() -> f64 {
    0.5
}

/// Parameters for a single first-layer raster line
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrintLayer0Parameters {
    /// Line start X (mm)
    pub x_start: f64,
    /// Line start Y (mm)
    pub y_start: f64,
    /// Line end X (mm)
    pub x_end: f64,
    /// Line end Y (mm)
    pub y_end: f64,
    /// Layer height (mm)
    pub z_value: f64,
    /// Feed rate for both the approach and the printed line (mm/min)
    pub feedrate: f64,
    /// Waveform tag
    pub waveform: String,
    /// Tooth height of the sawtooth profile (mm)
    #[serde(default = "default_amplitude")]
    pub amplitude: f64,
}

impl Default for PrintLayer0Parameters {
    fn default() -> Self {
        Self {
            x_start: 0.0,
            y_start: 0.0,
            x_end: 20.0,
            y_end: 0.0,
            z_value: 0.3,
            feedrate: 1000.0,
            waveform: WaveformKind::Default.name().to_string(),
            amplitude: default_amplitude(),
        }
    }
}

impl PrintLayer0Parameters {
    pub fn validate(&self) -> CamToolResult<()> {
        ensure_finite("x_start", self.x_start)?;
        ensure_finite("y_start", self.y_start)?;
        ensure_finite("x_end", self.x_end)?;
        ensure_finite("y_end", self.y_end)?;
        ensure_finite("z_value", self.z_value)?;
        ensure_finite("feedrate", self.feedrate)?;
        ensure_finite("amplitude", self.amplitude)
    }
}

/// Generator for the first printed layer line
pub struct PrintLayer0Generator {
    params: PrintLayer0Parameters,
}

impl PrintLayer0Generator {
    pub fn new(params: PrintLayer0Parameters) -> Self {
        Self { params }
    }

    /// Rapid to the start point, then print to the end point.
    pub fn generate(&self, sink: &mut dyn CommandSink) -> CamToolResult<()> {
        let wave = Waveform::resolve(&self.params.waveform);
        let mut writer = GcodeWriter::new(sink);
        self.write(&mut writer, &wave, CoordinateFormat::Natural)
    }

    /// Emit into an existing writer with an already resolved waveform.
    ///
    /// `approach` formats the rapid to the start point; callers that compute
    /// the start coordinates pass [`CoordinateFormat::Fixed3`].
    pub(crate) fn write(
        &self,
        writer: &mut GcodeWriter<'_>,
        wave: &Waveform,
        approach: CoordinateFormat,
    ) -> CamToolResult<()> {
        let p = &self.params;
        debug!(
            "Layer0 ({}, {}) -> ({}, {}) at Z{} with {} waveform",
            p.x_start,
            p.y_start,
            p.x_end,
            p.y_end,
            p.z_value,
            wave.kind()
        );

        writer.start_section(LABEL, wave)?;
        writer.emit(
            &MotionCommand::rapid(
                Move::new()
                    .with_x(p.x_start)
                    .with_y(p.y_start)
                    .with_z(p.z_value)
                    .with_feed(p.feedrate),
            ),
            approach,
        )?;

        // A single straight line has no cell structure to square off.
        let kind = match wave.kind() {
            WaveformKind::Square => WaveformKind::Default,
            other => other,
        };
        let start = Point::new(p.x_start, p.y_start);
        let end = Point::new(p.x_end, p.y_end);
        for point in generate_segment(start, end, kind, p.amplitude, LAYER0_TEETH) {
            writer.emit(
                &MotionCommand::linear(
                    Move::to_point(point)
                        .with_z(p.z_value)
                        .with_feed(p.feedrate),
                ),
                CoordinateFormat::Fixed3,
            )?;
        }

        writer.end_section(LABEL, wave)
    }
}
