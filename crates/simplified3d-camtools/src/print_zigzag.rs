use crate::error::{ensure_finite, CamToolResult};
use crate::sink::{CommandSink, GcodeWriter};
use crate::waveform::{generate_segment, Waveform, WaveformKind};
use serde::{Deserialize, Serialize};
use simplified3d_core::{CoordinateFormat, MotionCommand, Move, Point};
use tracing::debug;

/// Waveform subdivisions per row.
pub const ZIGZAG_SEGMENTS: usize = 10;

const LABEL: &str = "Print ZigZag";

fn default_row_spacing() -> f64 {
    0.2
}

fn default_amplitude() -> f64 {
    0.5
}

/// Parameters for a boustrophedon raster fill
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrintZigZagParameters {
    /// Left end of every row (mm)
    pub x_start: f64,
    /// Right end of every row (mm)
    pub x_end: f64,
    /// Y of the first row (mm)
    pub y_value: f64,
    /// Print height (mm)
    pub z_value: f64,
    /// Number of rows
    pub passes: usize,
    /// Feed rate (mm/min)
    pub feedrate: f64,
    /// Waveform tag
    pub waveform: String,
    /// Distance between consecutive rows (mm)
    #[serde(default = "default_row_spacing")]
    pub row_spacing: f64,
    /// Tooth or step height (mm)
    #[serde(default = "default_amplitude")]
    pub amplitude: f64,
}

impl Default for PrintZigZagParameters {
    fn default() -> Self {
        Self {
            x_start: 0.0,
            x_end: 20.0,
            y_value: 10.0,
            z_value: 0.3,
            passes: 10,
            feedrate: 1000.0,
            waveform: WaveformKind::Default.name().to_string(),
            row_spacing: default_row_spacing(),
            amplitude: default_amplitude(),
        }
    }
}

impl PrintZigZagParameters {
    pub fn validate(&self) -> CamToolResult<()> {
        ensure_finite("x_start", self.x_start)?;
        ensure_finite("x_end", self.x_end)?;
        ensure_finite("y_value", self.y_value)?;
        ensure_finite("z_value", self.z_value)?;
        ensure_finite("feedrate", self.feedrate)?;
        ensure_finite("row_spacing", self.row_spacing)?;
        ensure_finite("amplitude", self.amplitude)
    }
}

/// Generator for a zig-zag raster
pub struct PrintZigZagGenerator {
    params: PrintZigZagParameters,
}

impl PrintZigZagGenerator {
    pub fn new(params: PrintZigZagParameters) -> Self {
        Self { params }
    }

    /// Start and end of row `index`; even rows run start to end, odd rows back.
    pub fn row(&self, index: usize) -> (Point, Point) {
        let p = &self.params;
        let y = p.y_value + index as f64 * p.row_spacing;
        if index % 2 == 0 {
            (Point::new(p.x_start, y), Point::new(p.x_end, y))
        } else {
            (Point::new(p.x_end, y), Point::new(p.x_start, y))
        }
    }

    pub fn generate(&self, sink: &mut dyn CommandSink) -> CamToolResult<()> {
        let p = &self.params;
        let wave = Waveform::resolve(&p.waveform);
        debug!(
            "ZigZag {} passes from X{} to X{} with {} waveform",
            p.passes,
            p.x_start,
            p.x_end,
            wave.kind()
        );

        let mut writer = GcodeWriter::new(sink);
        writer.start_section(LABEL, &wave)?;

        for i in 0..p.passes {
            let (row_start, row_end) = self.row(i);
            let sign = if i % 2 == 0 { 1.0 } else { -1.0 };
            self.print_point(&mut writer, row_start)?;

            let mut path = generate_segment(
                row_start,
                row_end,
                wave.kind(),
                p.amplitude * sign,
                ZIGZAG_SEGMENTS,
            );
            if wave.kind() == WaveformKind::Sawtooth && i + 1 < p.passes {
                path.extend(generate_segment(
                    row_end,
                    row_start,
                    WaveformKind::Sawtooth,
                    -p.amplitude * sign,
                    ZIGZAG_SEGMENTS,
                ));
            }
            for point in path {
                self.print_point(&mut writer, point)?;
            }
        }

        writer.end_section(LABEL, &wave)
    }

    fn print_point(&self, writer: &mut GcodeWriter<'_>, point: Point) -> CamToolResult<()> {
        writer.emit(
            &MotionCommand::linear(
                Move::to_point(point)
                    .with_z(self.params.z_value)
                    .with_feed(self.params.feedrate),
            ),
            CoordinateFormat::Fixed3,
        )
    }
}
