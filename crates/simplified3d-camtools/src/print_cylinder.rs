use crate::error::{ensure_finite, CamToolResult};
use crate::sink::{CommandSink, GcodeWriter};
use crate::waveform::{modulate_radius, Waveform, WaveformKind};
use serde::{Deserialize, Serialize};
use simplified3d_core::{CoordinateFormat, MotionCommand, Move, Point};
use std::f64::consts::TAU;
use tracing::debug;

const LABEL: &str = "Print Cylinder";

/// Parameters for a cylindrical ring
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrintCylinderParameters {
    /// Centre X (mm)
    pub x_center: f64,
    /// Centre Y (mm)
    pub y_center: f64,
    /// Print height (mm)
    pub z_value: f64,
    /// Ring radius (mm)
    pub radius: f64,
    /// Number of straight segments approximating the circle
    pub segments: usize,
    /// Feed rate (mm/min)
    pub feedrate: f64,
    /// Waveform tag
    pub waveform: String,
}

impl Default for PrintCylinderParameters {
    fn default() -> Self {
        Self {
            x_center: 10.0,
            y_center: 10.0,
            z_value: 0.3,
            radius: 5.0,
            segments: 36,
            feedrate: 1200.0,
            waveform: WaveformKind::Default.name().to_string(),
        }
    }
}

impl PrintCylinderParameters {
    pub fn validate(&self) -> CamToolResult<()> {
        ensure_finite("x_center", self.x_center)?;
        ensure_finite("y_center", self.y_center)?;
        ensure_finite("z_value", self.z_value)?;
        ensure_finite("radius", self.radius)?;
        ensure_finite("feedrate", self.feedrate)
    }
}

/// Generator for a closed circular path
pub struct PrintCylinderGenerator {
    params: PrintCylinderParameters,
}

impl PrintCylinderGenerator {
    pub fn new(params: PrintCylinderParameters) -> Self {
        Self { params }
    }

    /// Points of the ring, `segments + 1` of them with the last one closing
    /// the loop on the first. Zero segments yields the single anchor at angle 0.
    pub fn ring_points(&self, kind: WaveformKind) -> Vec<Point> {
        let p = &self.params;
        let center = Point::new(p.x_center, p.y_center);
        if p.segments == 0 {
            return vec![center.offset(p.radius, 0.0)];
        }

        (0..=p.segments)
            .map(|i| {
                let step = i % p.segments;
                let angle = TAU * step as f64 / p.segments as f64;
                let quarters = (4 * step) as f64 / p.segments as f64;
                let r = modulate_radius(kind, p.radius, quarters.fract());
                center.offset(r * angle.cos(), r * angle.sin())
            })
            .collect()
    }

    pub fn generate(&self, sink: &mut dyn CommandSink) -> CamToolResult<()> {
        let p = &self.params;
        let wave = Waveform::resolve(&p.waveform);
        debug!(
            "Cylinder r={} at ({}, {}) with {} segments",
            p.radius, p.x_center, p.y_center, p.segments
        );

        let mut writer = GcodeWriter::new(sink);
        writer.start_section(LABEL, &wave)?;
        for point in self.ring_points(wave.kind()) {
            writer.emit(
                &MotionCommand::linear(
                    Move::to_point(point)
                        .with_z(p.z_value)
                        .with_feed(p.feedrate),
                ),
                CoordinateFormat::Fixed3,
            )?;
        }
        writer.end_section(LABEL, &wave)
    }
}
