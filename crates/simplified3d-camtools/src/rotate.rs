//! Rotation primitives.
//!
//! Two entry points exist. [`RotateGenerator`] signals a rotation by moving to
//! a waypoint offset from (x, y) along the new angle; it does not transform
//! any geometry. [`RotateAxisGenerator`] drives the A axis itself and applies
//! the requested waveform to the angular sweep.

use crate::error::{ensure_finite, CamToolResult};
use crate::sink::{CommandSink, GcodeWriter};
use crate::waveform::{generate_sweep, Waveform, WaveformKind};
use serde::{Deserialize, Serialize};
use simplified3d_core::{CoordinateFormat, MotionCommand, Move};
use tracing::debug;

/// Distance of the derived waypoint from (x, y) (mm)
pub const ROTATE_OFFSET_RADIUS: f64 = 5.0;
/// Back-off of the square sweep (degrees)
pub const ROTATE_SQUARE_BACKOFF: f64 = 10.0;

fn default_steps() -> usize {
    4
}

fn default_overshoot() -> f64 {
    2.0
}

/// Parameters for the derived-waypoint rotation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RotateParameters {
    /// Current angle (degrees)
    pub current_angle: f64,
    /// Rotation to apply (degrees)
    pub rotate_by: f64,
    pub x_value: f64,
    pub y_value: f64,
    pub z_value: f64,
    /// Feed rate (mm/min)
    pub feedrate: f64,
}

impl Default for RotateParameters {
    fn default() -> Self {
        Self {
            current_angle: 0.0,
            rotate_by: 90.0,
            x_value: 10.0,
            y_value: 10.0,
            z_value: 0.3,
            feedrate: 1200.0,
        }
    }
}

impl RotateParameters {
    pub fn validate(&self) -> CamToolResult<()> {
        ensure_finite("current_angle", self.current_angle)?;
        ensure_finite("rotate_by", self.rotate_by)?;
        ensure_finite("x_value", self.x_value)?;
        ensure_finite("y_value", self.y_value)?;
        ensure_finite("z_value", self.z_value)?;
        ensure_finite("feedrate", self.feedrate)
    }
}

/// Rotation expressed as a move to a waypoint on a circle around (x, y)
pub struct RotateGenerator {
    params: RotateParameters,
}

impl RotateGenerator {
    pub fn new(params: RotateParameters) -> Self {
        Self { params }
    }

    /// Emit the rotation and return the new angle in `[0, 360)`.
    pub fn generate(&self, sink: &mut dyn CommandSink) -> CamToolResult<f64> {
        let p = &self.params;
        let wave = Waveform::from(WaveformKind::Default);
        let new_angle = p.current_angle + p.rotate_by;
        let radians = new_angle.to_radians();

        let mut writer = GcodeWriter::new(sink);
        writer.start_section("Rotate", &wave)?;
        writer.emit(
            &MotionCommand::rapid(
                Move::new()
                    .with_x(p.x_value)
                    .with_y(p.y_value)
                    .with_z(p.z_value)
                    .with_feed(p.feedrate),
            ),
            CoordinateFormat::Fixed3,
        )?;
        writer.emit(
            &MotionCommand::linear(
                Move::new()
                    .with_x(p.x_value + ROTATE_OFFSET_RADIUS * radians.cos())
                    .with_y(p.y_value + ROTATE_OFFSET_RADIUS * radians.sin())
                    .with_z(p.z_value)
                    .with_feed(p.feedrate),
            ),
            CoordinateFormat::Fixed3,
        )?;
        writer.end_section("Rotate", &wave)?;

        let normalized = new_angle.rem_euclid(360.0);
        debug!("Rotated {} by {} to {}", p.current_angle, p.rotate_by, normalized);
        Ok(normalized)
    }
}

/// Parameters for driving the A axis directly
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RotateAxisParameters {
    /// Current A angle (degrees)
    pub current_angle: f64,
    /// Rotation to apply (degrees)
    pub rotate_by: f64,
    /// A axis feed rate
    pub a_feed: f64,
    /// Waveform tag
    pub waveform: String,
    /// Angular steps of the sawtooth sweep
    #[serde(default = "default_steps")]
    pub steps: usize,
    /// Overshoot between sawtooth steps (degrees)
    #[serde(default = "default_overshoot")]
    pub overshoot: f64,
}

impl Default for RotateAxisParameters {
    fn default() -> Self {
        Self {
            current_angle: 0.0,
            rotate_by: 90.0,
            a_feed: 800.0,
            waveform: WaveformKind::Default.name().to_string(),
            steps: default_steps(),
            overshoot: default_overshoot(),
        }
    }
}

impl RotateAxisParameters {
    pub fn validate(&self) -> CamToolResult<()> {
        ensure_finite("current_angle", self.current_angle)?;
        ensure_finite("rotate_by", self.rotate_by)?;
        ensure_finite("a_feed", self.a_feed)?;
        ensure_finite("overshoot", self.overshoot)
    }
}

/// Waveform-aware rotation of the A axis
pub struct RotateAxisGenerator {
    params: RotateAxisParameters,
}

impl RotateAxisGenerator {
    pub fn new(params: RotateAxisParameters) -> Self {
        Self { params }
    }

    /// Emit the sweep and return the target angle.
    pub fn generate(&self, sink: &mut dyn CommandSink) -> CamToolResult<f64> {
        let p = &self.params;
        let wave = Waveform::resolve(&p.waveform);
        let target = p.current_angle + p.rotate_by;
        let amplitude = match wave.kind() {
            WaveformKind::Square => ROTATE_SQUARE_BACKOFF,
            _ => p.overshoot,
        };
        let angles = generate_sweep(p.current_angle, target, wave.kind(), amplitude, p.steps);
        debug!(
            "A axis {} -> {} in {} moves with {} waveform",
            p.current_angle,
            target,
            angles.len(),
            wave.kind()
        );

        let mut writer = GcodeWriter::new(sink);
        writer.start_section("Rotate A Axis", &wave)?;
        for angle in angles {
            writer.emit(
                &MotionCommand::linear(Move::new().with_a(angle).with_feed(p.a_feed)),
                CoordinateFormat::Fixed3,
            )?;
        }
        writer.end_section("Rotate A Axis", &wave)?;
        Ok(target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rotate_moves_to_offset_waypoint() {
        let mut lines: Vec<String> = Vec::new();
        let angle = RotateGenerator::new(RotateParameters::default())
            .generate(&mut lines)
            .unwrap();
        assert_eq!(angle, 90.0);
        assert_eq!(
            lines,
            vec![
                "; Rotate Start (default waveform)",
                "G0 X10.000 Y10.000 Z0.300 F1200",
                "G1 X10.000 Y15.000 Z0.300 F1200",
                "; Rotate End (default waveform)",
            ]
        );
    }

    #[test]
    fn test_rotate_wraps_angle() {
        let params = RotateParameters {
            current_angle: 300.0,
            rotate_by: 120.0,
            ..Default::default()
        };
        let mut lines: Vec<String> = Vec::new();
        let angle = RotateGenerator::new(params).generate(&mut lines).unwrap();
        assert!((angle - 60.0).abs() < 1e-9);
    }

    #[test]
    fn test_axis_square_backs_off() {
        let params = RotateAxisParameters {
            waveform: "square".to_string(),
            ..Default::default()
        };
        let mut lines: Vec<String> = Vec::new();
        let target = RotateAxisGenerator::new(params).generate(&mut lines).unwrap();
        assert_eq!(target, 90.0);
        assert_eq!(
            &lines[1..4],
            &["G1 A45.000 F800", "G1 A35.000 F800", "G1 A90.000 F800"]
        );
    }

    #[test]
    fn test_axis_default_is_single_move() {
        let mut lines: Vec<String> = Vec::new();
        RotateAxisGenerator::new(RotateAxisParameters::default())
            .generate(&mut lines)
            .unwrap();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[1], "G1 A90.000 F800");
    }
}
