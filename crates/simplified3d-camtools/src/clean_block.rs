use crate::error::{ensure_finite, CamToolResult};
use crate::sink::{CommandSink, GcodeWriter};
use crate::waveform::{generate_segment, Waveform, WaveformKind};
use serde::{Deserialize, Serialize};
use simplified3d_core::{CoordinateFormat, MotionCommand, Move, Point};
use tracing::debug;

/// Whether the cleaning pass carries a tool
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ToolMode {
    /// Sweep moves are linear (tool engaged)
    WithTool,
    /// Every move is rapid
    NoTool,
}

impl ToolMode {
    fn label(&self) -> &'static str {
        match self {
            Self::WithTool => "Clean Block",
            Self::NoTool => "Clean No Tool Block",
        }
    }

    fn sweep_command(&self, m: Move) -> MotionCommand {
        match self {
            Self::WithTool => MotionCommand::linear(m),
            Self::NoTool => MotionCommand::rapid(m),
        }
    }
}

/// Optional sweep from the cleaning point to an end point
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CleanSweep {
    /// Sweep end X (mm)
    pub x_end: f64,
    /// Sweep end Y (mm)
    pub y_end: f64,
    /// Feed rate along the sweep (mm/min)
    pub feedrate: f64,
    /// Waveform tag
    pub waveform: String,
    /// Tooth or step height (mm)
    pub amplitude: f64,
    /// Waveform subdivisions along the sweep
    pub subdivisions: usize,
}

/// Parameters for the cleaning generators
///
/// With `sweep` unset the pass is a rapid move to (x, y, z) followed by a
/// dwell. With `sweep` set the tool additionally travels to the sweep end
/// using the requested waveform before dwelling.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CleanBlockParameters {
    /// Cleaning point X (mm)
    pub x_value: f64,
    /// Cleaning point Y (mm)
    pub y_value: f64,
    /// Cleaning height (mm)
    pub z_value: f64,
    /// Feed rate of the approach (mm/min)
    pub z_feed: f64,
    /// Dwell after the pass (ms)
    pub delay_time: f64,
    #[serde(default)]
    pub sweep: Option<CleanSweep>,
}

impl Default for CleanBlockParameters {
    fn default() -> Self {
        Self {
            x_value: 0.0,
            y_value: 0.0,
            z_value: 0.3,
            z_feed: 1000.0,
            delay_time: 500.0,
            sweep: None,
        }
    }
}

impl CleanBlockParameters {
    pub fn with_sweep(mut self, sweep: CleanSweep) -> Self {
        self.sweep = Some(sweep);
        self
    }

    pub fn validate(&self) -> CamToolResult<()> {
        ensure_finite("x_value", self.x_value)?;
        ensure_finite("y_value", self.y_value)?;
        ensure_finite("z_value", self.z_value)?;
        ensure_finite("z_feed", self.z_feed)?;
        ensure_finite("delay_time", self.delay_time)?;
        if let Some(sweep) = &self.sweep {
            ensure_finite("x_end", sweep.x_end)?;
            ensure_finite("y_end", sweep.y_end)?;
            ensure_finite("feedrate", sweep.feedrate)?;
            ensure_finite("amplitude", sweep.amplitude)?;
        }
        Ok(())
    }
}

/// Generator for nozzle and tool cleaning passes
pub struct CleanBlockGenerator {
    params: CleanBlockParameters,
    mode: ToolMode,
}

impl CleanBlockGenerator {
    /// Cleaning pass with the tool engaged
    pub fn new(params: CleanBlockParameters) -> Self {
        Self {
            params,
            mode: ToolMode::WithTool,
        }
    }

    /// Cleaning pass that only ever issues rapid moves
    pub fn without_tool(params: CleanBlockParameters) -> Self {
        Self {
            params,
            mode: ToolMode::NoTool,
        }
    }

    pub fn generate(&self, sink: &mut dyn CommandSink) -> CamToolResult<()> {
        let p = &self.params;
        let label = self.mode.label();
        let wave = match &p.sweep {
            Some(sweep) => Waveform::resolve(&sweep.waveform),
            None => Waveform::from(WaveformKind::Default),
        };
        debug!(
            "{} at ({}, {}, {}), sweep: {}",
            label,
            p.x_value,
            p.y_value,
            p.z_value,
            p.sweep.is_some()
        );

        let mut writer = GcodeWriter::new(sink);
        writer.start_section(label, &wave)?;
        writer.emit(
            &MotionCommand::rapid(
                Move::new()
                    .with_x(p.x_value)
                    .with_y(p.y_value)
                    .with_z(p.z_value)
                    .with_feed(p.z_feed),
            ),
            CoordinateFormat::Natural,
        )?;

        if let Some(sweep) = &p.sweep {
            let start = Point::new(p.x_value, p.y_value);
            let end = Point::new(sweep.x_end, sweep.y_end);
            for point in
                generate_segment(start, end, wave.kind(), sweep.amplitude, sweep.subdivisions)
            {
                let m = Move::to_point(point)
                    .with_z(p.z_value)
                    .with_feed(sweep.feedrate);
                writer.emit(&self.mode.sweep_command(m), CoordinateFormat::Fixed3)?;
            }
        }

        writer.dwell(p.delay_time)?;
        writer.end_section(label, &wave)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_clean_is_rapid_and_dwell() {
        let mut lines: Vec<String> = Vec::new();
        CleanBlockGenerator::new(CleanBlockParameters::default())
            .generate(&mut lines)
            .unwrap();
        assert_eq!(
            lines,
            vec![
                "; Clean Block Start (default waveform)",
                "G0 X0 Y0 Z0.3 F1000",
                "G04 P500",
                "; Clean Block End (default waveform)",
            ]
        );
    }

    #[test]
    fn test_validate_checks_sweep() {
        let params = CleanBlockParameters::default().with_sweep(CleanSweep {
            x_end: f64::INFINITY,
            y_end: 0.0,
            feedrate: 800.0,
            waveform: "default".to_string(),
            amplitude: 0.5,
            subdivisions: 4,
        });
        assert!(params.validate().is_err());
    }
}
