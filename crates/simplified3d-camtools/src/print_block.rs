use crate::error::{ensure_finite, CamToolResult};
use crate::sink::{CommandSink, GcodeWriter};
use crate::waveform::{generate_segment, Waveform, WaveformKind};
use serde::{Deserialize, Serialize};
use simplified3d_core::{CoordinateFormat, MotionCommand, Move, Point};
use tracing::debug;

/// Nominal width of the block outline (mm)
pub const BLOCK_WIDTH: f64 = 10.0;
/// Nominal height of the block outline (mm)
pub const BLOCK_HEIGHT: f64 = 10.0;
/// Teeth per outline edge for the sawtooth waveform
pub const BLOCK_EDGE_TEETH: usize = 5;
/// Tooth height of the sawtooth outline (mm)
pub const BLOCK_TOOTH_AMPLITUDE: f64 = 0.5;

const LABEL: &str = "Print Block";

/// Ultrasound transducer state, threaded through successive block prints.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UltrasoundState(pub bool);

impl UltrasoundState {
    pub const ON: Self = Self(true);
    pub const OFF: Self = Self(false);

    pub fn is_on(&self) -> bool {
        self.0
    }
}

/// Parameters for printing one block
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrintBlockParameters {
    /// Print height (mm)
    pub z_value: f64,
    /// Travel feed rate (mm/min)
    pub g0_xy_feed: f64,
    /// Depositing feed rate (mm/min)
    pub g1_xy_feed: f64,
    /// Waveform tag
    pub waveform: String,
    /// Deposit material while moving
    pub deposition: bool,
    /// Block centre X (mm)
    pub x_value: f64,
    /// Block centre Y (mm)
    pub y_value: f64,
    /// Z lift before rotating the tool (mm)
    pub vertical_lift: f64,
    /// Dwell after the block (ms)
    pub delay_time: f64,
    /// Step mode: switch the ultrasound off after the block
    pub step_button: bool,
    /// Z feed rate (mm/min)
    pub z_feed: f64,
    /// Tool angle on the A axis (degrees)
    pub next_tool_angle: f64,
    /// A axis feed rate
    pub a_feed: f64,
}

impl Default for PrintBlockParameters {
    fn default() -> Self {
        Self {
            z_value: 0.3,
            g0_xy_feed: 1500.0,
            g1_xy_feed: 1200.0,
            waveform: WaveformKind::Default.name().to_string(),
            deposition: true,
            x_value: 10.0,
            y_value: 10.0,
            vertical_lift: 0.5,
            delay_time: 100.0,
            step_button: false,
            z_feed: 1500.0,
            next_tool_angle: 0.0,
            a_feed: 800.0,
        }
    }
}

impl PrintBlockParameters {
    pub fn validate(&self) -> CamToolResult<()> {
        ensure_finite("z_value", self.z_value)?;
        ensure_finite("g0_xy_feed", self.g0_xy_feed)?;
        ensure_finite("g1_xy_feed", self.g1_xy_feed)?;
        ensure_finite("x_value", self.x_value)?;
        ensure_finite("y_value", self.y_value)?;
        ensure_finite("vertical_lift", self.vertical_lift)?;
        ensure_finite("delay_time", self.delay_time)?;
        ensure_finite("z_feed", self.z_feed)?;
        ensure_finite("next_tool_angle", self.next_tool_angle)?;
        ensure_finite("a_feed", self.a_feed)
    }
}

/// Generator for a single printed block
pub struct PrintBlockGenerator {
    params: PrintBlockParameters,
}

impl PrintBlockGenerator {
    pub fn new(params: PrintBlockParameters) -> Self {
        Self { params }
    }

    /// Print the block and return the ultrasound state for the next call.
    ///
    /// The state only changes when `step_button` is set and the ultrasound is
    /// already on, so this can switch it off but never on.
    pub fn generate(
        &self,
        sink: &mut dyn CommandSink,
        ultrasound: UltrasoundState,
    ) -> CamToolResult<UltrasoundState> {
        let p = &self.params;
        let wave = Waveform::resolve(&p.waveform);
        debug!(
            "Block at ({}, {}) angle {} deposition {} with {} waveform",
            p.x_value,
            p.y_value,
            p.next_tool_angle,
            p.deposition,
            wave.kind()
        );

        let mut writer = GcodeWriter::new(sink);
        writer.start_section(LABEL, &wave)?;
        writer.emit(
            &MotionCommand::linear(
                Move::new()
                    .with_z(p.z_value + p.vertical_lift)
                    .with_feed(p.z_feed),
            ),
            CoordinateFormat::Natural,
        )?;
        writer.emit(
            &MotionCommand::linear(Move::new().with_a(p.next_tool_angle).with_feed(p.a_feed)),
            CoordinateFormat::Natural,
        )?;

        match wave.kind() {
            WaveformKind::Default => {
                let target = Move::new()
                    .with_x(p.x_value)
                    .with_y(p.y_value)
                    .with_feed(self.xy_feed());
                writer.emit(&self.travel(target), CoordinateFormat::Natural)?;
            }
            kind => self.write_outline(&mut writer, kind)?,
        }

        if !p.deposition {
            writer.emit(
                &MotionCommand::linear(Move::new().with_z(p.z_value).with_feed(p.z_feed)),
                CoordinateFormat::Natural,
            )?;
        }
        writer.dwell(p.delay_time)?;
        writer.end_section(LABEL, &wave)?;

        if p.step_button && ultrasound.is_on() {
            debug!("Step mode: ultrasound off");
            return Ok(UltrasoundState::OFF);
        }
        Ok(ultrasound)
    }

    fn xy_feed(&self) -> f64 {
        if self.params.deposition {
            self.params.g1_xy_feed
        } else {
            self.params.g0_xy_feed
        }
    }

    fn travel(&self, m: Move) -> MotionCommand {
        if self.params.deposition {
            MotionCommand::linear(m)
        } else {
            MotionCommand::rapid(m)
        }
    }

    /// Corners of the outline, counter-clockwise from bottom-left.
    fn corners(&self) -> [Point; 4] {
        let center = Point::new(self.params.x_value, self.params.y_value);
        let (hw, hh) = (BLOCK_WIDTH / 2.0, BLOCK_HEIGHT / 2.0);
        [
            center.offset(-hw, -hh),
            center.offset(hw, -hh),
            center.offset(hw, hh),
            center.offset(-hw, hh),
        ]
    }

    fn write_outline(&self, writer: &mut GcodeWriter<'_>, kind: WaveformKind) -> CamToolResult<()> {
        let corners = self.corners();
        let feed = self.xy_feed();
        let (edge_kind, amplitude) = match kind {
            WaveformKind::Sawtooth => (WaveformKind::Sawtooth, BLOCK_TOOTH_AMPLITUDE),
            _ => (WaveformKind::Default, 0.0),
        };
        // Bottom and right teeth point outward, top and left mirror them.
        let signs = [-1.0, 1.0, -1.0, 1.0];

        writer.emit(
            &self.travel(Move::to_point(corners[0]).with_feed(feed)),
            CoordinateFormat::Fixed3,
        )?;
        for (i, sign) in signs.iter().enumerate() {
            let start = corners[i];
            let end = corners[(i + 1) % corners.len()];
            for point in generate_segment(start, end, edge_kind, amplitude * sign, BLOCK_EDGE_TEETH)
            {
                writer.emit(
                    &self.travel(Move::to_point(point).with_feed(feed)),
                    CoordinateFormat::Fixed3,
                )?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(params: PrintBlockParameters, state: UltrasoundState) -> (Vec<String>, UltrasoundState) {
        let mut lines: Vec<String> = Vec::new();
        let next = PrintBlockGenerator::new(params)
            .generate(&mut lines, state)
            .unwrap();
        (lines, next)
    }

    #[test]
    fn test_default_block_moves_directly() {
        let (lines, _) = render(PrintBlockParameters::default(), UltrasoundState::ON);
        assert_eq!(
            lines,
            vec![
                "; Print Block Start (default waveform)",
                "G1 Z0.8 F1500",
                "G1 A0 F800",
                "G1 X10 Y10 F1200",
                "G04 P100",
                "; Print Block End (default waveform)",
            ]
        );
    }

    #[test]
    fn test_travel_without_deposition_returns_to_height() {
        let params = PrintBlockParameters {
            deposition: false,
            ..Default::default()
        };
        let (lines, _) = render(params, UltrasoundState::OFF);
        assert_eq!(lines[3], "G0 X10 Y10 F1500");
        assert_eq!(lines[4], "G1 Z0.3 F1500");
    }

    #[test]
    fn test_square_outline_closes() {
        let params = PrintBlockParameters {
            waveform: "square".to_string(),
            ..Default::default()
        };
        let (lines, _) = render(params, UltrasoundState::OFF);
        let moves: Vec<&String> = lines.iter().filter(|l| l.starts_with("G1 X")).collect();
        assert_eq!(moves.len(), 5);
        assert_eq!(moves[0], "G1 X5.000 Y5.000 F1200");
        assert_eq!(moves[2], "G1 X15.000 Y15.000 F1200");
        assert_eq!(moves[0], moves[4]);
    }

    #[test]
    fn test_sawtooth_outline_has_five_teeth_per_edge() {
        let params = PrintBlockParameters {
            waveform: "sawtooth".to_string(),
            ..Default::default()
        };
        let (lines, _) = render(params, UltrasoundState::OFF);
        let moves: Vec<&String> = lines.iter().filter(|l| l.starts_with("G1 X")).collect();
        // corner approach + 4 edges of 5 points each
        assert_eq!(moves.len(), 1 + 4 * BLOCK_EDGE_TEETH);
        // first tooth on the bottom edge points away from the block
        assert_eq!(moves[1], "G1 X7.000 Y4.500 F1200");
        assert_eq!(moves.last(), moves.first());
    }

    #[test]
    fn test_outline_feed_follows_deposition() {
        for waveform in ["square", "sawtooth"] {
            let params = PrintBlockParameters {
                waveform: waveform.to_string(),
                deposition: false,
                ..Default::default()
            };
            let (lines, _) = render(params, UltrasoundState::OFF);
            let travel: Vec<&String> = lines.iter().filter(|l| l.starts_with("G0 X")).collect();
            assert!(!travel.is_empty());
            assert!(travel.iter().all(|l| l.ends_with(" F1500")));
            assert!(!lines.iter().any(|l| l.starts_with("G1 X")));
        }
    }

    #[test]
    fn test_step_button_only_switches_off() {
        let params = PrintBlockParameters {
            step_button: true,
            ..Default::default()
        };
        assert_eq!(render(params.clone(), UltrasoundState::ON).1, UltrasoundState::OFF);
        assert_eq!(render(params, UltrasoundState::OFF).1, UltrasoundState::OFF);
        assert_eq!(
            render(PrintBlockParameters::default(), UltrasoundState::ON).1,
            UltrasoundState::ON
        );
    }
}
