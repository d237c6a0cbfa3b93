//! Waveform strategies
//!
//! A waveform perturbs the nominal path between two anchor points. Every
//! generator resolves its waveform once per call and hands each segment of its
//! path skeleton to [`generate_segment`] (or [`generate_sweep`] for the rotary
//! axis), so the motion style is dispatched in one place.
//!
//! All functions here are pure: the same inputs always yield the same points.
//! The returned sequence never contains the start anchor and always ends
//! exactly on the end anchor.

use serde::{Deserialize, Serialize};
use simplified3d_core::{GcodeError, Point};
use std::fmt;
use std::str::FromStr;
use tracing::warn;

/// Relative radius perturbation of the sawtooth cylinder profile.
pub const RADIAL_SAWTOOTH_RATIO: f64 = 0.2;

/// Motion style applied to a nominal path segment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WaveformKind {
    /// Straight move to the segment end
    Default,
    /// Toothed profile alternating between baseline and an offset
    Sawtooth,
    /// Staircase profile of raised and lowered cells
    Square,
}

impl WaveformKind {
    /// Lowercase name used in comments and configuration
    pub fn name(&self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Sawtooth => "sawtooth",
            Self::Square => "square",
        }
    }
}

impl Default for WaveformKind {
    fn default() -> Self {
        Self::Default
    }
}

impl fmt::Display for WaveformKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for WaveformKind {
    type Err = GcodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "" | "none" | "default" | "straight" => Ok(Self::Default),
            "sawtooth" => Ok(Self::Sawtooth),
            "square" => Ok(Self::Square),
            _ => Err(GcodeError::UnknownWaveform { tag: s.to_string() }),
        }
    }
}

/// Waveform selection for one generation call
///
/// Unknown tags resolve to [`WaveformKind::Default`] and remember the
/// rejected tag so the generator can write a warning comment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Waveform {
    kind: WaveformKind,
    rejected_tag: Option<String>,
}

impl Waveform {
    /// Resolve a caller-supplied tag, never failing.
    pub fn resolve(tag: &str) -> Self {
        match tag.parse::<WaveformKind>() {
            Ok(kind) => Self {
                kind,
                rejected_tag: None,
            },
            Err(err) => {
                warn!("{}, falling back to default", err);
                Self {
                    kind: WaveformKind::Default,
                    rejected_tag: Some(tag.to_string()),
                }
            }
        }
    }

    pub fn kind(&self) -> WaveformKind {
        self.kind
    }

    /// Text of the warning comment for an unknown tag
    pub fn warning(&self) -> Option<String> {
        self.rejected_tag
            .as_ref()
            .map(|tag| format!("Warning: Unknown waveform '{}', using default path", tag))
    }
}

impl From<WaveformKind> for Waveform {
    fn from(kind: WaveformKind) -> Self {
        Self {
            kind,
            rejected_tag: None,
        }
    }
}

/// Waypoints approximating the segment `start -> end`.
///
/// * `Default` returns `[end]`.
/// * `Sawtooth` splits the segment into `subdivisions` equal steps; odd steps
///   are offset by `amplitude` along the axis perpendicular to the dominant
///   direction of travel, even steps stay on the baseline.
/// * `Square` builds `max(subdivisions / 2, 1)` cells. Each cell moves along
///   the baseline to its midpoint, steps by `amplitude`, moves to the cell end
///   at the raised height, and steps back to the baseline.
///
/// A zero-length segment or `subdivisions == 0` yields `[end]`.
pub fn generate_segment(
    start: Point,
    end: Point,
    kind: WaveformKind,
    amplitude: f64,
    subdivisions: usize,
) -> Vec<Point> {
    if subdivisions == 0 || start.approx_eq(&end) {
        return vec![end];
    }

    match kind {
        WaveformKind::Default => vec![end],
        WaveformKind::Sawtooth => sawtooth_segment(start, end, amplitude, subdivisions),
        WaveformKind::Square => square_segment(start, end, amplitude, subdivisions),
    }
}

/// Offset vector of `amplitude` perpendicular to the dominant axis of travel.
fn perpendicular_offset(start: Point, end: Point, amplitude: f64) -> (f64, f64) {
    let dx = (end.x - start.x).abs();
    let dy = (end.y - start.y).abs();
    if dx >= dy {
        (0.0, amplitude)
    } else {
        (amplitude, 0.0)
    }
}

fn sawtooth_segment(start: Point, end: Point, amplitude: f64, steps: usize) -> Vec<Point> {
    let (ox, oy) = perpendicular_offset(start, end, amplitude);
    let mut points = Vec::with_capacity(steps);

    for i in 1..steps {
        let p = start.lerp(&end, i as f64 / steps as f64);
        if i % 2 == 1 {
            points.push(p.offset(ox, oy));
        } else {
            points.push(p);
        }
    }
    points.push(end);
    points
}

fn square_segment(start: Point, end: Point, step_height: f64, subdivisions: usize) -> Vec<Point> {
    let (ox, oy) = perpendicular_offset(start, end, step_height);
    let cells = (subdivisions / 2).max(1);
    let mut points = Vec::with_capacity(cells * 4);

    for c in 0..cells {
        let t0 = c as f64 / cells as f64;
        let t1 = (c + 1) as f64 / cells as f64;
        let mid = start.lerp(&end, (t0 + t1) / 2.0);
        let cell_end = if c + 1 == cells {
            end
        } else {
            start.lerp(&end, t1)
        };

        points.push(mid);
        points.push(mid.offset(ox, oy));
        points.push(cell_end.offset(ox, oy));
        points.push(cell_end);
    }
    points
}

/// Intermediate angles for a rotary move `start -> end` (degrees).
///
/// * `Default` returns `[end]`.
/// * `Square` goes to the half-way angle, backs off by `amplitude` against the
///   direction of rotation, then finishes at `end`.
/// * `Sawtooth` splits the rotation into `subdivisions` equal steps and, at
///   every intermediate step, overshoots by `amplitude` before settling.
///
/// A zero-length rotation yields `[end]`.
pub fn generate_sweep(
    start: f64,
    end: f64,
    kind: WaveformKind,
    amplitude: f64,
    subdivisions: usize,
) -> Vec<f64> {
    let delta = end - start;
    if delta.abs() <= simplified3d_core::data::POSITION_EPSILON {
        return vec![end];
    }
    let direction = delta.signum();

    match kind {
        WaveformKind::Default => vec![end],
        WaveformKind::Square => {
            let half = start + delta / 2.0;
            vec![half, half - amplitude * direction, end]
        }
        WaveformKind::Sawtooth => {
            let steps = subdivisions.max(1);
            let mut angles = Vec::with_capacity(steps * 2);
            for k in 1..steps {
                let angle = start + delta * k as f64 / steps as f64;
                angles.push(angle + amplitude * direction);
                angles.push(angle);
            }
            angles.push(end);
            angles
        }
    }
}

/// Radius of a circular path at a point `quarter_phase` of the way through
/// its current quarter turn (`0.0..1.0`).
///
/// Only the sawtooth waveform changes the radius, ramping it up to
/// `radius * (1 + RADIAL_SAWTOOTH_RATIO)` across each quarter turn.
pub fn modulate_radius(kind: WaveformKind, radius: f64, quarter_phase: f64) -> f64 {
    match kind {
        WaveformKind::Sawtooth => radius + RADIAL_SAWTOOTH_RATIO * radius * quarter_phase,
        WaveformKind::Default | WaveformKind::Square => radius,
    }
}
