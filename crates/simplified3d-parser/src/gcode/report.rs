//! Whole-program coordinate reports

use super::coordinates::extract;
use serde::{Deserialize, Serialize};
use simplified3d_core::{format_natural, Axis};
use std::fmt;
use tracing::debug;

/// Coordinates read from one program line
///
/// Every axis is always present; `0.0` is a normal value for a line that
/// does not mention the axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LineCoordinates {
    /// 1-based line number
    pub line_number: usize,
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl LineCoordinates {
    pub fn from_line(line_number: usize, line: &str) -> Self {
        Self {
            line_number,
            x: extract(line, Axis::X),
            y: extract(line, Axis::Y),
            z: extract(line, Axis::Z),
        }
    }
}

impl fmt::Display for LineCoordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Line {}: X={}, Y={}, Z={}",
            self.line_number,
            format_natural(self.x),
            format_natural(self.y),
            format_natural(self.z)
        )
    }
}

/// Report every line of `text`, numbered from 1.
///
/// Surrounding blank lines are dropped before numbering; blank lines inside
/// the program keep their slot and report zeros.
pub fn parse_program(text: &str) -> Vec<LineCoordinates> {
    let body = text.trim();
    if body.is_empty() {
        return Vec::new();
    }
    let report: Vec<LineCoordinates> = body
        .lines()
        .enumerate()
        .map(|(i, line)| LineCoordinates::from_line(i + 1, line))
        .collect();
    debug!("Parsed {} coordinate lines", report.len());
    report
}
