//! G-Code command model
//!
//! Every generator emits a strict sequence of [`MotionCommand`] values.
//! Order is the only structure: there is no implicit grouping.

use crate::data::Point;
use crate::units::{format_coordinate, format_natural, CoordinateFormat};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Target of a rapid or linear move
///
/// Each axis is optional so a command can move any subset of X, Y, Z and the
/// rotary A axis. Fields are rendered in the fixed order X, Y, Z, A, F.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Move {
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub z: Option<f64>,
    /// Rotary axis angle in degrees
    pub a: Option<f64>,
    /// Feed rate (units/min)
    pub feed: Option<f64>,
}

impl Move {
    /// Creates an empty move
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a move to an XY point
    pub fn to_point(point: Point) -> Self {
        Self::new().with_x(point.x).with_y(point.y)
    }

    pub fn with_x(mut self, x: f64) -> Self {
        self.x = Some(x);
        self
    }

    pub fn with_y(mut self, y: f64) -> Self {
        self.y = Some(y);
        self
    }

    pub fn with_z(mut self, z: f64) -> Self {
        self.z = Some(z);
        self
    }

    pub fn with_a(mut self, a: f64) -> Self {
        self.a = Some(a);
        self
    }

    pub fn with_feed(mut self, feed: f64) -> Self {
        self.feed = Some(feed);
        self
    }

    fn write_fields(&self, line: &mut String, format: CoordinateFormat) {
        let axes = [('X', self.x), ('Y', self.y), ('Z', self.z), ('A', self.a)];
        for (letter, value) in axes {
            if let Some(v) = value {
                line.push(' ');
                line.push(letter);
                line.push_str(&format_coordinate(v, format));
            }
        }
        // Feed rates are always natural
        if let Some(f) = self.feed {
            line.push_str(" F");
            line.push_str(&format_natural(f));
        }
    }
}

/// A single emitted G-code command
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum MotionCommand {
    /// G0 positioning move, no deposition or cutting
    RapidMove(Move),
    /// G1 move while depositing or cutting
    LinearMove(Move),
    /// G04 pause
    Dwell { milliseconds: f64 },
    /// `;` comment line
    Comment { text: String },
}

impl MotionCommand {
    pub fn rapid(m: Move) -> Self {
        Self::RapidMove(m)
    }

    pub fn linear(m: Move) -> Self {
        Self::LinearMove(m)
    }

    pub fn dwell(milliseconds: f64) -> Self {
        Self::Dwell { milliseconds }
    }

    pub fn comment(text: impl Into<String>) -> Self {
        Self::Comment { text: text.into() }
    }

    /// Render this command as one G-code line (without the newline)
    pub fn to_line(&self, format: CoordinateFormat) -> String {
        match self {
            Self::RapidMove(m) => {
                let mut line = String::from("G0");
                m.write_fields(&mut line, format);
                line
            }
            Self::LinearMove(m) => {
                let mut line = String::from("G1");
                m.write_fields(&mut line, format);
                line
            }
            Self::Dwell { milliseconds } => format!("G04 P{}", format_natural(*milliseconds)),
            Self::Comment { text } => format!("; {}", text),
        }
    }
}

impl fmt::Display for MotionCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_line(CoordinateFormat::Natural))
    }
}
