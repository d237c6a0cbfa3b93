//! Coordinate formatting utilities
//!
//! Generated lines mix two numeric conventions: values computed by
//! waveform or trigonometric math are written with exactly three decimals,
//! while values passed straight through from the caller keep their natural
//! representation. The convention is chosen per emitted command.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Numeric rendering used for coordinate fields of a motion line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CoordinateFormat {
    /// Shortest round-trip representation (`10`, `0.3`, `-1.25`)
    Natural,
    /// Exactly three decimal places (`10.000`)
    Fixed3,
}

impl Default for CoordinateFormat {
    fn default() -> Self {
        Self::Natural
    }
}

impl fmt::Display for CoordinateFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Natural => write!(f, "natural"),
            Self::Fixed3 => write!(f, "fixed3"),
        }
    }
}

/// Format a value in its natural representation.
///
/// Negative zero is written as `0`.
pub fn format_natural(value: f64) -> String {
    if value == 0.0 {
        return "0".to_string();
    }
    format!("{}", value)
}

/// Format a coordinate with the given convention.
///
/// * `value` - Coordinate in machine units
/// * `format` - Target convention
pub fn format_coordinate(value: f64, format: CoordinateFormat) -> String {
    match format {
        CoordinateFormat::Natural => format_natural(value),
        CoordinateFormat::Fixed3 => {
            // Values that round to zero would otherwise print as "-0.000"
            let rounded = (value * 1000.0).round() / 1000.0;
            if rounded == 0.0 {
                "0.000".to_string()
            } else {
                format!("{:.3}", value)
            }
        }
    }
}
