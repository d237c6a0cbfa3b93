//! Error types for the CAM tools crate.
//!
//! Generators never fail on numeric input: degenerate geometry saturates and
//! unknown waveforms fall back to the straight path. The errors here cover the
//! remaining failure sources, the output sink and strict parameter checks.

use simplified3d_core::GcodeError;
use std::io;
use thiserror::Error;

/// Errors that can occur during CAM tool operations.
#[derive(Error, Debug)]
pub enum CamToolError {
    /// A parameter or waveform tag was rejected by a strict check.
    #[error(transparent)]
    Gcode(#[from] GcodeError),

    /// The output sink rejected a line.
    #[error("Output sink error: {0}")]
    Sink(#[from] io::Error),
}

/// Result type alias for CAM tool operations.
pub type CamToolResult<T> = Result<T, CamToolError>;

/// Reject NaN and infinite parameter values.
pub(crate) fn ensure_finite(name: &str, value: f64) -> CamToolResult<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(GcodeError::InvalidParameter {
            name: name.to_string(),
            reason: format!("must be finite, got {}", value),
        }
        .into())
    }
}
