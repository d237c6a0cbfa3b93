//! Error handling for Simplified3D
//!
//! G-Code input errors shared by the generator crates. All error types use
//! `thiserror` for ergonomic error handling.

use thiserror::Error;

/// G-Code error type
///
/// Represents errors related to G-Code generation inputs.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GcodeError {
    /// Waveform tag that does not name a known motion style
    #[error("Unknown waveform '{tag}'")]
    UnknownWaveform {
        /// The tag as supplied by the caller.
        tag: String,
    },

    /// Invalid parameter value
    #[error("Invalid parameter '{name}': {reason}")]
    InvalidParameter {
        /// The parameter name.
        name: String,
        /// The reason the parameter is invalid.
        reason: String,
    },
}
