//! # Simplified3D Parser
//!
//! Reads coordinates back out of G-code text. Extraction is deliberately
//! forgiving: any line, however malformed, yields a number for every axis,
//! with `0.0` standing in for an absent or unreadable field.

pub mod gcode;

pub use gcode::{extract, get_x, get_y, get_z, parse_program, LineCoordinates};
