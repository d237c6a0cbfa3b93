//! # Simplified3D Core
//!
//! Core types and utilities shared by the Simplified3D crates.
//! Provides the G-code command model, 2D geometry primitives,
//! coordinate formatting, and the G-code error type.

pub mod command;
pub mod data;
pub mod error;
pub mod units;

pub use command::{MotionCommand, Move};
pub use data::{Axis, Point};
pub use error::GcodeError;
pub use units::{format_coordinate, format_natural, CoordinateFormat};
