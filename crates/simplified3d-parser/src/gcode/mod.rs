//! G-code coordinate reading
//!
//! This module provides:
//! - Per-axis coordinate extraction from a single line
//! - Whole-program reports with one entry per line

pub mod coordinates;
pub mod report;

pub use coordinates::*;
pub use report::*;
