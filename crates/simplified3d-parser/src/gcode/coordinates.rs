//! Per-axis coordinate extraction
//!
//! A field starts right after the first occurrence of its axis letter and
//! ends one character before the nearest terminator letter (the separating
//! space), or at end of line when no terminator follows.
//!
//! | axis | terminators           | no terminator |
//! |------|-----------------------|---------------|
//! | X    | `Y` (anywhere)        | `0.0`         |
//! | Y    | `E`, `F`, `Z` (after) | end of line   |
//! | Z    | `E`, `F`, `Y` (after) | end of line   |
//!
//! Anything that does not parse as a number reads as `0.0`.

use simplified3d_core::Axis;
use tracing::trace;

fn find(bytes: &[u8], from: usize, letter: u8) -> Option<usize> {
    bytes
        .get(from..)?
        .iter()
        .position(|&b| b == letter)
        .map(|i| i + from)
}

/// Exclusive end of the field that starts after `letter_at`.
fn field_end(bytes: &[u8], axis: Axis, letter_at: usize) -> Option<usize> {
    match axis {
        Axis::X => find(bytes, 0, b'Y').map(|y| y.saturating_sub(1)),
        Axis::Y | Axis::Z => {
            let markers: &[u8] = if axis == Axis::Y { b"EFZ" } else { b"EFY" };
            let nearest = markers
                .iter()
                .filter_map(|&m| find(bytes, letter_at + 1, m))
                .min();
            Some(match nearest {
                Some(at) => at - 1,
                None => bytes.len(),
            })
        }
    }
}

/// Read the value of `axis` from a G-code line, `0.0` when absent or malformed.
pub fn extract(line: &str, axis: Axis) -> f64 {
    let bytes = line.as_bytes();
    let Some(letter_at) = find(bytes, 0, axis.letter() as u8) else {
        return 0.0;
    };
    let Some(end) = field_end(bytes, axis, letter_at) else {
        return 0.0;
    };

    let start = letter_at + 1;
    if end <= start {
        return 0.0;
    }
    let field = std::str::from_utf8(&bytes[start..end])
        .ok()
        .map(str::trim)
        .unwrap_or_default();

    match field.parse::<f64>() {
        Ok(value) => value,
        Err(_) => {
            trace!("Unreadable {} field {:?} in {:?}", axis, field, line);
            0.0
        }
    }
}

pub fn get_x(line: &str) -> f64 {
    extract(line, Axis::X)
}

pub fn get_y(line: &str) -> f64 {
    extract(line, Axis::Y)
}

pub fn get_z(line: &str) -> f64 {
    extract(line, Axis::Z)
}
