//! Operating-point markers for the tune diagram.

use crate::resonance::Segment;

/// Half length of the `+` marker drawn by the chart backend.
pub const PLUS_HALF_LENGTH: f64 = 0.05;
/// Half extent of the `x` marker drawn by the paint backend.
pub const CROSS_HALF_LENGTH: f64 = 0.015;
/// Pen width of the `x` marker, in tune units.
pub const CROSS_PEN_WIDTH: f64 = 0.0075;

/// Keeps only the fractional part of a tune, in `[0, 1)`.
pub fn fractional(tune: f64) -> f64 {
    let frac = tune - tune.floor();
    // Tiny negative tunes round up to exactly 1.0.
    if frac >= 1.0 { 0.0 } else { frac }
}

/// A `+` shaped marker centred on the fractional tunes.
pub fn plus_marker(nu_x: f64, nu_y: f64, half: f64) -> [Segment; 2] {
    let (x, y) = (fractional(nu_x), fractional(nu_y));
    [
        Segment::new((x - half, y), (x + half, y)),
        Segment::new((x, y - half), (x, y + half)),
    ]
}

/// An `x` shaped marker centred on `(x, y)` as given.
pub fn cross_marker(x: f64, y: f64, half: f64) -> [Segment; 2] {
    [
        Segment::new((x - half, y - half), (x + half, y + half)),
        Segment::new((x + half, y - half), (x - half, y + half)),
    ]
}
