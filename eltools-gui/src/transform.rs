//! Mapping from the unit tune square onto canvas pixels.

use eltools_core::resonance::Point as TunePoint;
use iced::{Point, Size};

/// The largest square that fits the canvas, centred, with `νy` pointing up.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UnitSquare {
    origin: Point,
    side: f32,
}

impl UnitSquare {
    pub fn fit(bounds: Size) -> Self {
        let side = bounds.width.min(bounds.height).max(0.0);
        let origin = Point::new((bounds.width - side) / 2.0, (bounds.height - side) / 2.0);
        Self { origin, side }
    }

    /// Like [`Self::fit`], but `None` for non-finite bounds.
    pub fn try_fit(bounds: Size) -> Option<Self> {
        if bounds.width.is_finite() && bounds.height.is_finite() {
            Some(Self::fit(bounds))
        } else {
            None
        }
    }

    pub fn side(&self) -> f32 {
        self.side
    }

    /// Canvas position of a point given in tune units.
    pub fn to_canvas(&self, (x, y): TunePoint) -> Point {
        Point::new(
            self.origin.x + x as f32 * self.side,
            self.origin.y + (1.0 - y as f32) * self.side,
        )
    }

    /// Pen width in pixels for a width given in tune units, at least one pixel.
    pub fn pen(&self, width: f64) -> f32 {
        (width as f32 * self.side).max(1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn centres_square_in_wide_canvas() {
        let square = UnitSquare::fit(Size::new(400.0, 200.0));
        assert_eq!(square.side(), 200.0);
        assert_eq!(square.to_canvas((0.0, 0.0)), Point::new(100.0, 200.0));
        assert_eq!(square.to_canvas((1.0, 1.0)), Point::new(300.0, 0.0));
        assert_eq!(square.to_canvas((0.5, 0.25)), Point::new(200.0, 150.0));
    }

    #[test]
    fn non_finite_bounds_do_not_fit() {
        assert!(UnitSquare::try_fit(Size::new(f32::INFINITY, 200.0)).is_none());
        assert!(UnitSquare::try_fit(Size::new(300.0, f32::NAN)).is_none());
        assert_eq!(
            UnitSquare::try_fit(Size::new(400.0, 200.0)),
            Some(UnitSquare::fit(Size::new(400.0, 200.0)))
        );
    }

    #[test]
    fn pen_is_scaled_and_never_vanishes() {
        let square = UnitSquare::fit(Size::new(1000.0, 1000.0));
        assert!((square.pen(0.0075) - 7.5).abs() < 1e-4);
        assert_eq!(square.pen(0.0001), 1.0);
    }
}
