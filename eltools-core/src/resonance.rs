//! # Resonance Diagram Module
//!
//! Enumerates the betatron resonance lines `p·νx + q·νy = r` that cross
//! the unit tune square, for all orders `|p| + |q|` up to a limit.
//!
//! ## Conventions
//! - Coefficients are reduced: `gcd(p, q, r) = 1`, so a geometric line
//!   is listed once, under its lowest order.
//! - Signs are canonical: `p > 0`, or `p = 0` and `q > 0`.
//! - Lines that only touch a corner of the square are dropped. Lines on
//!   the edges of the square (integer resonances) are kept.

use serde::Serialize;

/// Tolerance used when matching intersection points with the square.
const EPS: f64 = 1e-9;

/// A point in the `(νx, νy)` plane.
pub type Point = (f64, f64);

/// A straight segment between two points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Segment {
    pub start: Point,
    pub end: Point,
}

impl Segment {
    pub fn new(start: Point, end: Point) -> Self {
        Self { start, end }
    }

    pub fn points(&self) -> [Point; 2] {
        [self.start, self.end]
    }
}

/// One resonance line clipped to the unit square.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ResonanceLine {
    pub p: i32,
    pub q: i32,
    pub r: i32,
    pub segment: Segment,
}

impl ResonanceLine {
    /// The resonance order `|p| + |q|`.
    pub fn order(&self) -> u32 {
        self.p.unsigned_abs() + self.q.unsigned_abs()
    }
}

/// All resonance lines of order `1..=order` inside the unit square.
///
/// Lines come sorted by order, then `p` ascending, `q` descending and `r`
/// ascending. Order `0` gives an empty diagram.
pub fn resonance_lines(order: u32) -> Vec<ResonanceLine> {
    let order = order as i32;
    let mut lines = Vec::new();

    for n in 1..=order {
        for p in 0..=n {
            let q_abs = n - p;
            let qs = if p == 0 || q_abs == 0 {
                vec![q_abs]
            } else {
                vec![q_abs, -q_abs]
            };
            for q in qs {
                if p == 0 && q <= 0 {
                    continue;
                }
                // Range of p·νx + q·νy over the square.
                let r_min = p.min(0) + q.min(0);
                let r_max = p.max(0) + q.max(0);
                for r in r_min..=r_max {
                    if gcd(gcd(p, q), r) != 1 {
                        continue;
                    }
                    if let Some(segment) = clip_to_unit_square(p, q, r) {
                        lines.push(ResonanceLine { p, q, r, segment });
                    }
                }
            }
        }
    }
    lines
}

/// Only the segments of [`resonance_lines`], for plotting.
pub fn resonance_segments(order: u32) -> Vec<Segment> {
    resonance_lines(order).into_iter().map(|l| l.segment).collect()
}

/// Intersects `p·x + q·y = r` with the unit square.
///
/// Returns `None` when the line misses the square or only touches it in
/// a single point.
pub fn clip_to_unit_square(p: i32, q: i32, r: i32) -> Option<Segment> {
    let (p, q, r) = (p as f64, q as f64, r as f64);
    let mut hits: Vec<Point> = Vec::with_capacity(4);

    if q != 0.0 {
        for x in [0.0, 1.0] {
            let y = (r - p * x) / q;
            if (-EPS..=1.0 + EPS).contains(&y) {
                hits.push((x, y.clamp(0.0, 1.0)));
            }
        }
    }
    if p != 0.0 {
        for y in [0.0, 1.0] {
            let x = (r - q * y) / p;
            if (-EPS..=1.0 + EPS).contains(&x) {
                hits.push((x.clamp(0.0, 1.0), y));
            }
        }
    }

    let mut distinct: Vec<Point> = Vec::with_capacity(hits.len());
    for hit in hits {
        if !distinct.iter().any(|&d| close(d, hit)) {
            distinct.push(hit);
        }
    }

    // A line through a corner can report up to three distinct hits that
    // are collinear; the two farthest apart bound the segment.
    let mut best: Option<(f64, Segment)> = None;
    for (i, &a) in distinct.iter().enumerate() {
        for &b in &distinct[i + 1..] {
            let d = (a.0 - b.0).powi(2) + (a.1 - b.1).powi(2);
            if best.is_none_or(|(bd, _)| d > bd) {
                best = Some((d, Segment::new(a, b)));
            }
        }
    }
    best.map(|(_, segment)| segment)
}

fn close(a: Point, b: Point) -> bool {
    (a.0 - b.0).abs() < EPS && (a.1 - b.1).abs() < EPS
}

fn gcd(a: i32, b: i32) -> i32 {
    let (mut a, mut b) = (a.abs(), b.abs());
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}

#[cfg(test)]
mod tests {
    use super::*;

    fn in_unit_square(point: Point) -> bool {
        (0.0..=1.0).contains(&point.0) && (0.0..=1.0).contains(&point.1)
    }

    #[test]
    fn reference_counts() {
        let expected = [(0, 0), (1, 4), (2, 8), (3, 20), (4, 40), (5, 80)];
        for (order, count) in expected {
            assert_eq!(resonance_lines(order).len(), count, "order {order}");
        }
    }

    #[test]
    fn endpoints_lie_in_the_square() {
        for order in 1..=8 {
            for line in resonance_lines(order) {
                for point in line.segment.points() {
                    assert!(in_unit_square(point), "{line:?}");
                }
                assert!(line.segment.start != line.segment.end);
            }
        }
    }

    #[test]
    fn endpoints_satisfy_the_resonance_condition() {
        for line in resonance_lines(6) {
            for (x, y) in line.segment.points() {
                let lhs = line.p as f64 * x + line.q as f64 * y;
                assert!((lhs - line.r as f64).abs() < 1e-9, "{line:?}");
            }
        }
    }

    #[test]
    fn lines_are_unique_and_ordered() {
        let lines = resonance_lines(5);
        for (i, a) in lines.iter().enumerate() {
            for b in &lines[i + 1..] {
                assert!((a.p, a.q, a.r) != (b.p, b.q, b.r));
            }
        }
        assert!(lines.windows(2).all(|w| w[0].order() <= w[1].order()));
    }

    #[test]
    fn second_order_lines() {
        let second: Vec<(i32, i32, i32)> = resonance_lines(2)
            .into_iter()
            .filter(|l| l.order() == 2)
            .map(|l| (l.p, l.q, l.r))
            .collect();
        assert_eq!(second, vec![(0, 2, 1), (1, 1, 1), (1, -1, 0), (2, 0, 1)]);
    }

    #[test]
    fn corner_touching_lines_are_dropped() {
        // νx + νy = 0 meets the square only at the origin.
        assert!(clip_to_unit_square(1, 1, 0).is_none());
        assert!(clip_to_unit_square(1, 1, 2).is_none());
        let diagonal = clip_to_unit_square(1, -1, 0).unwrap();
        assert!(close(diagonal.start, (0.0, 0.0)) || close(diagonal.end, (0.0, 0.0)));
        assert!(close(diagonal.start, (1.0, 1.0)) || close(diagonal.end, (1.0, 1.0)));
    }

    #[test]
    fn line_outside_square_is_dropped() {
        assert!(clip_to_unit_square(1, 0, 2).is_none());
        assert!(clip_to_unit_square(1, 2, -1).is_none());
    }
}
