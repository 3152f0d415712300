//! Closed ring of 2D points in decimal degrees.
//!
//! - `Ring`: validated, explicitly closed (`pts[0] == pts[n-1]`), at least
//!   `MIN_RING_POINTS` points, finite coordinates.
//! - `Winding`: orientation classification from the signed area.

use nalgebra::Vector2;

use crate::cfg::MIN_RING_POINTS;
use crate::error::{ContourError, ContourResult};

/// Orientation of a ring as encoded by the sign of `signed_area`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Winding {
    Clockwise,
    CounterClockwise,
    /// Signed area is exactly zero.
    Degenerate,
}

/// Closed polygon boundary without holes (possibly nonconvex).
#[derive(Clone, Debug, PartialEq)]
pub struct Ring {
    pts: Vec<Vector2<f64>>,
}

impl Ring {
    /// Validate and wrap a closed point sequence.
    pub fn new(pts: Vec<Vector2<f64>>) -> ContourResult<Self> {
        if pts.len() < MIN_RING_POINTS {
            return Err(ContourError::TooFewPoints {
                required: MIN_RING_POINTS,
                actual: pts.len(),
            });
        }
        if let Some(index) = pts
            .iter()
            .position(|p| !(p.x.is_finite() && p.y.is_finite()))
        {
            return Err(ContourError::NonFinite { index });
        }
        let first = pts[0];
        let last = pts[pts.len() - 1];
        if first != last {
            return Err(ContourError::NotClosed {
                first: [first.x, first.y],
                last: [last.x, last.y],
            });
        }
        Ok(Self { pts })
    }

    /// Build from plain `[x, y]` pairs (the collaborator-facing shape).
    pub fn from_pairs(pairs: &[[f64; 2]]) -> ContourResult<Self> {
        Self::new(pairs.iter().map(|p| Vector2::new(p[0], p[1])).collect())
    }

    /// Close an open sequence of distinct vertices by repeating the first.
    pub(crate) fn close(mut open: Vec<Vector2<f64>>) -> ContourResult<Self> {
        if let Some(&first) = open.first() {
            open.push(first);
        }
        Self::new(open)
    }

    /// Plain `[x, y]` pairs, directly serializable.
    pub fn to_pairs(&self) -> Vec<[f64; 2]> {
        self.pts.iter().map(|p| [p.x, p.y]).collect()
    }

    #[inline]
    pub fn points(&self) -> &[Vector2<f64>] {
        &self.pts
    }

    /// Points without the closing repeat.
    #[inline]
    pub fn distinct(&self) -> &[Vector2<f64>] {
        &self.pts[..self.pts.len() - 1]
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.pts.len()
    }

    /// Always false for a validated ring.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pts.is_empty()
    }

    pub fn into_points(self) -> Vec<Vector2<f64>> {
        self.pts
    }

    /// Same points in reverse order. Closure is preserved.
    pub fn reversed(&self) -> Self {
        let mut pts = self.pts.clone();
        pts.reverse();
        Self { pts }
    }

    /// Shoelace area; positive for clockwise order (x right, y up).
    ///
    /// `0.5 * Σ (x[i+1] - x[i]) * (y[i+1] + y[i])` over consecutive pairs.
    pub fn signed_area(&self) -> f64 {
        signed_area(&self.pts)
    }

    pub fn winding(&self) -> Winding {
        let a = self.signed_area();
        if a > 0.0 {
            Winding::Clockwise
        } else if a < 0.0 {
            Winding::CounterClockwise
        } else {
            Winding::Degenerate
        }
    }

    /// Median distance between consecutive points (closing edge included).
    pub fn median_spacing(&self) -> f64 {
        median_spacing(&self.pts)
    }
}

/// Shoelace signed area of a closed point sequence (see `Ring::signed_area`).
pub fn signed_area(pts: &[Vector2<f64>]) -> f64 {
    // 0.5 prefactor applied once at the end
    let mut acc = 0.0;
    for w in pts.windows(2) {
        acc += (w[1].x - w[0].x) * (w[1].y + w[0].y);
    }
    0.5 * acc
}

/// Median of consecutive point distances; mean of the two middle values for
/// an even count. Zero for fewer than two points.
pub fn median_spacing(pts: &[Vector2<f64>]) -> f64 {
    let mut dr: Vec<f64> = pts.windows(2).map(|w| (w[1] - w[0]).norm()).collect();
    if dr.is_empty() {
        return 0.0;
    }
    dr.sort_by(|a, b| a.total_cmp(b));
    let mid = dr.len() / 2;
    if dr.len() % 2 == 1 {
        dr[mid]
    } else {
        0.5 * (dr[mid - 1] + dr[mid])
    }
}
