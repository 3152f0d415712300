//! Contour smoothing for clockwise, area-filtered rings.
//!
//! Purpose
//! - Remove the staircase artifacts that probability contours pick up from
//!   the pixel grid they were traced on, without visibly distorting shapes
//!   that are already smooth.
//!
//! Strategies (`cfg::Smoothing`)
//! - `Resample` (default): interpolating periodic spline, oversampled by the
//!   window length and decimated through a normalized Hamming window. Output
//!   point count follows the ring's native spacing.
//! - `Spline`: periodic smoothing spline with a residual budget, evaluated at
//!   the input samples. Output point count equals the input count.
//!
//! Both return a closed ring whose first and last points are bitwise equal.
//! Near-collinear input is not specially handled; non-finite results are
//! reported as `ContourError::Degenerate`.

mod fit;
mod resample;
mod spline;

pub use fit::smooth_spline_only;
pub use resample::{chunked_window, hamming_normalized, smooth_resampled, target_point_count};
pub use spline::PeriodicSpline;

use nalgebra::Vector2;

use crate::cfg::Smoothing;
use crate::error::{ContourError, ContourResult};
use crate::ring::{OrientedRing, Ring};

impl Smoothing {
    /// Smooth one closed ring with this strategy.
    pub fn apply(&self, ring: &Ring) -> ContourResult<Ring> {
        match self {
            Smoothing::Resample(cfg) => smooth_resampled(ring, cfg),
            Smoothing::Spline(cfg) => smooth_spline_only(ring, cfg),
        }
    }

    /// Point count (closure included) this strategy produces for `ring`.
    pub fn output_len(&self, ring: &Ring) -> usize {
        match self {
            Smoothing::Resample(cfg) => {
                target_point_count(ring.len(), ring.median_spacing(), cfg).saturating_add(1)
            }
            Smoothing::Spline(_) => ring.len(),
        }
    }
}

/// Smooth a kept, clockwise ring.
pub fn smooth_ring(ring: &OrientedRing, smoothing: &Smoothing) -> ContourResult<Ring> {
    smoothing.apply(ring.ring())
}

/// Re-close smoothed output; non-finite points mean the fit broke down.
fn close_checked(open: Vec<Vector2<f64>>) -> ContourResult<Ring> {
    if open.iter().any(|p| !(p.x.is_finite() && p.y.is_finite())) {
        return Err(ContourError::degenerate("non-finite smoothed coordinates"));
    }
    Ring::close(open).map_err(|e| ContourError::degenerate(format!("smoothed ring invalid: {e}")))
}
