//! Resample-and-window smoothing.
//!
//! Contour tracers on a pixelized sky produce staircase rings whose vertex
//! density reflects the pixel grid, not the region's true detail. This
//! strategy picks an output size from the native spacing and the assumed grid
//! resolution, oversamples an interpolating periodic spline by the window
//! length, and decimates with a normalized Hamming window applied to
//! non-overlapping chunks.

use nalgebra::Vector2;

use super::spline::PeriodicSpline;
use crate::cfg::{ResampleCfg, MAX_DENSE_SAMPLES};
use crate::error::{ContourError, ContourResult};
use crate::ring::Ring;

/// Hamming window of length `len`, normalized to unit sum.
pub fn hamming_normalized(len: usize) -> Vec<f64> {
    let mut w: Vec<f64> = match len {
        0 => return Vec::new(),
        1 => vec![1.0],
        _ => {
            let denom = (len - 1) as f64;
            (0..len)
                .map(|k| 0.54 - 0.46 * (std::f64::consts::TAU * k as f64 / denom).cos())
                .collect()
        }
    };
    let total: f64 = w.iter().sum();
    for v in &mut w {
        *v /= total;
    }
    w
}

/// Distinct output points for a ring of `n_in` points with median spacing
/// `spacing`: `max(min_points, floor(n_in * spacing / resolution))`.
pub fn target_point_count(n_in: usize, spacing: f64, cfg: &ResampleCfg) -> usize {
    let raw = (n_in as f64) * spacing / cfg.assumed_resolution;
    let n = if raw.is_finite() && raw > 0.0 {
        raw.floor() as usize
    } else {
        0
    };
    n.max(cfg.min_points)
}

/// Weighted sum over consecutive, non-overlapping chunks of `window.len()`.
/// Trailing samples that do not fill a chunk are ignored.
pub fn chunked_window(samples: &[Vector2<f64>], window: &[f64]) -> Vec<Vector2<f64>> {
    if window.is_empty() {
        return Vec::new();
    }
    samples
        .chunks_exact(window.len())
        .map(|chunk| {
            chunk
                .iter()
                .zip(window)
                .fold(Vector2::zeros(), |acc, (p, w)| acc + p * *w)
        })
        .collect()
}

/// Smooth a closed ring; output has `target_point_count + 1` points.
///
/// Rings whose oversampled length would exceed `MAX_DENSE_SAMPLES` are
/// `Degenerate`.
pub fn smooth_resampled(ring: &Ring, cfg: &ResampleCfg) -> ContourResult<Ring> {
    let n_out = target_point_count(ring.len(), ring.median_spacing(), cfg);
    let dense_len = cfg
        .window_size
        .checked_mul(n_out)
        .filter(|&d| d <= MAX_DENSE_SAMPLES)
        .ok_or_else(|| {
            ContourError::degenerate(format!(
                "{n_out} output points exceed the oversampling limit of {MAX_DENSE_SAMPLES}"
            ))
        })?;
    let spline = PeriodicSpline::fit(ring.distinct())?;
    let window = hamming_normalized(cfg.window_size);
    let dense = spline.eval_linspace(dense_len);
    let smoothed = chunked_window(&dense, &window);
    debug_assert_eq!(smoothed.len(), n_out);
    super::close_checked(smoothed)
}
