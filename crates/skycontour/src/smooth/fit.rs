//! Spline-only smoothing: periodic cubic smoothing spline at the input samples.
//!
//! Model
//! - Each coordinate is fitted independently as the minimizer of
//!   `Σ (y_i - f(t_i))² + λ ∫ f''²` over periodic cubic splines with knots at
//!   the samples (uniform, period 1).
//! - On a uniform periodic grid every operator involved is circulant, so the
//!   fit is a per-frequency gain `1 / (1 + λ c_k)` with
//!   `c_k = q_k² / r_k`, `q_k = (2 cos ω_k - 2) / h`, `r_k = h (4 + 2 cos ω_k) / 6`.
//! - `λ` is chosen so that the residual sum of squares equals the configured
//!   budget `s`; `s = 0` reproduces the input exactly.
//! - The output keeps the input point count.

use nalgebra::Vector2;

use crate::cfg::SplineCfg;
use crate::error::{ContourError, ContourResult};
use crate::ring::Ring;

const LOG_LAMBDA_MIN: f64 = -80.0;
const LOG_LAMBDA_MAX: f64 = 80.0;
const BISECT_ITERS: usize = 200;

/// Real DFT of one coordinate, kept with its trig table.
struct Spectrum<'a> {
    cos: &'a [f64],
    sin: &'a [f64],
    re: Vec<f64>,
    im: Vec<f64>,
}

impl<'a> Spectrum<'a> {
    fn new(vals: &[f64], cos: &'a [f64], sin: &'a [f64]) -> Self {
        let m = vals.len();
        let mut re = vec![0.0; m];
        let mut im = vec![0.0; m];
        for k in 0..m {
            let (mut a, mut b) = (0.0, 0.0);
            for (j, v) in vals.iter().enumerate() {
                let idx = (j * k) % m;
                a += v * cos[idx];
                b -= v * sin[idx];
            }
            re[k] = a;
            im[k] = b;
        }
        Self { cos, sin, re, im }
    }

    fn power(&self, k: usize) -> f64 {
        self.re[k] * self.re[k] + self.im[k] * self.im[k]
    }

    /// Residual sum of squares for penalty `lambda` (Parseval).
    fn residual(&self, penalty: &[f64], lambda: f64) -> f64 {
        let m = self.re.len() as f64;
        penalty
            .iter()
            .enumerate()
            .map(|(k, c)| {
                let g = lambda * c / (1.0 + lambda * c);
                self.power(k) * g * g
            })
            .sum::<f64>()
            / m
    }

    /// Inverse DFT after applying the smoothing gains.
    fn filtered(&self, penalty: &[f64], lambda: f64) -> Vec<f64> {
        let m = self.re.len();
        let gains: Vec<f64> = penalty.iter().map(|c| 1.0 / (1.0 + lambda * c)).collect();
        (0..m)
            .map(|j| {
                let mut acc = 0.0;
                for k in 0..m {
                    let idx = (j * k) % m;
                    acc += gains[k] * (self.re[k] * self.cos[idx] - self.im[k] * self.sin[idx]);
                }
                acc / m as f64
            })
            .collect()
    }

    /// Smallest `λ` whose residual reaches `budget`.
    fn solve_lambda(&self, penalty: &[f64], budget: f64) -> ContourResult<f64> {
        let ceiling = self.residual(penalty, LOG_LAMBDA_MAX.exp());
        if ceiling <= budget {
            return Err(ContourError::degenerate(format!(
                "smoothing budget {budget} exceeds ring variance {ceiling:.3e}"
            )));
        }
        let (mut lo, mut hi) = (LOG_LAMBDA_MIN, LOG_LAMBDA_MAX);
        for _ in 0..BISECT_ITERS {
            let mid = 0.5 * (lo + hi);
            if self.residual(penalty, mid.exp()) < budget {
                lo = mid;
            } else {
                hi = mid;
            }
            if hi - lo < 1e-10 {
                break;
            }
        }
        Ok((0.5 * (lo + hi)).exp())
    }
}

/// Per-frequency roughness `c_k` for `m` uniform periodic samples.
fn roughness(m: usize) -> Vec<f64> {
    let h = 1.0 / m as f64;
    (0..m)
        .map(|k| {
            let cw = (std::f64::consts::TAU * k as f64 / m as f64).cos();
            let q = (2.0 * cw - 2.0) / h;
            let r = h * (4.0 + 2.0 * cw) / 6.0;
            q * q / r
        })
        .collect()
}

/// Smooth a closed ring with a periodic smoothing spline; output has the same
/// point count as the input.
pub fn smooth_spline_only(ring: &Ring, cfg: &SplineCfg) -> ContourResult<Ring> {
    if cfg.smoothing <= 0.0 {
        return Ok(ring.clone());
    }
    let pts = ring.distinct();
    let m = pts.len();
    let (cos, sin): (Vec<f64>, Vec<f64>) = (0..m)
        .map(|i| {
            let th = std::f64::consts::TAU * i as f64 / m as f64;
            (th.cos(), th.sin())
        })
        .unzip();
    let penalty = roughness(m);

    let xs: Vec<f64> = pts.iter().map(|p| p.x).collect();
    let ys: Vec<f64> = pts.iter().map(|p| p.y).collect();
    let sx = Spectrum::new(&xs, &cos, &sin);
    let sy = Spectrum::new(&ys, &cos, &sin);
    let fx = sx.filtered(&penalty, sx.solve_lambda(&penalty, cfg.smoothing)?);
    let fy = sy.filtered(&penalty, sy.solve_lambda(&penalty, cfg.smoothing)?);

    let open: Vec<Vector2<f64>> = fx
        .into_iter()
        .zip(fy)
        .map(|(x, y)| Vector2::new(x, y))
        .collect();
    super::close_checked(open)
}
