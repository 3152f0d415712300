//! Periodic interpolating cubic spline on a uniform parameter grid.
//!
//! Model
//! - A closed ring with `n` points (closure included) has `m = n - 1` distinct
//!   samples at `t_i = i / m`, period 1. The spline is C² and passes through
//!   every sample; x and y share one parametrization and are fitted together
//!   (vector-valued right-hand side).
//! - Second derivatives `M_i` solve the cyclic system
//!   `M_{i-1} + 4 M_i + M_{i+1} = 6/h² (y_{i+1} - 2 y_i + y_{i-1})`,
//!   `h = 1/m`, via Thomas elimination plus a Sherman–Morrison correction.

use std::ops::{Mul, Sub};

use nalgebra::Vector2;

use crate::error::{ContourError, ContourResult};

/// Forward-eliminated tridiagonal matrix with unit off-diagonals.
struct UnitTridiag {
    /// Eliminated super-diagonal `c'_i`.
    cp: Vec<f64>,
    /// Pivots after elimination.
    piv: Vec<f64>,
}

impl UnitTridiag {
    fn factor(diag: &[f64]) -> Option<Self> {
        let m = diag.len();
        let mut cp = vec![0.0; m];
        let mut piv = vec![0.0; m];
        piv[0] = diag[0];
        for i in 0..m {
            if i > 0 {
                piv[i] = diag[i] - cp[i - 1];
            }
            if !piv[i].is_finite() || piv[i].abs() < 1e-300 {
                return None;
            }
            cp[i] = 1.0 / piv[i];
        }
        Some(Self { cp, piv })
    }

    fn solve<T>(&self, rhs: &[T]) -> Vec<T>
    where
        T: Copy + Sub<Output = T> + Mul<f64, Output = T>,
    {
        let m = rhs.len();
        let mut d: Vec<T> = Vec::with_capacity(m);
        d.push(rhs[0] * (1.0 / self.piv[0]));
        for i in 1..m {
            let prev = d[i - 1];
            d.push((rhs[i] - prev) * (1.0 / self.piv[i]));
        }
        for i in (0..m - 1).rev() {
            let next = d[i + 1];
            d[i] = d[i] - next * self.cp[i];
        }
        d
    }
}

/// Solve the cyclic `[1 4 1]` system for `m >= 3` unknowns.
fn solve_cyclic_141(rhs: &[Vector2<f64>]) -> Option<Vec<Vector2<f64>>> {
    let m = rhs.len();
    if m < 3 {
        return None;
    }
    // corners A[0][m-1] = A[m-1][0] = 1
    let (alpha, beta, gamma) = (1.0, 1.0, -4.0);
    let mut diag = vec![4.0; m];
    diag[0] -= gamma;
    diag[m - 1] -= alpha * beta / gamma;
    let tri = UnitTridiag::factor(&diag)?;

    let x = tri.solve(rhs);
    let mut u = vec![0.0; m];
    u[0] = gamma;
    u[m - 1] = alpha;
    let z = tri.solve(u.as_slice());

    let denom = 1.0 + z[0] + beta * z[m - 1] / gamma;
    if !denom.is_finite() || denom.abs() < 1e-300 {
        return None;
    }
    let fact = (x[0] + x[m - 1] * (beta / gamma)) * (1.0 / denom);
    Some(x.iter().zip(&z).map(|(xi, zi)| xi - fact * *zi).collect())
}

/// Periodic C² cubic through uniformly parametrized samples, period 1.
#[derive(Clone, Debug)]
pub struct PeriodicSpline {
    y: Vec<Vector2<f64>>,
    m2: Vec<Vector2<f64>>,
    h: f64,
}

impl PeriodicSpline {
    /// Fit through distinct samples (ring without its closing point).
    ///
    /// Errors with `Degenerate` for fewer than three samples or a
    /// non-finite solve.
    pub fn fit(samples: &[Vector2<f64>]) -> ContourResult<Self> {
        let m = samples.len();
        if m < 3 {
            return Err(ContourError::degenerate(format!(
                "periodic spline needs at least 3 samples, got {m}"
            )));
        }
        let h = 1.0 / (m as f64);
        let scale = 6.0 / (h * h);
        let rhs: Vec<Vector2<f64>> = (0..m)
            .map(|i| {
                let prev = samples[(i + m - 1) % m];
                let next = samples[(i + 1) % m];
                (next - samples[i] * 2.0 + prev) * scale
            })
            .collect();
        let m2 = solve_cyclic_141(&rhs)
            .ok_or_else(|| ContourError::degenerate("singular periodic spline system"))?;
        if m2.iter().any(|v| !(v.x.is_finite() && v.y.is_finite())) {
            return Err(ContourError::degenerate(
                "non-finite periodic spline coefficients",
            ));
        }
        Ok(Self {
            y: samples.to_vec(),
            m2,
            h,
        })
    }

    /// Number of distinct samples (spline segments).
    #[inline]
    pub fn segments(&self) -> usize {
        self.y.len()
    }

    /// Evaluate at parameter `t`; any real `t` is wrapped into `[0, 1)`.
    pub fn eval(&self, t: f64) -> Vector2<f64> {
        let m = self.y.len();
        let u = t.rem_euclid(1.0) * (m as f64);
        let k = (u.floor() as usize).min(m - 1);
        let b = u - k as f64;
        let a = 1.0 - b;
        let k1 = (k + 1) % m;
        let c = self.h * self.h / 6.0;
        self.y[k] * a
            + self.y[k1] * b
            + (self.m2[k] * (a * a * a - a) + self.m2[k1] * (b * b * b - b)) * c
    }

    /// Evaluate at `count` evenly spaced parameters over `[0, 1]` inclusive.
    pub fn eval_linspace(&self, count: usize) -> Vec<Vector2<f64>> {
        match count {
            0 => Vec::new(),
            1 => vec![self.eval(0.0)],
            _ => {
                let denom = (count - 1) as f64;
                (0..count).map(|j| self.eval(j as f64 / denom)).collect()
            }
        }
    }
}
