//! Synthetic rings for tests, benchmarks, and diagnostics.
//!
//! Model
//! - `circle`: `n` evenly spaced samples on a circle, closed, in the requested
//!   winding.
//! - `draw_ring_radial`: star-shaped ring from `n` jittered angles and jittered
//!   radii around a center. Sorted angles keep it simple (non-self-intersecting).
//! - `grid_snap`: snap vertices to a square grid and drop consecutive repeats,
//!   which reproduces the staircase edges of contours traced on a pixel grid.
//! - Determinism uses a replay token `(seed, index)` mixed into a single RNG.

use nalgebra::Vector2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::ContourResult;
use crate::ring::{Ring, Winding};

/// Replay token to make draws reproducible and indexable.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReplayToken {
    pub seed: u64,
    pub index: u64,
}

impl ReplayToken {
    #[inline]
    fn to_std_rng(self) -> StdRng {
        // SplitMix64 finalizer
        fn mix(mut x: u64) -> u64 {
            x ^= x >> 30;
            x = x.wrapping_mul(0xbf58476d1ce4e5b9);
            x ^= x >> 27;
            x = x.wrapping_mul(0x94d049bb133111eb);
            x ^ (x >> 31)
        }
        let k = mix(self.seed ^ mix(self.index.wrapping_add(0x9e3779b97f4a7c15)));
        StdRng::seed_from_u64(k)
    }
}

/// Radial-jitter sampler configuration.
#[derive(Clone, Copy, Debug)]
pub struct RadialCfg {
    /// Distinct vertices before closure. Raised to at least 3.
    pub vertices: usize,
    pub center: Vector2<f64>,
    /// Base radius in degrees.
    pub radius: f64,
    /// Angular jitter as a fraction of the base spacing 2π/n. Clamped to [0, 0.49].
    pub angle_jitter_frac: f64,
    /// Radii are `radius * (1 + u)` with `u ∈ [-radial_jitter, radial_jitter]`.
    pub radial_jitter: f64,
    pub winding: Winding,
}

impl Default for RadialCfg {
    fn default() -> Self {
        Self {
            vertices: 60,
            center: Vector2::zeros(),
            radius: 10.0,
            angle_jitter_frac: 0.3,
            radial_jitter: 0.15,
            winding: Winding::Clockwise,
        }
    }
}

fn vertex_at(center: Vector2<f64>, r: f64, th: f64) -> Vector2<f64> {
    center + Vector2::new(th.cos() * r, th.sin() * r)
}

/// Order increasing-angle vertices for `winding` and close the ring.
fn finish(mut open: Vec<Vector2<f64>>, winding: Winding) -> ContourResult<Ring> {
    // increasing angle is counter-clockwise
    if winding == Winding::Clockwise {
        open.reverse();
    }
    Ring::close(open)
}

/// Evenly sampled circle with `n` points including the closing repeat.
pub fn circle(center: Vector2<f64>, radius: f64, n: usize, winding: Winding) -> ContourResult<Ring> {
    let m = n.saturating_sub(1).max(1);
    let delta = std::f64::consts::TAU / (m as f64);
    let open = (0..m)
        .map(|k| vertex_at(center, radius, (k as f64) * delta))
        .collect();
    finish(open, winding)
}

/// Axis-aligned square with lower-left corner `origin`, counter-clockwise,
/// five points.
pub fn square_ccw(origin: Vector2<f64>, side: f64) -> ContourResult<Ring> {
    Ring::close(vec![
        origin,
        origin + Vector2::new(side, 0.0),
        origin + Vector2::new(side, side),
        origin + Vector2::new(0.0, side),
    ])
}

/// Draw a star-shaped ring via angular and radial jitter.
pub fn draw_ring_radial(cfg: RadialCfg, tok: ReplayToken) -> ContourResult<Ring> {
    let mut rng = tok.to_std_rng();
    let n = cfg.vertices.max(3);
    let aj = cfg.angle_jitter_frac.clamp(0.0, 0.49);
    let rj = cfg.radial_jitter.clamp(0.0, 0.95);
    let r0 = cfg.radius.max(1e-9);
    let delta = std::f64::consts::TAU / (n as f64);
    let phase = rng.gen::<f64>() * std::f64::consts::TAU;
    let open = (0..n)
        .map(|k| {
            let th = phase + (k as f64) * delta + (rng.gen::<f64>() * 2.0 - 1.0) * aj * delta;
            let u = (rng.gen::<f64>() * 2.0 - 1.0) * rj;
            vertex_at(cfg.center, r0 * (1.0 + u), th)
        })
        .collect();
    finish(open, cfg.winding)
}

/// Snap every vertex to a grid of spacing `cell` and drop consecutive
/// duplicates. Winding is preserved; the result may fail validation if the
/// ring collapses to fewer than three cells.
pub fn grid_snap(ring: &Ring, cell: f64) -> ContourResult<Ring> {
    let snap = |v: f64| (v / cell).round() * cell;
    let mut open: Vec<Vector2<f64>> = Vec::with_capacity(ring.len());
    for p in ring.distinct() {
        let q = Vector2::new(snap(p.x), snap(p.y));
        if open.last() != Some(&q) {
            open.push(q);
        }
    }
    while open.len() > 1 && open.first() == open.last() {
        open.pop();
    }
    Ring::close(open)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reproducible_draw() {
        let tok = ReplayToken { seed: 42, index: 7 };
        let a = draw_ring_radial(RadialCfg::default(), tok).unwrap();
        let b = draw_ring_radial(RadialCfg::default(), tok).unwrap();
        assert_eq!(a, b);
        let c = draw_ring_radial(RadialCfg::default(), ReplayToken { seed: 42, index: 8 }).unwrap();
        assert_ne!(a, c);
    }

    #[test]
    fn windings_are_as_requested() {
        let cw = circle(Vector2::zeros(), 5.0, 100, Winding::Clockwise).unwrap();
        let ccw = circle(Vector2::zeros(), 5.0, 100, Winding::CounterClockwise).unwrap();
        assert_eq!(cw.len(), 100);
        assert_eq!(cw.winding(), Winding::Clockwise);
        assert_eq!(ccw.winding(), Winding::CounterClockwise);
        let cfg = RadialCfg {
            winding: Winding::CounterClockwise,
            ..RadialCfg::default()
        };
        let r = draw_ring_radial(cfg, ReplayToken { seed: 1, index: 0 }).unwrap();
        assert_eq!(r.winding(), Winding::CounterClockwise);
    }

    #[test]
    fn grid_snap_produces_staircase_on_grid() {
        let c = circle(Vector2::new(30.0, -20.0), 8.0, 400, Winding::Clockwise).unwrap();
        let g = grid_snap(&c, 1.0).unwrap();
        assert!(g.len() < c.len());
        for p in g.points() {
            assert!((p.x - p.x.round()).abs() < 1e-12);
            assert!((p.y - p.y.round()).abs() < 1e-12);
        }
        for w in g.points().windows(2) {
            assert_ne!(w[0], w[1]);
        }
        assert_eq!(g.winding(), Winding::Clockwise);
    }
}
