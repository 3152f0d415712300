//! Pipeline configuration and its defaults.
//!
//! Policy
//! - Defaults are fixed, empirically tuned constants. Every run receives an
//!   explicit `PipelineCfg`, so several configurations can coexist (tests,
//!   comparisons) without shared state.

use serde::{Deserialize, Serialize};

use crate::error::{ContourError, ContourResult};

/// Smallest plausible localization region (deg²). Smaller rings are
/// single-pixel artifacts of the contour generator.
pub const AREA_CUTOFF_68: f64 = 10.0;
/// Assumed angular resolution of the source probability grid (degrees).
pub const ASSUMED_RESOLUTION_DEG: f64 = 2.2;
/// Hamming window length used for chunked averaging.
pub const WINDOW_SIZE: usize = 15;
/// Lower bound on distinct points in a resampled ring.
pub const MIN_POINTS: usize = 8;
/// Residual budget (deg², per coordinate) of the spline-only strategy.
pub const SPLINE_SMOOTHING: f64 = 1.0;
/// Confidence label of the only contour populated today.
pub const CONFIDENCE_68: &str = "68";
/// Closed triangle: three distinct vertices plus the closing repeat.
pub const MIN_RING_POINTS: usize = 4;
/// Upper bound on oversampled spline evaluations for one ring
/// (`window_size * n_out`). Larger rings are skipped as degenerate.
pub const MAX_DENSE_SAMPLES: usize = 1 << 22;

/// Resample-and-window smoothing parameters.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResampleCfg {
    pub assumed_resolution: f64,
    pub window_size: usize,
    pub min_points: usize,
}

impl Default for ResampleCfg {
    fn default() -> Self {
        Self {
            assumed_resolution: ASSUMED_RESOLUTION_DEG,
            window_size: WINDOW_SIZE,
            min_points: MIN_POINTS,
        }
    }
}

/// Spline-only smoothing parameters.
///
/// `smoothing` bounds the sum of squared residuals per coordinate, as in a
/// classic smoothing-spline fit. Zero reproduces the input exactly.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SplineCfg {
    pub smoothing: f64,
}

impl Default for SplineCfg {
    fn default() -> Self {
        Self {
            smoothing: SPLINE_SMOOTHING,
        }
    }
}

/// Smoothing strategy.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "strategy", rename_all = "snake_case")]
pub enum Smoothing {
    /// Interpolating periodic spline, oversampled and decimated through a
    /// Hamming window. Point count follows the ring's native spacing.
    Resample(ResampleCfg),
    /// Periodic smoothing spline evaluated at the input samples. Point count
    /// is preserved.
    Spline(SplineCfg),
}

impl Default for Smoothing {
    fn default() -> Self {
        Smoothing::Resample(ResampleCfg::default())
    }
}

/// Full pipeline configuration.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineCfg {
    /// Rings with unsigned area below this (deg²) are dropped.
    pub area_cutoff: f64,
    pub smoothing: Smoothing,
}

impl Default for PipelineCfg {
    fn default() -> Self {
        Self {
            area_cutoff: AREA_CUTOFF_68,
            smoothing: Smoothing::default(),
        }
    }
}

impl PipelineCfg {
    /// Default cutoff with the spline-only strategy.
    pub fn spline_only() -> Self {
        Self {
            smoothing: Smoothing::Spline(SplineCfg::default()),
            ..Self::default()
        }
    }

    /// Reject tunables that would make the pipeline meaningless.
    pub fn validate(&self) -> ContourResult<()> {
        if !self.area_cutoff.is_finite() || self.area_cutoff < 0.0 {
            return Err(ContourError::InvalidConfig(format!(
                "area_cutoff must be finite and >= 0, got {}",
                self.area_cutoff
            )));
        }
        match self.smoothing {
            Smoothing::Resample(r) => {
                if !r.assumed_resolution.is_finite() || r.assumed_resolution <= 0.0 {
                    return Err(ContourError::InvalidConfig(format!(
                        "assumed_resolution must be finite and > 0, got {}",
                        r.assumed_resolution
                    )));
                }
                if r.window_size == 0 {
                    return Err(ContourError::InvalidConfig(
                        "window_size must be >= 1".into(),
                    ));
                }
                if r.min_points == 0 {
                    return Err(ContourError::InvalidConfig(
                        "min_points must be >= 1".into(),
                    ));
                }
                match r.window_size.checked_mul(r.min_points) {
                    Some(dense) if dense <= MAX_DENSE_SAMPLES => {}
                    _ => {
                        return Err(ContourError::InvalidConfig(format!(
                            "window_size * min_points must be <= {MAX_DENSE_SAMPLES}"
                        )))
                    }
                }
            }
            Smoothing::Spline(s) => {
                if !s.smoothing.is_finite() || s.smoothing < 0.0 {
                    return Err(ContourError::InvalidConfig(format!(
                        "smoothing must be finite and >= 0, got {}",
                        s.smoothing
                    )));
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_tuned_constants() {
        let cfg = PipelineCfg::default();
        assert_eq!(cfg.area_cutoff, 10.0);
        match cfg.smoothing {
            Smoothing::Resample(r) => {
                assert_eq!(r.assumed_resolution, 2.2);
                assert_eq!(r.window_size, 15);
                assert_eq!(r.min_points, 8);
            }
            Smoothing::Spline(_) => panic!("resample is the default"),
        }
        assert!(cfg.validate().is_ok());
        assert!(PipelineCfg::spline_only().validate().is_ok());
    }

    #[test]
    fn validate_rejects_bad_tunables() {
        let mut cfg = PipelineCfg::default();
        cfg.area_cutoff = f64::NAN;
        assert!(cfg.validate().is_err());

        let cfg = PipelineCfg {
            smoothing: Smoothing::Resample(ResampleCfg {
                window_size: 0,
                ..ResampleCfg::default()
            }),
            ..PipelineCfg::default()
        };
        assert!(matches!(cfg.validate(), Err(ContourError::InvalidConfig(_))));

        let cfg = PipelineCfg {
            smoothing: Smoothing::Spline(SplineCfg { smoothing: -1.0 }),
            ..PipelineCfg::default()
        };
        assert!(cfg.validate().is_err());

        let cfg = PipelineCfg {
            smoothing: Smoothing::Resample(ResampleCfg {
                min_points: usize::MAX / 2,
                ..ResampleCfg::default()
            }),
            ..PipelineCfg::default()
        };
        assert!(matches!(cfg.validate(), Err(ContourError::InvalidConfig(_))));
    }

    #[test]
    fn json_round_trip_with_partial_fields() {
        let cfg: PipelineCfg = serde_json::from_str(
            r#"{"area_cutoff": 5.0, "smoothing": {"strategy": "resample", "window_size": 9}}"#,
        )
        .unwrap();
        assert_eq!(cfg.area_cutoff, 5.0);
        assert_eq!(
            cfg.smoothing,
            Smoothing::Resample(ResampleCfg {
                window_size: 9,
                ..ResampleCfg::default()
            })
        );

        let cfg: PipelineCfg =
            serde_json::from_str(r#"{"smoothing": {"strategy": "spline"}}"#).unwrap();
        assert_eq!(cfg.area_cutoff, AREA_CUTOFF_68);
        assert_eq!(cfg.smoothing, Smoothing::Spline(SplineCfg::default()));
    }
}
