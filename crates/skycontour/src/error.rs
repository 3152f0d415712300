//! Error types for ring cleanup and event assembly.
//!
//! Area drops are not errors; they are reported through `pipeline::RingOutcome`.

use thiserror::Error;

/// Errors raised while validating, smoothing, or assembling contours.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ContourError {
    /// Ring has fewer points than a closed triangle needs.
    #[error("malformed ring: need at least {required} points, got {actual}")]
    TooFewPoints { required: usize, actual: usize },

    /// First and last points differ.
    #[error("malformed ring: not closed, first point {first:?} != last point {last:?}")]
    NotClosed { first: [f64; 2], last: [f64; 2] },

    /// NaN or infinite coordinate.
    #[error("malformed ring: non-finite coordinate at index {index}")]
    NonFinite { index: usize },

    /// Zero signed area or a numerical failure in the curve fit.
    #[error("degenerate geometry: {0}")]
    Degenerate(String),

    /// A tunable is out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Required per-event metadata is absent.
    #[error("event is missing required field `{0}`")]
    MissingMetadata(&'static str),
}

impl ContourError {
    /// True for the input-shape errors that must be surfaced to the caller.
    pub fn is_malformed(&self) -> bool {
        matches!(
            self,
            Self::TooFewPoints { .. } | Self::NotClosed { .. } | Self::NonFinite { .. }
        )
    }

    /// True when the ring can be skipped like an area drop.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::Degenerate(_))
    }

    pub(crate) fn degenerate(reason: impl Into<String>) -> Self {
        Self::Degenerate(reason.into())
    }
}

/// Result alias for contour operations.
pub type ContourResult<T> = std::result::Result<T, ContourError>;
