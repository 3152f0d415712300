//! Minimum-area filter for contour-generator noise.

use super::orient::OrientedRing;
use crate::cfg::AREA_CUTOFF_68;

/// Keep/drop decision for one ring.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AreaVerdict {
    Keep,
    Drop,
}

/// Drops rings whose unsigned area is strictly below `cutoff` (deg²).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AreaFilter {
    pub cutoff: f64,
}

impl Default for AreaFilter {
    fn default() -> Self {
        Self {
            cutoff: AREA_CUTOFF_68,
        }
    }
}

impl AreaFilter {
    #[inline]
    pub fn new(cutoff: f64) -> Self {
        Self { cutoff }
    }

    /// The cutoff itself is kept.
    #[inline]
    pub fn verdict_for_area(&self, area: f64) -> AreaVerdict {
        if area < self.cutoff {
            AreaVerdict::Drop
        } else {
            AreaVerdict::Keep
        }
    }

    #[inline]
    pub fn verdict(&self, ring: &OrientedRing) -> AreaVerdict {
        self.verdict_for_area(ring.area())
    }
}
