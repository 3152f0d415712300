//! Canonical clockwise orientation.
//!
//! The web sky viewer fills polygons by their winding, so every ring is
//! brought to clockwise order before anything else looks at it.

use super::types::Ring;

/// Ring in clockwise order together with its unsigned area (deg²).
#[derive(Clone, Debug, PartialEq)]
pub struct OrientedRing {
    ring: Ring,
    area: f64,
}

impl OrientedRing {
    /// Unsigned area in square degrees; never negative.
    #[inline]
    pub fn area(&self) -> f64 {
        self.area
    }

    #[inline]
    pub fn ring(&self) -> &Ring {
        &self.ring
    }

    pub fn into_ring(self) -> Ring {
        self.ring
    }

    /// `(unsigned_area, ring)`.
    pub fn into_parts(self) -> (f64, Ring) {
        (self.area, self.ring)
    }
}

/// Reverse counter-clockwise rings; leave clockwise and zero-area rings as is.
pub fn orient_clockwise(ring: Ring) -> OrientedRing {
    let signed = ring.signed_area();
    if signed < 0.0 {
        OrientedRing {
            ring: ring.reversed(),
            area: -signed,
        }
    } else {
        OrientedRing { ring, area: signed }
    }
}
