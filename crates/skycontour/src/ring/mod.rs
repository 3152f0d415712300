//! Ring validation, canonical orientation, and the area filter.
//!
//! Purpose
//! - Turn raw contour polygons into validated, clockwise `OrientedRing`s and
//!   decide which of them are real localization regions.
//!
//! Conventions
//! - Coordinates are decimal degrees; areas are square degrees in the same
//!   flat (x, y) metric. No projection is applied.
//! - Rings are explicitly closed. Holes are not represented.
//!
//! Code cross-refs: `OrientedRing`, `AreaFilter`, `smooth::smooth_ring`

mod filter;
mod orient;
mod types;

pub use filter::{AreaFilter, AreaVerdict};
pub use orient::{orient_clockwise, OrientedRing};
pub use types::{median_spacing, signed_area, Ring, Winding};

#[cfg(test)]
mod tests;
