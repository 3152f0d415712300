//! Cleanup of sky-localization contours for web rendering.
//!
//! Raw probability contours arrive as closed rings in decimal degrees, traced
//! on a pixelized sky. This crate turns them into web-ready regions:
//! - `ring`: validation, clockwise orientation, minimum-area filter.
//! - `smooth`: resample-and-window (default) or spline-only smoothing.
//! - `region`: per-event records in their JSON shape.
//! - `pipeline`: the per-ring and per-event flow with failure isolation.
//!
//! The core is pure and in-memory: no file or network I/O, no global state.
//! Every run takes an explicit `PipelineCfg`.

pub mod cfg;
pub mod error;
pub mod pipeline;
pub mod region;
pub mod ring;
pub mod smooth;
pub mod synth;

/// Library version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use cfg::{PipelineCfg, ResampleCfg, Smoothing, SplineCfg};
pub use error::{ContourError, ContourResult};
pub use nalgebra::Vector2 as Vec2;

/// Common exports for callers.
pub mod prelude {
    pub use crate::cfg::{PipelineCfg, ResampleCfg, Smoothing, SplineCfg};
    pub use crate::error::{ContourError, ContourResult};
    pub use crate::pipeline::{
        clean_ring, BatchReport, BatchSummary, Cleaned, EventInput, EventReport, Pipeline,
        RingOutcome, RingReport,
    };
    pub use crate::region::{assemble_event, assemble_regions, EventRecord, Region};
    pub use crate::ring::{orient_clockwise, AreaFilter, AreaVerdict, OrientedRing, Ring, Winding};
    pub use crate::smooth::{smooth_ring, PeriodicSpline};
    pub use nalgebra::Vector2 as Vec2;
}
