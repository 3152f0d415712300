//! Per-ring cleanup and per-event assembly.
//!
//! Flow per feature: validate → orient clockwise → area filter → smooth →
//! region. Failures stay local to one ring: malformed input is reported as
//! `RingOutcome::Failed`, degenerate geometry as `RingOutcome::Skipped`, and
//! the remaining features and events continue. Only missing event metadata
//! fails a whole event.

use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

use crate::cfg::PipelineCfg;
use crate::error::{ContourError, ContourResult};
use crate::region::{assemble_event, assemble_regions, EventRecord};
use crate::ring::{orient_clockwise, AreaFilter, AreaVerdict, Ring};

/// One event as handed over by the collaborator layer.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct EventInput {
    pub ident: Option<String>,
    pub peak_gps: Option<i64>,
    /// Closed rings as `[x, y]` pairs in decimal degrees.
    #[serde(default)]
    pub features: Vec<Vec<[f64; 2]>>,
}

/// Result of cleaning a single validated ring.
#[derive(Clone, Debug, PartialEq)]
pub enum Cleaned {
    Kept { area: f64, ring: Ring },
    Dropped { area: f64 },
}

/// What happened to one feature.
#[derive(Clone, Debug, PartialEq)]
pub enum RingOutcome {
    Kept {
        area: f64,
        points_in: usize,
        points_out: usize,
    },
    /// Below the area cutoff; normal control flow.
    Dropped { area: f64 },
    /// Degenerate geometry, skipped like a drop.
    Skipped { reason: ContourError },
    /// Malformed input ring.
    Failed { error: ContourError },
}

#[derive(Clone, Debug, PartialEq)]
pub struct RingReport {
    pub feature: usize,
    pub outcome: RingOutcome,
}

/// Assembled record plus per-feature outcomes.
#[derive(Clone, Debug, PartialEq)]
pub struct EventReport {
    pub record: EventRecord,
    pub rings: Vec<RingReport>,
}

impl EventReport {
    fn count(&self, pred: impl Fn(&RingOutcome) -> bool) -> usize {
        self.rings.iter().filter(|r| pred(&r.outcome)).count()
    }

    pub fn kept(&self) -> usize {
        self.count(|o| matches!(o, RingOutcome::Kept { .. }))
    }

    pub fn dropped(&self) -> usize {
        self.count(|o| matches!(o, RingOutcome::Dropped { .. }))
    }

    pub fn skipped(&self) -> usize {
        self.count(|o| matches!(o, RingOutcome::Skipped { .. }))
    }

    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, RingOutcome::Failed { .. }))
    }

    /// Malformed-ring errors with their feature index.
    pub fn errors(&self) -> Vec<(usize, &ContourError)> {
        self.rings
            .iter()
            .filter_map(|r| match &r.outcome {
                RingOutcome::Failed { error } => Some((r.feature, error)),
                _ => None,
            })
            .collect()
    }
}

/// An event that could not be assembled at all.
#[derive(Clone, Debug, PartialEq)]
pub struct EventFailure {
    /// Position in the batch input.
    pub index: usize,
    pub ident: Option<String>,
    pub error: ContourError,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct BatchReport {
    pub events: Vec<EventReport>,
    pub failures: Vec<EventFailure>,
}

/// Aggregate counts over a batch.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchSummary {
    pub events: usize,
    pub regions: usize,
    pub dropped: usize,
    pub skipped: usize,
    pub failed_rings: usize,
    pub failed_events: usize,
}

impl BatchReport {
    pub fn records(&self) -> impl Iterator<Item = &EventRecord> {
        self.events.iter().map(|e| &e.record)
    }

    pub fn summary(&self) -> BatchSummary {
        let mut s = BatchSummary {
            events: self.events.len(),
            failed_events: self.failures.len(),
            ..BatchSummary::default()
        };
        for e in &self.events {
            s.regions += e.kept();
            s.dropped += e.dropped();
            s.skipped += e.skipped();
            s.failed_rings += e.failed();
        }
        s
    }
}

/// Validate, orient, filter, and smooth one ring.
///
/// Errors: malformed rings (`is_malformed`) and degenerate geometry
/// (`is_recoverable`). A zero-area ring is degenerate, not dropped.
pub fn clean_ring(ring: Ring, cfg: &PipelineCfg) -> ContourResult<Cleaned> {
    let oriented = orient_clockwise(ring);
    let area = oriented.area();
    if area == 0.0 {
        return Err(ContourError::degenerate("zero signed area"));
    }
    match AreaFilter::new(cfg.area_cutoff).verdict(&oriented) {
        AreaVerdict::Drop => Ok(Cleaned::Dropped { area }),
        AreaVerdict::Keep => {
            let ring = cfg.smoothing.apply(oriented.ring())?;
            Ok(Cleaned::Kept { area, ring })
        }
    }
}

/// Configured pipeline; the configuration is validated once up front.
#[derive(Clone, Copy, Debug)]
pub struct Pipeline {
    cfg: PipelineCfg,
}

impl Pipeline {
    pub fn new(cfg: PipelineCfg) -> ContourResult<Self> {
        cfg.validate()?;
        Ok(Self { cfg })
    }

    #[inline]
    pub fn cfg(&self) -> &PipelineCfg {
        &self.cfg
    }

    /// Clean one feature given as plain pairs; never fails, the outcome says
    /// what happened.
    pub fn process_feature(&self, pairs: &[[f64; 2]]) -> (RingOutcome, Option<Ring>) {
        let ring = match Ring::from_pairs(pairs) {
            Ok(r) => r,
            Err(error) => return (RingOutcome::Failed { error }, None),
        };
        let points_in = ring.len();
        match clean_ring(ring, &self.cfg) {
            Ok(Cleaned::Kept { area, ring }) => (
                RingOutcome::Kept {
                    area,
                    points_in,
                    points_out: ring.len(),
                },
                Some(ring),
            ),
            Ok(Cleaned::Dropped { area }) => (RingOutcome::Dropped { area }, None),
            Err(e) if e.is_recoverable() => (RingOutcome::Skipped { reason: e }, None),
            Err(error) => (RingOutcome::Failed { error }, None),
        }
    }

    /// Clean every feature of one event and assemble its record.
    ///
    /// Errors only with `MissingMetadata`; per-ring problems land in the
    /// report.
    pub fn process_event(&self, input: &EventInput) -> ContourResult<EventReport> {
        let mut record = assemble_event(input.ident.as_deref(), input.peak_gps, Vec::new())?;
        let ident = record.ident.clone();
        let mut rings = Vec::with_capacity(input.features.len());
        let mut kept = Vec::new();
        for (feature, pairs) in input.features.iter().enumerate() {
            let (outcome, smoothed) = self.process_feature(pairs);
            match &outcome {
                RingOutcome::Kept {
                    area,
                    points_in,
                    points_out,
                } => debug!(ident = %ident, feature, area, points_in, points_out, "kept"),
                RingOutcome::Dropped { area } => {
                    info!(ident = %ident, feature, area, "skipping {}+{}: A={:.1}", ident, feature + 1, area)
                }
                RingOutcome::Skipped { reason } => {
                    warn!(ident = %ident, feature, %reason, "degenerate ring skipped")
                }
                RingOutcome::Failed { error } => {
                    error!(ident = %ident, feature, %error, "malformed ring")
                }
            }
            if let Some(ring) = smoothed {
                kept.push(ring);
            }
            rings.push(RingReport { feature, outcome });
        }
        record.regions = assemble_regions(kept);
        let report = EventReport { record, rings };
        info!(
            ident = %ident,
            regions = report.kept(),
            dropped = report.dropped(),
            skipped = report.skipped(),
            failed = report.failed(),
            "event"
        );
        Ok(report)
    }

    /// Process events in order; a failed event does not stop the batch.
    pub fn process_batch(&self, inputs: &[EventInput]) -> BatchReport {
        let mut out = BatchReport::default();
        for (index, input) in inputs.iter().enumerate() {
            match self.process_event(input) {
                Ok(report) => out.events.push(report),
                Err(error) => {
                    error!(index, ident = ?input.ident, %error, "event failed");
                    out.failures.push(EventFailure {
                        index,
                        ident: input.ident.clone(),
                        error,
                    });
                }
            }
        }
        out
    }
}
