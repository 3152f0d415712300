//! Region and event records in their serialized shape.
//!
//! `EventRecord` serializes as
//! `{"ident": .., "peak_gps": .., "regions": [{"contours": {"68": [[x, y], ..]}}, ..]}`.
//! Contours are stored as plain `[x, y]` pairs so collaborators can emit JSON
//! without touching geometry types.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::cfg::CONFIDENCE_68;
use crate::error::{ContourError, ContourResult};
use crate::ring::Ring;

/// One localization region: confidence label → closed contour.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Region {
    pub contours: BTreeMap<String, Vec<[f64; 2]>>,
}

impl Region {
    /// Region carrying only the 68% contour.
    pub fn confidence_68(ring: &Ring) -> Self {
        Self::default().with_contour(CONFIDENCE_68, ring)
    }

    pub fn with_contour(mut self, label: &str, ring: &Ring) -> Self {
        self.contours.insert(label.to_string(), ring.to_pairs());
        self
    }

    pub fn contour(&self, label: &str) -> Option<&[[f64; 2]]> {
        self.contours.get(label).map(Vec::as_slice)
    }
}

/// All cleaned regions of one event plus its metadata.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EventRecord {
    pub ident: String,
    /// GPS seconds of peak significance.
    pub peak_gps: i64,
    pub regions: Vec<Region>,
}

/// One region per ring, in order; rings are never merged.
pub fn assemble_regions<I>(rings: I) -> Vec<Region>
where
    I: IntoIterator<Item = Ring>,
{
    rings.into_iter().map(|r| Region::confidence_68(&r)).collect()
}

/// Attach metadata. Only presence is checked: a missing or empty identifier,
/// or a missing timing value, is `MissingMetadata`. Zero regions is fine.
pub fn assemble_event(
    ident: Option<&str>,
    peak_gps: Option<i64>,
    regions: Vec<Region>,
) -> ContourResult<EventRecord> {
    let ident = match ident {
        Some(s) if !s.trim().is_empty() => s.to_string(),
        _ => return Err(ContourError::MissingMetadata("ident")),
    };
    let peak_gps = peak_gps.ok_or(ContourError::MissingMetadata("peak_gps"))?;
    Ok(EventRecord {
        ident,
        peak_gps,
        regions,
    })
}
