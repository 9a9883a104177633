//! Catalog image records

use chrono::NaiveDateTime;

use crate::coordinate::BoundingBox;

use super::card::CardType;
use super::status::ImageStatus;

/// One satellite image in the catalog
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogImage {
    pub id: i64,
    /// Product reference (file or scene name)
    pub reference: String,
    /// Acquisition time
    pub obstime: NaiveDateTime,
    /// Sensor code, e.g. "S1A" or "S2B"
    pub sensor: String,
    pub card: CardType,
    /// Envelope of the footprint, used for `&&`-style overlap filters
    pub footprint: BoundingBox,
    /// Footprint polygon as WKT, when ingestion supplied one
    pub footprint_wkt: Option<String>,
    pub status: ImageStatus,
}

/// Catalog record as supplied by ingestion
#[derive(Debug, Clone)]
pub struct NewImage {
    pub reference: String,
    pub obstime: NaiveDateTime,
    pub sensor: String,
    pub card: CardType,
    pub footprint: BoundingBox,
    pub footprint_wkt: Option<String>,
}

/// What a worker receives after a successful claim
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageHandle {
    pub id: i64,
    pub reference: String,
    pub obstime: NaiveDateTime,
}

/// Acquisition time filter; bounds are inclusive and optional
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TimeRange {
    pub start: Option<NaiveDateTime>,
    pub end: Option<NaiveDateTime>,
}

impl TimeRange {
    /// Create a range
    pub fn new(start: Option<NaiveDateTime>, end: Option<NaiveDateTime>) -> Self {
        TimeRange { start, end }
    }

    /// Range without bounds
    pub fn unbounded() -> Self {
        TimeRange::default()
    }
}
