//! Result records written by the extraction

use crate::stats::{Histogram, StatTuple};

/// Band statistics of one parcel in one image
///
/// Unique on (pid, obsid, band).
#[derive(Debug, Clone, PartialEq)]
pub struct StatRecord {
    pub pid: i64,
    pub obsid: i64,
    pub band: String,
    pub count: i64,
    pub mean: f64,
    pub std: f64,
    pub min: f64,
    pub max: f64,
    pub p25: f64,
    pub p50: f64,
    pub p75: f64,
}

impl StatRecord {
    /// Build a record from aggregated statistics
    pub fn new(pid: i64, obsid: i64, band: &str, stats: &StatTuple) -> Self {
        StatRecord {
            pid,
            obsid,
            band: band.to_string(),
            count: stats.count as i64,
            mean: stats.mean,
            std: stats.std,
            min: stats.min,
            max: stats.max,
            p25: stats.p25,
            p50: stats.p50,
            p75: stats.p75,
        }
    }
}

/// Value histogram of one parcel in one image
#[derive(Debug, Clone, PartialEq)]
pub struct HistRecord {
    pub pid: i64,
    pub obsid: i64,
    pub histogram: Histogram,
}

impl HistRecord {
    /// Histogram as a JSON object with string keys, e.g. `{"4":12,"5":3}`
    pub fn histogram_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(&self.histogram)
    }
}

/// Any record accepted by the result sink
#[derive(Debug, Clone, PartialEq)]
pub enum ResultRecord {
    Stat(StatRecord),
    Hist(HistRecord),
}

impl ResultRecord {
    /// Key used in duplicate diagnostics
    pub fn key(&self) -> String {
        match self {
            ResultRecord::Stat(r) => format!("({}, {}, {})", r.pid, r.obsid, r.band),
            ResultRecord::Hist(r) => format!("({}, {})", r.pid, r.obsid),
        }
    }
}
