//! Per-parcel statistics and histograms
//!
//! Aggregation kernels operating on the band values gathered for one
//! parcel selection.

mod aggregator;
mod histogram;
#[cfg(test)]
mod tests;

pub use aggregator::{percentile, StatTuple, StatisticsAggregator};
pub use histogram::{histogram_for, is_no_information, Histogram};
