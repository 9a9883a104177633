//! Tests for band statistics

extern crate std;

use crate::stats::{percentile, StatisticsAggregator};

#[test]
fn test_primary_band_statistics() {
    let aggregator = StatisticsAggregator::new(0.0);
    let stats = aggregator.stats_for(&[10.0, 12.0, 14.0, 16.0], true).unwrap();

    std::assert_eq!(stats.count, 4);
    std::assert_eq!(stats.mean, 13.0);
    std::assert_eq!(stats.min, 10.0);
    std::assert_eq!(stats.max, 16.0);
    std::assert!((stats.std - 5.0f64.sqrt()).abs() < 1e-12);
    std::assert_eq!(stats.p25, 11.5);
    std::assert_eq!(stats.p50, 13.0);
    std::assert_eq!(stats.p75, 14.5);
}

#[test]
fn test_uniform_band() {
    let aggregator = StatisticsAggregator::new(0.0);
    let stats = aggregator.stats_for(&[42.0; 9], true).unwrap();

    std::assert_eq!(stats.p50, 42.0);
    std::assert_eq!(stats.std, 0.0);
    std::assert_eq!(stats.count, 9);
}

#[test]
fn test_empty_selection_is_rejected() {
    let aggregator = StatisticsAggregator::new(0.0);
    std::assert!(aggregator.stats_for(&[], true).is_none());
    std::assert!(aggregator.stats_for(&[], false).is_none());
}

#[test]
fn test_nodata_at_extrema_is_rejected() {
    let aggregator = StatisticsAggregator::new(0.0);
    std::assert!(aggregator.stats_for(&[0.0, 5.0, 7.0], true).is_none());

    let aggregator = StatisticsAggregator::new(255.0);
    std::assert!(aggregator.stats_for(&[3.0, 255.0, 7.0], true).is_none());
}

#[test]
fn test_interior_nodata_is_not_detected() {
    // Known boundary case: only min and max are compared with nodata
    let aggregator = StatisticsAggregator::new(5.0);
    let stats = aggregator.stats_for(&[1.0, 5.0, 9.0], true).unwrap();
    std::assert_eq!(stats.count, 3);
    std::assert_eq!(stats.mean, 5.0);
}

#[test]
fn test_secondary_band_skips_nodata_check() {
    let aggregator = StatisticsAggregator::new(0.0);
    let stats = aggregator.stats_for(&[0.0, 2.0, 4.0], false).unwrap();
    std::assert_eq!(stats.min, 0.0);
    std::assert_eq!(stats.mean, 2.0);
}

#[test]
fn test_percentile_interpolation() {
    let sorted = [1.0, 2.0, 3.0, 4.0, 5.0];
    std::assert_eq!(percentile(&sorted, 0.0), 1.0);
    std::assert_eq!(percentile(&sorted, 50.0), 3.0);
    std::assert_eq!(percentile(&sorted, 100.0), 5.0);
    std::assert_eq!(percentile(&[1.0, 2.0], 25.0), 1.25);
    std::assert_eq!(percentile(&[7.0], 75.0), 7.0);
}
