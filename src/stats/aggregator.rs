//! Order statistics with nodata-aware acceptance

/// Summary statistics of one band over one parcel selection
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StatTuple {
    pub count: usize,
    pub mean: f64,
    /// Population standard deviation
    pub std: f64,
    pub min: f64,
    pub max: f64,
    pub p25: f64,
    pub p50: f64,
    pub p75: f64,
}

/// Linear-interpolated percentile of already sorted values
///
/// Matches the usual "linear" definition: rank `q/100 * (n - 1)`,
/// interpolated between the two neighbouring order statistics.
pub fn percentile(sorted: &[f64], q: f64) -> f64 {
    if sorted.is_empty() {
        return f64::NAN;
    }
    let rank = (q / 100.0) * (sorted.len() - 1) as f64;
    let lower = rank.floor() as usize;
    let upper = rank.ceil() as usize;
    let fraction = rank - lower as f64;
    sorted[lower] + (sorted[upper] - sorted[lower]) * fraction
}

/// Computes band statistics for parcel selections
#[derive(Debug, Clone, Copy)]
pub struct StatisticsAggregator {
    nodata: f64,
}

impl StatisticsAggregator {
    /// Create an aggregator for images using `nodata` as sentinel
    pub fn new(nodata: f64) -> Self {
        StatisticsAggregator { nodata }
    }

    /// Nodata sentinel in use
    pub fn nodata(&self) -> f64 {
        self.nodata
    }

    /// Statistics for one band of a selection
    ///
    /// For the primary band the selection is rejected when it is empty or
    /// when its minimum or maximum equals nodata. Only the extrema are
    /// inspected: a nodata pixel strictly inside the value range goes
    /// through. Secondary bands reuse the positions accepted for the primary
    /// band and are not checked again.
    pub fn stats_for(&self, values: &[f64], is_primary_band: bool) -> Option<StatTuple> {
        if values.is_empty() {
            return None;
        }

        let mut sorted = values.to_vec();
        sorted.sort_by(|a, b| a.total_cmp(b));
        let min = sorted[0];
        let max = sorted[sorted.len() - 1];

        if is_primary_band && (min == self.nodata || max == self.nodata) {
            return None;
        }

        let count = sorted.len();
        let mean = sorted.iter().sum::<f64>() / count as f64;
        let variance = sorted.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>() / count as f64;

        Some(StatTuple {
            count,
            mean,
            std: variance.sqrt(),
            min,
            max,
            p25: percentile(&sorted, 25.0),
            p50: percentile(&sorted, 50.0),
            p75: percentile(&sorted, 75.0),
        })
    }
}
