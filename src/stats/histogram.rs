//! Exact value histograms for classification bands

use std::collections::BTreeMap;

/// Value to pixel count tally
pub type Histogram = BTreeMap<u8, u64>;

/// Tally every distinct value in `values`
pub fn histogram_for(values: &[u8]) -> Histogram {
    let mut counts = [0u64; 256];
    for v in values {
        counts[*v as usize] += 1;
    }

    counts.iter()
        .enumerate()
        .filter(|(_, count)| **count > 0)
        .map(|(value, count)| (value as u8, *count))
        .collect()
}

/// True for a histogram holding only zeros, which carries no information
pub fn is_no_information(histogram: &Histogram) -> bool {
    histogram.len() == 1 && histogram.contains_key(&0)
}
