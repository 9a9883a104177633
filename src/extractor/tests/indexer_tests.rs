//! Tests for the pixel indexer

extern crate std;

use crate::coordinate::GeoTransform;
use crate::extractor::{Matrix, PixelIndexer};

fn window_transform() -> GeoTransform {
    GeoTransform::new(0.0, 40.0, 10.0, -10.0)
}

#[test]
fn test_mask_fully_inside_window() {
    let indexer = PixelIndexer::new();
    let mask = GeoTransform::new(10.0, 30.0, 10.0, -10.0);
    let selection = Matrix::filled(2, 2, true);

    let result = indexer.indices(&mask, &selection, &window_transform(), 4, 4);

    std::assert_eq!(result.len(), 4);
    std::assert_eq!(result.rows, vec![1, 1, 2, 2]);
    std::assert_eq!(result.cols, vec![1, 2, 1, 2]);
}

#[test]
fn test_only_selected_pixels_are_emitted() {
    let indexer = PixelIndexer::new();
    let mask = GeoTransform::new(0.0, 40.0, 10.0, -10.0);
    let selection = Matrix::from_vec(2, 3, vec![true, false, true, false, true, false]).unwrap();

    let result = indexer.indices(&mask, &selection, &window_transform(), 4, 4);

    std::assert_eq!(result.rows, vec![0, 0, 1]);
    std::assert_eq!(result.cols, vec![0, 2, 1]);
}

#[test]
fn test_mask_straddling_window_edge_is_truncated() {
    let indexer = PixelIndexer::new();
    // One pixel up and one pixel left of the window origin
    let mask = GeoTransform::new(-10.0, 50.0, 10.0, -10.0);
    let selection = Matrix::filled(3, 3, true);

    let result = indexer.indices(&mask, &selection, &window_transform(), 4, 4);

    std::assert_eq!(result.len(), 4);
    std::assert!(result.rows.iter().all(|r| *r < 4));
    std::assert!(result.cols.iter().all(|c| *c < 4));
    std::assert_eq!(result.rows, vec![0, 0, 1, 1]);
    std::assert_eq!(result.cols, vec![0, 1, 0, 1]);
}

#[test]
fn test_mask_outside_window_is_empty() {
    let indexer = PixelIndexer::new();
    let mask = GeoTransform::new(100.0, 100.0, 10.0, -10.0);
    let selection = Matrix::filled(2, 2, true);

    let result = indexer.indices(&mask, &selection, &window_transform(), 4, 4);

    std::assert!(result.is_empty());
    std::assert_eq!(result.rows.len(), result.cols.len());
}

#[test]
fn test_origin_rounding_noise_is_snapped() {
    let indexer = PixelIndexer::new();
    let mask = GeoTransform::new(9.999_999_999_9, 30.000_000_000_1, 10.0, -10.0);
    let selection = Matrix::filled(1, 1, true);

    let result = indexer.indices(&mask, &selection, &window_transform(), 4, 4);

    std::assert_eq!(result.rows, vec![1]);
    std::assert_eq!(result.cols, vec![1]);
}
