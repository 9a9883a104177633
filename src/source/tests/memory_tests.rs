//! Tests for the in-memory source

extern crate std;

use crate::coordinate::GeoTransform;
use crate::extractor::{Matrix, RasterWindow};
use crate::source::{ImageSource, MemorySource, SampleType};

fn source() -> MemorySource {
    let values: Vec<f32> = (0..16).map(|v| v as f32).collect();
    let band = Matrix::from_vec(4, 4, values).unwrap();
    MemorySource::new(32631, GeoTransform::new(1000.0, 2000.0, 10.0, -10.0), vec![band]).unwrap()
}

#[test]
fn test_reads_sub_window() {
    let mut source = source();
    let data = source.read(&RasterWindow::new(1, 2, 2, 2)).unwrap();

    std::assert_eq!(data.rows(), 2);
    std::assert_eq!(data.cols(), 2);
    std::assert_eq!(data.bands[0].as_slice(), &[9.0, 10.0, 13.0, 14.0]);
    std::assert_eq!(data.transform, GeoTransform::new(1010.0, 1980.0, 10.0, -10.0));
}

#[test]
fn test_rejects_window_outside_raster() {
    let mut source = source();
    std::assert!(source.read(&RasterWindow::new(3, 3, 2, 2)).is_err());
}

#[test]
fn test_rejects_bands_of_different_shape() {
    let transform = GeoTransform::new(0.0, 0.0, 10.0, -10.0);
    let bands = vec![Matrix::filled(2, 2, 0.0f32), Matrix::filled(2, 3, 0.0f32)];
    std::assert!(MemorySource::new(32631, transform, bands).is_err());
}

#[test]
fn test_u8_source() {
    let transform = GeoTransform::new(0.0, 0.0, 20.0, -20.0);
    let band = Matrix::from_vec(1, 2, vec![4u8, 200]).unwrap();
    let source = MemorySource::from_u8(32631, transform, vec![band]).unwrap().with_nodata(0.0);

    std::assert_eq!(source.sample_type(), SampleType::U8);
    std::assert_eq!(source.nodata(), Some(0.0));
    std::assert_eq!(source.width(), 2);
    std::assert_eq!(source.height(), 1);
}
