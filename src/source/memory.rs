//! In-memory image source

use crate::coordinate::GeoTransform;
use crate::errors::{ExtractError, ExtractResult};
use crate::extractor::{Matrix, RasterWindow};

use super::{check_window, ImageSource, SampleType, WindowData};

/// Multi-band raster held entirely in memory
#[derive(Debug, Clone)]
pub struct MemorySource {
    srid: i32,
    transform: GeoTransform,
    sample_type: SampleType,
    nodata: Option<f64>,
    bands: Vec<Matrix<f32>>,
}

impl MemorySource {
    /// Wrap `bands`, which must all share one shape
    pub fn new(srid: i32, transform: GeoTransform, bands: Vec<Matrix<f32>>) -> ExtractResult<Self> {
        let shape = bands.first().map(|b| (b.rows(), b.cols()));
        if bands.iter().any(|b| Some((b.rows(), b.cols())) != shape) {
            return Err(ExtractError::GenericError("Bands differ in shape".to_string()));
        }

        Ok(MemorySource {
            srid,
            transform,
            sample_type: SampleType::F32,
            nodata: None,
            bands,
        })
    }

    /// Build from 8-bit bands
    pub fn from_u8(srid: i32, transform: GeoTransform, bands: Vec<Matrix<u8>>) -> ExtractResult<Self> {
        let widened = bands.iter().map(|b| b.map(|v| v as f32)).collect();
        let mut source = Self::new(srid, transform, widened)?;
        source.sample_type = SampleType::U8;
        Ok(source)
    }

    /// Declare a nodata sentinel
    pub fn with_nodata(mut self, nodata: f64) -> Self {
        self.nodata = Some(nodata);
        self
    }
}

impl ImageSource for MemorySource {
    fn srid(&self) -> i32 {
        self.srid
    }

    fn transform(&self) -> GeoTransform {
        self.transform
    }

    fn band_count(&self) -> usize {
        self.bands.len()
    }

    fn width(&self) -> u32 {
        self.bands.first().map(|b| b.cols() as u32).unwrap_or(0)
    }

    fn height(&self) -> u32 {
        self.bands.first().map(|b| b.rows() as u32).unwrap_or(0)
    }

    fn sample_type(&self) -> SampleType {
        self.sample_type
    }

    fn nodata(&self) -> Option<f64> {
        self.nodata
    }

    fn read(&mut self, window: &RasterWindow) -> ExtractResult<WindowData> {
        check_window(window, self.width(), self.height())?;

        let rows = window.height as usize;
        let cols = window.width as usize;
        let bands = self.bands.iter().map(|band| {
            let mut out = Matrix::filled(rows, cols, 0.0f32);
            for r in 0..rows {
                for c in 0..cols {
                    if let Some(v) = band.get(window.y as usize + r, window.x as usize + c) {
                        out.set(r, c, v);
                    }
                }
            }
            out
        }).collect();

        Ok(WindowData {
            window: *window,
            transform: self.transform.shifted(window.x, window.y),
            bands,
        })
    }
}
