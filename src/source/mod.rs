//! Image sources
//!
//! The extraction only needs a georeferenced, multi-band raster that can
//! read a pixel window. [`ImageSource`] is that contract; ENVI band files
//! stacked on a common grid and in-memory arrays implement it.

mod memory;
mod envi;
mod stack;
#[cfg(test)]
mod tests;

pub use memory::MemorySource;
pub use envi::{EnviHeader, EnviSource};
pub use stack::BandStack;

use crate::coordinate::GeoTransform;
use crate::errors::{ExtractError, ExtractResult};
use crate::extractor::{Matrix, RasterWindow};

/// Encoding of the samples stored by a source
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleType {
    U8,
    I16,
    U16,
    F32,
}

impl SampleType {
    /// Map an ENVI `data type` code
    pub fn from_envi(code: u32) -> Option<Self> {
        match code {
            1 => Some(SampleType::U8),
            2 => Some(SampleType::I16),
            4 => Some(SampleType::F32),
            12 => Some(SampleType::U16),
            _ => None,
        }
    }

    /// Bytes per sample
    pub fn size(&self) -> usize {
        match self {
            SampleType::U8 => 1,
            SampleType::I16 | SampleType::U16 => 2,
            SampleType::F32 => 4,
        }
    }
}

/// Bands of one window, all sharing the window grid
#[derive(Debug, Clone, PartialEq)]
pub struct WindowData {
    /// Window position in the source image
    pub window: RasterWindow,
    /// Georeference of the window's top-left pixel
    pub transform: GeoTransform,
    /// One `height` x `width` matrix per band
    pub bands: Vec<Matrix<f32>>,
}

impl WindowData {
    /// Window height in pixels
    pub fn rows(&self) -> usize {
        self.window.height as usize
    }

    /// Window width in pixels
    pub fn cols(&self) -> usize {
        self.window.width as usize
    }
}

/// Georeferenced multi-band raster with windowed reads
pub trait ImageSource {
    /// EPSG code of the raster grid
    fn srid(&self) -> i32;

    /// Georeference of the full raster
    fn transform(&self) -> GeoTransform;

    /// Number of bands
    fn band_count(&self) -> usize;

    /// Raster width in pixels
    fn width(&self) -> u32;

    /// Raster height in pixels
    fn height(&self) -> u32;

    /// Stored sample encoding
    fn sample_type(&self) -> SampleType;

    /// Nodata sentinel declared by the source, if any
    fn nodata(&self) -> Option<f64> {
        None
    }

    /// Read all bands of `window`
    fn read(&mut self, window: &RasterWindow) -> ExtractResult<WindowData>;
}

/// Reject windows that do not fit the raster
pub(crate) fn check_window(window: &RasterWindow, width: u32, height: u32) -> ExtractResult<()> {
    if window.fits_within(width, height) {
        Ok(())
    } else {
        Err(ExtractError::GenericError(format!(
            "Window {:?} exceeds raster of {}x{} pixels", window, width, height
        )))
    }
}
