//! Fixed-offset mask header

use crate::coordinate::GeoTransform;
use crate::io::byte_order::ByteOrder;

/// Length of the header in bytes
pub const HEADER_LENGTH: usize = 61;

/// Pixel type code for unsigned 8-bit samples (upper nibble of a segment flag)
pub const PIXEL_TYPE_U8: u8 = 4;

/// Decoded mask header
///
/// Layout: endianness (1), version (2), band count (2), scale x/y (8 each),
/// origin x/y (8 each), skew x/y (8 each), srid (4), width (2), height (2).
#[derive(Debug, Clone, PartialEq)]
pub struct MaskHeader {
    pub byte_order: ByteOrder,
    pub version: u16,
    pub band_count: u16,
    pub scale_x: f64,
    pub scale_y: f64,
    pub origin_x: f64,
    pub origin_y: f64,
    pub skew_x: f64,
    pub skew_y: f64,
    pub srid: i32,
    pub width: u16,
    pub height: u16,
}

impl MaskHeader {
    /// Georeference of the mask grid
    pub fn transform(&self) -> GeoTransform {
        GeoTransform::new(self.origin_x, self.origin_y, self.scale_x, self.scale_y)
    }

    /// Samples per band
    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }
}
