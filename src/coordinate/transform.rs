//! Affine georeference of a north-up raster

use super::bbox::BoundingBox;

/// North-up affine transform: upper-left origin and pixel size
///
/// `pixel_height` follows the GDAL convention and is normally negative.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoTransform {
    /// X coordinate of the upper-left corner
    pub origin_x: f64,
    /// Y coordinate of the upper-left corner
    pub origin_y: f64,
    /// Pixel width in map units
    pub pixel_width: f64,
    /// Pixel height in map units (negative for north-up)
    pub pixel_height: f64,
}

impl GeoTransform {
    /// Create a transform from origin and pixel size
    pub fn new(origin_x: f64, origin_y: f64, pixel_width: f64, pixel_height: f64) -> Self {
        GeoTransform {
            origin_x,
            origin_y,
            pixel_width,
            pixel_height,
        }
    }

    /// Pixel size rounded to whole map units
    ///
    /// Parcel masks are bucketed by this value.
    pub fn rounded_pixel_size(&self) -> i64 {
        self.pixel_width.abs().round() as i64
    }

    /// Geographic extent of a `width` x `height` raster on this grid
    pub fn extent(&self, width: u32, height: u32) -> BoundingBox {
        let x_end = self.origin_x + width as f64 * self.pixel_width.abs();
        let y_end = self.origin_y - height as f64 * self.pixel_height.abs();
        BoundingBox::new(self.origin_x, y_end, x_end, self.origin_y)
    }

    /// Transform for a sub-window starting at pixel (`x`, `y`)
    pub fn shifted(&self, x: u32, y: u32) -> GeoTransform {
        GeoTransform::new(
            self.origin_x + x as f64 * self.pixel_width.abs(),
            self.origin_y - y as f64 * self.pixel_height.abs(),
            self.pixel_width,
            self.pixel_height,
        )
    }
}
