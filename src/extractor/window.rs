//! Raster window structure for bounded reads
//!
//! A window is the rectangular pixel sub-region of an image that is actually
//! read into memory. The coordinates are in pixels and follow the usual
//! image convention where (0,0) is the top-left corner of the image.

/// Rectangular pixel window of a source image
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RasterWindow {
    /// X-coordinate of the top-left corner (pixels from left)
    pub x: u32,

    /// Y-coordinate of the top-left corner (pixels from top)
    pub y: u32,

    /// Width of the window in pixels
    pub width: u32,

    /// Height of the window in pixels
    pub height: u32,
}

impl RasterWindow {
    /// Create a new window
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        RasterWindow { x, y, width, height }
    }

    /// Window covering a whole `width` x `height` image
    pub fn full(width: u32, height: u32) -> Self {
        RasterWindow::new(0, 0, width, height)
    }

    /// Get the rightmost X coordinate (exclusive)
    pub fn end_x(&self) -> u32 {
        self.x + self.width
    }

    /// Get the bottommost Y coordinate (exclusive)
    pub fn end_y(&self) -> u32 {
        self.y + self.height
    }

    /// Number of pixels in the window
    pub fn area(&self) -> u64 {
        self.width as u64 * self.height as u64
    }

    /// True when the window has no pixels
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// True when the window lies within a `width` x `height` image
    pub fn fits_within(&self, width: u32, height: u32) -> bool {
        self.end_x() <= width && self.end_y() <= height
    }
}
