//! Window planning for bounded raster reads
//!
//! Full images may be hundreds of megabytes or more, while a parcel selection
//! usually covers a fraction of the footprint. The planner converts the
//! selection envelope into the smallest pixel window that covers it so only
//! that window has to be read.

use log::debug;

use crate::coordinate::{BoundingBox, GeoTransform};

use super::window::RasterWindow;

/// Offsets closer than this to a whole pixel are treated as on the grid
const GRID_TOLERANCE: f64 = 1e-6;

/// Snap a fractional pixel offset onto the grid when it is within tolerance
///
/// Map coordinates that sit exactly on a pixel edge come out of the division
/// as e.g. 2.9999999997; without snapping floor() would lose a pixel.
pub(crate) fn snap_to_grid(value: f64) -> f64 {
    let nearest = value.round();
    if (value - nearest).abs() < GRID_TOLERANCE {
        nearest
    } else {
        value
    }
}

/// Computes the minimal image window covering a parcel selection
#[derive(Debug, Default, Clone, Copy)]
pub struct WindowPlanner;

impl WindowPlanner {
    /// Create a new planner
    pub fn new() -> Self {
        WindowPlanner
    }

    /// Plan the window for `selection` on an image with the given grid
    ///
    /// The selection is first clipped to the image extent, then its corners
    /// are converted to pixel offsets relative to the image origin: floor for
    /// the upper-left corner, ceil for the lower-right one. The result always
    /// lies inside the image; a selection that misses the image yields an
    /// empty window.
    ///
    /// # Arguments
    /// * `transform` - Georeference of the full image
    /// * `image_width` - Image width in pixels
    /// * `image_height` - Image height in pixels
    /// * `selection` - Envelope of the parcel selection in the image CRS
    pub fn plan(&self, transform: &GeoTransform, image_width: u32, image_height: u32,
                selection: &BoundingBox) -> RasterWindow {
        let image_extent = transform.extent(image_width, image_height);

        let clipped = match selection.clip_to(&image_extent) {
            Some(bbox) => bbox,
            None => {
                debug!("Selection {:?} misses image extent {:?}", selection, image_extent);
                return RasterWindow::new(0, 0, 0, 0);
            }
        };

        let dx = transform.pixel_width.abs();
        let dy = transform.pixel_height.abs();

        let x0 = snap_to_grid((clipped.min_x - transform.origin_x) / dx).floor().max(0.0);
        let y0 = snap_to_grid((transform.origin_y - clipped.max_y) / dy).floor().max(0.0);
        let x1 = snap_to_grid((clipped.max_x - transform.origin_x) / dx).ceil().min(image_width as f64);
        let y1 = snap_to_grid((transform.origin_y - clipped.min_y) / dy).ceil().min(image_height as f64);

        let x = x0 as u32;
        let y = y0 as u32;
        let width = (x1 - x0).max(0.0) as u32;
        let height = (y1 - y0).max(0.0) as u32;

        let window = RasterWindow::new(x, y, width, height);
        debug!("Planned window {:?} ({} of {} pixels)", window, window.area(),
               image_width as u64 * image_height as u64);
        window
    }
}
