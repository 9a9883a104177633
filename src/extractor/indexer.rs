//! Mapping of parcel mask pixels into window pixel space

use log::debug;

use crate::coordinate::GeoTransform;

use super::matrix::Matrix;
use super::planner::snap_to_grid;

/// Window-relative pixel positions selected by one parcel mask
///
/// `rows` and `cols` always have the same length. The same selection is
/// reused for every band of the image.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PixelSelection {
    /// Row index of each selected pixel
    pub rows: Vec<u32>,
    /// Column index of each selected pixel
    pub cols: Vec<u32>,
}

impl PixelSelection {
    /// Number of selected pixels
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// True when no pixel of the mask falls inside the window
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Band values at the selected positions, widened for aggregation
    pub fn values_of(&self, band: &Matrix<f32>) -> Vec<f64> {
        band.gather(&self.rows, &self.cols)
            .into_iter()
            .map(|v| v as f64)
            .collect()
    }
}

/// Converts mask pixel positions into window pixel coordinates
#[derive(Debug, Default, Clone, Copy)]
pub struct PixelIndexer;

impl PixelIndexer {
    /// Create a new indexer
    pub fn new() -> Self {
        PixelIndexer
    }

    /// Compute the window positions of every selected mask pixel
    ///
    /// The mask origin is expressed as a whole row/column offset from the
    /// window origin, using the window's pixel size. Positions falling outside
    /// `window_rows` x `window_cols` are dropped: masks routinely straddle the
    /// window edge, so this is not an error.
    ///
    /// # Arguments
    /// * `mask` - Georeference of the parcel mask
    /// * `selection` - Mask pixels belonging to the parcel
    /// * `window` - Georeference of the window that was read
    /// * `window_rows` - Window height in pixels
    /// * `window_cols` - Window width in pixels
    pub fn indices(&self, mask: &GeoTransform, selection: &Matrix<bool>,
                   window: &GeoTransform, window_rows: usize, window_cols: usize) -> PixelSelection {
        let dx = window.pixel_width.abs();
        let dy = window.pixel_height.abs();

        if (mask.pixel_width.abs() - dx).abs() > 1e-6 * dx {
            debug!("Mask pixel size {} differs from window pixel size {}", mask.pixel_width, dx);
        }

        let row_offset = snap_to_grid((window.origin_y - mask.origin_y) / dy).floor() as i64;
        let col_offset = snap_to_grid((mask.origin_x - window.origin_x) / dx).floor() as i64;

        let mut result = PixelSelection::default();
        for row in 0..selection.rows() {
            let target_row = row as i64 + row_offset;
            if target_row < 0 || target_row >= window_rows as i64 {
                continue;
            }
            for col in 0..selection.cols() {
                if selection.get(row, col) != Some(true) {
                    continue;
                }
                let target_col = col as i64 + col_offset;
                if target_col < 0 || target_col >= window_cols as i64 {
                    continue;
                }
                result.rows.push(target_row as u32);
                result.cols.push(target_col as u32);
            }
        }

        result
    }
}
