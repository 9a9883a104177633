//! Bounding box structure for defining regions

/// An axis-aligned bounding box in a coordinate system
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    /// Minimum X coordinate
    pub min_x: f64,
    /// Minimum Y coordinate
    pub min_y: f64,
    /// Maximum X coordinate
    pub max_x: f64,
    /// Maximum Y coordinate
    pub max_y: f64,
}

impl BoundingBox {
    /// Create a new bounding box
    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        BoundingBox {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    /// Create a bounding box from a `[minx, miny, maxx, maxy]` array
    pub fn from_array(values: [f64; 4]) -> Self {
        BoundingBox::new(values[0], values[1], values[2], values[3])
    }

    /// Envelope overlap test (touching edges count as overlap)
    pub fn intersects(&self, other: &BoundingBox) -> bool {
        self.min_x <= other.max_x && self.max_x >= other.min_x &&
            self.min_y <= other.max_y && self.max_y >= other.min_y
    }

    /// Clip this box to `bounds`
    ///
    /// Returns `None` when the boxes do not overlap.
    pub fn clip_to(&self, bounds: &BoundingBox) -> Option<BoundingBox> {
        if !self.intersects(bounds) {
            return None;
        }

        Some(BoundingBox::new(
            self.min_x.max(bounds.min_x),
            self.min_y.max(bounds.min_y),
            self.max_x.min(bounds.max_x),
            self.max_y.min(bounds.max_y),
        ))
    }
}
