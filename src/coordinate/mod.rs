//! Coordinate handling for georeferenced rasters
//!
//! This module provides the geographic primitives shared by the window
//! planner, the pixel indexer and the catalog filters.

mod bbox;
mod transform;

// Re-export key types
pub use self::bbox::BoundingBox;
pub use self::transform::GeoTransform;
