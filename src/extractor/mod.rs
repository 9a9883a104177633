//! Window planning and pixel indexing
//!
//! This module bounds the I/O for one image to the window covering the
//! parcel selection, and maps parcel masks into that window.

mod matrix;
mod window;
mod planner;
mod indexer;
#[cfg(test)]
mod tests;

// Public exports
pub use matrix::Matrix;
pub use window::RasterWindow;
pub use planner::WindowPlanner;
pub use indexer::{PixelIndexer, PixelSelection};
