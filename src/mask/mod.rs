//! Binary parcel raster mask format
//!
//! Parcel masks are produced upstream as well-known-binary rasters: a fixed
//! 61 byte header followed by one segment per band. This module decodes
//! them into a georeference plus band matrices, and encodes them for
//! producers and tests.

pub mod header;
pub mod decoder;
pub mod encoder;
#[cfg(test)]
mod tests;

pub use header::{MaskHeader, HEADER_LENGTH, PIXEL_TYPE_U8};
pub use decoder::{RasterMask, RasterMaskDecoder};
pub use encoder::RasterMaskEncoder;
