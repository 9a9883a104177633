//! Raster mask decoder
//!
//! Decodes the header with the byte order announced by the blob itself and
//! slices the band segments. Only unsigned 8-bit segments are supported; any
//! other pixel type aborts the decode, since the segment stride would be
//! wrong and every following band would be misread.

use log::debug;
use std::io::Cursor;

use crate::coordinate::GeoTransform;
use crate::errors::DecodeError;
use crate::extractor::Matrix;
use crate::io::byte_order::{ByteOrder, ByteOrderHandler};
use crate::io::seekable::SeekableReader;

use super::header::{MaskHeader, HEADER_LENGTH, PIXEL_TYPE_U8};

/// A decoded parcel mask
#[derive(Debug, Clone, PartialEq)]
pub struct RasterMask {
    /// Header fields
    pub header: MaskHeader,
    /// One matrix per band, `height` rows by `width` columns
    pub bands: Vec<Matrix<u8>>,
}

impl RasterMask {
    /// Georeference of the mask
    pub fn transform(&self) -> GeoTransform {
        self.header.transform()
    }

    /// Pixels of the first band equal to 1, the parcel's own pixels
    pub fn selection(&self) -> Option<Matrix<bool>> {
        self.bands.first().map(|band| band.map(|v| v == 1))
    }
}

/// Decoder for binary parcel masks
#[derive(Debug, Default, Clone, Copy)]
pub struct RasterMaskDecoder;

impl RasterMaskDecoder {
    /// Create a new decoder
    pub fn new() -> Self {
        RasterMaskDecoder
    }

    /// Decode a complete mask blob
    pub fn decode(&self, bytes: &[u8]) -> Result<RasterMask, DecodeError> {
        let header = self.decode_header(bytes)?;
        let pixel_count = header.pixel_count();

        let mut bands = Vec::with_capacity(header.band_count as usize);
        let mut offset = HEADER_LENGTH;
        for band in 0..header.band_count {
            // flag byte + nodata byte + samples
            let segment_end = offset + 2 + pixel_count;
            if bytes.len() < segment_end {
                return Err(DecodeError::Truncated { needed: segment_end, available: bytes.len() });
            }

            let pixel_type = bytes[offset] >> 4;
            if pixel_type != PIXEL_TYPE_U8 {
                debug!("Band {} has pixel type {}", band, pixel_type);
                return Err(DecodeError::UnsupportedPixelType(pixel_type));
            }

            let samples = bytes[offset + 2..segment_end].to_vec();
            let matrix = Matrix::from_vec(header.height as usize, header.width as usize, samples)
                .ok_or(DecodeError::Truncated { needed: segment_end, available: bytes.len() })?;
            bands.push(matrix);
            offset = segment_end;
        }

        Ok(RasterMask { header, bands })
    }

    /// Decode only the 61 byte header
    pub fn decode_header(&self, bytes: &[u8]) -> Result<MaskHeader, DecodeError> {
        if bytes.len() < HEADER_LENGTH {
            return Err(DecodeError::Truncated { needed: HEADER_LENGTH, available: bytes.len() });
        }

        let mut cursor = Cursor::new(&bytes[..HEADER_LENGTH]);
        let byte_order = ByteOrder::detect(&mut cursor)?;
        let handler = byte_order.create_handler();

        self.read_fields(byte_order, handler.as_ref(), &mut cursor)
            .map_err(|_| DecodeError::Truncated { needed: HEADER_LENGTH, available: bytes.len() })
    }

    fn read_fields(&self, byte_order: ByteOrder, handler: &dyn ByteOrderHandler,
                   reader: &mut dyn SeekableReader) -> std::io::Result<MaskHeader> {
        Ok(MaskHeader {
            byte_order,
            version: handler.read_u16(reader)?,
            band_count: handler.read_u16(reader)?,
            scale_x: handler.read_f64(reader)?,
            scale_y: handler.read_f64(reader)?,
            origin_x: handler.read_f64(reader)?,
            origin_y: handler.read_f64(reader)?,
            skew_x: handler.read_f64(reader)?,
            skew_y: handler.read_f64(reader)?,
            srid: handler.read_i32(reader)?,
            width: handler.read_u16(reader)?,
            height: handler.read_u16(reader)?,
        })
    }
}
