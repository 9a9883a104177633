//! Raster mask encoder
//!
//! Writes masks in the same layout the upstream producer emits, so parcel
//! tables can be populated locally and decoder behaviour can be pinned
//! down in tests.

use byteorder::{BigEndian, LittleEndian, WriteBytesExt};
use std::io::{self, Write};

use crate::coordinate::GeoTransform;
use crate::extractor::Matrix;
use crate::io::byte_order::ByteOrder;

use super::header::{HEADER_LENGTH, PIXEL_TYPE_U8};

/// Segment flag with the pixel type in the upper nibble
const SEGMENT_FLAG_U8: u8 = PIXEL_TYPE_U8 << 4;

/// Builder for binary parcel masks
#[derive(Debug, Clone)]
pub struct RasterMaskEncoder {
    byte_order: ByteOrder,
    transform: GeoTransform,
    srid: i32,
    bands: Vec<Matrix<u8>>,
}

impl RasterMaskEncoder {
    /// Start a little-endian mask on the given grid
    pub fn new(transform: GeoTransform, srid: i32) -> Self {
        RasterMaskEncoder {
            byte_order: ByteOrder::LittleEndian,
            transform,
            srid,
            bands: Vec::new(),
        }
    }

    /// Use a different byte order
    pub fn with_byte_order(mut self, byte_order: ByteOrder) -> Self {
        self.byte_order = byte_order;
        self
    }

    /// Append a band; all bands must share the first band's shape
    pub fn with_band(mut self, band: Matrix<u8>) -> Self {
        self.bands.push(band);
        self
    }

    /// Serialize the mask
    pub fn encode(&self) -> io::Result<Vec<u8>> {
        let (height, width) = match self.bands.first() {
            Some(first) => (first.rows(), first.cols()),
            None => (0, 0),
        };
        if self.bands.iter().any(|b| b.rows() != height || b.cols() != width) {
            return Err(io::Error::new(io::ErrorKind::InvalidInput, "Mask bands differ in shape"));
        }
        if width > u16::MAX as usize || height > u16::MAX as usize {
            return Err(io::Error::new(io::ErrorKind::InvalidInput, "Mask exceeds 65535 pixels per side"));
        }

        let mut buffer = Vec::with_capacity(HEADER_LENGTH + self.bands.len() * (2 + width * height));
        buffer.write_u8(self.byte_order.wkb_flag())?;
        match self.byte_order {
            ByteOrder::LittleEndian => self.write_header::<LittleEndian>(&mut buffer, width as u16, height as u16)?,
            ByteOrder::BigEndian => self.write_header::<BigEndian>(&mut buffer, width as u16, height as u16)?,
        }

        for band in &self.bands {
            buffer.write_u8(SEGMENT_FLAG_U8)?;
            buffer.write_u8(0)?; // nodata value
            buffer.write_all(band.as_slice())?;
        }

        Ok(buffer)
    }

    fn write_header<B: byteorder::ByteOrder>(&self, buffer: &mut Vec<u8>, width: u16, height: u16) -> io::Result<()> {
        buffer.write_u16::<B>(0)?; // version
        buffer.write_u16::<B>(self.bands.len() as u16)?;
        buffer.write_f64::<B>(self.transform.pixel_width)?;
        buffer.write_f64::<B>(self.transform.pixel_height)?;
        buffer.write_f64::<B>(self.transform.origin_x)?;
        buffer.write_f64::<B>(self.transform.origin_y)?;
        buffer.write_f64::<B>(0.0)?; // skew x
        buffer.write_f64::<B>(0.0)?; // skew y
        buffer.write_i32::<B>(self.srid)?;
        buffer.write_u16::<B>(width)?;
        buffer.write_u16::<B>(height)?;
        Ok(())
    }
}
