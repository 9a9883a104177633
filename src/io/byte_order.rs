//! Byte order handling for binary rasters
//!
//! This module implements the Strategy pattern for handling different
//! byte orders (little-endian vs big-endian) when reading mask blobs
//! and raw band files.

use byteorder::{BigEndian, LittleEndian, ReadBytesExt};
use std::io::Result;

use crate::errors::DecodeError;
use crate::io::seekable::SeekableReader;

/// Represents the byte order of a binary payload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ByteOrder {
    /// Little-endian byte order (NDR)
    LittleEndian,
    /// Big-endian byte order (XDR)
    BigEndian,
}

impl ByteOrder {
    /// Detects the byte order from the leading flag of a raster mask blob
    pub fn detect(reader: &mut dyn SeekableReader) -> std::result::Result<Self, DecodeError> {
        let flag = reader.read_u8().map_err(|_| DecodeError::Truncated { needed: 1, available: 0 })?;
        Self::from_wkb_flag(flag)
    }

    /// Maps a WKB endianness flag (0 = XDR, 1 = NDR)
    pub fn from_wkb_flag(flag: u8) -> std::result::Result<Self, DecodeError> {
        match flag {
            0 => Ok(ByteOrder::BigEndian),
            1 => Ok(ByteOrder::LittleEndian),
            other => Err(DecodeError::InvalidEndianness(other)),
        }
    }

    /// Maps the ENVI header `byte order` value (0 = little, 1 = big)
    pub fn from_envi(value: u8) -> Option<Self> {
        match value {
            0 => Some(ByteOrder::LittleEndian),
            1 => Some(ByteOrder::BigEndian),
            _ => None,
        }
    }

    /// WKB endianness flag for this byte order
    pub fn wkb_flag(&self) -> u8 {
        match self {
            ByteOrder::LittleEndian => 1,
            ByteOrder::BigEndian => 0,
        }
    }

    /// Creates the appropriate handler for this byte order
    pub fn create_handler(&self) -> Box<dyn ByteOrderHandler> {
        match self {
            ByteOrder::LittleEndian => Box::new(LittleEndianHandler),
            ByteOrder::BigEndian => Box::new(BigEndianHandler),
        }
    }
}

/// Trait for byte order handling strategies
pub trait ByteOrderHandler: Send + Sync {
    /// Read a u16 value
    fn read_u16(&self, reader: &mut dyn SeekableReader) -> Result<u16>;

    /// Read an i16 value
    fn read_i16(&self, reader: &mut dyn SeekableReader) -> Result<i16>;

    /// Read an i32 value
    fn read_i32(&self, reader: &mut dyn SeekableReader) -> Result<i32>;

    /// Read an f32 value
    fn read_f32(&self, reader: &mut dyn SeekableReader) -> Result<f32>;

    /// Read an f64 value
    fn read_f64(&self, reader: &mut dyn SeekableReader) -> Result<f64>;
}

/// Little-endian byte order handler
pub struct LittleEndianHandler;

impl ByteOrderHandler for LittleEndianHandler {
    fn read_u16(&self, reader: &mut dyn SeekableReader) -> Result<u16> {
        reader.read_u16::<LittleEndian>()
    }

    fn read_i16(&self, reader: &mut dyn SeekableReader) -> Result<i16> {
        reader.read_i16::<LittleEndian>()
    }

    fn read_i32(&self, reader: &mut dyn SeekableReader) -> Result<i32> {
        reader.read_i32::<LittleEndian>()
    }

    fn read_f32(&self, reader: &mut dyn SeekableReader) -> Result<f32> {
        reader.read_f32::<LittleEndian>()
    }

    fn read_f64(&self, reader: &mut dyn SeekableReader) -> Result<f64> {
        reader.read_f64::<LittleEndian>()
    }
}

/// Big-endian byte order handler
pub struct BigEndianHandler;

impl ByteOrderHandler for BigEndianHandler {
    fn read_u16(&self, reader: &mut dyn SeekableReader) -> Result<u16> {
        reader.read_u16::<BigEndian>()
    }

    fn read_i16(&self, reader: &mut dyn SeekableReader) -> Result<i16> {
        reader.read_i16::<BigEndian>()
    }

    fn read_i32(&self, reader: &mut dyn SeekableReader) -> Result<i32> {
        reader.read_i32::<BigEndian>()
    }

    fn read_f32(&self, reader: &mut dyn SeekableReader) -> Result<f32> {
        reader.read_f32::<BigEndian>()
    }

    fn read_f64(&self, reader: &mut dyn SeekableReader) -> Result<f64> {
        reader.read_f64::<BigEndian>()
    }
}
