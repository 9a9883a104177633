//! I/O utilities for binary decoding
//!
//! This module provides the reader trait and byte order strategies shared by
//! the mask decoder and the raw raster sources.

pub mod seekable;
pub mod byte_order;
