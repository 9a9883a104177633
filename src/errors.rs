//! Custom error types for parcel extraction

use std::fmt;
use std::io;

/// Errors raised while decoding a binary parcel mask
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// Blob ended before the expected number of bytes
    Truncated { needed: usize, available: usize },
    /// Endianness flag was neither 0 (XDR) nor 1 (NDR)
    InvalidEndianness(u8),
    /// Band segment uses a pixel type other than unsigned 8-bit
    UnsupportedPixelType(u8),
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodeError::Truncated { needed, available } => {
                write!(f, "Truncated mask: need {} bytes, have {}", needed, available)
            }
            DecodeError::InvalidEndianness(flag) => write!(f, "Invalid endianness flag: {}", flag),
            DecodeError::UnsupportedPixelType(code) => write!(f, "Unsupported pixel type code: {}", code),
        }
    }
}

impl std::error::Error for DecodeError {}

/// Extraction error types
#[derive(Debug)]
pub enum ExtractError {
    /// I/O error
    IoError(io::Error),
    /// Storage could not be opened or reached
    ConnectionFailure(String),
    /// Any other persistence failure
    Storage(rusqlite::Error),
    /// Expected band or source file is absent
    ResourceMissing(String),
    /// Malformed parcel mask
    Decode(DecodeError),
    /// A conditional status transition affected no row
    ConcurrencyConflict { image_id: i64 },
    /// Result row already persisted
    DuplicateKeyConflict(String),
    /// Status change not allowed by the transition table
    InvalidTransition { from: String, to: String },
    /// Image sample encoding not usable for the requested operation
    UnsupportedSampleType(String),
    /// Invalid configuration
    Config(String),
    /// Generic error with message
    GenericError(String),
}

impl ExtractError {
    /// Short reason recorded in the catalog when this error ends an image
    pub fn diagnostic(&self) -> String {
        match self {
            ExtractError::IoError(_) => "io error".to_string(),
            ExtractError::ConnectionFailure(_) => "connection failure".to_string(),
            ExtractError::Storage(_) => "storage error".to_string(),
            ExtractError::ResourceMissing(what) => format!("missing resource {}", what),
            ExtractError::Decode(_) => "decode error".to_string(),
            ExtractError::ConcurrencyConflict { .. } => "concurrency conflict".to_string(),
            ExtractError::DuplicateKeyConflict(_) => "duplicate key".to_string(),
            ExtractError::InvalidTransition { .. } => "invalid transition".to_string(),
            ExtractError::UnsupportedSampleType(_) => "unsupported sample type".to_string(),
            ExtractError::Config(_) => "config error".to_string(),
            ExtractError::GenericError(_) => "extraction error".to_string(),
        }
    }
}

impl fmt::Display for ExtractError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExtractError::IoError(e) => write!(f, "I/O error: {}", e),
            ExtractError::ConnectionFailure(msg) => write!(f, "Connection failure: {}", msg),
            ExtractError::Storage(e) => write!(f, "Storage error: {}", e),
            ExtractError::ResourceMissing(what) => write!(f, "Resource missing: {}", what),
            ExtractError::Decode(e) => write!(f, "Decode error: {}", e),
            ExtractError::ConcurrencyConflict { image_id } => {
                write!(f, "Status of image {} changed concurrently", image_id)
            }
            ExtractError::DuplicateKeyConflict(key) => write!(f, "Duplicate result key: {}", key),
            ExtractError::InvalidTransition { from, to } => {
                write!(f, "Invalid status transition: {} -> {}", from, to)
            }
            ExtractError::UnsupportedSampleType(t) => write!(f, "Unsupported sample type: {}", t),
            ExtractError::Config(msg) => write!(f, "Configuration error: {}", msg),
            ExtractError::GenericError(msg) => write!(f, "Extraction error: {}", msg),
        }
    }
}

impl std::error::Error for ExtractError {}

impl From<io::Error> for ExtractError {
    fn from(error: io::Error) -> Self {
        ExtractError::IoError(error)
    }
}

impl From<rusqlite::Error> for ExtractError {
    fn from(error: rusqlite::Error) -> Self {
        ExtractError::Storage(error)
    }
}

impl From<DecodeError> for ExtractError {
    fn from(error: DecodeError) -> Self {
        ExtractError::Decode(error)
    }
}

impl From<toml::de::Error> for ExtractError {
    fn from(error: toml::de::Error) -> Self {
        ExtractError::Config(error.to_string())
    }
}

impl From<serde_json::Error> for ExtractError {
    fn from(error: serde_json::Error) -> Self {
        ExtractError::GenericError(format!("JSON error: {}", error))
    }
}

impl From<String> for ExtractError {
    fn from(msg: String) -> Self {
        ExtractError::GenericError(msg)
    }
}

/// Result type for extraction operations
pub type ExtractResult<T> = Result<T, ExtractError>;
