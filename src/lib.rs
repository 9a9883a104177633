pub mod io;
pub mod errors;
pub mod config;
pub mod coordinate;
pub mod extractor;
pub mod mask;
pub mod stats;
pub mod catalog;
pub mod storage;
pub mod source;
pub mod pipeline;
pub mod commands;
pub mod utils;

pub use errors::{DecodeError, ExtractError, ExtractResult};
pub use config::Config;
pub use catalog::{CardType, ImageStatus, JobCoordinator};
pub use mask::RasterMaskDecoder;
pub use stats::StatisticsAggregator;
pub use storage::ResultSink;
pub use pipeline::{ExtractionMode, ExtractionWorker, RunOutcome};
pub use coordinate::{BoundingBox, GeoTransform};
