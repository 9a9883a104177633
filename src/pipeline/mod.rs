//! Per-image extraction pipeline
//!
//! Ties the job coordinator, image sources, parcel masks, aggregation and
//! the result sink together into one claim-process-complete cycle.

mod provider;
mod worker;
#[cfg(test)]
mod tests;

pub use provider::{EnviTemplateProvider, SourceProvider};
pub use worker::{ExtractionMode, ExtractionWorker, RunOutcome};
