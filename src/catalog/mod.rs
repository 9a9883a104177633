//! Catalog images and the job coordinator
//!
//! Workers share one catalog table. The only concurrency control is the
//! conditional status update performed by [`JobCoordinator`]: a transition
//! succeeds only if the row still carries the expected prior status.

mod card;
mod status;
mod image;
mod coordinator;
#[cfg(test)]
mod tests;

pub use card::CardType;
pub use status::ImageStatus;
pub use image::{CatalogImage, ImageHandle, NewImage, TimeRange};
pub use coordinator::JobCoordinator;
