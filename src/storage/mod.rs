//! SQLite persistence for parcel masks and extraction results
//!
//! Every component opens its own connection from the shared configuration,
//! so several worker processes can run against one database file.

mod records;
mod parcels;
mod sink;
#[cfg(test)]
mod tests;

pub use records::{HistRecord, ResultRecord, StatRecord};
pub use parcels::{ParcelMaskRow, ParcelStore};
pub use sink::{BatchOutcome, ResultSink};

use log::debug;
use rusqlite::Connection;
use std::time::Duration;

use crate::config::DatabaseConfig;
use crate::errors::{ExtractError, ExtractResult};

/// Open a connection to the catalog database
///
/// Failures to open are reported as connection failures: the worker cannot
/// do anything for the current image without storage.
pub fn open_connection(config: &DatabaseConfig) -> ExtractResult<Connection> {
    let conn = Connection::open(&config.path).map_err(|e| {
        ExtractError::ConnectionFailure(format!("{}: {}", config.path.display(), e))
    })?;
    conn.busy_timeout(Duration::from_millis(config.busy_timeout_ms))?;
    debug!("Opened database {}", config.path.display());
    Ok(conn)
}

/// True when a SQLite error is a primary key or unique constraint violation
pub(crate) fn is_unique_violation(error: &rusqlite::Error) -> bool {
    match error {
        rusqlite::Error::SqliteFailure(e, _) => {
            e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE ||
                e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_PRIMARYKEY
        }
        _ => false,
    }
}
