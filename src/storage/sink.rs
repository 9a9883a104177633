//! Batched persistence of result records
//!
//! The worker hands over the records of one parcel page at a time and each
//! page is written in a single transaction. Rows whose key already exists
//! are logged and skipped so an image can be re-run safely; any other
//! failure rolls the page back and is returned to the caller.

use log::{debug, warn};
use rusqlite::{params, Connection};

use crate::config::Config;
use crate::errors::{ExtractError, ExtractResult};

use super::is_unique_violation;
use super::open_connection;
use super::records::ResultRecord;

/// Counts for one written page
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchOutcome {
    /// Rows inserted
    pub written: usize,
    /// Rows skipped because their key already existed
    pub duplicates: usize,
}

/// Writes statistics and histogram rows
pub struct ResultSink {
    conn: Connection,
    results_table: String,
    hists_table: String,
    total_written: usize,
}

impl ResultSink {
    /// Connect to the result tables described by `config`
    pub fn open(config: &Config) -> ExtractResult<Self> {
        let conn = open_connection(&config.database)?;
        Self::with_connection(conn, &config.tables.results, &config.tables.hists)
    }

    /// Use an existing connection; creates the result tables if needed
    pub fn with_connection(conn: Connection, results_table: &str, hists_table: &str) -> ExtractResult<Self> {
        let sink = ResultSink {
            conn,
            results_table: results_table.to_string(),
            hists_table: hists_table.to_string(),
            total_written: 0,
        };
        sink.init_schema()?;
        Ok(sink)
    }

    fn init_schema(&self) -> ExtractResult<()> {
        self.conn.execute_batch(&format!(
            "CREATE TABLE IF NOT EXISTS {r} (
                pid     INTEGER NOT NULL,
                obsid   INTEGER NOT NULL,
                band    TEXT NOT NULL,
                count   INTEGER NOT NULL,
                mean    REAL,
                std     REAL,
                min     REAL,
                max     REAL,
                p25     REAL,
                p50     REAL,
                p75     REAL,
                PRIMARY KEY (pid, obsid, band)
            );
            CREATE TABLE IF NOT EXISTS {h} (
                pid     INTEGER NOT NULL,
                obsid   INTEGER NOT NULL,
                hist    TEXT NOT NULL,
                PRIMARY KEY (pid, obsid)
            );",
            r = self.results_table,
            h = self.hists_table
        ))?;
        Ok(())
    }

    /// Rows written by this sink so far
    pub fn total_written(&self) -> usize {
        self.total_written
    }

    /// Write one page of records in a single transaction
    pub fn append_batch(&mut self, records: Vec<ResultRecord>) -> ExtractResult<BatchOutcome> {
        let mut outcome = BatchOutcome::default();
        if records.is_empty() {
            return Ok(outcome);
        }

        let stat_sql = format!(
            "INSERT INTO {} (pid, obsid, band, count, mean, std, min, max, p25, p50, p75)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
            self.results_table
        );
        let hist_sql = format!("INSERT INTO {} (pid, obsid, hist) VALUES (?1, ?2, ?3)", self.hists_table);

        let tx = self.conn.transaction()?;
        {
            let mut stat_stmt = tx.prepare_cached(&stat_sql)?;
            let mut hist_stmt = tx.prepare_cached(&hist_sql)?;

            for record in &records {
                let result = match record {
                    ResultRecord::Stat(r) => stat_stmt.execute(params![
                        r.pid, r.obsid, r.band, r.count, r.mean, r.std, r.min, r.max, r.p25, r.p50, r.p75
                    ]),
                    ResultRecord::Hist(r) => hist_stmt.execute(params![r.pid, r.obsid, r.histogram_json()?]),
                };

                match result {
                    Ok(_) => outcome.written += 1,
                    Err(e) if is_unique_violation(&e) => {
                        warn!("{}", ExtractError::DuplicateKeyConflict(record.key()));
                        outcome.duplicates += 1;
                    }
                    Err(e) => return Err(ExtractError::Storage(e)),
                }
            }
        }
        tx.commit()?;

        self.total_written += outcome.written;
        debug!("Wrote {} records, skipped {} duplicates", outcome.written, outcome.duplicates);
        Ok(outcome)
    }
}
