//! Paged access to rasterized parcel masks
//!
//! Masks are stored per resolution/projection bucket, keyed by the spatial
//! reference id and the rounded pixel size. Pages are fetched with keyset
//! pagination on the parcel id so the full parcel set is never buffered.

use log::debug;
use rusqlite::{params, Connection};

use crate::config::Config;
use crate::coordinate::BoundingBox;
use crate::errors::ExtractResult;

use super::open_connection;

/// One stored parcel mask
#[derive(Debug, Clone, PartialEq)]
pub struct ParcelMaskRow {
    pub pid: i64,
    /// Binary mask blob
    pub rast: Vec<u8>,
}

/// Read access to the parcel mask table
pub struct ParcelStore {
    conn: Connection,
    table: String,
}

impl ParcelStore {
    /// Connect to the parcel table described by `config`
    pub fn open(config: &Config) -> ExtractResult<Self> {
        let conn = open_connection(&config.database)?;
        Self::with_connection(conn, &config.tables.parcels)
    }

    /// Use an existing connection; creates the parcel table if needed
    pub fn with_connection(conn: Connection, table: &str) -> ExtractResult<Self> {
        let store = ParcelStore {
            conn,
            table: table.to_string(),
        };
        store.conn.execute_batch(&format!(
            "CREATE TABLE IF NOT EXISTS {t} (
                pid     INTEGER NOT NULL,
                srid    INTEGER NOT NULL,
                dx      INTEGER NOT NULL,
                minx    REAL NOT NULL,
                miny    REAL NOT NULL,
                maxx    REAL NOT NULL,
                maxy    REAL NOT NULL,
                rast    BLOB NOT NULL,
                PRIMARY KEY (srid, dx, pid)
            );",
            t = store.table
        ))?;
        Ok(store)
    }

    /// Store a mask for parcel `pid` in bucket (`srid`, `dx`)
    pub fn insert_mask(&self, pid: i64, srid: i32, dx: i64, envelope: &BoundingBox, rast: &[u8]) -> ExtractResult<()> {
        self.conn.execute(
            &format!(
                "INSERT OR REPLACE INTO {} (pid, srid, dx, minx, miny, maxx, maxy, rast)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                self.table
            ),
            params![pid, srid, dx, envelope.min_x, envelope.min_y, envelope.max_x, envelope.max_y, rast],
        )?;
        Ok(())
    }

    /// Envelope of the bucket's parcels overlapping `extent`
    pub fn selection_extent(&self, srid: i32, dx: i64, extent: &BoundingBox) -> ExtractResult<Option<BoundingBox>> {
        let bounds: (Option<f64>, Option<f64>, Option<f64>, Option<f64>) = self.conn.query_row(
            &format!(
                "SELECT MIN(minx), MIN(miny), MAX(maxx), MAX(maxy) FROM {}
                 WHERE srid = ?1 AND dx = ?2 AND maxx >= ?3 AND minx <= ?5 AND maxy >= ?4 AND miny <= ?6",
                self.table
            ),
            params![srid, dx, extent.min_x, extent.min_y, extent.max_x, extent.max_y],
            |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?)),
        )?;

        match bounds {
            (Some(min_x), Some(min_y), Some(max_x), Some(max_y)) => {
                Ok(Some(BoundingBox::new(min_x, min_y, max_x, max_y)))
            }
            _ => Ok(None),
        }
    }

    /// Number of the bucket's parcels overlapping `extent`
    pub fn count(&self, srid: i32, dx: i64, extent: &BoundingBox) -> ExtractResult<u64> {
        let count: i64 = self.conn.query_row(
            &format!(
                "SELECT COUNT(*) FROM {}
                 WHERE srid = ?1 AND dx = ?2 AND maxx >= ?3 AND minx <= ?5 AND maxy >= ?4 AND miny <= ?6",
                self.table
            ),
            params![srid, dx, extent.min_x, extent.min_y, extent.max_x, extent.max_y],
            |row| row.get(0),
        )?;
        Ok(count.max(0) as u64)
    }

    /// Next page of masks with a parcel id above `after_pid`
    pub fn next_page(&self, srid: i32, dx: i64, extent: &BoundingBox,
                     after_pid: Option<i64>, page_size: usize) -> ExtractResult<Vec<ParcelMaskRow>> {
        let mut stmt = self.conn.prepare_cached(&format!(
            "SELECT pid, rast FROM {}
             WHERE srid = ?1 AND dx = ?2 AND maxx >= ?3 AND minx <= ?5 AND maxy >= ?4 AND miny <= ?6
               AND pid > ?7
             ORDER BY pid LIMIT ?8",
            self.table
        ))?;

        let rows = stmt.query_map(
            params![
                srid, dx, extent.min_x, extent.min_y, extent.max_x, extent.max_y,
                after_pid.unwrap_or(i64::MIN), page_size as i64
            ],
            |row| Ok(ParcelMaskRow { pid: row.get(0)?, rast: row.get(1)? }),
        )?;

        let mut page = Vec::with_capacity(page_size);
        for row in rows {
            page.push(row?);
        }
        debug!("Fetched {} parcel masks after {:?}", page.len(), after_pid);
        Ok(page)
    }
}
