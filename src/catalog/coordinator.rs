//! Claim-based job coordination over the shared catalog table

use log::{debug, info, warn};
use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::config::Config;
use crate::coordinate::BoundingBox;
use crate::errors::{ExtractError, ExtractResult};
use crate::storage::open_connection;

use super::card::CardType;
use super::image::{CatalogImage, ImageHandle, NewImage, TimeRange};
use super::status::ImageStatus;

/// Shared WHERE fragment for card, footprint overlap and acquisition time
///
/// Parameters: ?1 card, ?2..?5 filter envelope, ?6 start, ?7 end.
const FILTER_SQL: &str = "card = ?1 \
    AND maxx >= ?2 AND minx <= ?4 AND maxy >= ?3 AND miny <= ?5 \
    AND (?6 IS NULL OR obstime >= ?6) AND (?7 IS NULL OR obstime <= ?7)";

/// One select-and-update round of `claim`
enum ClaimAttempt {
    Claimed(ImageHandle),
    /// Another worker moved the candidate first
    Lost(i64),
    NoCandidate,
}

/// Assigns catalog images to workers through conditional status updates
///
/// Each worker process holds its own coordinator (and connection). No two
/// coordinators can both claim the same image: the claiming update only
/// matches while the row is still `ingested`.
pub struct JobCoordinator {
    conn: Connection,
    table: String,
}

impl JobCoordinator {
    /// Connect to the catalog described by `config`
    pub fn open(config: &Config) -> ExtractResult<Self> {
        let conn = open_connection(&config.database)?;
        Self::with_connection(conn, &config.tables.catalog)
    }

    /// Use an existing connection; creates the catalog table if needed
    pub fn with_connection(conn: Connection, table: &str) -> ExtractResult<Self> {
        let coordinator = JobCoordinator {
            conn,
            table: table.to_string(),
        };
        coordinator.init_schema()?;
        Ok(coordinator)
    }

    fn init_schema(&self) -> ExtractResult<()> {
        self.conn.execute_batch(&format!(
            "CREATE TABLE IF NOT EXISTS {t} (
                id          INTEGER PRIMARY KEY AUTOINCREMENT,
                reference   TEXT NOT NULL UNIQUE,
                obstime     TEXT NOT NULL,
                sensor      TEXT NOT NULL,
                card        TEXT NOT NULL,
                footprint   TEXT,
                minx        REAL NOT NULL,
                miny        REAL NOT NULL,
                maxx        REAL NOT NULL,
                maxy        REAL NOT NULL,
                status      TEXT NOT NULL DEFAULT 'ingested'
            );
            CREATE INDEX IF NOT EXISTS idx_{t}_candidates ON {t}(card, status, obstime);",
            t = self.table
        ))?;
        Ok(())
    }

    /// Insert a freshly ingested image; returns its id
    pub fn register(&self, image: &NewImage) -> ExtractResult<i64> {
        self.conn.execute(
            &format!(
                "INSERT INTO {} (reference, obstime, sensor, card, footprint, minx, miny, maxx, maxy, status)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
                self.table
            ),
            params![
                image.reference,
                image.obstime,
                image.sensor,
                image.card.code(),
                image.footprint_wkt,
                image.footprint.min_x,
                image.footprint.min_y,
                image.footprint.max_x,
                image.footprint.max_y,
                ImageStatus::Ingested.as_db(),
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Claim the oldest matching `ingested` image
    ///
    /// Selects the candidate, then moves it to `inprogress` with an update
    /// conditioned on the status still being `ingested`. A lost race moves on
    /// to the next candidate; `None` means no candidate is left.
    pub fn claim(&self, card: CardType, filter: &BoundingBox, range: &TimeRange) -> ExtractResult<Option<ImageHandle>> {
        loop {
            match self.try_claim(card, filter, range)? {
                ClaimAttempt::Claimed(handle) => return Ok(Some(handle)),
                ClaimAttempt::Lost(image_id) => debug!("Lost claim race for image {}, trying the next one", image_id),
                ClaimAttempt::NoCandidate => return Ok(None),
            }
        }
    }

    fn try_claim(&self, card: CardType, filter: &BoundingBox, range: &TimeRange) -> ExtractResult<ClaimAttempt> {
        let candidate = self.conn.query_row(
            &format!(
                "SELECT id, reference, obstime FROM {} WHERE status = 'ingested' AND {}
                 ORDER BY obstime ASC, id ASC LIMIT 1",
                self.table, FILTER_SQL
            ),
            params![card.code(), filter.min_x, filter.min_y, filter.max_x, filter.max_y, range.start, range.end],
            |row| Ok(ImageHandle {
                id: row.get(0)?,
                reference: row.get(1)?,
                obstime: row.get(2)?,
            }),
        ).optional()?;

        let handle = match candidate {
            Some(handle) => handle,
            None => {
                info!("No images with status 'ingested' found for card {}", card);
                return Ok(ClaimAttempt::NoCandidate);
            }
        };

        if self.complete(handle.id, ImageStatus::InProgress, ImageStatus::Ingested)? {
            info!("{} claimed for processing", handle.reference);
            Ok(ClaimAttempt::Claimed(handle))
        } else {
            Ok(ClaimAttempt::Lost(handle.id))
        }
    }

    /// Move `image_id` to `new_status` if it is still in `expected_prior`
    ///
    /// Returns `false` when the row did not carry the expected status: the
    /// caller should treat that as a benign race, not a fault.
    pub fn complete(&self, image_id: i64, new_status: ImageStatus, expected_prior: ImageStatus) -> ExtractResult<bool> {
        if !expected_prior.can_transition_to(&new_status) {
            return Err(ExtractError::InvalidTransition {
                from: expected_prior.as_db(),
                to: new_status.as_db(),
            });
        }

        let affected = self.conn.execute(
            &format!("UPDATE {} SET status = ?1 WHERE id = ?2 AND status = ?3", self.table),
            params![new_status.as_db(), image_id, expected_prior.as_db()],
        )?;

        if affected == 1 {
            info!("Record for {} updated to {} from {}", image_id, new_status, expected_prior);
            Ok(true)
        } else {
            warn!("{}", ExtractError::ConcurrencyConflict { image_id });
            Ok(false)
        }
    }

    /// Fetch one catalog record
    pub fn get(&self, image_id: i64) -> ExtractResult<Option<CatalogImage>> {
        let image = self.conn.query_row(
            &format!(
                "SELECT id, reference, obstime, sensor, card, footprint, minx, miny, maxx, maxy, status
                 FROM {} WHERE id = ?1",
                self.table
            ),
            params![image_id],
            read_image,
        ).optional()?;

        match image {
            Some(Ok(image)) => Ok(Some(image)),
            Some(Err(e)) => Err(e),
            None => Ok(None),
        }
    }

    /// Number of images per status matching the filters
    pub fn status_counts(&self, card: CardType, filter: &BoundingBox, range: &TimeRange) -> ExtractResult<Vec<(ImageStatus, i64)>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT status, COUNT(*) FROM {} WHERE {} GROUP BY status ORDER BY status",
            self.table, FILTER_SQL
        ))?;

        let rows = stmt.query_map(
            params![card.code(), filter.min_x, filter.min_y, filter.max_x, filter.max_y, range.start, range.end],
            |row| {
                let status: String = row.get(0)?;
                Ok((ImageStatus::from_db(&status), row.get::<_, i64>(1)?))
            },
        )?;

        let mut counts = Vec::new();
        for row in rows {
            counts.push(row?);
        }
        Ok(counts)
    }

    /// Put every matching `extracted` image back to `ingested`
    ///
    /// Used between extraction passes over the same images, e.g. the 10 m
    /// and 20 m Sentinel-2 band sets.
    pub fn reset_extracted(&self, card: CardType, filter: &BoundingBox, range: &TimeRange) -> ExtractResult<usize> {
        let affected = self.conn.execute(
            &format!(
                "UPDATE {} SET status = ?8 WHERE status = ?9 AND {}",
                self.table, FILTER_SQL
            ),
            params![
                card.code(), filter.min_x, filter.min_y, filter.max_x, filter.max_y, range.start, range.end,
                ImageStatus::Ingested.as_db(),
                ImageStatus::Extracted.as_db(),
            ],
        )?;
        info!("Reset {} extracted {} images to ingested", affected, card);
        Ok(affected)
    }
}

fn read_image(row: &Row<'_>) -> rusqlite::Result<ExtractResult<CatalogImage>> {
    let card_code: String = row.get(4)?;
    let status: String = row.get(10)?;
    let card = match card_code.parse::<CardType>() {
        Ok(card) => card,
        Err(e) => return Ok(Err(e)),
    };

    Ok(Ok(CatalogImage {
        id: row.get(0)?,
        reference: row.get(1)?,
        obstime: row.get(2)?,
        sensor: row.get(3)?,
        card,
        footprint_wkt: row.get(5)?,
        footprint: BoundingBox::new(row.get(6)?, row.get(7)?, row.get(8)?, row.get(9)?),
        status: ImageStatus::from_db(&status),
    }))
}
