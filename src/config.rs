//! Worker configuration
//!
//! Configuration is read once from a TOML file and handed to every component
//! constructor. Only `database.path` and `source.template` are mandatory.

use chrono::{NaiveDate, NaiveDateTime};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::catalog::TimeRange;
use crate::coordinate::BoundingBox;
use crate::errors::{ExtractError, ExtractResult};
use crate::utils::string_utils::is_sql_identifier;

/// Top-level configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub database: DatabaseConfig,
    #[serde(default)]
    pub tables: TableConfig,
    #[serde(default)]
    pub selection: SelectionConfig,
    pub source: SourceConfig,
    #[serde(default)]
    pub extraction: ExtractionConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Catalog database location
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub path: PathBuf,
    #[serde(default = "default_busy_timeout")]
    pub busy_timeout_ms: u64,
}

/// Table names, interpolated into SQL after validation
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TableConfig {
    pub catalog: String,
    pub parcels: String,
    pub results: String,
    pub hists: String,
}

impl Default for TableConfig {
    fn default() -> Self {
        TableConfig {
            catalog: "dias_catalogue".to_string(),
            parcels: "parcel_masks".to_string(),
            results: "results".to_string(),
            hists: "hists".to_string(),
        }
    }
}

/// Spatial and temporal filter applied when claiming images
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SelectionConfig {
    /// Area of interest as `[minx, miny, maxx, maxy]` in footprint coordinates
    pub aoi: Option<[f64; 4]>,
    /// First acquisition date (inclusive)
    pub start: Option<NaiveDate>,
    /// Last acquisition date (inclusive, at midnight)
    pub end: Option<NaiveDate>,
}

impl SelectionConfig {
    /// Spatial filter; unbounded when no AOI is configured
    pub fn spatial_filter(&self) -> BoundingBox {
        match self.aoi {
            Some(values) => BoundingBox::from_array(values),
            None => BoundingBox::new(f64::MIN, f64::MIN, f64::MAX, f64::MAX),
        }
    }

    /// Acquisition time filter
    pub fn time_range(&self) -> TimeRange {
        TimeRange::new(self.start.map(midnight), self.end.map(midnight))
    }
}

fn midnight(date: NaiveDate) -> NaiveDateTime {
    date.and_hms_opt(0, 0, 0).unwrap_or_default()
}

/// Where band files of a catalog image live
#[derive(Debug, Clone, Deserialize)]
pub struct SourceConfig {
    /// Band file path with `{date}`, `{reference}` and `{band}` placeholders
    pub template: String,
    /// Nodata sentinel of the imagery
    #[serde(default)]
    pub nodata: f64,
}

/// Paging and progress settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    pub stats_page_size: usize,
    pub hist_page_size: usize,
    pub show_progress: bool,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        ExtractionConfig {
            stats_page_size: 10_000,
            hist_page_size: 1_000,
            show_progress: false,
        }
    }
}

/// Log output
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log file; console logging through `RUST_LOG` when absent
    pub file: Option<PathBuf>,
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig {
            file: None,
            level: "info".to_string(),
        }
    }
}

fn default_busy_timeout() -> u64 {
    5_000
}

impl Config {
    /// Load and validate a configuration file
    pub fn from_file<P: AsRef<Path>>(path: P) -> ExtractResult<Self> {
        let content = fs::read_to_string(path.as_ref()).map_err(|e| {
            ExtractError::Config(format!("Cannot read {}: {}", path.as_ref().display(), e))
        })?;
        Self::parse(&content)
    }

    /// Parse and validate configuration text
    pub fn parse(content: &str) -> ExtractResult<Self> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> ExtractResult<()> {
        for name in [&self.tables.catalog, &self.tables.parcels, &self.tables.results, &self.tables.hists] {
            if !is_sql_identifier(name) {
                return Err(ExtractError::Config(format!("Invalid table name: {}", name)));
            }
        }

        if self.extraction.stats_page_size == 0 || self.extraction.hist_page_size == 0 {
            return Err(ExtractError::Config("Page sizes must be positive".to_string()));
        }

        if let (Some(start), Some(end)) = (self.selection.start, self.selection.end) {
            if start > end {
                return Err(ExtractError::Config(format!("Start date {} is after end date {}", start, end)));
            }
        }

        if !self.source.template.contains("{band}") {
            return Err(ExtractError::Config("Source template needs a {band} placeholder".to_string()));
        }

        Ok(())
    }
}
