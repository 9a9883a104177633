//! Extraction worker
//!
//! One `run_once` call processes at most one catalog image:
//!
//! 1. claim the oldest matching `ingested` image
//! 2. open its bands and read the window covering the parcel selection
//! 3. page through the parcel masks, decode and index each one
//! 4. aggregate statistics (or a histogram) per parcel
//! 5. write every page through the result sink
//! 6. move the image to `extracted`, or to `error(reason)`
//!
//! Many workers may run this loop against the same catalog; the claim is
//! the only point where they coordinate.

use log::{debug, error, info, warn};

use crate::catalog::{CardType, ImageHandle, ImageStatus, JobCoordinator, TimeRange};
use crate::config::{Config, ExtractionConfig};
use crate::coordinate::BoundingBox;
use crate::errors::{ExtractError, ExtractResult};
use crate::extractor::{PixelIndexer, PixelSelection, WindowPlanner};
use crate::mask::RasterMaskDecoder;
use crate::source::{ImageSource, SampleType, WindowData};
use crate::stats::{histogram_for, is_no_information, StatisticsAggregator};
use crate::storage::{HistRecord, ParcelMaskRow, ParcelStore, ResultRecord, ResultSink, StatRecord};
use crate::utils::progress::ProgressTracker;

use super::provider::{EnviTemplateProvider, SourceProvider};

/// What to compute per parcel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractionMode {
    /// Band statistics for every requested band
    Statistics,
    /// Value histogram of the first band (classification layers)
    Histogram,
}

/// Result of one worker cycle
#[derive(Debug, Clone, PartialEq)]
pub enum RunOutcome {
    /// No image was available to claim
    Idle,
    /// An image was claimed and left in `status`
    Processed {
        image_id: i64,
        status: ImageStatus,
        records: usize,
    },
}

/// Claims catalog images and extracts per-parcel results from them
pub struct ExtractionWorker {
    coordinator: JobCoordinator,
    parcels: ParcelStore,
    sink: ResultSink,
    provider: Box<dyn SourceProvider>,
    settings: ExtractionConfig,
    filter: BoundingBox,
    range: TimeRange,
    nodata: f64,
    planner: WindowPlanner,
    indexer: PixelIndexer,
    decoder: RasterMaskDecoder,
}

impl ExtractionWorker {
    /// Build a worker from configuration, with its own database connections
    pub fn open(config: &Config) -> ExtractResult<Self> {
        let worker = ExtractionWorker::new(
            JobCoordinator::open(config)?,
            ParcelStore::open(config)?,
            ResultSink::open(config)?,
            Box::new(EnviTemplateProvider::new(&config.source.template)),
        )
        .with_settings(config.extraction.clone())
        .with_selection(config.selection.spatial_filter(), config.selection.time_range())
        .with_nodata(config.source.nodata);
        Ok(worker)
    }

    /// Assemble a worker from its parts, with default settings and no selection filter
    pub fn new(coordinator: JobCoordinator, parcels: ParcelStore, sink: ResultSink,
               provider: Box<dyn SourceProvider>) -> Self {
        ExtractionWorker {
            coordinator,
            parcels,
            sink,
            provider,
            settings: ExtractionConfig::default(),
            filter: BoundingBox::new(f64::MIN, f64::MIN, f64::MAX, f64::MAX),
            range: TimeRange::unbounded(),
            nodata: 0.0,
            planner: WindowPlanner::new(),
            indexer: PixelIndexer::new(),
            decoder: RasterMaskDecoder::new(),
        }
    }

    /// Use different paging and progress settings
    pub fn with_settings(mut self, settings: ExtractionConfig) -> Self {
        self.settings = settings;
        self
    }

    /// Only claim images overlapping `filter` and acquired within `range`
    pub fn with_selection(mut self, filter: BoundingBox, range: TimeRange) -> Self {
        self.filter = filter;
        self.range = range;
        self
    }

    /// Nodata sentinel for sources that do not declare one
    pub fn with_nodata(mut self, nodata: f64) -> Self {
        self.nodata = nodata;
        self
    }

    /// Coordinator used for claims, e.g. for status reporting
    pub fn coordinator(&self) -> &JobCoordinator {
        &self.coordinator
    }

    /// Claim and process at most one image
    ///
    /// Failures while processing a claimed image end that image in
    /// `error(reason)` and are not returned; only failures to claim or to
    /// record the final status are.
    ///
    /// # Arguments
    /// * `card` - Product type to claim
    /// * `bands` - Band names, in source order; the first one is the primary band
    /// * `mode` - Statistics or histogram extraction
    pub fn run_once(&mut self, card: CardType, bands: &[String], mode: ExtractionMode) -> ExtractResult<RunOutcome> {
        let handle = match self.coordinator.claim(card, &self.filter, &self.range)? {
            Some(handle) => handle,
            None => return Ok(RunOutcome::Idle),
        };

        let result = self.provider.open(&handle, bands)
            .and_then(|mut source| self.process(&handle, source.as_mut(), card, bands, mode));

        let (status, records) = match result {
            Ok(0) => {
                info!("No parcels extracted from {}", handle.reference);
                (ImageStatus::error("no parcels"), 0)
            }
            Ok(records) => (ImageStatus::Extracted, records),
            Err(e) => {
                error!("Extraction of {} failed: {}", handle.reference, e);
                (ImageStatus::error(e.diagnostic()), 0)
            }
        };

        // A lost race is logged by the coordinator and otherwise ignored
        self.coordinator.complete(handle.id, status.clone(), ImageStatus::InProgress)?;

        Ok(RunOutcome::Processed {
            image_id: handle.id,
            status,
            records,
        })
    }

    /// Run until no matching image is left; returns the number of images processed
    pub fn run_until_idle(&mut self, card: CardType, bands: &[String], mode: ExtractionMode) -> ExtractResult<usize> {
        let mut processed = 0;
        while let RunOutcome::Processed { .. } = self.run_once(card, bands, mode)? {
            processed += 1;
        }
        info!("Processed {} {} images", processed, card);
        Ok(processed)
    }

    /// Extract all parcels of one claimed image; returns the number of records produced
    pub fn process(&mut self, image: &ImageHandle, source: &mut dyn ImageSource, card: CardType,
                   bands: &[String], mode: ExtractionMode) -> ExtractResult<usize> {
        if bands.is_empty() || bands.len() != source.band_count() {
            return Err(ExtractError::GenericError(format!(
                "{} band names for a source with {} bands", bands.len(), source.band_count()
            )));
        }
        if mode == ExtractionMode::Histogram && source.sample_type() != SampleType::U8 {
            return Err(ExtractError::UnsupportedSampleType(format!(
                "histograms need 8-bit samples, got {:?}", source.sample_type()
            )));
        }

        let transform = source.transform();
        let srid = source.srid();
        let pixel_size = transform.rounded_pixel_size();
        let extent = transform.extent(source.width(), source.height());
        let nodata = source.nodata().unwrap_or(self.nodata);

        let selection = match self.parcels.selection_extent(srid, pixel_size, &extent)? {
            Some(selection) => selection,
            None => {
                debug!("No parcels in bucket ({}, {}) overlap {}", srid, pixel_size, image.reference);
                return Ok(0);
            }
        };

        let window = self.planner.plan(&transform, source.width(), source.height(), &selection);
        if window.is_empty() {
            return Ok(0);
        }
        let data = source.read(&window)?;
        info!("Read window {:?} of {} ({} bands)", window, image.reference, data.bands.len());

        let page_size = match mode {
            ExtractionMode::Statistics => self.settings.stats_page_size,
            ExtractionMode::Histogram => self.settings.hist_page_size,
        };
        let progress = if self.settings.show_progress {
            ProgressTracker::new(self.parcels.count(srid, pixel_size, &extent)?, &image.reference)
        } else {
            ProgressTracker::hidden()
        };

        let aggregator = StatisticsAggregator::new(nodata);
        let labels: Vec<String> = bands.iter().map(|b| card.band_label(b)).collect();
        let mut produced = 0;
        let mut after_pid = None;

        loop {
            let page = self.parcels.next_page(srid, pixel_size, &extent, after_pid, page_size)?;
            if page.is_empty() {
                break;
            }
            after_pid = page.last().map(|row| row.pid);

            let mut records = Vec::new();
            for row in &page {
                let Some(positions) = self.locate(row, &data) else { continue };
                match mode {
                    ExtractionMode::Statistics => {
                        collect_stats(&aggregator, row.pid, image.id, &labels, &positions, &data, &mut records)
                    }
                    ExtractionMode::Histogram => {
                        collect_histogram(row.pid, image.id, &positions, &data, &mut records)
                    }
                }
            }

            produced += records.len();
            let outcome = self.sink.append_batch(records)?;
            debug!("Page up to parcel {:?}: {} written, {} duplicates", after_pid, outcome.written, outcome.duplicates);
            if let Some(pid) = after_pid {
                progress.set_message(&format!("{} up to parcel {}", image.reference, pid));
            }
            progress.increment(page.len() as u64);

            if page.len() < page_size {
                break;
            }
        }

        progress.finish();
        info!("Extracted {} records from {}", produced, image.reference);
        Ok(produced)
    }

    /// Window positions of one parcel, or `None` when its mask is unusable
    fn locate(&self, row: &ParcelMaskRow, data: &WindowData) -> Option<PixelSelection> {
        let mask = match self.decoder.decode(&row.rast) {
            Ok(mask) => mask,
            Err(e) => {
                warn!("Skipping parcel {}: {}", row.pid, e);
                return None;
            }
        };
        let selection = mask.selection()?;
        Some(self.indexer.indices(&mask.transform(), &selection, &data.transform, data.rows(), data.cols()))
    }
}

/// Primary band first: it alone decides whether the parcel is kept
fn collect_stats(aggregator: &StatisticsAggregator, pid: i64, obsid: i64, labels: &[String],
                 positions: &PixelSelection, data: &WindowData, records: &mut Vec<ResultRecord>) {
    for (index, (label, band)) in labels.iter().zip(&data.bands).enumerate() {
        let values = positions.values_of(band);
        match aggregator.stats_for(&values, index == 0) {
            Some(stats) => records.push(ResultRecord::Stat(StatRecord::new(pid, obsid, label, &stats))),
            None if index == 0 => return,
            None => {}
        }
    }
}

fn collect_histogram(pid: i64, obsid: i64, positions: &PixelSelection, data: &WindowData,
                     records: &mut Vec<ResultRecord>) {
    let Some(band) = data.bands.first() else { return };
    let values: Vec<u8> = positions.values_of(band).iter().map(|v| *v as u8).collect();
    if values.is_empty() {
        return;
    }

    let histogram = histogram_for(&values);
    if is_no_information(&histogram) {
        return;
    }
    records.push(ResultRecord::Hist(HistRecord { pid, obsid, histogram }));
}
