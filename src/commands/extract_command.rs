//! Extraction command
//!
//! Claims images of one product type and extracts per-parcel statistics or
//! histograms from them, one image per cycle.

use clap::ArgMatches;
use log::info;

use crate::catalog::CardType;
use crate::commands::card_arg;
use crate::commands::command_traits::Command;
use crate::config::Config;
use crate::errors::{ExtractError, ExtractResult};
use crate::pipeline::{ExtractionMode, ExtractionWorker, RunOutcome};
use crate::utils::logger::Logger;

/// Command for claiming and processing catalog images
pub struct ExtractCommand<'a> {
    /// Product type to claim
    card: CardType,
    /// Band names in source order
    bands: Vec<String>,
    /// Statistics or histograms
    mode: ExtractionMode,
    /// Keep claiming until no candidate is left
    repeat: bool,
    /// Worker configuration
    config: &'a Config,
    /// Logger for the run summary
    logger: &'a Logger,
}

impl<'a> ExtractCommand<'a> {
    /// Create a new extract command
    ///
    /// # Arguments
    /// * `args` - CLI argument matches from clap
    /// * `config` - Worker configuration
    /// * `logger` - Logger for the run summary
    ///
    /// # Returns
    /// A new ExtractCommand instance or an error
    pub fn new(args: &ArgMatches, config: &'a Config, logger: &'a Logger) -> ExtractResult<Self> {
        let card = card_arg(args)?;
        let histogram = args.get_flag("histogram");
        let mode = if histogram { ExtractionMode::Histogram } else { ExtractionMode::Statistics };

        let bands = match args.get_one::<String>("bands") {
            Some(list) => list.split(',')
                .map(|b| b.trim().to_string())
                .filter(|b| !b.is_empty())
                .collect(),
            None => {
                let resolution = match args.get_one::<String>("resolution") {
                    Some(value) => Some(value.parse::<i32>()
                        .map_err(|_| ExtractError::Config(format!("Invalid resolution: {}", value)))?),
                    // The classification layer is the histogram default
                    None if histogram => Some(-1),
                    None => None,
                };
                card.default_bands(resolution)?
            }
        };
        if bands.is_empty() {
            return Err(ExtractError::Config("No bands selected".to_string()));
        }

        info!("Extracting {:?} of {} images, bands {:?}", mode, card, bands);

        Ok(ExtractCommand {
            card,
            bands,
            mode,
            repeat: args.get_flag("loop"),
            config,
            logger,
        })
    }
}

impl<'a> Command for ExtractCommand<'a> {
    fn execute(&self) -> ExtractResult<()> {
        let mut worker = ExtractionWorker::open(self.config)?;

        let summary = if self.repeat {
            let processed = worker.run_until_idle(self.card, &self.bands, self.mode)?;
            vec![format!("Images processed: {}", processed)]
        } else {
            match worker.run_once(self.card, &self.bands, self.mode)? {
                RunOutcome::Idle => vec!["No image to process".to_string()],
                RunOutcome::Processed { image_id, status, records } => vec![
                    format!("Image: {}", image_id),
                    format!("Status: {}", status),
                    format!("Records: {}", records),
                ],
            }
        };

        self.logger.report(&format!("Extraction ({})", self.card), &summary)?;
        Ok(())
    }
}
