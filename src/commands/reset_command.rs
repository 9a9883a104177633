//! Reset of extracted images for another extraction pass

use clap::ArgMatches;

use crate::catalog::{CardType, JobCoordinator};
use crate::commands::card_arg;
use crate::commands::command_traits::Command;
use crate::config::Config;
use crate::errors::ExtractResult;
use crate::utils::logger::Logger;

/// Moves every selected `extracted` image back to `ingested`
pub struct ResetCommand<'a> {
    card: CardType,
    config: &'a Config,
    logger: &'a Logger,
}

impl<'a> ResetCommand<'a> {
    pub fn new(args: &ArgMatches, config: &'a Config, logger: &'a Logger) -> ExtractResult<Self> {
        Ok(ResetCommand {
            card: card_arg(args)?,
            config,
            logger,
        })
    }
}

impl<'a> Command for ResetCommand<'a> {
    fn execute(&self) -> ExtractResult<()> {
        let coordinator = JobCoordinator::open(self.config)?;
        let reset = coordinator.reset_extracted(
            self.card,
            &self.config.selection.spatial_filter(),
            &self.config.selection.time_range(),
        )?;

        self.logger.report(&format!("Reset ({})", self.card), &[format!("Images reset to ingested: {}", reset)])?;
        Ok(())
    }
}
