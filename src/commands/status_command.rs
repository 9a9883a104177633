//! Catalog status report

use clap::ArgMatches;

use crate::catalog::{CardType, JobCoordinator};
use crate::commands::card_arg;
use crate::commands::command_traits::Command;
use crate::config::Config;
use crate::errors::ExtractResult;
use crate::utils::logger::Logger;

/// Counts catalog images per status for the configured selection
pub struct StatusCommand<'a> {
    card: CardType,
    config: &'a Config,
    logger: &'a Logger,
}

impl<'a> StatusCommand<'a> {
    pub fn new(args: &ArgMatches, config: &'a Config, logger: &'a Logger) -> ExtractResult<Self> {
        Ok(StatusCommand {
            card: card_arg(args)?,
            config,
            logger,
        })
    }
}

impl<'a> Command for StatusCommand<'a> {
    fn execute(&self) -> ExtractResult<()> {
        let coordinator = JobCoordinator::open(self.config)?;
        let counts = coordinator.status_counts(
            self.card,
            &self.config.selection.spatial_filter(),
            &self.config.selection.time_range(),
        )?;

        let lines: Vec<String> = if counts.is_empty() {
            vec!["no images".to_string()]
        } else {
            counts.iter().map(|(status, count)| format!("{}: {}", status, count)).collect()
        };
        self.logger.report(&format!("Catalog status ({})", self.card), &lines)?;
        Ok(())
    }
}
