//! CLI command implementations
//!
//! This module contains implementations of various commands
//! supported by the CLI application using the Command pattern.

pub mod command_traits;
pub mod extract_command;
pub mod status_command;
pub mod reset_command;

pub use command_traits::{Command, CommandFactory};
pub use extract_command::ExtractCommand;
pub use status_command::StatusCommand;
pub use reset_command::ResetCommand;

use clap::ArgMatches;
use crate::catalog::CardType;
use crate::config::Config;
use crate::errors::{ExtractError, ExtractResult};
use crate::utils::logger::Logger;

/// Factory for creating command instances based on CLI arguments
///
/// This factory examines the command-line arguments and creates
/// the appropriate command instance for execution.
pub struct ParcelkitCommandFactory;

impl ParcelkitCommandFactory {
    /// Create a new factory instance
    pub fn new() -> Self {
        ParcelkitCommandFactory
    }
}

impl Default for ParcelkitCommandFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> CommandFactory<'a> for ParcelkitCommandFactory {
    fn create_command(&self, args: &ArgMatches, config: &'a Config,
                      logger: &'a Logger) -> ExtractResult<Box<dyn Command + 'a>> {
        if args.get_flag("status") {
            Ok(Box::new(StatusCommand::new(args, config, logger)?))
        } else if args.get_flag("reset") {
            Ok(Box::new(ResetCommand::new(args, config, logger)?))
        } else {
            // Default to extraction
            Ok(Box::new(ExtractCommand::new(args, config, logger)?))
        }
    }
}

/// Product type selected with `--card`
pub(crate) fn card_arg(args: &ArgMatches) -> ExtractResult<CardType> {
    args.get_one::<String>("card")
        .ok_or_else(|| ExtractError::Config("Missing --card".to_string()))?
        .parse()
}
