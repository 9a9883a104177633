use clap::{Arg, Command as ClapCommand, ArgAction};
use std::process;
use std::str::FromStr;
use log::{error, LevelFilter};

use parcelkit::config::Config;
use parcelkit::utils::logger::Logger;
use parcelkit::commands::{CommandFactory, ParcelkitCommandFactory};

fn main() {
    let matches = ClapCommand::new("parcelkit")
        .version("0.1.0")
        .author("Maurice Schilpp")
        .about("Extract per-parcel statistics from satellite images in a shared catalog")
        .arg(
            Arg::new("config")
                .help("Worker configuration (TOML)")
                .required(true)
                .index(1),
        )
        .arg(
            Arg::new("card")
                .long("card")
                .help("Product type to process (s2, bs, c6, c1)")
                .value_name("CARD")
                .required(true),
        )
        .arg(
            Arg::new("bands")
                .long("bands")
                .help("Comma separated band names, overriding the product defaults")
                .value_name("BANDS")
                .required(false),
        )
        .arg(
            Arg::new("resolution")
                .long("resolution")
                .help("Sentinel-2 band set: 10, 20, or -1 for the scene classification")
                .value_name("METERS")
                .allow_negative_numbers(true)
                .required(false),
        )
        .arg(
            Arg::new("histogram")
                .long("histogram")
                .help("Extract value histograms instead of band statistics")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("loop")
                .long("loop")
                .help("Keep claiming images until none is left")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("status")
                .long("status")
                .help("Report catalog images per status")
                .action(ArgAction::SetTrue)
                .conflicts_with("reset"),
        )
        .arg(
            Arg::new("reset")
                .long("reset")
                .help("Move extracted images back to ingested")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Enable debug output")
                .action(ArgAction::SetTrue),
        )
        .get_matches();

    let config_path = matches.get_one::<String>("config").map(String::as_str).unwrap_or_default();
    let config = match Config::from_file(config_path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error loading configuration: {}", e);
            process::exit(1);
        }
    };

    let level = if matches.get_flag("verbose") {
        LevelFilter::Debug
    } else {
        LevelFilter::from_str(&config.logging.level).unwrap_or(LevelFilter::Info)
    };

    match &config.logging.file {
        Some(path) => {
            if let Err(e) = Logger::init_global_logger(path, level) {
                eprintln!("Error setting up global logger: {}", e);
                process::exit(1);
            }
        }
        None => {
            env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level.as_str()))
                .init();
        }
    }

    // Reports go to the console only; the global logger already owns the log file
    let logger = match Logger::new(None, level) {
        Ok(l) => l,
        Err(e) => {
            eprintln!("Error initializing logger: {}", e);
            process::exit(1);
        }
    };

    let factory = ParcelkitCommandFactory::new();

    let command_result = factory.create_command(&matches, &config, &logger);
    match command_result {
        Ok(command) => {
            if let Err(e) = command.execute() {
                error!("Command execution error: {}", e);
                eprintln!("Error: {}", e);
                process::exit(1);
            }
        },
        Err(e) => {
            error!("Failed to create command: {}", e);
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };
}
