// ABOUTME: Entry point for the swatch command line tool
// ABOUTME: Loads configuration, initializes logging, and dispatches the requested command

use std::process::ExitCode;

use anyhow::{Context, Result};
use swatchsmith_core::{SwatchConfig, SwatchError};
use swatchsmith_logging::{LoggingGuard, error, info};

mod cli;
mod commands;

use cli::{Cli, Command, USAGE};

fn setup_logging(config: &SwatchConfig, verbosity: u8) -> Result<LoggingGuard> {
    let mut logging = config.logging.clone();
    logging.level = logging.level.raised_by(verbosity);
    swatchsmith_logging::init_logging_with_config(logging)
        .context("Failed to initialize swatchsmith logging")
}

fn run(cli: &Cli) -> Result<String> {
    let config = SwatchConfig::load(cli.config.as_deref()).context("Failed to load configuration")?;
    let _guard = setup_logging(&config, cli.verbosity)?;
    info!(command = ?cli.command, "Running swatch");

    let result = commands::execute(cli, &config);
    if let Err(err) = &result {
        error!(error = %err, "Command failed");
    }
    result
}

fn main() -> ExitCode {
    let cli = match Cli::from_env() {
        Ok(cli) => cli,
        Err(err) => {
            eprintln!("{:#}", err);
            return ExitCode::from(2);
        }
    };

    match cli.command {
        Command::Help => {
            print!("{}", USAGE);
            return ExitCode::SUCCESS;
        }
        Command::Version => {
            println!("swatch {}", env!("CARGO_PKG_VERSION"));
            return ExitCode::SUCCESS;
        }
        _ => {}
    }

    match run(&cli) {
        Ok(output) => {
            if !output.is_empty() {
                println!("{}", output);
            }
            ExitCode::SUCCESS
        }
        Err(err) => {
            // User-fixable conditions get the bare message
            if let Some(swatch_err) = err.downcast_ref::<SwatchError>()
                && swatch_err.is_precondition()
            {
                eprintln!("{}", swatch_err);
                return ExitCode::from(2);
            }
            eprintln!("Error: {:#}", err);
            ExitCode::FAILURE
        }
    }
}
