//! Terminal front end for checking campground availability.
//! Each sub-command is one interaction with the search form; the form state
//! is saved between runs.

use std::process::ExitCode;

use clap::Parser;

mod cli;
mod commands;
mod config;
mod display;

use crate::cli::{Cli, log_filter};
use crate::config::AppConfig;

#[tokio::main]
async fn main() -> ExitCode {
    // Load environment variables
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    // Initialize logger
    env_logger::init_from_env(env_logger::Env::new().default_filter_or(log_filter(cli.verbose)));

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            log::error!("❌ Invalid configuration: {:#}", e);
            eprintln!("error: {:#}", e);
            return ExitCode::FAILURE;
        }
    };

    log::info!("🏕️ Using availability API at {}", config.api_url);

    match commands::run(cli.command, &config).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
