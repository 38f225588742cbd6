pub mod commands;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use doorstep_core::config::SiteConfig;

#[derive(Debug, Parser)]
#[command(
    name = "doorstep",
    about = "Doorstep estimator CLI",
    long_about = "Run the instant price estimator wizard and inspect a Doorstep site configuration.",
    after_help = "Examples:\n  doorstep estimate --service alterations\n  doorstep services\n  doorstep doctor --json"
)]
pub struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "Run the interactive estimate wizard for a service")]
    Estimate {
        #[arg(long, help = "Service id to estimate; prompts for one when omitted")]
        service: Option<String>,
        #[arg(long, help = "Path to a doorstep.toml config file")]
        config: Option<PathBuf>,
    },
    #[command(about = "List configured services with their estimate bands")]
    Services {
        #[arg(long, help = "Path to a doorstep.toml config file")]
        config: Option<PathBuf>,
    },
    #[command(about = "Inspect effective configuration values with source attribution")]
    Config {
        #[arg(long, help = "Path to a doorstep.toml config file")]
        config: Option<PathBuf>,
    },
    #[command(about = "Validate configuration and catalog integrity")]
    Doctor {
        #[arg(long, help = "Emit machine-readable JSON output")]
        json: bool,
        #[arg(long, help = "Path to a doorstep.toml config file")]
        config: Option<PathBuf>,
    },
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Estimate { service, config } => {
            commands::estimate::run(commands::estimate::EstimateArgs { service, config })
        }
        Command::Services { config } => {
            commands::CommandResult { exit_code: 0, output: commands::services::run(config) }
        }
        Command::Config { config } => {
            commands::CommandResult { exit_code: 0, output: commands::config::run(config) }
        }
        Command::Doctor { json, config } => {
            commands::CommandResult { exit_code: 0, output: commands::doctor::run(config, json) }
        }
    };

    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}

pub fn init_logging(config: &SiteConfig) {
    use doorstep_core::config::LogFormat::{Compact, Json, Pretty};
    use tracing::Level;

    let log_level = config.logging.level.parse::<Level>().unwrap_or(Level::INFO);

    match config.logging.format {
        Compact => {
            tracing_subscriber::fmt().with_target(false).with_max_level(log_level).compact().init();
        }
        Pretty => {
            tracing_subscriber::fmt().with_target(false).with_max_level(log_level).pretty().init();
        }
        Json => {
            tracing_subscriber::fmt().with_target(false).with_max_level(log_level).json().init();
        }
    }
}
