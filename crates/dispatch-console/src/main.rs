//! Voice dispatch admin console
//!
//! Manage agent configurations, start test calls and review call results
//! of the AI voice agent service from a terminal.

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    missing_docs,
    rust_2018_idioms
)]

use clap::{Parser, Subcommand};
use dispatch_client::ApiClient;
use dispatch_console::commands::{self, CallCommand, CallsCommand, ConfigsCommand};
use dispatch_console::{Shell, TerminalConfirm, TerminalHandoff, interactive};
use dispatch_core::{Config, Error, Result};
use std::path::PathBuf;
use tracing::{debug, info};

/// Command line interface for the dispatch console
#[derive(Parser)]
#[command(
    name = "dispatch-console",
    version = env!("CARGO_PKG_VERSION"),
    about = "Admin console for AI voice agent dispatch calls",
    long_about = "Manage agent configurations, start test check-in calls and review call results of the AI voice agent service. Without a subcommand an interactive session starts."
)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error); overrides the configuration file
    #[arg(short, long, global = true)]
    log_level: Option<String>,

    /// Enable structured JSON logging
    #[arg(long, global = true)]
    json: bool,

    /// Subcommand
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands
#[derive(Subcommand)]
enum Commands {
    /// Show call counts, success rate and recent calls
    Dashboard,

    /// Manage agent configurations
    Configs {
        /// Configuration subcommand
        #[command(subcommand)]
        action: ConfigsCommand,
    },

    /// Start test calls
    Call {
        /// Call subcommand
        #[command(subcommand)]
        action: CallCommand,
    },

    /// Review call history and results
    Calls {
        /// Call history subcommand
        #[command(subcommand)]
        action: CallsCommand,
    },

    /// Start an interactive session (default)
    Shell,
}

/// Main entry point for the console
///
/// # Errors
///
/// Returns error if configuration cannot be loaded, the terminal cannot be
/// prompted, or a command left an error notification behind
#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists (for development convenience)
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = Config::load(cli.config.as_deref())?;

    let level = cli.log_level.as_deref().unwrap_or(&config.logging.level);
    dispatch_core::init_logging(level, cli.json || config.logging.is_json())?;
    info!(
        version = env!("CARGO_PKG_VERSION"),
        base_url = %config.api.base_url,
        "dispatch console starting"
    );

    let api = ApiClient::new(config.api.base_url.clone());
    let sdk = TerminalHandoff;
    let confirm = TerminalConfirm;
    let mut shell = Shell::new(&config.console);

    let output = match cli.command.unwrap_or(Commands::Shell) {
        Commands::Dashboard => commands::dashboard(&mut shell, &api).await,
        Commands::Configs { action } => commands::configs(action, &mut shell, &api, &confirm).await,
        Commands::Call { action } => commands::call(action, &mut shell, &api, &sdk).await,
        Commands::Calls { action } => commands::calls(action, &mut shell, &api).await,
        Commands::Shell => {
            return interactive::run(&mut shell, &api, &sdk, &confirm).await;
        }
    };

    print!("{output}");
    let failed = commands::failed(&shell);
    for notice in shell.take_notices() {
        println!("{}", notice.render());
    }

    if failed {
        debug!("command finished with an error notification");
        return Err(Error::Other("command failed".to_string()));
    }
    Ok(())
}
