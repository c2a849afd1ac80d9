//! Core types and utilities for the voice dispatch console

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    missing_docs,
    rust_2018_idioms
)]

pub mod config;
pub mod error;
pub mod format;
pub mod types;

// Re-export commonly used types
pub use config::Config;
pub use error::{Error, Result};
pub use types::{
    AgentConfig, AgentConfigDraft, Call, CallCounts, CallDetail, CallId, CallOutcome, CallResult,
    CallStatus, ConfigId, DashboardStats, ScenarioType, SessionGrant, StartCallRequest,
};

/// Initialize the logging system
///
/// `RUST_LOG` takes precedence over `level` when it is set. With `json`
/// the output is one JSON object per event, otherwise human readable.
///
/// # Errors
///
/// Returns an error if a global subscriber has already been installed.
pub fn init_logging(level: &str, json: bool) -> Result<()> {
    use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let registry = tracing_subscriber::registry().with(env_filter);

    let installed = if json {
        registry
            .with(tracing_subscriber::fmt::layer().json())
            .try_init()
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().pretty())
            .try_init()
    };

    installed.map_err(|e| Error::Configuration {
        message: format!("logging already initialized: {e}"),
    })
}
