//! Real-time session handoff for terminal use
//!
//! A terminal cannot carry call audio, so joining a session means handing
//! the token and agent id to the operator, who opens them in a browser
//! client of the calling SDK.

use async_trait::async_trait;
use chrono::Utc;
use console::style;
use dispatch_client::session::SessionResult;
use dispatch_client::{RealtimeSdk, SessionError, SessionHandle};
use tracing::info;

/// Prints session credentials for the operator's browser client
#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalHandoff;

#[async_trait]
impl RealtimeSdk for TerminalHandoff {
    async fn connect(&self, token: &str, agent_id: &str) -> SessionResult<SessionHandle> {
        if token.is_empty() {
            return Err(SessionError::rejected("empty session token"));
        }

        println!("{}", style("Real-time session ready").green().bold());
        println!("  Agent ID: {agent_id}");
        println!("  Token:    {token}");
        info!(agent_id, "session credentials handed off");

        Ok(SessionHandle {
            agent_id: agent_id.to_string(),
            call_id: None,
            connected_at: Utc::now(),
        })
    }
}
