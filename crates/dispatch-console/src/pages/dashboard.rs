//! Dashboard screen: call counts, success rate and recent activity

use crate::components::call_list;
use crate::notify::Toaster;
use console::style;
use dispatch_client::ConsoleApi;
use dispatch_core::{Call, CallCounts, DashboardStats};
use std::fmt::Write as _;
use tracing::debug;

/// Shown when the service reports no recent calls
pub const NO_RECENT_CALLS: &str = "No recent calls found";

/// Dashboard screen state
#[derive(Debug, Clone)]
pub struct DashboardPage {
    data: DashboardStats,
    loaded: bool,
    timestamp_format: String,
}

impl DashboardPage {
    /// Create an unloaded dashboard
    pub fn new(timestamp_format: impl Into<String>) -> Self {
        Self {
            data: DashboardStats::default(),
            loaded: false,
            timestamp_format: timestamp_format.into(),
        }
    }

    /// Fetch statistics and recent calls
    ///
    /// On failure the previous figures stay in place.
    pub async fn load(&mut self, api: &dyn ConsoleApi, toaster: &mut Toaster) {
        match api.dashboard_stats().await {
            Ok(data) => {
                debug!(
                    total = data.stats.total_calls,
                    recent = data.recent_calls.len(),
                    "dashboard loaded"
                );
                self.data = data;
            }
            Err(_) => toaster.error("Failed to fetch dashboard data"),
        }
        self.loaded = true;
    }

    /// Aggregate counts
    pub const fn stats(&self) -> CallCounts {
        self.data.stats
    }

    /// Completed share of all calls, in whole percent
    pub fn success_rate(&self) -> u32 {
        self.data.stats.success_rate()
    }

    /// Most recent calls, newest first
    pub fn recent_calls(&self) -> &[Call] {
        &self.data.recent_calls
    }

    /// Whether a load has finished
    pub const fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// Render the screen
    pub fn render(&self) -> String {
        if !self.loaded {
            return "Loading...\n".to_string();
        }

        let stats = self.stats();
        let mut out = String::new();
        let _ = writeln!(out, "{}", style("Dashboard").bold());
        let _ = writeln!(out, "Overview of your AI voice agent activities\n");
        let _ = writeln!(out, "  Total Calls   {}", stats.total_calls);
        let _ = writeln!(out, "  Completed     {}", style(stats.completed_calls).green());
        let _ = writeln!(out, "  In Progress   {}", style(stats.in_progress_calls).blue());
        let _ = writeln!(out, "  Failed        {}", style(stats.failed_calls).red());
        let _ = writeln!(
            out,
            "\n  Success Rate  {}% of total calls\n",
            style(self.success_rate()).bold()
        );
        let _ = writeln!(out, "{}", style("Recent Calls").bold());
        out.push_str(&call_list(
            self.recent_calls(),
            NO_RECENT_CALLS,
            &self.timestamp_format,
        ));
        out
    }
}
