//! Call results screen: call history and per-call detail
//!
//! Detail requests are ticketed. Each request takes the next sequence
//! number and its response is applied only while that ticket is still the
//! current one, so a slow response for an earlier selection can never
//! replace a newer one. Closing the detail retires the current ticket.

use crate::components::{call_list, outcome_badge, scenario_badge, status_badge};
use crate::notify::Toaster;
use console::style;
use dispatch_client::ConsoleApi;
use dispatch_core::format::{format_duration, format_json, format_timestamp};
use dispatch_core::{Call, CallDetail, CallId, CallResult, Result};
use std::fmt::Write as _;
use tracing::debug;

/// Shown when the service reports no calls
pub const NO_CALLS: &str = "No calls found. Start a test call to see results here.";

/// Identifies one detail request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailTicket {
    seq: u64,
    call_id: CallId,
}

impl DetailTicket {
    /// Sequence number of the request
    pub const fn seq(&self) -> u64 {
        self.seq
    }

    /// Call the request is for
    pub fn call_id(&self) -> &str {
        &self.call_id
    }
}

/// Detail panel state
#[derive(Debug, Clone, PartialEq)]
pub enum DetailState {
    /// Nothing selected
    Idle,
    /// Waiting for the response to `ticket`
    Loading {
        /// The outstanding request
        ticket: DetailTicket,
    },
    /// Detail on display
    Loaded {
        /// Selected call
        call_id: CallId,
        /// Fetched detail
        detail: Box<CallDetail>,
    },
    /// The last request failed; nothing is selected
    Failed {
        /// Call whose detail could not be fetched
        call_id: CallId,
    },
}

/// Call results screen state
#[derive(Debug, Clone)]
pub struct CallResultsPage {
    calls: Vec<Call>,
    loaded: bool,
    detail: DetailState,
    seq: u64,
    timestamp_format: String,
}

impl CallResultsPage {
    /// Create an unloaded screen
    pub fn new(timestamp_format: impl Into<String>) -> Self {
        Self {
            calls: Vec::new(),
            loaded: false,
            detail: DetailState::Idle,
            seq: 0,
            timestamp_format: timestamp_format.into(),
        }
    }

    /// Fetch the call history; also used for explicit refresh
    pub async fn load(&mut self, api: &dyn ConsoleApi, toaster: &mut Toaster) {
        match api.list_calls().await {
            Ok(calls) => {
                debug!(count = calls.len(), "calls loaded");
                self.calls = calls;
            }
            Err(_) => toaster.error("Failed to fetch calls"),
        }
        self.loaded = true;
    }

    /// Cached calls in service order
    pub fn calls(&self) -> &[Call] {
        &self.calls
    }

    /// Detail panel state
    pub const fn detail_state(&self) -> &DetailState {
        &self.detail
    }

    /// Detail on display
    pub fn detail(&self) -> Option<&CallDetail> {
        match &self.detail {
            DetailState::Loaded { detail, .. } => Some(detail.as_ref()),
            _ => None,
        }
    }

    /// Whether a detail request is outstanding
    pub const fn is_detail_loading(&self) -> bool {
        matches!(self.detail, DetailState::Loading { .. })
    }

    /// Issue a ticket for `call_id`, superseding any outstanding request
    pub fn begin_detail(&mut self, call_id: impl Into<CallId>) -> DetailTicket {
        self.seq += 1;
        let ticket = DetailTicket {
            seq: self.seq,
            call_id: call_id.into(),
        };
        self.detail = DetailState::Loading {
            ticket: ticket.clone(),
        };
        ticket
    }

    /// Apply the response for `ticket` if it is still current
    ///
    /// Returns whether the response was applied.
    pub fn finish_detail(
        &mut self,
        ticket: &DetailTicket,
        response: Result<CallDetail>,
        toaster: &mut Toaster,
    ) -> bool {
        if ticket.seq != self.seq || !self.is_detail_loading() {
            debug!(
                seq = ticket.seq,
                current = self.seq,
                call_id = %ticket.call_id,
                "discarding superseded call detail"
            );
            return false;
        }

        self.detail = match response {
            Ok(detail) => DetailState::Loaded {
                call_id: ticket.call_id.clone(),
                detail: Box::new(detail),
            },
            Err(_) => {
                toaster.error("Failed to fetch call details");
                DetailState::Failed {
                    call_id: ticket.call_id.clone(),
                }
            }
        };
        true
    }

    /// Fetch and show the detail of `call_id`
    pub async fn open_detail(
        &mut self,
        call_id: &str,
        api: &dyn ConsoleApi,
        toaster: &mut Toaster,
    ) -> bool {
        let ticket = self.begin_detail(call_id);
        let response = api.get_call(call_id).await;
        self.finish_detail(&ticket, response, toaster)
    }

    /// Hide the detail and retire any outstanding request
    pub fn close_detail(&mut self) {
        self.seq += 1;
        self.detail = DetailState::Idle;
    }

    /// Render the call history
    pub fn render(&self) -> String {
        if !self.loaded {
            return "Loading...\n".to_string();
        }

        let mut out = String::new();
        let _ = writeln!(out, "{}", style("Call Results").bold());
        let _ = writeln!(out, "View and analyze completed call results\n");
        out.push_str(&call_list(&self.calls, NO_CALLS, &self.timestamp_format));

        match &self.detail {
            DetailState::Loading { ticket } => {
                let _ = writeln!(out, "\nLoading details for call {}...", ticket.call_id);
            }
            DetailState::Loaded { detail, .. } => {
                out.push('\n');
                out.push_str(&render_detail(detail, &self.timestamp_format));
            }
            DetailState::Idle | DetailState::Failed { .. } => {}
        }
        out
    }
}

/// Render the full detail of one call
pub fn render_detail(detail: &CallDetail, timestamp_format: &str) -> String {
    let info = &detail.call_info;
    let mut out = String::new();

    let _ = writeln!(out, "{}", style("Call Details").bold().underlined());
    let _ = writeln!(out, "{}", style("Call Information").bold());
    let _ = writeln!(out, "  Driver: {}", info.driver_name);
    if let Some(phone) = info.driver_phone.as_deref().filter(|p| !p.is_empty()) {
        let _ = writeln!(out, "  Phone: {phone}");
    }
    let _ = writeln!(out, "  Load Number: {}", info.load_number);
    let _ = writeln!(
        out,
        "  Agent: {}",
        info.agent_name.as_deref().unwrap_or("Unknown")
    );
    if let Some(scenario) = info.scenario_type {
        let _ = writeln!(out, "  Scenario: {}", scenario_badge(scenario));
    }

    let _ = writeln!(out, "{}", style("Timing").bold());
    let _ = writeln!(
        out,
        "  Started: {}",
        format_timestamp(info.started_at.as_ref(), timestamp_format)
    );
    let _ = writeln!(
        out,
        "  Ended: {}",
        format_timestamp(info.ended_at.as_ref(), timestamp_format)
    );
    let _ = writeln!(out, "  Duration: {}", format_duration(info.duration));
    let _ = writeln!(out, "  Status: {}", status_badge(info.call_status));

    if let Some(results) = &detail.results {
        out.push_str(&render_results(results));
    }

    if let Some(transcript) = detail.transcript.as_deref().filter(|t| !t.is_empty()) {
        let _ = writeln!(out, "{}", style("Full Transcript").bold());
        for line in transcript.lines() {
            let _ = writeln!(out, "  {line}");
        }
    }

    if let Some(data) = &detail.structured_data {
        let _ = writeln!(out, "{}", style("Structured Data").bold());
        for line in format_json(data).lines() {
            let _ = writeln!(out, "  {line}");
        }
    }
    out
}

/// Render extracted call results, listing only the fields that carry a value
pub fn render_results(results: &CallResult) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", style("Call Results").bold());
    let outcome = results
        .call_outcome
        .as_ref()
        .map_or_else(String::new, |o| outcome_badge(o).to_string());
    let _ = writeln!(out, "  Outcome: {outcome}");
    for (label, value) in results.present_fields() {
        let _ = writeln!(out, "  {label}: {value}");
    }
    out
}
