//! Call list rendering shared by the dashboard and the results screen

use super::badge::status_badge;
use console::style;
use dispatch_core::Call;
use dispatch_core::format::{format_duration, format_timestamp};
use std::fmt::Write as _;

/// Agent name shown when the service did not join one in
pub const UNKNOWN_AGENT: &str = "Unknown";

/// Render one call as a short block of lines
pub fn call_entry(call: &Call, timestamp_format: &str) -> String {
    let mut out = format!(
        "{} - Load #{}  {}\n",
        style(&call.driver_name).bold(),
        call.load_number,
        status_badge(call.call_status)
    );

    let agent = call.agent_name().unwrap_or(UNKNOWN_AGENT);
    match call.driver_phone.as_deref().filter(|p| !p.is_empty()) {
        Some(phone) => {
            let _ = writeln!(out, "    {phone} • Agent: {agent}");
        }
        None => {
            let _ = writeln!(out, "    Agent: {agent}");
        }
    }

    let _ = write!(
        out,
        "    Started: {}",
        format_timestamp(call.started_at.as_ref(), timestamp_format)
    );
    if call.duration.is_some_and(|d| d > 0) {
        let _ = write!(out, "  Duration: {}", format_duration(call.duration));
    }
    let _ = write!(out, "\n    {}", style(format!("id: {}", call.id)).dim());
    out
}

/// Render a list of calls, or `empty_message` when there are none
pub fn call_list(calls: &[Call], empty_message: &str, timestamp_format: &str) -> String {
    if calls.is_empty() {
        return format!("  {empty_message}\n");
    }

    calls.iter().fold(String::new(), |mut out, call| {
        for line in call_entry(call, timestamp_format).lines() {
            let _ = writeln!(out, "  {line}");
        }
        out.push('\n');
        out
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use dispatch_core::CallStatus;
    use dispatch_core::format::DEFAULT_TIMESTAMP_FORMAT;
    use dispatch_core::types::AgentSummary;

    fn call(duration: Option<u32>) -> Call {
        Call {
            id: "call-1".to_string(),
            call_id: None,
            agent_config_id: Some("cfg-1".to_string()),
            driver_name: "Mike Johnson".to_string(),
            driver_phone: Some("+15550100".to_string()),
            load_number: "7891-B".to_string(),
            call_status: CallStatus::Completed,
            started_at: None,
            ended_at: None,
            duration,
            agent_configs: Some(AgentSummary {
                name: Some("Check-in Agent".to_string()),
                scenario_type: None,
            }),
        }
    }

    #[test]
    fn test_entry_lists_driver_agent_and_duration() {
        let text = console::strip_ansi_codes(&call_entry(&call(Some(125)), DEFAULT_TIMESTAMP_FORMAT))
            .to_string();

        assert!(text.starts_with("Mike Johnson - Load #7891-B  [Completed]"));
        assert!(text.contains("+15550100 • Agent: Check-in Agent"));
        assert!(text.contains("Started: N/A"));
        assert!(text.contains("Duration: 2:05"));
    }

    #[test]
    fn test_entry_omits_zero_duration() {
        let text = call_entry(&call(Some(0)), DEFAULT_TIMESTAMP_FORMAT);
        assert!(!text.contains("Duration"));
    }

    #[test]
    fn test_empty_list_message() {
        assert_eq!(
            call_list(&[], "No recent calls found", DEFAULT_TIMESTAMP_FORMAT),
            "  No recent calls found\n"
        );
    }
}
