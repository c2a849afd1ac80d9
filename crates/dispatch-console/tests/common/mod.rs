//! Common test utilities and fixtures for console integration tests

#![allow(dead_code, unreachable_pub)]

use chrono::{Duration, TimeZone, Utc};
use dispatch_core::types::CallInfo;
use dispatch_core::{
    AgentConfig, Call, CallDetail, CallOutcome, CallResult, CallStatus, ScenarioType,
};
use std::sync::Once;

static INIT_LOGGER: Once = Once::new();

/// Initialize test logging once per test binary
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter("debug")
            .with_test_writer()
            .init();
    });
}

/// Strip terminal styling from rendered screen text
pub fn plain(text: &str) -> String {
    console::strip_ansi_codes(text).to_string()
}

/// Agent configuration fixtures
pub struct ConfigFixtures;

impl ConfigFixtures {
    /// Routine check-in configuration
    pub fn check_in(id: &str) -> AgentConfig {
        AgentConfig {
            id: id.to_string(),
            name: "Standard Check-in".to_string(),
            scenario_type: ScenarioType::CheckIn,
            system_prompt: "You are a friendly dispatcher.".to_string(),
            conversation_flow: "Greet, ask for status, confirm ETA.".to_string(),
            emergency_triggers: Vec::new(),
            max_retries: 3,
            interruption_sensitivity: 0.5,
            backchannel_enabled: true,
            filler_words_enabled: true,
            created_at: Some(Utc.with_ymd_and_hms(2025, 6, 1, 9, 30, 0).unwrap()),
            updated_at: None,
        }
    }

    /// Emergency configuration with three trigger phrases
    pub fn emergency(id: &str) -> AgentConfig {
        AgentConfig {
            name: "Emergency Protocol".to_string(),
            scenario_type: ScenarioType::Emergency,
            system_prompt: "Stay calm and collect the location.".to_string(),
            conversation_flow: "Confirm safety, get location, escalate.".to_string(),
            emergency_triggers: vec![
                "accident".to_string(),
                "breakdown".to_string(),
                "medical".to_string(),
            ],
            ..Self::check_in(id)
        }
    }
}

/// Call fixtures
pub struct CallFixtures;

impl CallFixtures {
    /// Call in `status`, started `minutes_ago` before a fixed reference time
    pub fn call(id: &str, status: CallStatus, minutes_ago: i64) -> Call {
        let reference = Utc.with_ymd_and_hms(2025, 6, 2, 12, 0, 0).unwrap();
        Call {
            id: id.to_string(),
            call_id: Some(format!("rt-{id}")),
            agent_config_id: Some("cfg-1".to_string()),
            driver_name: format!("Driver {id}"),
            driver_phone: Some("+1-555-0100".to_string()),
            load_number: format!("LOAD-{id}"),
            call_status: status,
            started_at: Some(reference - Duration::minutes(minutes_ago)),
            ended_at: None,
            duration: Some(95),
            agent_configs: None,
        }
    }

    /// Full detail of a completed call with extracted results
    pub fn detail(id: &str) -> CallDetail {
        CallDetail {
            call_info: CallInfo {
                id: id.to_string(),
                driver_name: format!("Driver {id}"),
                driver_phone: None,
                load_number: format!("LOAD-{id}"),
                agent_name: Some("Standard Check-in".to_string()),
                scenario_type: Some(ScenarioType::CheckIn),
                call_status: CallStatus::Completed,
                started_at: None,
                ended_at: None,
                duration: Some(95),
            },
            results: Some(CallResult {
                call_id: Some(id.to_string()),
                call_outcome: Some(CallOutcome::InTransitUpdate),
                driver_status: Some("Driving".to_string()),
                current_location: Some("I-10 near Indio".to_string()),
                eta: Some("Tomorrow 8:00 AM".to_string()),
                ..CallResult::default()
            }),
            transcript: Some(format!("Agent: Hi Driver {id}\nDriver: On my way")),
            structured_data: Some(serde_json::json!({ "load": id })),
        }
    }
}
