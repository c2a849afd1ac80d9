//! Core data types for the voice dispatch console
//!
//! These mirror the JSON resources of the external voice-agent service. The
//! console never owns them; it only caches what the service returns.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use validator::Validate;

/// Agent configuration identifier type
pub type ConfigId = String;

/// Call identifier type
pub type CallId = String;

/// Lowest accepted retry ceiling
pub const MIN_RETRIES: u8 = 1;

/// Highest accepted retry ceiling
pub const MAX_RETRIES: u8 = 10;

/// Scenario an agent configuration is written for
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ScenarioType {
    /// Routine driver check-in
    #[default]
    CheckIn,
    /// Emergency handling
    Emergency,
}

impl ScenarioType {
    /// Human readable label
    pub const fn label(self) -> &'static str {
        match self {
            Self::CheckIn => "Check-in",
            Self::Emergency => "Emergency",
        }
    }
}

impl std::fmt::Display for ScenarioType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::CheckIn => write!(f, "check_in"),
            Self::Emergency => write!(f, "emergency"),
        }
    }
}

impl std::str::FromStr for ScenarioType {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "check_in" | "checkin" => Ok(Self::CheckIn),
            "emergency" => Ok(Self::Emergency),
            other => Err(crate::Error::validation(
                "scenario_type",
                format!("unknown scenario '{other}', expected check_in or emergency"),
            )),
        }
    }
}

/// Call lifecycle status
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum CallStatus {
    /// Call record created, not yet connected
    #[default]
    Initiated,
    /// Call is live
    InProgress,
    /// Call finished normally
    Completed,
    /// Call could not be completed
    Failed,
    /// Status value this console does not know about
    #[serde(other)]
    Unknown,
}

impl std::fmt::Display for CallStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Initiated => write!(f, "initiated"),
            Self::InProgress => write!(f, "in_progress"),
            Self::Completed => write!(f, "completed"),
            Self::Failed => write!(f, "failed"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}

/// The service's classification of how a call concluded
///
/// The set is open: values added by the service later are kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum CallOutcome {
    /// Driver reported progress en route
    InTransitUpdate,
    /// Driver confirmed arrival
    ArrivalConfirmation,
    /// An emergency was detected during the call
    EmergencyDetected,
    /// Driver did not cooperate
    UncooperativeDriver,
    /// The call itself failed
    CallFailed,
    /// Any other outcome label
    Other(String),
}

impl CallOutcome {
    /// Label as the service spells it
    pub fn as_str(&self) -> &str {
        match self {
            Self::InTransitUpdate => "In-Transit Update",
            Self::ArrivalConfirmation => "Arrival Confirmation",
            Self::EmergencyDetected => "Emergency Detected",
            Self::UncooperativeDriver => "Uncooperative Driver",
            Self::CallFailed => "Call Failed",
            Self::Other(label) => label,
        }
    }
}

impl From<String> for CallOutcome {
    fn from(value: String) -> Self {
        match value.as_str() {
            "In-Transit Update" => Self::InTransitUpdate,
            "Arrival Confirmation" => Self::ArrivalConfirmation,
            "Emergency Detected" => Self::EmergencyDetected,
            "Uncooperative Driver" => Self::UncooperativeDriver,
            "Call Failed" => Self::CallFailed,
            _ => Self::Other(value),
        }
    }
}

impl From<CallOutcome> for String {
    fn from(value: CallOutcome) -> Self {
        match value {
            CallOutcome::Other(label) => label,
            known => known.as_str().to_string(),
        }
    }
}

impl std::fmt::Display for CallOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A saved script/behavior profile for an automated caller
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AgentConfig {
    /// Unique identifier
    pub id: ConfigId,

    /// Display name
    pub name: String,

    /// Scenario category
    pub scenario_type: ScenarioType,

    /// System prompt given to the voice agent
    pub system_prompt: String,

    /// Conversation flow script
    pub conversation_flow: String,

    /// Emergency trigger phrases, in insertion order
    #[serde(default, deserialize_with = "null_as_default")]
    pub emergency_triggers: Vec<String>,

    /// Retry ceiling, clamped into `1..=10` on decode
    #[serde(default = "default_max_retries", deserialize_with = "lenient_retries")]
    pub max_retries: u8,

    /// Interruption sensitivity, clamped into `0.0..=1.0` on decode
    #[serde(
        default = "default_interruption_sensitivity",
        deserialize_with = "lenient_sensitivity"
    )]
    pub interruption_sensitivity: f64,

    /// Whether the agent emits backchannel cues
    #[serde(default = "default_true", deserialize_with = "null_as_true")]
    pub backchannel_enabled: bool,

    /// Whether the agent uses filler words
    #[serde(default = "default_true", deserialize_with = "null_as_true")]
    pub filler_words_enabled: bool,

    /// When the service created the configuration
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub created_at: Option<DateTime<Utc>>,

    /// When the service last updated the configuration
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl AgentConfig {
    /// Draft pre-filled from this configuration, for editing
    pub fn to_draft(&self) -> AgentConfigDraft {
        AgentConfigDraft {
            name: self.name.clone(),
            scenario_type: self.scenario_type,
            system_prompt: self.system_prompt.clone(),
            conversation_flow: self.conversation_flow.clone(),
            emergency_triggers: self.emergency_triggers.clone(),
            max_retries: self.max_retries.clamp(MIN_RETRIES, MAX_RETRIES),
            interruption_sensitivity: self.interruption_sensitivity.clamp(0.0, 1.0),
            backchannel_enabled: self.backchannel_enabled,
            filler_words_enabled: self.filler_words_enabled,
        }
    }
}

/// Body sent to create or update an agent configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Validate)]
pub struct AgentConfigDraft {
    /// Display name
    #[validate(length(min = 1, message = "Configuration name is required"))]
    pub name: String,

    /// Scenario category
    pub scenario_type: ScenarioType,

    /// System prompt
    #[validate(length(min = 1, message = "System prompt is required"))]
    pub system_prompt: String,

    /// Conversation flow script
    #[validate(length(min = 1, message = "Conversation flow is required"))]
    pub conversation_flow: String,

    /// Emergency trigger phrases, in insertion order
    pub emergency_triggers: Vec<String>,

    /// Retry ceiling, kept within `1..=10` by [`Self::set_max_retries`]
    pub max_retries: u8,

    /// Interruption sensitivity, kept within `0.0..=1.0`
    pub interruption_sensitivity: f64,

    /// Backchannel cues
    pub backchannel_enabled: bool,

    /// Filler words
    pub filler_words_enabled: bool,
}

impl Default for AgentConfigDraft {
    fn default() -> Self {
        Self {
            name: String::new(),
            scenario_type: ScenarioType::CheckIn,
            system_prompt: String::new(),
            conversation_flow: String::new(),
            emergency_triggers: Vec::new(),
            max_retries: default_max_retries(),
            interruption_sensitivity: default_interruption_sensitivity(),
            backchannel_enabled: true,
            filler_words_enabled: true,
        }
    }
}

impl AgentConfigDraft {
    /// Set the retry ceiling, clamped to the accepted range
    pub fn set_max_retries(&mut self, value: i64) {
        self.max_retries = u8::try_from(value.clamp(i64::from(MIN_RETRIES), i64::from(MAX_RETRIES)))
            .unwrap_or(MIN_RETRIES);
    }

    /// Set the interruption sensitivity, clamped to `0.0..=1.0`
    ///
    /// NaN is ignored and leaves the current value.
    pub fn set_interruption_sensitivity(&mut self, value: f64) {
        if !value.is_nan() {
            self.interruption_sensitivity = value.clamp(0.0, 1.0);
        }
    }

    /// Append a trigger phrase
    ///
    /// The input is trimmed; empty input is ignored. Returns whether a phrase
    /// was added. Duplicates are kept.
    pub fn add_trigger(&mut self, input: &str) -> bool {
        let phrase = input.trim();
        if phrase.is_empty() {
            return false;
        }
        self.emergency_triggers.push(phrase.to_string());
        true
    }

    /// Remove the trigger at `index`, returning it if it existed
    pub fn remove_trigger(&mut self, index: usize) -> Option<String> {
        (index < self.emergency_triggers.len()).then(|| self.emergency_triggers.remove(index))
    }

    /// Check the required text fields
    ///
    /// Reports the first missing field in form order.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Validation`] naming the missing field.
    pub fn check(&self) -> crate::Result<()> {
        let Err(errors) = self.validate() else {
            return Ok(());
        };

        let field_errors = errors.field_errors();
        for field in ["name", "system_prompt", "conversation_flow"] {
            if let Some(first) = field_errors.get(field).and_then(|errs| errs.first()) {
                let message = first
                    .message
                    .as_ref()
                    .map_or_else(|| format!("{field} is invalid"), ToString::to_string);
                return Err(crate::Error::validation(field, message));
            }
        }
        Err(crate::Error::validation("form", errors.to_string()))
    }
}

/// Agent fields the call list joins in
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct AgentSummary {
    /// Configuration name
    #[serde(default)]
    pub name: Option<String>,

    /// Scenario category
    #[serde(default)]
    pub scenario_type: Option<ScenarioType>,
}

/// One execution of a configuration against a driver and load
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Call {
    /// Unique identifier
    pub id: CallId,

    /// Identifier assigned by the voice provider
    #[serde(default)]
    pub call_id: Option<String>,

    /// Configuration the call used
    #[serde(default)]
    pub agent_config_id: Option<ConfigId>,

    /// Driver name
    #[serde(default)]
    pub driver_name: String,

    /// Driver phone, absent for in-app calls
    #[serde(default)]
    pub driver_phone: Option<String>,

    /// Load number
    #[serde(default)]
    pub load_number: String,

    /// Lifecycle status
    #[serde(default, deserialize_with = "null_as_default")]
    pub call_status: CallStatus,

    /// When the call started
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub started_at: Option<DateTime<Utc>>,

    /// When the call ended
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub ended_at: Option<DateTime<Utc>>,

    /// Duration in seconds
    #[serde(default)]
    pub duration: Option<u32>,

    /// Joined agent configuration fields
    #[serde(default)]
    pub agent_configs: Option<AgentSummary>,
}

impl Call {
    /// Name of the agent configuration used, if the service joined it in
    pub fn agent_name(&self) -> Option<&str> {
        self.agent_configs.as_ref()?.name.as_deref()
    }
}

/// Structured results the service extracted from a call
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CallResult {
    /// Call the results belong to
    #[serde(default)]
    pub call_id: Option<CallId>,

    /// Outcome classification
    #[serde(default)]
    pub call_outcome: Option<CallOutcome>,

    /// Driver status as reported
    #[serde(default)]
    pub driver_status: Option<String>,

    /// Driver's current location
    #[serde(default)]
    pub current_location: Option<String>,

    /// Estimated time of arrival
    #[serde(default)]
    pub eta: Option<String>,

    /// Kind of emergency
    #[serde(default)]
    pub emergency_type: Option<String>,

    /// Where the emergency is
    #[serde(default)]
    pub emergency_location: Option<String>,

    /// Escalation status
    #[serde(default)]
    pub escalation_status: Option<String>,

    /// Full transcript text
    #[serde(default)]
    pub raw_transcript: Option<String>,

    /// Arbitrary extracted payload
    #[serde(default)]
    pub structured_data: Option<serde_json::Value>,
}

impl CallResult {
    /// Labelled optional fields that carry a value, in display order
    pub fn present_fields(&self) -> Vec<(&'static str, &str)> {
        [
            ("Driver Status", &self.driver_status),
            ("Current Location", &self.current_location),
            ("ETA", &self.eta),
            ("Emergency Type", &self.emergency_type),
            ("Emergency Location", &self.emergency_location),
            ("Escalation Status", &self.escalation_status),
        ]
        .into_iter()
        .filter_map(|(label, value)| {
            value
                .as_deref()
                .filter(|v| !v.is_empty())
                .map(|v| (label, v))
        })
        .collect()
    }
}

/// Call fields of a call detail response
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CallInfo {
    /// Unique identifier
    pub id: CallId,

    /// Driver name
    #[serde(default)]
    pub driver_name: String,

    /// Driver phone
    #[serde(default)]
    pub driver_phone: Option<String>,

    /// Load number
    #[serde(default)]
    pub load_number: String,

    /// Agent configuration name
    #[serde(default)]
    pub agent_name: Option<String>,

    /// Scenario category
    #[serde(default)]
    pub scenario_type: Option<ScenarioType>,

    /// Lifecycle status
    #[serde(default, deserialize_with = "null_as_default")]
    pub call_status: CallStatus,

    /// When the call started
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub started_at: Option<DateTime<Utc>>,

    /// When the call ended
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub ended_at: Option<DateTime<Utc>>,

    /// Duration in seconds
    #[serde(default)]
    pub duration: Option<u32>,
}

/// Full detail of one call including results and transcript
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CallDetail {
    /// Call fields
    pub call_info: CallInfo,

    /// Extracted results
    #[serde(default)]
    pub results: Option<CallResult>,

    /// Transcript text
    #[serde(default)]
    pub transcript: Option<String>,

    /// Arbitrary extracted payload
    #[serde(default)]
    pub structured_data: Option<serde_json::Value>,
}

/// Aggregate call counts
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CallCounts {
    /// All calls
    #[serde(default)]
    pub total_calls: u64,
    /// Completed calls
    #[serde(default)]
    pub completed_calls: u64,
    /// Calls in progress
    #[serde(default)]
    pub in_progress_calls: u64,
    /// Failed calls
    #[serde(default)]
    pub failed_calls: u64,
}

impl CallCounts {
    /// Completed share of all calls as a whole percentage
    ///
    /// Rounds half up; zero calls yields 0.
    #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn success_rate(&self) -> u32 {
        if self.total_calls == 0 {
            return 0;
        }
        let rate = (self.completed_calls as f64 / self.total_calls as f64) * 100.0;
        rate.round() as u32
    }
}

/// Dashboard read model, recomputed by the service on every request
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct DashboardStats {
    /// Aggregate counts
    #[serde(default)]
    pub stats: CallCounts,

    /// Most recent calls, newest first
    #[serde(default, deserialize_with = "null_as_default")]
    pub recent_calls: Vec<Call>,
}

/// Body of a start-call request
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StartCallRequest {
    /// Configuration to run
    pub agent_config_id: ConfigId,
    /// Driver name
    pub driver_name: String,
    /// Load number
    pub load_number: String,
    /// Driver phone; in-app calls leave it out
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub driver_phone: Option<String>,
}

/// Credentials for joining a started real-time session
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SessionGrant {
    /// Session access token
    #[serde(alias = "access_token")]
    pub token: String,
    /// Voice agent identifier
    pub agent_id: String,
    /// Call record created for the session
    #[serde(default)]
    pub call_id: Option<CallId>,
}

const fn default_max_retries() -> u8 {
    3
}

const fn default_interruption_sensitivity() -> f64 {
    0.5
}

const fn default_true() -> bool {
    true
}

/// Treat an explicit JSON `null` like a missing field
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn null_as_true<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<bool>::deserialize(deserializer)?.unwrap_or(true))
}

/// Any integer the service stores, clamped into the accepted retry range
fn lenient_retries<'de, D>(deserializer: D) -> Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(raw) = Option::<i64>::deserialize(deserializer)? else {
        return Ok(default_max_retries());
    };
    let clamped = raw.clamp(i64::from(MIN_RETRIES), i64::from(MAX_RETRIES));
    Ok(u8::try_from(clamped).unwrap_or(MIN_RETRIES))
}

/// `null` reads as the default sensitivity, anything else is clamped
fn lenient_sensitivity<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<f64>::deserialize(deserializer)?
        .map_or_else(default_interruption_sensitivity, |v| v.clamp(0.0, 1.0)))
}

/// Accept RFC 3339 timestamps as well as naive ones, which are read as UTC
fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(raw) = Option::<String>::deserialize(deserializer)? else {
        return Ok(None);
    };
    if raw.is_empty() {
        return Ok(None);
    }
    if let Ok(ts) = DateTime::parse_from_rfc3339(&raw) {
        return Ok(Some(ts.with_timezone(&Utc)));
    }
    NaiveDateTime::parse_from_str(&raw, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(&raw, "%Y-%m-%d %H:%M:%S%.f"))
        .map(|naive| Some(naive.and_utc()))
        .map_err(|e| serde::de::Error::custom(format!("invalid timestamp '{raw}': {e}")))
}
