//! In-memory voice agent service for testing

use crate::api::ConsoleApi;
use async_trait::async_trait;
use chrono::Utc;
use dispatch_core::{
    AgentConfig, AgentConfigDraft, Call, CallCounts, CallDetail, CallId, CallResult, CallStatus,
    DashboardStats, Error, Result, SessionGrant, StartCallRequest,
};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;
use uuid::Uuid;

/// Number of calls the derived dashboard lists
const RECENT_CALLS: usize = 10;

/// Remote operations of [`ConsoleApi`], for failure injection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    /// `GET /agent-configs`
    ListAgentConfigs,
    /// `GET /agent-configs/{id}`
    GetAgentConfig,
    /// `POST /agent-configs`
    CreateAgentConfig,
    /// `PUT /agent-configs/{id}`
    UpdateAgentConfig,
    /// `DELETE /agent-configs/{id}`
    DeleteAgentConfig,
    /// `GET /calls`
    ListCalls,
    /// `GET /calls/{id}`
    GetCall,
    /// `GET /calls/{id}/results`
    GetCallResults,
    /// `POST /calls/start`
    StartCall,
    /// `GET /dashboard/stats`
    DashboardStats,
}

#[derive(Debug, Default)]
struct State {
    configs: Vec<AgentConfig>,
    calls: Vec<Call>,
    details: HashMap<CallId, CallDetail>,
    results: HashMap<CallId, CallResult>,
    stats: Option<DashboardStats>,
    started: Vec<StartCallRequest>,
    requests: Vec<String>,
}

/// Mock voice agent service
///
/// Holds configurations and calls in memory, records every request as
/// `"METHOD /path"`, and can be told to fail individual operations.
#[derive(Debug, Clone, Default)]
pub struct MockApi {
    state: Arc<Mutex<State>>,
    failures: HashMap<Operation, (u16, Option<String>)>,
    detail_delays: HashMap<CallId, Duration>,
    withhold_grant: bool,
}

impl MockApi {
    /// Create an empty mock service
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed agent configurations
    #[must_use]
    pub fn with_configs(self, configs: Vec<AgentConfig>) -> Self {
        self.state.lock().configs = configs;
        self
    }

    /// Seed calls
    #[must_use]
    pub fn with_calls(self, calls: Vec<Call>) -> Self {
        self.state.lock().calls = calls;
        self
    }

    /// Seed the detail returned for one call
    #[must_use]
    pub fn with_detail(self, detail: CallDetail) -> Self {
        let id = detail.call_info.id.clone();
        self.state.lock().details.insert(id, detail);
        self
    }

    /// Seed the results returned for one call
    #[must_use]
    pub fn with_results(self, call_id: impl Into<CallId>, results: CallResult) -> Self {
        self.state.lock().results.insert(call_id.into(), results);
        self
    }

    /// Fix the dashboard statistics instead of deriving them from the calls
    #[must_use]
    pub fn with_stats(self, stats: DashboardStats) -> Self {
        self.state.lock().stats = Some(stats);
        self
    }

    /// Make `operation` answer with an API error
    #[must_use]
    pub fn failing_on(mut self, operation: Operation, status: u16, detail: Option<&str>) -> Self {
        self.failures
            .insert(operation, (status, detail.map(ToString::to_string)));
        self
    }

    /// Accept started calls without handing out session credentials
    #[must_use]
    pub fn without_session_grant(mut self) -> Self {
        self.withhold_grant = true;
        self
    }

    /// Delay the detail response of one call
    #[must_use]
    pub fn with_detail_delay(mut self, call_id: impl Into<CallId>, delay: Duration) -> Self {
        self.detail_delays.insert(call_id.into(), delay);
        self
    }

    /// Requests seen so far, in order
    pub fn requests(&self) -> Vec<String> {
        self.state.lock().requests.clone()
    }

    /// Number of requests seen so far
    pub fn request_count(&self) -> usize {
        self.state.lock().requests.len()
    }

    /// Start-call bodies received so far
    pub fn started_calls(&self) -> Vec<StartCallRequest> {
        self.state.lock().started.clone()
    }

    /// Configurations currently stored
    pub fn configs(&self) -> Vec<AgentConfig> {
        self.state.lock().configs.clone()
    }

    fn record(&self, operation: Operation, line: String) -> Result<()> {
        self.state.lock().requests.push(line);
        match self.failures.get(&operation) {
            Some((status, detail)) => Err(Error::api(*status, detail.clone())),
            None => Ok(()),
        }
    }

    fn derived_stats(calls: &[Call]) -> DashboardStats {
        let count = |status: CallStatus| {
            calls
                .iter()
                .filter(|call| call.call_status == status)
                .count() as u64
        };

        let mut recent_calls = calls.to_vec();
        recent_calls.sort_by(|a, b| b.started_at.cmp(&a.started_at));
        recent_calls.truncate(RECENT_CALLS);

        DashboardStats {
            stats: CallCounts {
                total_calls: calls.len() as u64,
                completed_calls: count(CallStatus::Completed),
                in_progress_calls: count(CallStatus::InProgress),
                failed_calls: count(CallStatus::Failed),
            },
            recent_calls,
        }
    }
}

fn config_not_found() -> Error {
    Error::api(404, Some("Agent config not found".to_string()))
}

fn call_not_found() -> Error {
    Error::api(404, Some("Call not found".to_string()))
}

fn apply_draft(config: &mut AgentConfig, draft: &AgentConfigDraft) {
    config.name.clone_from(&draft.name);
    config.scenario_type = draft.scenario_type;
    config.system_prompt.clone_from(&draft.system_prompt);
    config.conversation_flow.clone_from(&draft.conversation_flow);
    config.emergency_triggers.clone_from(&draft.emergency_triggers);
    config.max_retries = draft.max_retries;
    config.interruption_sensitivity = draft.interruption_sensitivity;
    config.backchannel_enabled = draft.backchannel_enabled;
    config.filler_words_enabled = draft.filler_words_enabled;
    config.updated_at = Some(Utc::now());
}

#[async_trait]
impl ConsoleApi for MockApi {
    async fn list_agent_configs(&self) -> Result<Vec<AgentConfig>> {
        self.record(Operation::ListAgentConfigs, "GET /agent-configs".to_string())?;
        Ok(self.state.lock().configs.clone())
    }

    async fn get_agent_config(&self, id: &str) -> Result<AgentConfig> {
        self.record(Operation::GetAgentConfig, format!("GET /agent-configs/{id}"))?;
        self.state
            .lock()
            .configs
            .iter()
            .find(|config| config.id == id)
            .cloned()
            .ok_or_else(config_not_found)
    }

    async fn create_agent_config(&self, draft: &AgentConfigDraft) -> Result<AgentConfig> {
        self.record(Operation::CreateAgentConfig, "POST /agent-configs".to_string())?;

        let config = AgentConfig {
            id: Uuid::new_v4().to_string(),
            name: draft.name.clone(),
            scenario_type: draft.scenario_type,
            system_prompt: draft.system_prompt.clone(),
            conversation_flow: draft.conversation_flow.clone(),
            emergency_triggers: draft.emergency_triggers.clone(),
            max_retries: draft.max_retries,
            interruption_sensitivity: draft.interruption_sensitivity,
            backchannel_enabled: draft.backchannel_enabled,
            filler_words_enabled: draft.filler_words_enabled,
            created_at: Some(Utc::now()),
            updated_at: None,
        };

        self.state.lock().configs.insert(0, config.clone());
        Ok(config)
    }

    async fn update_agent_config(
        &self,
        id: &str,
        draft: &AgentConfigDraft,
    ) -> Result<AgentConfig> {
        self.record(Operation::UpdateAgentConfig, format!("PUT /agent-configs/{id}"))?;

        let mut state = self.state.lock();
        let config = state
            .configs
            .iter_mut()
            .find(|config| config.id == id)
            .ok_or_else(config_not_found)?;
        apply_draft(config, draft);
        Ok(config.clone())
    }

    async fn delete_agent_config(&self, id: &str) -> Result<()> {
        self.record(
            Operation::DeleteAgentConfig,
            format!("DELETE /agent-configs/{id}"),
        )?;

        let mut state = self.state.lock();
        let before = state.configs.len();
        state.configs.retain(|config| config.id != id);
        if state.configs.len() == before {
            return Err(config_not_found());
        }
        Ok(())
    }

    async fn list_calls(&self) -> Result<Vec<Call>> {
        self.record(Operation::ListCalls, "GET /calls".to_string())?;
        Ok(self.state.lock().calls.clone())
    }

    async fn get_call(&self, id: &str) -> Result<CallDetail> {
        self.record(Operation::GetCall, format!("GET /calls/{id}"))?;

        if let Some(delay) = self.detail_delays.get(id) {
            sleep(*delay).await;
        }

        self.state
            .lock()
            .details
            .get(id)
            .cloned()
            .ok_or_else(call_not_found)
    }

    async fn get_call_results(&self, id: &str) -> Result<CallResult> {
        self.record(Operation::GetCallResults, format!("GET /calls/{id}/results"))?;
        self.state
            .lock()
            .results
            .get(id)
            .cloned()
            .ok_or_else(|| Error::api(404, Some("Call results not found".to_string())))
    }

    async fn start_call(&self, request: &StartCallRequest) -> Result<SessionGrant> {
        self.record(Operation::StartCall, "POST /calls/start".to_string())?;

        let mut state = self.state.lock();
        if !state
            .configs
            .iter()
            .any(|config| config.id == request.agent_config_id)
        {
            return Err(config_not_found());
        }
        state.started.push(request.clone());

        let call_id = Uuid::new_v4().to_string();
        if self.withhold_grant {
            return Err(Error::SessionNotGranted {
                call_id: Some(call_id),
            });
        }
        Ok(SessionGrant {
            token: format!("mock-token-{call_id}"),
            agent_id: format!("mock-agent-{}", request.agent_config_id),
            call_id: Some(call_id),
        })
    }

    async fn dashboard_stats(&self) -> Result<DashboardStats> {
        self.record(Operation::DashboardStats, "GET /dashboard/stats".to_string())?;

        let state = self.state.lock();
        Ok(state
            .stats
            .clone()
            .unwrap_or_else(|| Self::derived_stats(&state.calls)))
    }
}
