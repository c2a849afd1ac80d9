//! The remote operations the console depends on

use async_trait::async_trait;
use dispatch_core::{
    AgentConfig, AgentConfigDraft, Call, CallDetail, CallResult, DashboardStats, Result,
    SessionGrant, StartCallRequest,
};

/// One method per remote operation of the voice agent service
///
/// Implementations pass failures straight through: no retries, no caching.
#[async_trait]
pub trait ConsoleApi: Send + Sync {
    /// `GET /agent-configs`
    async fn list_agent_configs(&self) -> Result<Vec<AgentConfig>>;

    /// `GET /agent-configs/{id}`
    async fn get_agent_config(&self, id: &str) -> Result<AgentConfig>;

    /// `POST /agent-configs`
    async fn create_agent_config(&self, draft: &AgentConfigDraft) -> Result<AgentConfig>;

    /// `PUT /agent-configs/{id}`
    async fn update_agent_config(&self, id: &str, draft: &AgentConfigDraft)
    -> Result<AgentConfig>;

    /// `DELETE /agent-configs/{id}`
    async fn delete_agent_config(&self, id: &str) -> Result<()>;

    /// `GET /calls`
    async fn list_calls(&self) -> Result<Vec<Call>>;

    /// `GET /calls/{id}`, including results and transcript
    async fn get_call(&self, id: &str) -> Result<CallDetail>;

    /// `GET /calls/{id}/results`
    async fn get_call_results(&self, id: &str) -> Result<CallResult>;

    /// `POST /calls/start`
    async fn start_call(&self, request: &StartCallRequest) -> Result<SessionGrant>;

    /// `GET /dashboard/stats`
    async fn dashboard_stats(&self) -> Result<DashboardStats>;
}
