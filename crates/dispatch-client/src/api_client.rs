//! HTTP client for communicating with the voice agent service API

use crate::api::ConsoleApi;
use crate::envelope::{Envelope, StartCallBody, failure_text_from_body};
use async_trait::async_trait;
use dispatch_core::{
    AgentConfig, AgentConfigDraft, Call, CallDetail, CallResult, DashboardStats, Error, Result,
    SessionGrant, StartCallRequest,
};
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use tracing::{debug, error};

/// API client for making HTTP requests to the voice agent service
///
/// Every path is appended to `base_url`, which already carries the `/api`
/// prefix. The client neither retries nor caches.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    /// Create a new API client
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    /// Create a client that reuses an existing `reqwest` client
    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    /// Base URL requests are sent to
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{path}", self.base_url);
        debug!(%method, %url, "API request");
        self.client.request(method, url)
    }

    /// Send a request and return the response once it has a 2xx status
    async fn send(&self, request: RequestBuilder, action: &str) -> Result<Response> {
        let response = request.send().await.map_err(|e| {
            let err = Error::Transport(format!("Failed to {action}: {e}"));
            error!("API Error: {err}");
            err
        })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let err = Error::api(status.as_u16(), failure_text_from_body(&body));
        error!(status = status.as_u16(), "API Error: {err}");
        Err(err)
    }

    /// Send a request and unwrap the `data` of its envelope
    async fn fetch<T: DeserializeOwned>(&self, request: RequestBuilder, action: &str) -> Result<T> {
        let response = self.send(request, action).await?;
        let status = response.status().as_u16();
        let envelope: Envelope<T> = decode(response, action).await?;
        envelope.into_data(status).inspect_err(|e| error!("API Error: {e}"))
    }
}

async fn decode<T: DeserializeOwned>(response: Response, action: &str) -> Result<T> {
    let bytes = response.bytes().await.map_err(|e| {
        let err = Error::Transport(format!("Failed to {action}: {e}"));
        error!("API Error: {err}");
        err
    })?;
    serde_json::from_slice(&bytes).map_err(|e| {
        error!("API Error: failed to parse response to {action}: {e}");
        Error::Serialization(e)
    })
}

fn segment(id: &str) -> String {
    urlencoding::encode(id).into_owned()
}

#[async_trait]
impl ConsoleApi for ApiClient {
    async fn list_agent_configs(&self) -> Result<Vec<AgentConfig>> {
        self.fetch(
            self.request(Method::GET, "/agent-configs"),
            "fetch agent configurations",
        )
        .await
    }

    async fn get_agent_config(&self, id: &str) -> Result<AgentConfig> {
        let path = format!("/agent-configs/{}", segment(id));
        self.fetch(self.request(Method::GET, &path), "fetch agent configuration")
            .await
    }

    async fn create_agent_config(&self, draft: &AgentConfigDraft) -> Result<AgentConfig> {
        let request = self.request(Method::POST, "/agent-configs").json(draft);
        self.fetch(request, "create agent configuration").await
    }

    async fn update_agent_config(
        &self,
        id: &str,
        draft: &AgentConfigDraft,
    ) -> Result<AgentConfig> {
        let path = format!("/agent-configs/{}", segment(id));
        let request = self.request(Method::PUT, &path).json(draft);
        self.fetch(request, "update agent configuration").await
    }

    async fn delete_agent_config(&self, id: &str) -> Result<()> {
        let action = "delete agent configuration";
        let path = format!("/agent-configs/{}", segment(id));
        let response = self.send(self.request(Method::DELETE, &path), action).await?;
        let status = response.status().as_u16();
        let envelope: Envelope<serde_json::Value> = decode(response, action).await?;
        envelope.into_ack(status).inspect_err(|e| error!("API Error: {e}"))
    }

    async fn list_calls(&self) -> Result<Vec<Call>> {
        self.fetch(self.request(Method::GET, "/calls"), "fetch calls")
            .await
    }

    async fn get_call(&self, id: &str) -> Result<CallDetail> {
        let path = format!("/calls/{}", segment(id));
        self.fetch(self.request(Method::GET, &path), "fetch call details")
            .await
    }

    async fn get_call_results(&self, id: &str) -> Result<CallResult> {
        let path = format!("/calls/{}/results", segment(id));
        self.fetch(self.request(Method::GET, &path), "fetch call results")
            .await
    }

    async fn start_call(&self, request: &StartCallRequest) -> Result<SessionGrant> {
        let action = "start call";
        let builder = self.request(Method::POST, "/calls/start").json(request);
        let response = self.send(builder, action).await?;
        let status = response.status().as_u16();
        let body: StartCallBody = decode(response, action).await?;
        body.into_grant(status).inspect_err(|e| error!("API Error: {e}"))
    }

    async fn dashboard_stats(&self) -> Result<DashboardStats> {
        self.fetch(
            self.request(Method::GET, "/dashboard/stats"),
            "fetch dashboard statistics",
        )
        .await
    }
}
