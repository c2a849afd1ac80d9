//! Call trigger screen: start a test call and join its real-time session

use crate::components::scenario_badge;
use crate::notify::Toaster;
use console::style;
use dispatch_client::{ConsoleApi, RealtimeSdk, SessionHandle};
use dispatch_core::{AgentConfig, ConfigId, Error, SessionGrant, StartCallRequest};
use std::fmt::Write as _;
use tracing::{debug, info, warn};

/// Shown instead of the form when no configuration exists
pub const NO_CONFIGS_GUIDANCE: &str =
    "No agent configurations available. Please create an agent configuration first.";

/// Call trigger screen state
#[derive(Debug, Clone, Default)]
pub struct CallTriggerPage {
    configs: Vec<AgentConfig>,
    loaded: bool,
    selected: Option<ConfigId>,
    driver_name: String,
    load_number: String,
    driver_phone: Option<String>,
    last_grant: Option<SessionGrant>,
    session: Option<SessionHandle>,
}

impl CallTriggerPage {
    /// Create an unloaded screen
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch configurations and pre-select the first one
    ///
    /// A selection that still exists is kept.
    pub async fn load(&mut self, api: &dyn ConsoleApi, toaster: &mut Toaster) {
        match api.list_agent_configs().await {
            Ok(configs) => {
                self.configs = configs;
                let still_there = self
                    .selected
                    .as_deref()
                    .is_some_and(|id| self.configs.iter().any(|c| c.id == id));
                if !still_there {
                    self.selected = self.configs.first().map(|c| c.id.clone());
                }
                debug!(count = self.configs.len(), selected = ?self.selected, "call trigger loaded");
            }
            Err(_) => toaster.error("Failed to fetch agent configurations"),
        }
        self.loaded = true;
    }

    /// Configurations offered for selection
    pub fn configs(&self) -> &[AgentConfig] {
        &self.configs
    }

    /// Select configuration `id`; unknown ids are refused
    pub fn select(&mut self, id: &str) -> bool {
        if self.configs.iter().any(|c| c.id == id) {
            self.selected = Some(id.to_string());
            true
        } else {
            false
        }
    }

    /// Clear the selection
    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    /// Selected configuration
    pub fn selected_config(&self) -> Option<&AgentConfig> {
        let id = self.selected.as_deref()?;
        self.configs.iter().find(|c| c.id == id)
    }

    /// Driver name as entered
    pub fn driver_name(&self) -> &str {
        &self.driver_name
    }

    /// Load number as entered
    pub fn load_number(&self) -> &str {
        &self.load_number
    }

    /// Set the driver name
    pub fn set_driver_name(&mut self, value: impl Into<String>) {
        self.driver_name = value.into();
    }

    /// Set the load number
    pub fn set_load_number(&mut self, value: impl Into<String>) {
        self.load_number = value.into();
    }

    /// Set the driver phone; blank clears it
    pub fn set_driver_phone(&mut self, value: Option<String>) {
        self.driver_phone = value.filter(|p| !p.trim().is_empty());
    }

    /// Whether the form accepts submissions at all
    pub fn can_submit(&self) -> bool {
        !self.configs.is_empty()
    }

    /// Guidance shown when submission is impossible
    pub fn guidance(&self) -> Option<&'static str> {
        (self.loaded && self.configs.is_empty()).then_some(NO_CONFIGS_GUIDANCE)
    }

    /// Credentials of the last started call
    pub const fn last_grant(&self) -> Option<&SessionGrant> {
        self.last_grant.as_ref()
    }

    /// Real-time session joined for the last started call
    pub const fn session(&self) -> Option<&SessionHandle> {
        self.session.as_ref()
    }

    /// What the agent opens the call with
    ///
    /// Only available once a driver name, a load number and a configuration
    /// are all present.
    pub fn preview(&self) -> Option<String> {
        if self.driver_name.is_empty() || self.load_number.is_empty() {
            return None;
        }
        self.selected_config()?;
        Some(format!(
            "Hi {}, this is Dispatch with a check call on load {}. Can you give me an update on your status?",
            self.driver_name, self.load_number
        ))
    }

    /// Start a call with the current form and join its session
    ///
    /// Missing input raises a notification without any request. After the
    /// service accepted the call the form resets even if the session could
    /// not be joined. Returns whether the service started the call.
    pub async fn submit(
        &mut self,
        api: &dyn ConsoleApi,
        sdk: &dyn RealtimeSdk,
        toaster: &mut Toaster,
    ) -> bool {
        if !self.can_submit() {
            debug!("call submission disabled without configurations");
            return false;
        }
        let Some(config_id) = self.selected_config().map(|c| c.id.clone()) else {
            toaster.error("Please select an agent configuration");
            return false;
        };
        if self.driver_name.trim().is_empty() {
            toaster.error("Driver name is required");
            return false;
        }
        if self.load_number.trim().is_empty() {
            toaster.error("Load number is required");
            return false;
        }

        let request = StartCallRequest {
            agent_config_id: config_id,
            driver_name: self.driver_name.clone(),
            load_number: self.load_number.clone(),
            driver_phone: self.driver_phone.clone(),
        };

        let grant = match api.start_call(&request).await {
            Ok(grant) => grant,
            Err(err @ Error::SessionNotGranted { .. }) => {
                warn!(error = %err, "call started without a session grant");
                toaster.error(err.to_string());
                self.session = None;
                self.last_grant = None;
                self.reset_form();
                return true;
            }
            Err(err) => {
                toaster.error(err.detail().unwrap_or("Failed to start call"));
                return false;
            }
        };

        info!(agent_id = %grant.agent_id, call_id = ?grant.call_id, "call started");
        toaster.success("Call started successfully!");

        self.session = match sdk.connect(&grant.token, &grant.agent_id).await {
            Ok(handle) => Some(handle),
            Err(err) => {
                toaster.error(format!("Failed to join call session: {err}"));
                None
            }
        };
        self.last_grant = Some(grant);
        self.reset_form();
        true
    }

    fn reset_form(&mut self) {
        self.driver_name.clear();
        self.load_number.clear();
        self.driver_phone = None;
    }

    /// Render the screen
    pub fn render(&self) -> String {
        if !self.loaded {
            return "Loading...\n".to_string();
        }

        let mut out = String::new();
        let _ = writeln!(out, "{}", style("Start Test Call").bold());
        let _ = writeln!(
            out,
            "Trigger an in-app call using your configured AI voice agent\n"
        );

        if let Some(guidance) = self.guidance() {
            let _ = writeln!(out, "  {}", style(guidance).yellow());
            return out;
        }

        let _ = writeln!(out, "{}", style("Call Details").bold());
        for config in &self.configs {
            let marker = if self.selected.as_deref() == Some(config.id.as_str()) {
                style("●").green()
            } else {
                style("○").dim()
            };
            let _ = writeln!(out, "  {marker} {} ({})", config.name, config.scenario_type);
        }
        let _ = writeln!(out, "  Driver Name: {}", self.driver_name);
        let _ = writeln!(out, "  Load Number: {}", self.load_number);

        let _ = writeln!(out, "\n{}", style("Selected Configuration").bold());
        match self.selected_config() {
            Some(config) => out.push_str(&render_selected(config)),
            None => {
                let _ = writeln!(out, "  Select an agent configuration to see details");
            }
        }

        if let Some(preview) = self.preview() {
            let _ = writeln!(out, "\n{}", style("Call Preview").bold());
            let _ = writeln!(out, "  The agent will say:");
            let _ = writeln!(out, "  {}", style(format!("\"{preview}\"")).italic());
        }

        if let Some(grant) = &self.last_grant {
            let _ = writeln!(out, "\n{}", style("Last Call").bold());
            let _ = writeln!(out, "  Agent: {}", grant.agent_id);
            if let Some(call_id) = &grant.call_id {
                let _ = writeln!(out, "  Call: {call_id}");
            }
            let joined = if self.session.is_some() { "joined" } else { "not joined" };
            let _ = writeln!(out, "  Session: {joined}");
        }
        out
    }
}

fn render_selected(config: &AgentConfig) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "  Configuration Name: {}", config.name);
    let _ = writeln!(out, "  Scenario Type: {}", scenario_badge(config.scenario_type));
    let _ = writeln!(out, "  System Prompt: {}", config.system_prompt);
    let _ = writeln!(out, "  Conversation Flow: {}", config.conversation_flow);
    if !config.emergency_triggers.is_empty() {
        let _ = writeln!(out, "  Emergency Triggers:");
        for trigger in &config.emergency_triggers {
            let _ = writeln!(out, "    - {trigger}");
        }
    }
    out
}
