//! Agent configuration screen: list, create, edit and delete configurations

use crate::components::scenario_badge;
use crate::confirm::Confirm;
use crate::notify::Toaster;
use console::style;
use dispatch_client::ConsoleApi;
use dispatch_core::format::format_timestamp;
use dispatch_core::{AgentConfig, AgentConfigDraft, ConfigId, Error};
use std::fmt::Write as _;
use tracing::{debug, info};

/// Prompt shown before a configuration is deleted
pub const DELETE_PROMPT: &str = "Are you sure you want to delete this configuration?";

/// Empty-state headline
pub const NO_CONFIGS: &str = "No agent configurations found.";

/// Empty-state hint
pub const NO_CONFIGS_HINT: &str = "Create your first configuration to get started.";

/// Whether the editor creates a new configuration or updates one
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorMode {
    /// Submitting creates a configuration
    Create,
    /// Submitting updates the configuration with this id
    Edit(ConfigId),
}

/// Open configuration form
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigEditor {
    mode: EditorMode,
    draft: AgentConfigDraft,
    trigger_input: String,
}

impl ConfigEditor {
    fn new(mode: EditorMode, draft: AgentConfigDraft) -> Self {
        Self {
            mode,
            draft,
            trigger_input: String::new(),
        }
    }

    /// Create or edit
    pub const fn mode(&self) -> &EditorMode {
        &self.mode
    }

    /// Draft being edited
    pub const fn draft(&self) -> &AgentConfigDraft {
        &self.draft
    }

    /// Mutable access to the draft
    pub fn draft_mut(&mut self) -> &mut AgentConfigDraft {
        &mut self.draft
    }

    /// Pending trigger phrase
    pub fn trigger_input(&self) -> &str {
        &self.trigger_input
    }

    /// Replace the pending trigger phrase
    pub fn set_trigger_input(&mut self, input: impl Into<String>) {
        self.trigger_input = input.into();
    }

    /// Append the pending trigger phrase to the draft
    ///
    /// Blank input is ignored and kept; an appended phrase clears the input.
    pub fn add_trigger(&mut self) -> bool {
        let added = self.draft.add_trigger(&self.trigger_input);
        if added {
            self.trigger_input.clear();
        }
        added
    }

    /// Remove the trigger at `index`
    pub fn remove_trigger(&mut self, index: usize) -> Option<String> {
        self.draft.remove_trigger(index)
    }

    /// Form heading
    pub const fn title(&self) -> &'static str {
        match self.mode {
            EditorMode::Create => "Create New Configuration",
            EditorMode::Edit(_) => "Edit Configuration",
        }
    }
}

/// Agent configuration screen state
#[derive(Debug, Clone)]
pub struct AgentConfigPage {
    configs: Vec<AgentConfig>,
    loaded: bool,
    editor: Option<ConfigEditor>,
    timestamp_format: String,
}

impl AgentConfigPage {
    /// Create an unloaded screen
    pub fn new(timestamp_format: impl Into<String>) -> Self {
        Self {
            configs: Vec::new(),
            loaded: false,
            editor: None,
            timestamp_format: timestamp_format.into(),
        }
    }

    /// Fetch every configuration
    pub async fn load(&mut self, api: &dyn ConsoleApi, toaster: &mut Toaster) {
        match api.list_agent_configs().await {
            Ok(configs) => {
                debug!(count = configs.len(), "agent configurations loaded");
                self.configs = configs;
            }
            Err(_) => toaster.error("Failed to fetch agent configurations"),
        }
        self.loaded = true;
    }

    /// Cached configurations in service order
    pub fn configs(&self) -> &[AgentConfig] {
        &self.configs
    }

    /// Cached configuration by id
    pub fn config(&self, id: &str) -> Option<&AgentConfig> {
        self.configs.iter().find(|c| c.id == id)
    }

    /// Open an empty form with the default draft
    pub fn open_create(&mut self) {
        self.editor = Some(ConfigEditor::new(
            EditorMode::Create,
            AgentConfigDraft::default(),
        ));
    }

    /// Open the form pre-filled from the cached configuration `id`
    ///
    /// Returns `false` when no such configuration is cached.
    pub fn open_edit(&mut self, id: &str) -> bool {
        let Some(config) = self.config(id) else {
            return false;
        };
        let editor = ConfigEditor::new(EditorMode::Edit(config.id.clone()), config.to_draft());
        self.editor = Some(editor);
        true
    }

    /// Open form, if any
    pub const fn editor(&self) -> Option<&ConfigEditor> {
        self.editor.as_ref()
    }

    /// Mutable access to the open form
    pub fn editor_mut(&mut self) -> Option<&mut ConfigEditor> {
        self.editor.as_mut()
    }

    /// Dismiss the form, discarding the draft
    pub fn cancel(&mut self) {
        self.editor = None;
    }

    /// Validate and send the open form
    ///
    /// An invalid draft raises a notification without any request. On
    /// success the list is re-fetched and the form closes; on failure the
    /// form stays open with its draft. Returns whether the save succeeded.
    pub async fn submit(&mut self, api: &dyn ConsoleApi, toaster: &mut Toaster) -> bool {
        let Some(editor) = self.editor.as_ref() else {
            return false;
        };

        if let Err(err) = editor.draft.check() {
            let message = match err {
                Error::Validation { message, .. } => message,
                other => other.to_string(),
            };
            toaster.error(message);
            return false;
        }

        let saved = match &editor.mode {
            EditorMode::Create => api
                .create_agent_config(&editor.draft)
                .await
                .map(|config| ("Configuration created successfully", config)),
            EditorMode::Edit(id) => api
                .update_agent_config(id, &editor.draft)
                .await
                .map(|config| ("Configuration updated successfully", config)),
        };

        match saved {
            Ok((message, config)) => {
                info!(id = %config.id, name = %config.name, "agent configuration saved");
                toaster.success(message);
                self.editor = None;
                self.load(api, toaster).await;
                true
            }
            Err(_) => {
                let message = match editor.mode {
                    EditorMode::Create => "Failed to create configuration",
                    EditorMode::Edit(_) => "Failed to update configuration",
                };
                toaster.error(message);
                false
            }
        }
    }

    /// Delete configuration `id` after the operator confirms
    ///
    /// Declining issues no request and changes nothing. Returns whether the
    /// configuration was deleted.
    pub async fn delete(
        &mut self,
        id: &str,
        api: &dyn ConsoleApi,
        confirm: &dyn Confirm,
        toaster: &mut Toaster,
    ) -> bool {
        if !confirm.confirm(DELETE_PROMPT) {
            debug!(id, "delete declined");
            return false;
        }

        match api.delete_agent_config(id).await {
            Ok(()) => {
                info!(id, "agent configuration deleted");
                toaster.success("Configuration deleted successfully");
                self.load(api, toaster).await;
                true
            }
            Err(_) => {
                toaster.error("Failed to delete configuration");
                false
            }
        }
    }

    /// Render the screen
    pub fn render(&self) -> String {
        if !self.loaded {
            return "Loading...\n".to_string();
        }

        let mut out = String::new();
        let _ = writeln!(out, "{}", style("Agent Configurations").bold());
        let _ = writeln!(out, "Manage your AI voice agent configurations\n");

        if let Some(editor) = &self.editor {
            out.push_str(&render_editor(editor));
            out.push('\n');
        }

        if self.configs.is_empty() {
            let _ = writeln!(out, "  {NO_CONFIGS}");
            let _ = writeln!(out, "  {NO_CONFIGS_HINT}");
            return out;
        }

        for config in &self.configs {
            out.push_str(&render_config(config, &self.timestamp_format));
            out.push('\n');
        }
        out
    }
}

/// Render one configuration card
pub fn render_config(config: &AgentConfig, timestamp_format: &str) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "  {} {}  {}",
        style(&config.name).bold(),
        scenario_badge(config.scenario_type),
        style(format!("id: {}", config.id)).dim()
    );
    let _ = writeln!(out, "    System Prompt: {}", config.system_prompt);
    let _ = writeln!(out, "    Conversation Flow: {}", config.conversation_flow);
    if !config.emergency_triggers.is_empty() {
        let _ = writeln!(
            out,
            "    Emergency Triggers: {}",
            config.emergency_triggers.join(", ")
        );
    }
    let _ = writeln!(
        out,
        "    Max Retries: {}  Interruption Sensitivity: {:.1}  Backchannel: {}  Filler Words: {}",
        config.max_retries,
        config.interruption_sensitivity,
        on_off(config.backchannel_enabled),
        on_off(config.filler_words_enabled)
    );
    let _ = writeln!(
        out,
        "    Updated: {}",
        format_timestamp(
            config.updated_at.as_ref().or(config.created_at.as_ref()),
            timestamp_format
        )
    );
    out
}

fn render_editor(editor: &ConfigEditor) -> String {
    let draft = editor.draft();
    let mut out = String::new();
    let _ = writeln!(out, "  {}", style(editor.title()).bold().underlined());
    let _ = writeln!(out, "    Configuration Name: {}", draft.name);
    let _ = writeln!(out, "    Scenario Type: {}", draft.scenario_type.label());
    let _ = writeln!(out, "    System Prompt: {}", draft.system_prompt);
    let _ = writeln!(out, "    Conversation Flow: {}", draft.conversation_flow);
    let _ = writeln!(out, "    Emergency Triggers:");
    for (index, trigger) in draft.emergency_triggers.iter().enumerate() {
        let _ = writeln!(out, "      {}. {trigger}", index + 1);
    }
    let _ = writeln!(
        out,
        "    Max Retries: {}  Interruption Sensitivity: {:.1}",
        draft.max_retries, draft.interruption_sensitivity
    );
    let _ = writeln!(
        out,
        "    Backchannel: {}  Filler Words: {}",
        on_off(draft.backchannel_enabled),
        on_off(draft.filler_words_enabled)
    );
    out
}

const fn on_off(enabled: bool) -> &'static str {
    if enabled { "on" } else { "off" }
}
