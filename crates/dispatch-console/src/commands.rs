//! One-shot commands driving the screens from the command line

use crate::app::{Shell, Tab};
use crate::confirm::{AssumeYes, Confirm};
use crate::notify::NoticeLevel;
use crate::pages::{ConfigEditor, render_config, render_detail, render_results};
use clap::{Args, Subcommand};
use dispatch_client::{ConsoleApi, RealtimeSdk};
use dispatch_core::ScenarioType;

/// Agent configuration fields settable from the command line
#[derive(Debug, Clone, Default, Args)]
pub struct ConfigFields {
    /// Configuration name
    #[arg(long)]
    pub name: Option<String>,

    /// Scenario type (check_in, emergency)
    #[arg(long, value_name = "SCENARIO")]
    pub scenario: Option<ScenarioType>,

    /// System prompt given to the voice agent
    #[arg(long, value_name = "TEXT")]
    pub system_prompt: Option<String>,

    /// Conversation flow script
    #[arg(long, value_name = "TEXT")]
    pub conversation_flow: Option<String>,

    /// Append an emergency trigger phrase (repeatable)
    #[arg(long = "trigger", value_name = "PHRASE")]
    pub triggers: Vec<String>,

    /// Drop the existing triggers before appending
    #[arg(long)]
    pub clear_triggers: bool,

    /// Retry ceiling, clamped to 1..=10
    #[arg(long, allow_negative_numbers = true)]
    pub max_retries: Option<i64>,

    /// Interruption sensitivity, clamped to 0.0..=1.0
    #[arg(long, allow_negative_numbers = true)]
    pub interruption_sensitivity: Option<f64>,

    /// Enable or disable backchannel cues
    #[arg(long, value_name = "BOOL")]
    pub backchannel: Option<bool>,

    /// Enable or disable filler words
    #[arg(long, value_name = "BOOL")]
    pub filler_words: Option<bool>,
}

impl ConfigFields {
    /// Copy the given fields into the editor's draft
    pub fn apply(&self, editor: &mut ConfigEditor) {
        let draft = editor.draft_mut();
        if let Some(name) = &self.name {
            draft.name.clone_from(name);
        }
        if let Some(scenario) = self.scenario {
            draft.scenario_type = scenario;
        }
        if let Some(prompt) = &self.system_prompt {
            draft.system_prompt.clone_from(prompt);
        }
        if let Some(flow) = &self.conversation_flow {
            draft.conversation_flow.clone_from(flow);
        }
        if self.clear_triggers {
            draft.emergency_triggers.clear();
        }
        if let Some(retries) = self.max_retries {
            draft.set_max_retries(retries);
        }
        if let Some(sensitivity) = self.interruption_sensitivity {
            draft.set_interruption_sensitivity(sensitivity);
        }
        if let Some(enabled) = self.backchannel {
            draft.backchannel_enabled = enabled;
        }
        if let Some(enabled) = self.filler_words {
            draft.filler_words_enabled = enabled;
        }

        for trigger in &self.triggers {
            editor.set_trigger_input(trigger.as_str());
            editor.add_trigger();
        }
        editor.set_trigger_input("");
    }
}

/// Agent configuration commands
#[derive(Debug, Clone, Subcommand)]
pub enum ConfigsCommand {
    /// List every configuration
    List,

    /// Show one configuration
    Show {
        /// Configuration id
        id: String,
    },

    /// Create a configuration
    Create {
        /// Fields of the new configuration
        #[command(flatten)]
        fields: ConfigFields,
    },

    /// Update a configuration
    Update {
        /// Configuration id
        id: String,

        /// Fields to change
        #[command(flatten)]
        fields: ConfigFields,
    },

    /// Delete a configuration
    Delete {
        /// Configuration id
        id: String,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

/// Call trigger commands
#[derive(Debug, Clone, Subcommand)]
pub enum CallCommand {
    /// Start a test call and hand off its session
    Start {
        /// Agent configuration id; the first configuration when omitted
        #[arg(long, value_name = "ID")]
        agent_config: Option<String>,

        /// Driver name
        #[arg(long)]
        driver: String,

        /// Load number
        #[arg(long)]
        load: String,

        /// Driver phone number
        #[arg(long)]
        phone: Option<String>,
    },
}

/// Call history commands
#[derive(Debug, Clone, Subcommand)]
pub enum CallsCommand {
    /// List calls
    List,

    /// Show the full detail of one call
    Show {
        /// Call id
        id: String,
    },

    /// Show the extracted results of one call
    Results {
        /// Call id
        id: String,
    },
}

/// Whether the last command left an error notification behind
pub fn failed(shell: &Shell) -> bool {
    shell
        .toaster()
        .notices()
        .any(|notice| notice.level == NoticeLevel::Error)
}

/// Show the dashboard
pub async fn dashboard(shell: &mut Shell, api: &dyn ConsoleApi) -> String {
    shell.activate(Tab::Dashboard, api).await;
    shell.dashboard().render()
}

/// Run an agent configuration command
pub async fn configs(
    command: ConfigsCommand,
    shell: &mut Shell,
    api: &dyn ConsoleApi,
    confirm: &dyn Confirm,
) -> String {
    match command {
        ConfigsCommand::List => {
            shell.activate(Tab::AgentConfig, api).await;
        }
        ConfigsCommand::Show { id } => {
            return match api.get_agent_config(&id).await {
                Ok(config) => render_config(&config, shell.timestamp_format()),
                Err(err) => {
                    shell.toaster_mut().error(
                        err.detail()
                            .unwrap_or("Failed to fetch agent configuration")
                            .to_string(),
                    );
                    String::new()
                }
            };
        }
        ConfigsCommand::Create { fields } => {
            shell.activate(Tab::AgentConfig, api).await;
            let (page, toaster) = shell.agent_config_mut();
            page.open_create();
            if let Some(editor) = page.editor_mut() {
                fields.apply(editor);
            }
            page.submit(api, toaster).await;
        }
        ConfigsCommand::Update { id, fields } => {
            shell.activate(Tab::AgentConfig, api).await;
            let (page, toaster) = shell.agent_config_mut();
            if page.open_edit(&id) {
                if let Some(editor) = page.editor_mut() {
                    fields.apply(editor);
                }
                page.submit(api, toaster).await;
            } else {
                toaster.error(format!("Agent configuration {id} not found"));
            }
        }
        ConfigsCommand::Delete { id, yes } => {
            shell.activate(Tab::AgentConfig, api).await;
            let (page, toaster) = shell.agent_config_mut();
            let confirm: &dyn Confirm = if yes { &AssumeYes } else { confirm };
            page.delete(&id, api, confirm, toaster).await;
        }
    }
    shell.agent_config().render()
}

/// Run a call trigger command
pub async fn call(
    command: CallCommand,
    shell: &mut Shell,
    api: &dyn ConsoleApi,
    sdk: &dyn RealtimeSdk,
) -> String {
    let CallCommand::Start {
        agent_config,
        driver,
        load,
        phone,
    } = command;

    shell.activate(Tab::CallTrigger, api).await;
    let (page, toaster) = shell.call_trigger_mut();
    if let Some(id) = agent_config
        && !page.select(&id)
    {
        page.clear_selection();
    }
    page.set_driver_name(driver);
    page.set_load_number(load);
    page.set_driver_phone(phone);
    page.submit(api, sdk, toaster).await;
    shell.call_trigger().render()
}

/// Run a call history command
pub async fn calls(command: CallsCommand, shell: &mut Shell, api: &dyn ConsoleApi) -> String {
    match command {
        CallsCommand::List => {
            shell.activate(Tab::CallResults, api).await;
            shell.call_results().render()
        }
        CallsCommand::Show { id } => {
            let format = shell.timestamp_format().to_string();
            let (page, toaster) = shell.call_results_mut();
            page.open_detail(&id, api, toaster).await;
            page.detail()
                .map(|detail| render_detail(detail, &format))
                .unwrap_or_default()
        }
        CallsCommand::Results { id } => match api.get_call_results(&id).await {
            Ok(results) => render_results(&results),
            Err(err) => {
                shell.toaster_mut().error(
                    err.detail()
                        .unwrap_or("Failed to fetch call results")
                        .to_string(),
                );
                String::new()
            }
        },
    }
}
