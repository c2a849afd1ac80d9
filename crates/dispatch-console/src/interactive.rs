//! Interactive terminal session over the tab shell
//!
//! Each round prints the active screen and its pending notifications, then
//! offers the actions of that screen. Escape or Ctrl-C inside a form returns
//! to the menu; at the menu it ends the session.

use crate::app::{Shell, Tab};
use crate::confirm::Confirm;
use crate::pages::ConfigEditor;
use console::style;
use dispatch_client::{ConsoleApi, RealtimeSdk};
use dispatch_core::{Error, Result, ScenarioType};
use inquire::{CustomType, InquireError, Select, Text};
use std::fmt;
use tracing::{debug, info};

/// Menu entries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    Refresh,
    NewConfig,
    EditConfig,
    DeleteConfig,
    SelectConfig,
    StartCall,
    ViewDetails,
    CloseDetails,
    SwitchTab,
    Quit,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Refresh => "Refresh",
            Self::NewConfig => "New configuration",
            Self::EditConfig => "Edit configuration",
            Self::DeleteConfig => "Delete configuration",
            Self::SelectConfig => "Select agent configuration",
            Self::StartCall => "Start call",
            Self::ViewDetails => "View call details",
            Self::CloseDetails => "Close call details",
            Self::SwitchTab => "Switch tab",
            Self::Quit => "Quit",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TriggerAction {
    Add,
    Remove,
    Done,
}

impl fmt::Display for TriggerAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Add => "Add trigger phrase",
            Self::Remove => "Remove trigger phrase",
            Self::Done => "Done",
        })
    }
}

fn actions(shell: &Shell) -> Vec<Action> {
    let mut actions = match shell.active() {
        Tab::Dashboard => vec![Action::Refresh],
        Tab::AgentConfig => {
            let mut actions = vec![Action::NewConfig];
            if !shell.agent_config().configs().is_empty() {
                actions.extend([Action::EditConfig, Action::DeleteConfig]);
            }
            actions.push(Action::Refresh);
            actions
        }
        Tab::CallTrigger => {
            if shell.call_trigger().can_submit() {
                vec![Action::SelectConfig, Action::StartCall]
            } else {
                Vec::new()
            }
        }
        Tab::CallResults => {
            let page = shell.call_results();
            let mut actions = Vec::new();
            if !page.calls().is_empty() {
                actions.push(Action::ViewDetails);
            }
            if page.detail().is_some() {
                actions.push(Action::CloseDetails);
            }
            actions.push(Action::Refresh);
            actions
        }
    };
    actions.extend([Action::SwitchTab, Action::Quit]);
    actions
}

fn prompt_error(err: InquireError) -> Error {
    Error::Other(format!("terminal prompt failed: {err}"))
}

/// `None` when the operator backed out of the prompt
fn cancellable<T>(result: std::result::Result<T, InquireError>) -> Result<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => Ok(None),
        Err(err) => Err(prompt_error(err)),
    }
}

fn flush_notices(shell: &mut Shell) {
    for notice in shell.take_notices() {
        println!("{}", notice.render());
    }
}

/// Pick one of `labels`, returning its index
fn choose(message: &str, labels: Vec<String>) -> Result<Option<usize>> {
    if labels.is_empty() {
        return Ok(None);
    }
    Ok(cancellable(Select::new(message, labels).raw_prompt())?.map(|choice| choice.index))
}

/// Run the session until the operator quits
///
/// # Errors
///
/// Returns an error if the terminal cannot be prompted.
pub async fn run(
    shell: &mut Shell,
    api: &dyn ConsoleApi,
    sdk: &dyn RealtimeSdk,
    confirm: &dyn Confirm,
) -> Result<()> {
    shell.activate(Tab::Dashboard, api).await;

    loop {
        println!("{}", shell.render());
        flush_notices(shell);

        let Some(action) = cancellable(Select::new("Action", actions(shell)).prompt())? else {
            break;
        };
        debug!(%action, tab = shell.active().id(), "menu action");

        match action {
            Action::Refresh => {
                let tab = shell.active();
                shell.activate(tab, api).await;
            }
            Action::NewConfig => {
                shell.agent_config_mut().0.open_create();
                edit_config(shell, api).await?;
            }
            Action::EditConfig => {
                if let Some(id) = pick_config(shell.agent_config().configs())?
                    && shell.agent_config_mut().0.open_edit(&id)
                {
                    edit_config(shell, api).await?;
                }
            }
            Action::DeleteConfig => {
                if let Some(id) = pick_config(shell.agent_config().configs())? {
                    let (page, toaster) = shell.agent_config_mut();
                    page.delete(&id, api, confirm, toaster).await;
                }
            }
            Action::SelectConfig => {
                if let Some(id) = pick_config(shell.call_trigger().configs())? {
                    shell.call_trigger_mut().0.select(&id);
                }
            }
            Action::StartCall => start_call(shell, api, sdk).await?,
            Action::ViewDetails => {
                let labels = shell
                    .call_results()
                    .calls()
                    .iter()
                    .map(|call| format!("{} - Load #{}", call.driver_name, call.load_number))
                    .collect();
                let id = choose("Call", labels)?.and_then(|index| {
                    shell.call_results().calls().get(index).map(|call| call.id.clone())
                });
                if let Some(id) = id {
                    let (page, toaster) = shell.call_results_mut();
                    page.open_detail(&id, api, toaster).await;
                }
            }
            Action::CloseDetails => shell.call_results_mut().0.close_detail(),
            Action::SwitchTab => {
                let cursor = Tab::ALL
                    .iter()
                    .position(|tab| *tab == shell.active())
                    .unwrap_or_default();
                let picked = cancellable(
                    Select::new("Tab", Tab::ALL.to_vec())
                        .with_starting_cursor(cursor)
                        .prompt(),
                )?;
                if let Some(tab) = picked {
                    shell.activate(tab, api).await;
                }
            }
            Action::Quit => break,
        }
    }

    flush_notices(shell);
    info!("interactive session ended");
    Ok(())
}

fn pick_config(configs: &[dispatch_core::AgentConfig]) -> Result<Option<String>> {
    let labels = configs
        .iter()
        .map(|config| format!("{} ({})", config.name, config.scenario_type.label()))
        .collect();
    Ok(choose("Agent configuration", labels)?
        .and_then(|index| configs.get(index))
        .map(|config| config.id.clone()))
}

/// Fill and submit the open editor until it closes or the operator gives up
async fn edit_config(shell: &mut Shell, api: &dyn ConsoleApi) -> Result<()> {
    loop {
        let (page, toaster) = shell.agent_config_mut();
        let Some(editor) = page.editor_mut() else {
            return Ok(());
        };
        println!("{}", style(editor.title()).bold());

        if fill_editor(editor)?.is_none() {
            page.cancel();
            return Ok(());
        }
        page.submit(api, toaster).await;
        let still_open = page.editor().is_some();
        flush_notices(shell);

        if !still_open {
            return Ok(());
        }
        let keep = cancellable(
            inquire::Confirm::new("Keep editing?")
                .with_default(true)
                .prompt(),
        )?
        .unwrap_or(false);
        if !keep {
            shell.agent_config_mut().0.cancel();
            return Ok(());
        }
    }
}

fn fill_editor(editor: &mut ConfigEditor) -> Result<Option<()>> {
    let draft = editor.draft().clone();

    let Some(name) = cancellable(
        Text::new("Configuration name")
            .with_initial_value(&draft.name)
            .prompt(),
    )?
    else {
        return Ok(None);
    };

    let scenarios = vec![ScenarioType::CheckIn, ScenarioType::Emergency];
    let cursor = scenarios
        .iter()
        .position(|s| *s == draft.scenario_type)
        .unwrap_or_default();
    let Some(scenario) = cancellable(
        Select::new("Scenario type", scenarios)
            .with_starting_cursor(cursor)
            .prompt(),
    )?
    else {
        return Ok(None);
    };

    let Some(system_prompt) = cancellable(
        Text::new("System prompt")
            .with_initial_value(&draft.system_prompt)
            .prompt(),
    )?
    else {
        return Ok(None);
    };

    let Some(conversation_flow) = cancellable(
        Text::new("Conversation flow")
            .with_initial_value(&draft.conversation_flow)
            .prompt(),
    )?
    else {
        return Ok(None);
    };

    let Some(max_retries) = cancellable(
        CustomType::<i64>::new("Max retries (1-10)")
            .with_default(i64::from(draft.max_retries))
            .prompt(),
    )?
    else {
        return Ok(None);
    };

    let Some(sensitivity) = cancellable(
        CustomType::<f64>::new("Interruption sensitivity (0.0-1.0)")
            .with_default(draft.interruption_sensitivity)
            .prompt(),
    )?
    else {
        return Ok(None);
    };

    let Some(backchannel) = cancellable(
        inquire::Confirm::new("Enable backchannel cues?")
            .with_default(draft.backchannel_enabled)
            .prompt(),
    )?
    else {
        return Ok(None);
    };

    let Some(filler_words) = cancellable(
        inquire::Confirm::new("Enable filler words?")
            .with_default(draft.filler_words_enabled)
            .prompt(),
    )?
    else {
        return Ok(None);
    };

    let fields = editor.draft_mut();
    fields.name = name;
    fields.scenario_type = scenario;
    fields.system_prompt = system_prompt;
    fields.conversation_flow = conversation_flow;
    fields.set_max_retries(max_retries);
    fields.set_interruption_sensitivity(sensitivity);
    fields.backchannel_enabled = backchannel;
    fields.filler_words_enabled = filler_words;

    edit_triggers(editor)
}

fn edit_triggers(editor: &mut ConfigEditor) -> Result<Option<()>> {
    loop {
        let triggers = editor.draft().emergency_triggers.clone();
        if triggers.is_empty() {
            println!("  Emergency triggers: none");
        } else {
            println!("  Emergency triggers: {}", triggers.join(", "));
        }

        let mut options = vec![TriggerAction::Add];
        if !triggers.is_empty() {
            options.push(TriggerAction::Remove);
        }
        options.push(TriggerAction::Done);

        let Some(action) = cancellable(Select::new("Emergency triggers", options).prompt())?
        else {
            return Ok(None);
        };
        match action {
            TriggerAction::Add => {
                if let Some(phrase) = cancellable(Text::new("Trigger phrase").prompt())? {
                    editor.set_trigger_input(phrase);
                    editor.add_trigger();
                }
            }
            TriggerAction::Remove => {
                if let Some(index) = choose("Remove which phrase?", triggers)? {
                    editor.remove_trigger(index);
                }
            }
            TriggerAction::Done => return Ok(Some(())),
        }
    }
}

async fn start_call(shell: &mut Shell, api: &dyn ConsoleApi, sdk: &dyn RealtimeSdk) -> Result<()> {
    let (page, toaster) = shell.call_trigger_mut();

    let Some(driver) = cancellable(
        Text::new("Driver name")
            .with_initial_value(page.driver_name())
            .prompt(),
    )?
    else {
        return Ok(());
    };
    let Some(load) = cancellable(
        Text::new("Load number")
            .with_initial_value(page.load_number())
            .prompt(),
    )?
    else {
        return Ok(());
    };
    let Some(phone) = cancellable(
        Text::new("Driver phone")
            .with_help_message("leave blank to skip")
            .prompt(),
    )?
    else {
        return Ok(());
    };

    page.set_driver_name(driver);
    page.set_load_number(load);
    page.set_driver_phone(Some(phone));
    page.submit(api, sdk, toaster).await;
    Ok(())
}
