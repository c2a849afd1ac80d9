//! Tab shell holding the active screen

use crate::notify::{Notice, Toaster};
use crate::pages::{AgentConfigPage, CallResultsPage, CallTriggerPage, DashboardPage};
use console::style;
use dispatch_client::ConsoleApi;
use dispatch_core::config::ConsoleConfig;
use dispatch_core::Error;
use std::fmt::{self, Write as _};
use std::str::FromStr;
use tracing::debug;

/// Application title shown in the header
pub const TITLE: &str = "AI Voice Agent Tool";

/// Console tabs in navigation order
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Tab {
    /// Counts and recent activity
    #[default]
    Dashboard,
    /// Agent configuration management
    AgentConfig,
    /// Start a test call
    CallTrigger,
    /// Call history and detail
    CallResults,
}

impl Tab {
    /// Every tab in navigation order
    pub const ALL: [Self; 4] = [
        Self::Dashboard,
        Self::AgentConfig,
        Self::CallTrigger,
        Self::CallResults,
    ];

    /// Stable identifier
    pub const fn id(self) -> &'static str {
        match self {
            Self::Dashboard => "dashboard",
            Self::AgentConfig => "config",
            Self::CallTrigger => "calls",
            Self::CallResults => "results",
        }
    }

    /// Navigation label
    pub const fn label(self) -> &'static str {
        match self {
            Self::Dashboard => "Dashboard",
            Self::AgentConfig => "Agent Config",
            Self::CallTrigger => "Start Call",
            Self::CallResults => "Call Results",
        }
    }
}

impl fmt::Display for Tab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Tab {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|tab| tab.id().eq_ignore_ascii_case(wanted) || tab.label().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| Error::validation("tab", format!("unknown tab '{wanted}'")))
    }
}

/// Console shell: the active tab, the notification queue and the screens
#[derive(Debug, Clone)]
pub struct Shell {
    active: Tab,
    toaster: Toaster,
    timestamp_format: String,
    dashboard: DashboardPage,
    agent_config: AgentConfigPage,
    call_trigger: CallTriggerPage,
    call_results: CallResultsPage,
}

impl Shell {
    /// Create a shell on the dashboard tab; nothing is fetched yet
    pub fn new(config: &ConsoleConfig) -> Self {
        let timestamp_format = config.timestamp_format.clone();
        Self {
            active: Tab::Dashboard,
            toaster: Toaster::new(config.notification_capacity),
            dashboard: DashboardPage::new(timestamp_format.clone()),
            agent_config: AgentConfigPage::new(timestamp_format.clone()),
            call_trigger: CallTriggerPage::new(),
            call_results: CallResultsPage::new(timestamp_format.clone()),
            timestamp_format,
        }
    }

    /// Active tab
    pub const fn active(&self) -> Tab {
        self.active
    }

    /// Switch to `tab` and mount its screen
    ///
    /// Mounting starts the screen from scratch and fetches its data, like
    /// opening it for the first time.
    pub async fn activate(&mut self, tab: Tab, api: &dyn ConsoleApi) {
        debug!(tab = tab.id(), "activating tab");
        self.active = tab;
        let format = self.timestamp_format.clone();
        match tab {
            Tab::Dashboard => {
                self.dashboard = DashboardPage::new(format);
                self.dashboard.load(api, &mut self.toaster).await;
            }
            Tab::AgentConfig => {
                self.agent_config = AgentConfigPage::new(format);
                self.agent_config.load(api, &mut self.toaster).await;
            }
            Tab::CallTrigger => {
                self.call_trigger = CallTriggerPage::new();
                self.call_trigger.load(api, &mut self.toaster).await;
            }
            Tab::CallResults => {
                self.call_results = CallResultsPage::new(format);
                self.call_results.load(api, &mut self.toaster).await;
            }
        }
    }

    /// Format timestamps are rendered with
    pub fn timestamp_format(&self) -> &str {
        &self.timestamp_format
    }

    /// Pending notifications
    pub const fn toaster(&self) -> &Toaster {
        &self.toaster
    }

    /// Mutable access to the notifications
    pub fn toaster_mut(&mut self) -> &mut Toaster {
        &mut self.toaster
    }

    /// Take the pending notifications for display
    pub fn take_notices(&mut self) -> Vec<Notice> {
        self.toaster.drain()
    }

    /// Dashboard screen
    pub const fn dashboard(&self) -> &DashboardPage {
        &self.dashboard
    }

    /// Agent configuration screen
    pub const fn agent_config(&self) -> &AgentConfigPage {
        &self.agent_config
    }

    /// Call trigger screen
    pub const fn call_trigger(&self) -> &CallTriggerPage {
        &self.call_trigger
    }

    /// Call results screen
    pub const fn call_results(&self) -> &CallResultsPage {
        &self.call_results
    }

    /// Agent configuration screen together with the notifications
    pub fn agent_config_mut(&mut self) -> (&mut AgentConfigPage, &mut Toaster) {
        (&mut self.agent_config, &mut self.toaster)
    }

    /// Call trigger screen together with the notifications
    pub fn call_trigger_mut(&mut self) -> (&mut CallTriggerPage, &mut Toaster) {
        (&mut self.call_trigger, &mut self.toaster)
    }

    /// Call results screen together with the notifications
    pub fn call_results_mut(&mut self) -> (&mut CallResultsPage, &mut Toaster) {
        (&mut self.call_results, &mut self.toaster)
    }

    /// Header line with the navigation, active tab highlighted
    pub fn render_header(&self) -> String {
        let nav = Tab::ALL
            .into_iter()
            .map(|tab| {
                if tab == self.active {
                    style(format!("[{}]", tab.label())).cyan().bold().to_string()
                } else {
                    format!(" {} ", tab.label())
                }
            })
            .collect::<Vec<_>>()
            .join(" ");

        let mut out = String::new();
        let _ = writeln!(out, "{}", style(TITLE).bold());
        let _ = writeln!(out, "{nav}");
        out
    }

    /// Header followed by the active screen
    pub fn render(&self) -> String {
        let page = match self.active {
            Tab::Dashboard => self.dashboard.render(),
            Tab::AgentConfig => self.agent_config.render(),
            Tab::CallTrigger => self.call_trigger.render(),
            Tab::CallResults => self.call_results.render(),
        };
        format!("{}\n{page}", self.render_header())
    }
}
