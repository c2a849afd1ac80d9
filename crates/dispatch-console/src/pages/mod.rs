//! The four console screens

pub mod agent_config;
pub mod call_results;
pub mod call_trigger;
pub mod dashboard;

pub use agent_config::{AgentConfigPage, ConfigEditor, EditorMode, render_config};
pub use call_results::{CallResultsPage, DetailState, DetailTicket, render_detail, render_results};
pub use call_trigger::CallTriggerPage;
pub use dashboard::DashboardPage;
