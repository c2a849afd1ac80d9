//! Operator confirmation for destructive actions

use tracing::warn;

/// Asks the operator to confirm an action
pub trait Confirm: Send + Sync {
    /// Whether the operator accepted `prompt`
    fn confirm(&self, prompt: &str) -> bool;
}

impl<F> Confirm for F
where
    F: Fn(&str) -> bool + Send + Sync,
{
    fn confirm(&self, prompt: &str) -> bool {
        self(prompt)
    }
}

/// Accepts every prompt, for `--yes`
#[derive(Debug, Clone, Copy, Default)]
pub struct AssumeYes;

impl Confirm for AssumeYes {
    fn confirm(&self, _prompt: &str) -> bool {
        true
    }
}

/// Interactive yes/no prompt on the terminal
///
/// An aborted or failed prompt counts as declined.
#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalConfirm;

impl Confirm for TerminalConfirm {
    fn confirm(&self, prompt: &str) -> bool {
        inquire::Confirm::new(prompt)
            .with_default(false)
            .prompt()
            .unwrap_or_else(|e| {
                warn!("confirmation prompt failed: {e}");
                false
            })
    }
}
