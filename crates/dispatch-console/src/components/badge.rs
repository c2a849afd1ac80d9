//! Colored status, outcome and scenario badges

use console::style;
use dispatch_core::{CallOutcome, CallStatus, ScenarioType};
use std::fmt;

/// Color family of a badge
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    /// Green
    Success,
    /// Blue
    Info,
    /// Yellow
    Warning,
    /// Red
    Danger,
    /// Orange
    Caution,
    /// Gray
    Neutral,
}

/// A short colored label
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Badge {
    /// Text inside the badge
    pub label: String,
    /// Color family
    pub tone: Tone,
}

impl Badge {
    fn new(label: impl Into<String>, tone: Tone) -> Self {
        Self {
            label: label.into(),
            tone,
        }
    }
}

impl fmt::Display for Badge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = style(format!("[{}]", self.label));
        let styled = match self.tone {
            Tone::Success => text.green(),
            Tone::Info => text.blue(),
            Tone::Warning => text.yellow(),
            Tone::Danger => text.red(),
            Tone::Caution => text.color256(208),
            Tone::Neutral => text.dim(),
        };
        write!(f, "{styled}")
    }
}

/// Badge for a call lifecycle status
pub fn status_badge(status: CallStatus) -> Badge {
    match status {
        CallStatus::Completed => Badge::new("Completed", Tone::Success),
        CallStatus::InProgress => Badge::new("In Progress", Tone::Info),
        CallStatus::Failed => Badge::new("Failed", Tone::Danger),
        CallStatus::Initiated => Badge::new("Initiated", Tone::Warning),
        CallStatus::Unknown => Badge::new("Unknown", Tone::Neutral),
    }
}

/// Badge for a call outcome; unknown outcomes keep their own label
pub fn outcome_badge(outcome: &CallOutcome) -> Badge {
    let tone = match outcome {
        CallOutcome::InTransitUpdate => Tone::Info,
        CallOutcome::ArrivalConfirmation => Tone::Success,
        CallOutcome::EmergencyDetected | CallOutcome::CallFailed => Tone::Danger,
        CallOutcome::UncooperativeDriver => Tone::Caution,
        CallOutcome::Other(_) => Tone::Neutral,
    };
    Badge::new(outcome.as_str(), tone)
}

/// Badge for a scenario category
pub fn scenario_badge(scenario: ScenarioType) -> Badge {
    let tone = match scenario {
        ScenarioType::CheckIn => Tone::Info,
        ScenarioType::Emergency => Tone::Danger,
    };
    Badge::new(scenario.label(), tone)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case(CallStatus::Completed, "Completed", Tone::Success)]
    #[case(CallStatus::InProgress, "In Progress", Tone::Info)]
    #[case(CallStatus::Failed, "Failed", Tone::Danger)]
    #[case(CallStatus::Initiated, "Initiated", Tone::Warning)]
    #[case(CallStatus::Unknown, "Unknown", Tone::Neutral)]
    fn test_status_badges(#[case] status: CallStatus, #[case] label: &str, #[case] tone: Tone) {
        assert_eq!(status_badge(status), Badge::new(label, tone));
    }

    #[rstest]
    #[case("In-Transit Update", Tone::Info)]
    #[case("Arrival Confirmation", Tone::Success)]
    #[case("Emergency Detected", Tone::Danger)]
    #[case("Uncooperative Driver", Tone::Caution)]
    #[case("Call Failed", Tone::Danger)]
    #[case("Voicemail Left", Tone::Neutral)]
    fn test_outcome_badges(#[case] raw: &str, #[case] tone: Tone) {
        let badge = outcome_badge(&CallOutcome::from(raw.to_string()));
        assert_eq!(badge, Badge::new(raw, tone));
    }

    #[test]
    fn test_badge_text_without_color() {
        let rendered = scenario_badge(ScenarioType::CheckIn).to_string();
        assert_eq!(console::strip_ansi_codes(&rendered), "[Check-in]");
    }
}
