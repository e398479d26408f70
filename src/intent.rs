//! Keyword command interpretation.
//!
//! Each container declares an ordered table of rules. Input is lower-cased
//! and the first rule with any pattern occurring as a substring wins. There
//! is no scoring or disambiguation: overlapping keywords across containers
//! are each answered independently.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActionKind {
    // Compliance
    ShowDocuments,
    GenerateDisclosures,
    AssembleDocuments,
    ShowAuditTrail,
    // Customer intelligence
    ShowMilestones,
    ShowRetentionRisks,
    ShowCoverageAdequacy,
    // Illustration
    CreateIllustration,
    ShowProjections,
    ValidateSuitability,
    GenerateReport,
    // Meeting prep
    PrepareMeeting,
    ShowClientSnapshot,
    ShowExposureView,
    // Predictive analytics
    ShowInsights,
    ShowLapseRisks,
    ShowOpportunities,
    ShowEngagementTrends,
}

impl ActionKind {
    /// Canned spoken acknowledgement for the voice agent.
    pub fn acknowledgement(&self) -> &'static str {
        match self {
            ActionKind::ShowDocuments => "Here are the compliance documents on file.",
            ActionKind::GenerateDisclosures => "I'll generate the required disclosures.",
            ActionKind::AssembleDocuments => "Assembling the documents for your appointment.",
            ActionKind::ShowAuditTrail => "Here's the audit trail.",
            ActionKind::ShowMilestones => "Here are the upcoming life-stage milestones.",
            ActionKind::ShowRetentionRisks => "Here are the retention risk scores.",
            ActionKind::ShowCoverageAdequacy => "Here's the coverage adequacy review.",
            ActionKind::CreateIllustration => "Let's build a new income illustration.",
            ActionKind::ShowProjections => "Here are the income projections.",
            ActionKind::ValidateSuitability => "Checking suitability now.",
            ActionKind::GenerateReport => "Generating the regulatory report.",
            ActionKind::PrepareMeeting => "Let's get you ready for the meeting.",
            ActionKind::ShowClientSnapshot => "Here's the client snapshot.",
            ActionKind::ShowExposureView => "Here's the exposure view.",
            ActionKind::ShowInsights => "Here are the predictive insights.",
            ActionKind::ShowLapseRisks => "These policies show lapse risk.",
            ActionKind::ShowOpportunities => "Here are your cross-sell opportunities.",
            ActionKind::ShowEngagementTrends => "Here are the engagement trends.",
        }
    }
}

/// Result of a successful match. `data` is a snapshot of the container's
/// current state when the rule selects one.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActionDescriptor {
    pub action: ActionKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

/// One row of an intent table.
pub struct IntentRule<S> {
    pub patterns: &'static [&'static str],
    pub action: ActionKind,
    pub select: Option<fn(&S) -> Value>,
}

impl<S> IntentRule<S> {
    fn matches(&self, lowered: &str) -> bool {
        self.patterns.iter().any(|p| lowered.contains(p))
    }
}

/// Evaluate `rules` in order against `text`; first match wins.
pub fn interpret<S>(rules: &[IntentRule<S>], data: &S, text: &str) -> Option<ActionDescriptor> {
    let lowered = text.to_lowercase();
    rules
        .iter()
        .find(|rule| rule.matches(&lowered))
        .map(|rule| ActionDescriptor {
            action: rule.action,
            data: rule.select.map(|select| select(data)),
        })
}

/// Implemented by every container that answers voice commands.
pub trait CommandInterpreter: Send + Sync {
    /// Short name used to tag matches ("Compliance").
    fn domain(&self) -> &'static str;

    fn interpret(&self, text: &str) -> Option<ActionDescriptor>;
}

pub(crate) fn list_value(items: &[Value]) -> Value {
    Value::Array(items.to_vec())
}

pub(crate) fn map_value(map: &HashMap<String, Value>) -> Value {
    Value::Object(map.iter().map(|(k, v)| (k.clone(), v.clone())).collect())
}
