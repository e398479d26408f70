//! Voice agent: routes free text to every domain interpreter.
//!
//! Interpreters are asked in a fixed order and every match is kept. The
//! spoken reply is the canned acknowledgement of each match, in order.

use std::sync::Arc;

use serde::Serialize;

use crate::intent::{ActionDescriptor, CommandInterpreter};
use crate::speech::random_response;

const NOT_UNDERSTOOD: &[&str] = &[
    "Sorry, I didn't catch that. Could you try again?",
    "I'm not sure how to help with that yet.",
    "Hmm, I didn't understand. Try asking for documents, projections or meeting prep.",
];

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandMatch {
    pub domain: &'static str,
    #[serde(flatten)]
    pub descriptor: ActionDescriptor,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentReply {
    pub matches: Vec<CommandMatch>,
    pub spoken: String,
}

impl AgentReply {
    pub fn understood(&self) -> bool {
        !self.matches.is_empty()
    }
}

pub struct VoiceAgent {
    interpreters: Vec<Arc<dyn CommandInterpreter>>,
}

impl VoiceAgent {
    pub fn new(interpreters: Vec<Arc<dyn CommandInterpreter>>) -> Self {
        Self { interpreters }
    }

    pub fn dispatch(&self, text: &str) -> AgentReply {
        let matches: Vec<CommandMatch> = self
            .interpreters
            .iter()
            .filter_map(|i| {
                i.interpret(text).map(|descriptor| CommandMatch {
                    domain: i.domain(),
                    descriptor,
                })
            })
            .collect();

        if matches.is_empty() {
            log::debug!("VoiceAgent: no match for {text:?}");
            return AgentReply {
                matches,
                spoken: random_response(NOT_UNDERSTOOD)
                    .unwrap_or_default()
                    .to_string(),
            };
        }

        let spoken = matches
            .iter()
            .map(|m| m.descriptor.action.acknowledgement())
            .collect::<Vec<_>>()
            .join(" ");
        log::info!(
            "VoiceAgent: {text:?} matched {}",
            matches
                .iter()
                .map(|m| m.domain)
                .collect::<Vec<_>>()
                .join(", ")
        );
        AgentReply { matches, spoken }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::stub::StubTransport;
    use crate::api::AdvisorClient;
    use crate::containers::{
        ComplianceContainer, CustomerIntelligenceContainer, IllustrationContainer,
        MeetingPrepContainer, PredictiveAnalyticsContainer,
    };
    use crate::intent::ActionKind;
    use serde_json::json;

    fn agent() -> VoiceAgent {
        let api = Arc::new(AdvisorClient::new(StubTransport::new()));
        VoiceAgent::new(vec![
            Arc::new(ComplianceContainer::new(api.clone())),
            Arc::new(CustomerIntelligenceContainer::new(api.clone())),
            Arc::new(IllustrationContainer::new(api.clone())),
            Arc::new(MeetingPrepContainer::new(api.clone())),
            Arc::new(PredictiveAnalyticsContainer::new(api)),
        ])
    }

    #[test]
    fn test_single_domain_match() {
        let reply = agent().dispatch("Show projections for the Johnsons");
        assert_eq!(reply.matches.len(), 1);
        assert_eq!(reply.matches[0].domain, "Illustration");
        assert_eq!(reply.matches[0].descriptor.action, ActionKind::ShowProjections);
        assert_eq!(reply.spoken, "Here are the income projections.");
    }

    #[test]
    fn test_overlapping_keywords_answer_from_every_domain() {
        let reply = agent().dispatch("who has retention risk");
        let domains: Vec<_> = reply.matches.iter().map(|m| m.domain).collect();
        assert_eq!(domains, vec!["CustomerIntelligence", "PredictiveAnalytics"]);
        assert_eq!(
            reply.spoken,
            "Here are the retention risk scores. These policies show lapse risk."
        );
    }

    #[test]
    fn test_no_match_gets_fallback_reply() {
        let reply = agent().dispatch("what's the weather like");
        assert!(!reply.understood());
        assert!(NOT_UNDERSTOOD.contains(&reply.spoken.as_str()));
    }

    #[test]
    fn test_match_serializes_flat() {
        let reply = agent().dispatch("meeting prep");
        assert_eq!(
            serde_json::to_value(&reply.matches[0]).unwrap(),
            json!({ "domain": "MeetingPrep", "action": "PREPARE_MEETING" })
        );
    }
}
