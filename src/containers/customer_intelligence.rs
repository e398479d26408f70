//! Customer intelligence: profile, life-stage milestones, retention risk and
//! coverage adequacy.

use std::collections::HashMap;
use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;

use super::tracking::{ContainerCore, Slot, Snapshot};
use crate::api::AdvisorClient;
use crate::error::DashboardError;
use crate::intent::{
    self, list_value, map_value, ActionDescriptor, ActionKind, CommandInterpreter, IntentRule,
};
use crate::types::Filters;

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerIntelligenceData {
    pub intelligence: Option<Value>,
    pub milestones: Vec<Value>,
    /// Keyed by customer id.
    pub retention_risks: HashMap<String, Value>,
    /// Keyed by customer id.
    pub coverage_adequacy: HashMap<String, Value>,
}

fn select_milestones(data: &CustomerIntelligenceData) -> Value {
    list_value(&data.milestones)
}

fn select_retention_risks(data: &CustomerIntelligenceData) -> Value {
    map_value(&data.retention_risks)
}

fn select_coverage_adequacy(data: &CustomerIntelligenceData) -> Value {
    map_value(&data.coverage_adequacy)
}

const RULES: &[IntentRule<CustomerIntelligenceData>] = &[
    IntentRule {
        patterns: &["show milestones", "life stage"],
        action: ActionKind::ShowMilestones,
        select: Some(select_milestones),
    },
    IntentRule {
        patterns: &["retention risk", "lapse risk"],
        action: ActionKind::ShowRetentionRisks,
        select: Some(select_retention_risks),
    },
    IntentRule {
        patterns: &["coverage gap", "coverage adequacy"],
        action: ActionKind::ShowCoverageAdequacy,
        select: Some(select_coverage_adequacy),
    },
];

pub struct CustomerIntelligenceContainer {
    api: Arc<AdvisorClient>,
    core: ContainerCore<CustomerIntelligenceData>,
}

impl CustomerIntelligenceContainer {
    pub fn new(api: Arc<AdvisorClient>) -> Self {
        Self {
            api,
            core: ContainerCore::new("CustomerIntelligenceContainer"),
        }
    }

    pub async fn fetch_customer_intelligence(
        &self,
        customer_id: &str,
    ) -> Result<Value, DashboardError> {
        self.core
            .track(
                Slot::whole("intelligence", "Failed to fetch customer intelligence"),
                self.api.get_customer_intelligence(customer_id),
                |d, v| d.intelligence = Some(v.clone()),
            )
            .await
    }

    pub async fn fetch_milestones(&self, filters: &Filters) -> Result<Vec<Value>, DashboardError> {
        self.core
            .track(
                Slot::whole("milestones", "Failed to fetch milestones"),
                self.api.get_life_stage_milestones(filters),
                |d, v| d.milestones = v.clone(),
            )
            .await
    }

    pub async fn fetch_retention_risk(&self, customer_id: &str) -> Result<Value, DashboardError> {
        self.core
            .track(
                Slot::keyed("retention_risks", customer_id, "Failed to fetch retention risk"),
                self.api.get_retention_risk_scores(customer_id),
                |d, v| {
                    d.retention_risks.insert(customer_id.to_string(), v.clone());
                },
            )
            .await
    }

    pub async fn fetch_coverage_adequacy(
        &self,
        customer_id: &str,
    ) -> Result<Value, DashboardError> {
        self.core
            .track(
                Slot::keyed(
                    "coverage_adequacy",
                    customer_id,
                    "Failed to fetch coverage adequacy",
                ),
                self.api.get_coverage_adequacy(customer_id),
                |d, v| {
                    d.coverage_adequacy.insert(customer_id.to_string(), v.clone());
                },
            )
            .await
    }

    pub fn intelligence(&self) -> Option<Value> {
        self.core.read(|d| d.intelligence.clone())
    }

    pub fn milestones(&self) -> Vec<Value> {
        self.core.read(|d| d.milestones.clone())
    }

    pub fn retention_risk(&self, customer_id: &str) -> Option<Value> {
        self.core.read(|d| d.retention_risks.get(customer_id).cloned())
    }

    pub fn coverage_adequacy(&self, customer_id: &str) -> Option<Value> {
        self.core.read(|d| d.coverage_adequacy.get(customer_id).cloned())
    }

    pub fn loading(&self) -> bool {
        self.core.loading()
    }

    pub fn error(&self) -> Option<String> {
        self.core.error()
    }

    pub fn snapshot(&self) -> Snapshot<CustomerIntelligenceData> {
        self.core.snapshot()
    }
}

impl CommandInterpreter for CustomerIntelligenceContainer {
    fn domain(&self) -> &'static str {
        "CustomerIntelligence"
    }

    fn interpret(&self, text: &str) -> Option<ActionDescriptor> {
        self.core.read(|d| intent::interpret(RULES, d, text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::stub::StubTransport;
    use serde_json::json;

    fn container(stub: &Arc<StubTransport>) -> CustomerIntelligenceContainer {
        CustomerIntelligenceContainer::new(Arc::new(AdvisorClient::new(stub.clone())))
    }

    #[tokio::test]
    async fn test_intelligence_is_replaced_wholesale() {
        let stub = StubTransport::new();
        stub.respond("GET intelligence/customers/C-1", json!({ "segment": "pre-retiree" }));
        stub.respond("GET intelligence/customers/C-2", json!({ "segment": "young family" }));
        let ci = container(&stub);

        ci.fetch_customer_intelligence("C-1").await.unwrap();
        ci.fetch_customer_intelligence("C-2").await.unwrap();

        assert_eq!(ci.intelligence(), Some(json!({ "segment": "young family" })));
    }

    #[tokio::test]
    async fn test_milestones_pass_filters_as_query() {
        let stub = StubTransport::new();
        stub.respond("GET intelligence/milestones", json!([{ "event": "retirement" }]));
        let ci = container(&stub);

        let mut filters = Filters::new();
        filters.insert("withinDays".into(), json!(90));
        let milestones = ci.fetch_milestones(&filters).await.unwrap();

        assert_eq!(milestones, vec![json!({ "event": "retirement" })]);
        assert_eq!(
            stub.calls()[0].query,
            vec![("withinDays".to_string(), "90".to_string())]
        );
    }

    #[tokio::test]
    async fn test_retention_risk_entries_are_independent() {
        let stub = StubTransport::new();
        stub.respond("GET intelligence/customers/C-1/retention-risk", json!({ "score": 0.8 }));
        stub.respond("GET intelligence/customers/C-2/retention-risk", json!({ "score": 0.1 }));
        let ci = container(&stub);

        ci.fetch_retention_risk("C-1").await.unwrap();
        let first = ci.retention_risk("C-1");
        ci.fetch_retention_risk("C-2").await.unwrap();

        assert_eq!(ci.retention_risk("C-1"), first);
        assert_eq!(ci.retention_risk("C-2"), Some(json!({ "score": 0.1 })));
    }

    #[tokio::test]
    async fn test_coverage_failure_surfaces_error() {
        let stub = StubTransport::new();
        stub.fail_network("GET intelligence/customers/C-1/coverage-adequacy", "timed out");
        let ci = container(&stub);

        assert!(ci.fetch_coverage_adequacy("C-1").await.is_err());
        assert_eq!(ci.error().as_deref(), Some("Network error: timed out"));
        assert!(ci.coverage_adequacy("C-1").is_none());
        assert!(!ci.loading());
    }

    #[tokio::test]
    async fn test_retention_risk_command_carries_snapshot() {
        let stub = StubTransport::new();
        stub.respond("GET intelligence/customers/C-1/retention-risk", json!({ "score": 0.8 }));
        let ci = container(&stub);
        ci.fetch_retention_risk("C-1").await.unwrap();

        let hit = ci.interpret("Who has a high lapse risk?").unwrap();
        assert_eq!(hit.action, ActionKind::ShowRetentionRisks);
        assert_eq!(hit.data, Some(json!({ "C-1": { "score": 0.8 } })));
    }

    #[test]
    fn test_keyword_table() {
        let stub = StubTransport::new();
        let ci = container(&stub);

        let cases = [
            ("show milestones", ActionKind::ShowMilestones),
            ("any life stage events?", ActionKind::ShowMilestones),
            ("retention risk", ActionKind::ShowRetentionRisks),
            ("coverage gap analysis", ActionKind::ShowCoverageAdequacy),
            ("COVERAGE ADEQUACY", ActionKind::ShowCoverageAdequacy),
        ];
        for (text, expected) in cases {
            assert_eq!(ci.interpret(text).map(|h| h.action), Some(expected), "input: {text}");
        }
        assert_eq!(
            ci.interpret("show milestones").unwrap().data,
            Some(json!([]))
        );
        assert!(ci.interpret("show documents").is_none());
    }
}
