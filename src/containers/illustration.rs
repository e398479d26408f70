//! Income illustration planning: illustration generation, projections,
//! suitability checks and regulatory reports.

use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;

use super::tracking::{ContainerCore, Slot, Snapshot};
use crate::api::AdvisorClient;
use crate::error::DashboardError;
use crate::intent::{self, list_value, ActionDescriptor, ActionKind, CommandInterpreter, IntentRule};

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IllustrationData {
    pub current_illustration: Option<Value>,
    pub projections: Vec<Value>,
    pub suitability_report: Option<Value>,
    pub regulatory_report: Option<Value>,
}

fn select_projections(data: &IllustrationData) -> Value {
    list_value(&data.projections)
}

const RULES: &[IntentRule<IllustrationData>] = &[
    IntentRule {
        patterns: &["create illustration", "new illustration"],
        action: ActionKind::CreateIllustration,
        select: None,
    },
    IntentRule {
        patterns: &["show projections", "income projections"],
        action: ActionKind::ShowProjections,
        select: Some(select_projections),
    },
    IntentRule {
        patterns: &["validate suitability", "check suitability"],
        action: ActionKind::ValidateSuitability,
        select: None,
    },
    IntentRule {
        patterns: &["generate report", "regulatory report"],
        action: ActionKind::GenerateReport,
        select: None,
    },
];

pub struct IllustrationContainer {
    api: Arc<AdvisorClient>,
    core: ContainerCore<IllustrationData>,
}

impl IllustrationContainer {
    pub fn new(api: Arc<AdvisorClient>) -> Self {
        Self {
            api,
            core: ContainerCore::new("IllustrationContainer"),
        }
    }

    /// `params` is forwarded to the backend as-is.
    pub async fn create_illustration(&self, params: &Value) -> Result<Value, DashboardError> {
        self.core
            .track(
                Slot::whole("current_illustration", "Failed to create illustration"),
                self.api.generate_income_illustration(params),
                |d, v| d.current_illustration = Some(v.clone()),
            )
            .await
    }

    pub async fn fetch_projections(&self, scenario_id: &str) -> Result<Vec<Value>, DashboardError> {
        self.core
            .track(
                Slot::whole("projections", "Failed to fetch projections"),
                self.api.get_income_projections(scenario_id),
                |d, v| d.projections = v.clone(),
            )
            .await
    }

    pub async fn check_suitability(&self, illustration_id: &str) -> Result<Value, DashboardError> {
        self.core
            .track(
                Slot::whole("suitability_report", "Failed to validate suitability"),
                self.api.validate_suitability(illustration_id),
                |d, v| d.suitability_report = Some(v.clone()),
            )
            .await
    }

    pub async fn generate_report(&self, illustration_id: &str) -> Result<Value, DashboardError> {
        self.core
            .track(
                Slot::whole("regulatory_report", "Failed to generate report"),
                self.api.generate_regulatory_report(illustration_id),
                |d, v| d.regulatory_report = Some(v.clone()),
            )
            .await
    }

    pub fn current_illustration(&self) -> Option<Value> {
        self.core.read(|d| d.current_illustration.clone())
    }

    pub fn projections(&self) -> Vec<Value> {
        self.core.read(|d| d.projections.clone())
    }

    pub fn suitability_report(&self) -> Option<Value> {
        self.core.read(|d| d.suitability_report.clone())
    }

    pub fn regulatory_report(&self) -> Option<Value> {
        self.core.read(|d| d.regulatory_report.clone())
    }

    pub fn loading(&self) -> bool {
        self.core.loading()
    }

    pub fn error(&self) -> Option<String> {
        self.core.error()
    }

    pub fn snapshot(&self) -> Snapshot<IllustrationData> {
        self.core.snapshot()
    }
}

impl CommandInterpreter for IllustrationContainer {
    fn domain(&self) -> &'static str {
        "Illustration"
    }

    fn interpret(&self, text: &str) -> Option<ActionDescriptor> {
        self.core.read(|d| intent::interpret(RULES, d, text))
    }
}
