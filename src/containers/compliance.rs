//! Compliance documents, disclosures, document assembly and audit trails.

use std::collections::HashMap;
use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;

use super::tracking::{ContainerCore, Slot, Snapshot};
use crate::api::AdvisorClient;
use crate::error::DashboardError;
use crate::intent::{self, list_value, ActionDescriptor, ActionKind, CommandInterpreter, IntentRule};

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplianceData {
    pub documents: Vec<Value>,
    /// Keyed by transaction type.
    pub disclosures: HashMap<String, Value>,
    /// Keyed by appointment id.
    pub assembled_docs: HashMap<String, Value>,
    /// Keyed by document id.
    pub audit_trails: HashMap<String, Value>,
}

fn select_documents(data: &ComplianceData) -> Value {
    list_value(&data.documents)
}

const RULES: &[IntentRule<ComplianceData>] = &[
    IntentRule {
        patterns: &["show documents", "compliance documents"],
        action: ActionKind::ShowDocuments,
        select: Some(select_documents),
    },
    IntentRule {
        patterns: &["generate disclosures", "create disclosures"],
        action: ActionKind::GenerateDisclosures,
        select: None,
    },
    IntentRule {
        patterns: &["assemble documents", "prepare documents"],
        action: ActionKind::AssembleDocuments,
        select: None,
    },
    IntentRule {
        patterns: &["audit trail", "show audit"],
        action: ActionKind::ShowAuditTrail,
        select: None,
    },
];

pub struct ComplianceContainer {
    api: Arc<AdvisorClient>,
    core: ContainerCore<ComplianceData>,
}

impl ComplianceContainer {
    pub fn new(api: Arc<AdvisorClient>) -> Self {
        Self {
            api,
            core: ContainerCore::new("ComplianceContainer"),
        }
    }

    pub async fn fetch_documents(&self, customer_id: &str) -> Result<Vec<Value>, DashboardError> {
        self.core
            .track(
                Slot::whole("documents", "Failed to fetch compliance documents"),
                self.api.get_compliance_documents(customer_id),
                |d, docs| d.documents = docs.clone(),
            )
            .await
    }

    pub async fn create_disclosures(&self, transaction_type: &str) -> Result<Value, DashboardError> {
        self.core
            .track(
                Slot::keyed("disclosures", transaction_type, "Failed to generate disclosures"),
                self.api.generate_disclosures(transaction_type),
                |d, v| {
                    d.disclosures.insert(transaction_type.to_string(), v.clone());
                },
            )
            .await
    }

    pub async fn assemble_docs_for_appointment(
        &self,
        appointment_id: &str,
    ) -> Result<Value, DashboardError> {
        self.core
            .track(
                Slot::keyed("assembled_docs", appointment_id, "Failed to assemble documents"),
                self.api.assemble_documents(appointment_id),
                |d, v| {
                    d.assembled_docs.insert(appointment_id.to_string(), v.clone());
                },
            )
            .await
    }

    pub async fn fetch_audit_trail(&self, document_id: &str) -> Result<Value, DashboardError> {
        self.core
            .track(
                Slot::keyed("audit_trails", document_id, "Failed to fetch audit trail"),
                self.api.get_audit_trail(document_id),
                |d, v| {
                    d.audit_trails.insert(document_id.to_string(), v.clone());
                },
            )
            .await
    }

    pub fn documents(&self) -> Vec<Value> {
        self.core.read(|d| d.documents.clone())
    }

    pub fn disclosures(&self, transaction_type: &str) -> Option<Value> {
        self.core.read(|d| d.disclosures.get(transaction_type).cloned())
    }

    pub fn assembled_docs(&self, appointment_id: &str) -> Option<Value> {
        self.core.read(|d| d.assembled_docs.get(appointment_id).cloned())
    }

    pub fn audit_trail(&self, document_id: &str) -> Option<Value> {
        self.core.read(|d| d.audit_trails.get(document_id).cloned())
    }

    pub fn loading(&self) -> bool {
        self.core.loading()
    }

    pub fn error(&self) -> Option<String> {
        self.core.error()
    }

    pub fn snapshot(&self) -> Snapshot<ComplianceData> {
        self.core.snapshot()
    }
}

impl CommandInterpreter for ComplianceContainer {
    fn domain(&self) -> &'static str {
        "Compliance"
    }

    fn interpret(&self, text: &str) -> Option<ActionDescriptor> {
        self.core.read(|d| intent::interpret(RULES, d, text))
    }
}
