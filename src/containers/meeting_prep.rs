//! Meeting preparation: appointment prep bundles and per-customer views
//! (snapshot, exposure, competitor quotes, upgrade eligibility).

use std::collections::HashMap;
use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;

use super::tracking::{ContainerCore, Slot, Snapshot};
use crate::api::AdvisorClient;
use crate::error::DashboardError;
use crate::intent::{self, ActionDescriptor, ActionKind, CommandInterpreter, IntentRule};

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MeetingPrepData {
    /// Keyed by appointment id.
    pub prep_data: HashMap<String, Value>,
    /// The rest are keyed by customer id.
    pub client_snapshots: HashMap<String, Value>,
    pub exposure_views: HashMap<String, Value>,
    pub competitor_quotes: HashMap<String, Value>,
    pub upgrade_eligibility: HashMap<String, Value>,
}

const RULES: &[IntentRule<MeetingPrepData>] = &[
    IntentRule {
        patterns: &["prepare meeting", "meeting prep"],
        action: ActionKind::PrepareMeeting,
        select: None,
    },
    IntentRule {
        patterns: &["client snapshot", "customer snapshot"],
        action: ActionKind::ShowClientSnapshot,
        select: None,
    },
    IntentRule {
        patterns: &["exposure view", "show exposure"],
        action: ActionKind::ShowExposureView,
        select: None,
    },
];

pub struct MeetingPrepContainer {
    api: Arc<AdvisorClient>,
    core: ContainerCore<MeetingPrepData>,
}

impl MeetingPrepContainer {
    pub fn new(api: Arc<AdvisorClient>) -> Self {
        Self {
            api,
            core: ContainerCore::new("MeetingPrepContainer"),
        }
    }

    pub async fn fetch_meeting_prep(&self, appointment_id: &str) -> Result<Value, DashboardError> {
        self.core
            .track(
                Slot::keyed("prep_data", appointment_id, "Failed to fetch meeting prep data"),
                self.api.get_meeting_prep_data(appointment_id),
                |d, v| {
                    d.prep_data.insert(appointment_id.to_string(), v.clone());
                },
            )
            .await
    }

    pub async fn fetch_client_snapshot(&self, customer_id: &str) -> Result<Value, DashboardError> {
        self.core
            .track(
                Slot::keyed("client_snapshots", customer_id, "Failed to fetch client snapshot"),
                self.api.get_client_snapshot(customer_id),
                |d, v| {
                    d.client_snapshots.insert(customer_id.to_string(), v.clone());
                },
            )
            .await
    }

    pub async fn fetch_exposure_view(&self, customer_id: &str) -> Result<Value, DashboardError> {
        self.core
            .track(
                Slot::keyed("exposure_views", customer_id, "Failed to fetch exposure view"),
                self.api.get_exposure_view(customer_id),
                |d, v| {
                    d.exposure_views.insert(customer_id.to_string(), v.clone());
                },
            )
            .await
    }

    pub async fn fetch_competitor_quotes(&self, customer_id: &str) -> Result<Value, DashboardError> {
        self.core
            .track(
                Slot::keyed(
                    "competitor_quotes",
                    customer_id,
                    "Failed to fetch competitor quotes",
                ),
                self.api.get_competitor_quotes(customer_id),
                |d, v| {
                    d.competitor_quotes.insert(customer_id.to_string(), v.clone());
                },
            )
            .await
    }

    pub async fn fetch_upgrade_eligibility(
        &self,
        customer_id: &str,
    ) -> Result<Value, DashboardError> {
        self.core
            .track(
                Slot::keyed(
                    "upgrade_eligibility",
                    customer_id,
                    "Failed to fetch upgrade eligibility",
                ),
                self.api.get_upgrade_eligibility(customer_id),
                |d, v| {
                    d.upgrade_eligibility.insert(customer_id.to_string(), v.clone());
                },
            )
            .await
    }

    pub fn prep_data(&self, appointment_id: &str) -> Option<Value> {
        self.core.read(|d| d.prep_data.get(appointment_id).cloned())
    }

    pub fn client_snapshot(&self, customer_id: &str) -> Option<Value> {
        self.core.read(|d| d.client_snapshots.get(customer_id).cloned())
    }

    pub fn exposure_view(&self, customer_id: &str) -> Option<Value> {
        self.core.read(|d| d.exposure_views.get(customer_id).cloned())
    }

    pub fn competitor_quotes(&self, customer_id: &str) -> Option<Value> {
        self.core.read(|d| d.competitor_quotes.get(customer_id).cloned())
    }

    pub fn upgrade_eligibility(&self, customer_id: &str) -> Option<Value> {
        self.core.read(|d| d.upgrade_eligibility.get(customer_id).cloned())
    }

    pub fn loading(&self) -> bool {
        self.core.loading()
    }

    pub fn error(&self) -> Option<String> {
        self.core.error()
    }

    pub fn snapshot(&self) -> Snapshot<MeetingPrepData> {
        self.core.snapshot()
    }
}

impl CommandInterpreter for MeetingPrepContainer {
    fn domain(&self) -> &'static str {
        "MeetingPrep"
    }

    fn interpret(&self, text: &str) -> Option<ActionDescriptor> {
        self.core.read(|d| intent::interpret(RULES, d, text))
    }
}
