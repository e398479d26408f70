//! Predictive analytics: insights, lapse risk indicators, cross-sell
//! opportunities and engagement trends.
//!
//! Retention/lapse risk overlaps with `CustomerIntelligenceContainer`; the
//! two are not reconciled.

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
pub struct PredictiveAnalyticsData {
    /// Keyed by customer id.
    pub insights: HashMap<String, Value>,
    pub lapse_risks: Vec<Value>,
    pub opportunities: Vec<Value>,
    /// Keyed by customer id.
    pub engagement_trends: HashMap<String, Value>,
}

fn select_insights(data: &PredictiveAnalyticsData) -> Value {
    map_value(&data.insights)
}

fn select_lapse_risks(data: &PredictiveAnalyticsData) -> Value {
    list_value(&data.lapse_risks)
}

fn select_opportunities(data: &PredictiveAnalyticsData) -> Value {
    list_value(&data.opportunities)
}

fn select_engagement_trends(data: &PredictiveAnalyticsData) -> Value {
    map_value(&data.engagement_trends)
}

const RULES: &[IntentRule<PredictiveAnalyticsData>] = &[
    IntentRule {
        patterns: &["show insights", "predictive insights"],
        action: ActionKind::ShowInsights,
        select: Some(select_insights),
    },
    IntentRule {
        patterns: &["lapse risk", "retention risk"],
        action: ActionKind::ShowLapseRisks,
        select: Some(select_lapse_risks),
    },
    IntentRule {
        patterns: &["opportunities", "cross sell"],
        action: ActionKind::ShowOpportunities,
        select: Some(select_opportunities),
    },
    IntentRule {
        patterns: &["engagement trends", "show trends"],
        action: ActionKind::ShowEngagementTrends,
        select: Some(select_engagement_trends),
    },
];

pub struct PredictiveAnalyticsContainer {
    api: Arc<AdvisorClient>,
    core: ContainerCore<PredictiveAnalyticsData>,
}

impl PredictiveAnalyticsContainer {
    pub fn new(api: Arc<AdvisorClient>) -> Self {
        Self {
            api,
            core: ContainerCore::new("PredictiveAnalyticsContainer"),
        }
    }

    pub async fn fetch_insights(&self, customer_id: &str) -> Result<Value, DashboardError> {
        self.core
            .track(
                Slot::keyed("insights", customer_id, "Failed to fetch predictive insights"),
                self.api.get_predictive_insights(customer_id),
                |d, v| {
                    d.insights.insert(customer_id.to_string(), v.clone());
                },
            )
            .await
    }

    pub async fn fetch_lapse_risks(&self, filters: &Filters) -> Result<Vec<Value>, DashboardError> {
        self.core
            .track(
                Slot::whole("lapse_risks", "Failed to fetch lapse risks"),
                self.api.get_lapse_risk_indicators(filters),
                |d, v| d.lapse_risks = v.clone(),
            )
            .await
    }

    pub async fn fetch_opportunities(&self, advisor_id: &str) -> Result<Vec<Value>, DashboardError> {
        self.core
            .track(
                Slot::whole("opportunities", "Failed to fetch opportunities"),
                self.api.get_cross_sell_opportunities(advisor_id),
                |d, v| d.opportunities = v.clone(),
            )
            .await
    }

    pub async fn fetch_engagement_trends(
        &self,
        customer_id: &str,
    ) -> Result<Value, DashboardError> {
        self.core
            .track(
                Slot::keyed(
                    "engagement_trends",
                    customer_id,
                    "Failed to fetch engagement trends",
                ),
                self.api.get_engagement_trends(customer_id),
                |d, v| {
                    d.engagement_trends.insert(customer_id.to_string(), v.clone());
                },
            )
            .await
    }

    pub fn insights(&self, customer_id: &str) -> Option<Value> {
        self.core.read(|d| d.insights.get(customer_id).cloned())
    }

    pub fn lapse_risks(&self) -> Vec<Value> {
        self.core.read(|d| d.lapse_risks.clone())
    }

    pub fn opportunities(&self) -> Vec<Value> {
        self.core.read(|d| d.opportunities.clone())
    }

    pub fn engagement_trends(&self, customer_id: &str) -> Option<Value> {
        self.core.read(|d| d.engagement_trends.get(customer_id).cloned())
    }

    pub fn loading(&self) -> bool {
        self.core.loading()
    }

    pub fn error(&self) -> Option<String> {
        self.core.error()
    }

    pub fn snapshot(&self) -> Snapshot<PredictiveAnalyticsData> {
        self.core.snapshot()
    }
}

impl CommandInterpreter for PredictiveAnalyticsContainer {
    fn domain(&self) -> &'static str {
        "PredictiveAnalytics"
    }

    fn interpret(&self, text: &str) -> Option<ActionDescriptor> {
        self.core.read(|d| intent::interpret(RULES, d, text))
    }
}
