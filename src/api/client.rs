//! Typed operations over a `Transport`.
//!
//! One function per backend operation. Domain payloads are opaque JSON;
//! the four primary collections decode into typed records.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::{json, Value};

use super::{ApiRequest, Transport};
use crate::error::DashboardError;
use crate::types::{Filters, Lead, Opportunity, Quote, RecentItem};

#[derive(Clone)]
pub struct AdvisorClient {
    transport: Arc<dyn Transport>,
}

impl AdvisorClient {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    async fn fetch(&self, request: ApiRequest) -> Result<Value, DashboardError> {
        let route = request.route();
        log::debug!("AdvisorClient: {}", route);
        self.transport.execute(request).await.map_err(|e| {
            log::debug!("AdvisorClient: {} failed: {}", route, e);
            e
        })
    }

    async fn fetch_list<T: DeserializeOwned>(
        &self,
        request: ApiRequest,
    ) -> Result<Vec<T>, DashboardError> {
        let value = self.fetch(request).await?;
        decode_list(value)
    }

    // =========================================================================
    // Primary collections
    // =========================================================================

    pub async fn get_leads(&self) -> Result<Vec<Lead>, DashboardError> {
        self.fetch_list(ApiRequest::get(["leads"])).await
    }

    pub async fn get_opportunities(&self) -> Result<Vec<Opportunity>, DashboardError> {
        self.fetch_list(ApiRequest::get(["opportunities"])).await
    }

    pub async fn get_quotes(&self) -> Result<Vec<Quote>, DashboardError> {
        self.fetch_list(ApiRequest::get(["quotes"])).await
    }

    pub async fn get_recent_items(&self) -> Result<Vec<RecentItem>, DashboardError> {
        self.fetch_list(ApiRequest::get(["recent"])).await
    }

    // =========================================================================
    // Compliance
    // =========================================================================

    pub async fn get_compliance_documents(
        &self,
        customer_id: &str,
    ) -> Result<Vec<Value>, DashboardError> {
        self.fetch_list(ApiRequest::get([
            "compliance",
            "customers",
            customer_id,
            "documents",
        ]))
        .await
    }

    pub async fn generate_disclosures(
        &self,
        transaction_type: &str,
    ) -> Result<Value, DashboardError> {
        self.fetch(
            ApiRequest::post(["compliance", "disclosures"])
                .with_body(json!({ "transactionType": transaction_type })),
        )
        .await
    }

    pub async fn assemble_documents(&self, appointment_id: &str) -> Result<Value, DashboardError> {
        self.fetch(ApiRequest::post([
            "compliance",
            "appointments",
            appointment_id,
            "documents",
        ]))
        .await
    }

    pub async fn get_audit_trail(&self, document_id: &str) -> Result<Value, DashboardError> {
        self.fetch(ApiRequest::get([
            "compliance",
            "documents",
            document_id,
            "audit-trail",
        ]))
        .await
    }

    // =========================================================================
    // Customer intelligence
    // =========================================================================

    pub async fn get_customer_intelligence(
        &self,
        customer_id: &str,
    ) -> Result<Value, DashboardError> {
        self.fetch(ApiRequest::get(["intelligence", "customers", customer_id]))
            .await
    }

    pub async fn get_life_stage_milestones(
        &self,
        filters: &Filters,
    ) -> Result<Vec<Value>, DashboardError> {
        self.fetch_list(ApiRequest::get(["intelligence", "milestones"]).with_filters(filters))
            .await
    }

    pub async fn get_retention_risk_scores(
        &self,
        customer_id: &str,
    ) -> Result<Value, DashboardError> {
        self.fetch(ApiRequest::get([
            "intelligence",
            "customers",
            customer_id,
            "retention-risk",
        ]))
        .await
    }

    pub async fn get_coverage_adequacy(&self, customer_id: &str) -> Result<Value, DashboardError> {
        self.fetch(ApiRequest::get([
            "intelligence",
            "customers",
            customer_id,
            "coverage-adequacy",
        ]))
        .await
    }

    // =========================================================================
    // Income illustration
    // =========================================================================

    pub async fn generate_income_illustration(
        &self,
        params: &Value,
    ) -> Result<Value, DashboardError> {
        self.fetch(ApiRequest::post(["illustrations"]).with_body(params.clone()))
            .await
    }

    pub async fn get_income_projections(
        &self,
        scenario_id: &str,
    ) -> Result<Vec<Value>, DashboardError> {
        self.fetch_list(ApiRequest::get([
            "illustrations",
            "scenarios",
            scenario_id,
            "projections",
        ]))
        .await
    }

    pub async fn validate_suitability(
        &self,
        illustration_id: &str,
    ) -> Result<Value, DashboardError> {
        self.fetch(ApiRequest::post([
            "illustrations",
            illustration_id,
            "suitability",
        ]))
        .await
    }

    pub async fn generate_regulatory_report(
        &self,
        illustration_id: &str,
    ) -> Result<Value, DashboardError> {
        self.fetch(ApiRequest::post([
            "illustrations",
            illustration_id,
            "regulatory-report",
        ]))
        .await
    }

    // =========================================================================
    // Meeting preparation
    // =========================================================================

    pub async fn get_meeting_prep_data(
        &self,
        appointment_id: &str,
    ) -> Result<Value, DashboardError> {
        self.fetch(ApiRequest::get(["meeting-prep", "appointments", appointment_id]))
            .await
    }

    pub async fn get_client_snapshot(&self, customer_id: &str) -> Result<Value, DashboardError> {
        self.customer_prep(customer_id, "snapshot").await
    }

    pub async fn get_exposure_view(&self, customer_id: &str) -> Result<Value, DashboardError> {
        self.customer_prep(customer_id, "exposure").await
    }

    pub async fn get_competitor_quotes(&self, customer_id: &str) -> Result<Value, DashboardError> {
        self.customer_prep(customer_id, "competitor-quotes").await
    }

    pub async fn get_upgrade_eligibility(
        &self,
        customer_id: &str,
    ) -> Result<Value, DashboardError> {
        self.customer_prep(customer_id, "upgrade-eligibility").await
    }

    async fn customer_prep(&self, customer_id: &str, view: &str) -> Result<Value, DashboardError> {
        self.fetch(ApiRequest::get(["meeting-prep", "customers", customer_id, view]))
            .await
    }

    // =========================================================================
    // Predictive analytics
    // =========================================================================

    pub async fn get_predictive_insights(
        &self,
        customer_id: &str,
    ) -> Result<Value, DashboardError> {
        self.fetch(ApiRequest::get([
            "analytics",
            "customers",
            customer_id,
            "insights",
        ]))
        .await
    }

    pub async fn get_lapse_risk_indicators(
        &self,
        filters: &Filters,
    ) -> Result<Vec<Value>, DashboardError> {
        self.fetch_list(ApiRequest::get(["analytics", "lapse-risks"]).with_filters(filters))
            .await
    }

    pub async fn get_cross_sell_opportunities(
        &self,
        advisor_id: &str,
    ) -> Result<Vec<Value>, DashboardError> {
        self.fetch_list(ApiRequest::get([
            "analytics",
            "advisors",
            advisor_id,
            "cross-sell",
        ]))
        .await
    }

    pub async fn get_engagement_trends(&self, customer_id: &str) -> Result<Value, DashboardError> {
        self.fetch(ApiRequest::get([
            "analytics",
            "customers",
            customer_id,
            "engagement-trends",
        ]))
        .await
    }
}

/// `null` decodes as an empty list; anything other than an array is a parse error.
fn decode_list<T: DeserializeOwned>(value: Value) -> Result<Vec<T>, DashboardError> {
    match value {
        Value::Null => Ok(Vec::new()),
        Value::Array(_) => Ok(serde_json::from_value(value)?),
        other => Err(DashboardError::Parse(format!(
            "expected a list, got {}",
            json_kind(&other)
        ))),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
