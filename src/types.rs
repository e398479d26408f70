//! Shared record and configuration types.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Filter object for list lookups. Keys are passed through to the backend
/// as query parameters without validation.
pub type Filters = BTreeMap<String, serde_json::Value>;

// CRM records are rendered as they come: `null` reads as missing and
// numbers or booleans keep their JSON text.
fn scalar_text(value: Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s),
        other => Some(other.to_string()),
    }
}

fn lenient_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(scalar_text(Value::deserialize(deserializer)?).unwrap_or_default())
}

fn lenient_opt_string<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<String>, D::Error> {
    Ok(scalar_text(Value::deserialize(deserializer)?))
}

// =============================================================================
// Primary collections
// =============================================================================

/// A sales lead. Field names follow the CRM table columns.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Lead {
    #[serde(rename = "sys_id", default, deserialize_with = "lenient_string")]
    pub id: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub number: String,
    #[serde(default, deserialize_with = "lenient_opt_string")]
    pub first_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_opt_string")]
    pub last_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_opt_string")]
    pub company: Option<String>,
    #[serde(default, deserialize_with = "lenient_opt_string")]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "lenient_opt_string")]
    pub business_phone: Option<String>,
    #[serde(default, deserialize_with = "lenient_opt_string")]
    pub lead_type: Option<String>,
    #[serde(rename = "lead_rating", default, deserialize_with = "lenient_opt_string")]
    pub rating: Option<String>,
    #[serde(default, deserialize_with = "lenient_opt_string")]
    pub stage: Option<String>,
}

impl Lead {
    /// "First Last", skipping whichever part is missing.
    pub fn display_name(&self) -> String {
        [self.first_name.as_deref(), self.last_name.as_deref()]
            .into_iter()
            .flatten()
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Opportunity {
    #[serde(rename = "sys_id", default, deserialize_with = "lenient_string")]
    pub id: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub number: String,
    #[serde(default, deserialize_with = "lenient_opt_string")]
    pub consumer: Option<String>,
    #[serde(rename = "short_description", default, deserialize_with = "lenient_opt_string")]
    pub description: Option<String>,
    /// Display-formatted amount, e.g. "$50,000". Bare numbers keep their JSON text.
    #[serde(default, deserialize_with = "lenient_opt_string")]
    pub amount: Option<String>,
    #[serde(default, deserialize_with = "lenient_opt_string")]
    pub industry: Option<String>,
    #[serde(default, deserialize_with = "lenient_opt_string")]
    pub rating: Option<String>,
    #[serde(default, deserialize_with = "lenient_opt_string")]
    pub stage: Option<String>,
    #[serde(default, deserialize_with = "lenient_opt_string")]
    pub sales_cycle_type: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    #[serde(rename = "sys_id", default, deserialize_with = "lenient_string")]
    pub id: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub number: String,
    #[serde(default, deserialize_with = "lenient_opt_string")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "lenient_opt_string")]
    pub amount: Option<String>,
    #[serde(default, deserialize_with = "lenient_opt_string")]
    pub status: Option<String>,
    #[serde(default, deserialize_with = "lenient_opt_string")]
    pub valid_until: Option<String>,
}

impl Quote {
    /// Parse `valid_until` as a calendar date. Unparseable values yield `None`.
    pub fn valid_until_date(&self) -> Option<NaiveDate> {
        let raw = self.valid_until.as_deref()?.trim();
        // Accept "2025-01-31" as well as "2025-01-31 00:00:00"
        let date_part = raw.split_whitespace().next()?;
        NaiveDate::parse_from_str(date_part, "%Y-%m-%d").ok()
    }
}

/// Recently viewed record. Shape depends on the source table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecentItem(pub serde_json::Value);

/// The four primary collections shown as dashboard tabs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Collection {
    Leads,
    Opportunities,
    Quotes,
    RecentItems,
}

impl Collection {
    pub const ALL: [Collection; 4] = [
        Collection::Leads,
        Collection::Opportunities,
        Collection::Quotes,
        Collection::RecentItems,
    ];
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardData {
    pub leads: Vec<Lead>,
    pub opportunities: Vec<Opportunity>,
    pub quotes: Vec<Quote>,
    pub recent_items: Vec<RecentItem>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub leads_count: usize,
    pub opportunities_count: usize,
    pub quotes_count: usize,
    pub recent_count: usize,
}

impl DashboardStats {
    pub fn from_data(data: &DashboardData) -> Self {
        Self {
            leads_count: data.leads.len(),
            opportunities_count: data.opportunities.len(),
            quotes_count: data.quotes.len(),
            recent_count: data.recent_items.len(),
        }
    }

    pub fn count(&self, collection: Collection) -> usize {
        match collection {
            Collection::Leads => self.leads_count,
            Collection::Opportunities => self.opportunities_count,
            Collection::Quotes => self.quotes_count,
            Collection::RecentItems => self.recent_count,
        }
    }

    pub fn total(&self) -> usize {
        self.leads_count + self.opportunities_count + self.quotes_count + self.recent_count
    }
}

// =============================================================================
// Configuration
// =============================================================================

/// How the dashboard load reacts when some of the four fetches fail.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FallbackPolicy {
    /// Any failure replaces the whole dataset with the mock dataset.
    #[default]
    AllOrNothing,
    /// Keep collections that loaded; mock only the failed ones.
    PartialFill,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoiceGender {
    #[default]
    Female,
    Male,
    Any,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpeechConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_language")]
    pub language: String,
    #[serde(default = "default_preferred_voices")]
    pub preferred_voices: Vec<String>,
    #[serde(default)]
    pub preferred_gender: VoiceGender,
    #[serde(default = "default_unit")]
    pub default_rate: f32,
    #[serde(default = "default_unit")]
    pub default_pitch: f32,
    #[serde(default = "default_unit")]
    pub default_volume: f32,
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            language: default_language(),
            preferred_voices: default_preferred_voices(),
            preferred_gender: VoiceGender::default(),
            default_rate: 1.0,
            default_pitch: 1.0,
            default_volume: 1.0,
        }
    }
}

/// Persisted at ~/.advisor-assistant/config.json
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_token: Option<String>,
    /// No timeout unless set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_timeout_secs: Option<u64>,
    #[serde(default)]
    pub fallback_policy: FallbackPolicy,
    #[serde(default)]
    pub speech: SpeechConfig,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub advisor_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub advisor_id: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            api_token: None,
            request_timeout_secs: None,
            fallback_policy: FallbackPolicy::default(),
            speech: SpeechConfig::default(),
            advisor_name: None,
            advisor_id: None,
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_unit() -> f32 {
    1.0
}

fn default_language() -> String {
    "en-GB".to_string()
}

fn default_api_base_url() -> String {
    "http://localhost:8080".to_string()
}

fn default_preferred_voices() -> Vec<String> {
    vec![
        "Google UK English Female".to_string(),
        "Microsoft Hazel Desktop - English (Great Britain)".to_string(),
        "Microsoft Susan Desktop - English (Great Britain)".to_string(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lead_decodes_crm_columns() {
        let lead: Lead = serde_json::from_value(serde_json::json!({
            "sys_id": "1",
            "number": "LEAD0001",
            "first_name": "John",
            "last_name": "Smith",
            "lead_rating": "Hot",
            "unknown_column": true
        }))
        .unwrap();
        assert_eq!(lead.id, "1");
        assert_eq!(lead.rating.as_deref(), Some("Hot"));
        assert_eq!(lead.display_name(), "John Smith");
        assert!(lead.company.is_none());
    }

    #[test]
    fn test_sparse_records_still_decode() {
        let quote: Quote = serde_json::from_value(serde_json::json!({})).unwrap();
        assert_eq!(quote, Quote::default());
        assert!(quote.valid_until_date().is_none());
    }

    #[test]
    fn test_null_and_numeric_fields_decode_as_text() {
        let opp: Opportunity = serde_json::from_value(serde_json::json!({
            "sys_id": 42,
            "number": null,
            "amount": 50000,
            "rating": false,
            "stage": null
        }))
        .unwrap();
        assert_eq!(opp.id, "42");
        assert_eq!(opp.number, "");
        assert_eq!(opp.amount.as_deref(), Some("50000"));
        assert_eq!(opp.rating.as_deref(), Some("false"));
        assert!(opp.stage.is_none());
    }

    #[test]
    fn test_quote_valid_until_date() {
        let quote = Quote {
            valid_until: Some("2025-01-31 00:00:00".into()),
            ..Default::default()
        };
        assert_eq!(
            quote.valid_until_date(),
            NaiveDate::from_ymd_opt(2025, 1, 31)
        );

        let quote = Quote {
            valid_until: Some("end of month".into()),
            ..Default::default()
        };
        assert!(quote.valid_until_date().is_none());
    }

    #[test]
    fn test_stats_total_is_sum_of_counts() {
        let data = DashboardData {
            leads: vec![Lead::default(); 3],
            opportunities: vec![Opportunity::default(); 2],
            quotes: vec![Quote::default()],
            recent_items: vec![],
        };
        let stats = DashboardStats::from_data(&data);
        assert_eq!(stats.total(), 6);
        assert_eq!(stats.count(Collection::Opportunities), 2);
    }

    #[test]
    fn test_config_defaults_from_empty_json() {
        let config: Config = serde_json::from_str("{}").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.fallback_policy, FallbackPolicy::AllOrNothing);
        assert!(config.speech.enabled);
        assert_eq!(config.speech.language, "en-GB");
    }

    #[test]
    fn test_config_partial_fill_from_json() {
        let config: Config =
            serde_json::from_str(r#"{"fallbackPolicy":"partialFill","speech":{"enabled":false}}"#)
                .unwrap();
        assert_eq!(config.fallback_policy, FallbackPolicy::PartialFill);
        assert!(!config.speech.enabled);
        assert_eq!(config.speech.default_rate, 1.0);
    }
}
