//! Domain state containers.
//!
//! Each container owns one slice of fetched data with a loading flag and an
//! error slot, and answers voice commands for its domain.

mod tracking;

pub mod compliance;
pub mod customer_intelligence;
pub mod illustration;
pub mod meeting_prep;
pub mod predictive_analytics;

pub use tracking::Snapshot;
pub use compliance::{ComplianceContainer, ComplianceData};
pub use customer_intelligence::{CustomerIntelligenceContainer, CustomerIntelligenceData};
pub use illustration::{IllustrationContainer, IllustrationData};
pub use meeting_prep::{MeetingPrepContainer, MeetingPrepData};
pub use predictive_analytics::{PredictiveAnalyticsContainer, PredictiveAnalyticsData};
