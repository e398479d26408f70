//! Dashboard orchestration: the four primary collections, loaded together.
//!
//! The load never fails. When the backend misbehaves the dashboard shows the
//! fixed mock dataset instead, either wholesale or per collection depending
//! on the configured `FallbackPolicy`.

use std::sync::Arc;

use parking_lot::Mutex;
use serde::Serialize;

use crate::api::AdvisorClient;
use crate::error::DashboardError;
use crate::mock_data;
use crate::types::{Collection, DashboardData, DashboardStats, FallbackPolicy};

/// Where the displayed data came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum DataSource {
    Live,
    Mock,
    /// Some collections are live; these ones are mocked.
    Partial { mocked: Vec<Collection> },
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSnapshot {
    pub data: DashboardData,
    pub stats: DashboardStats,
    /// `None` until the first load settles.
    pub source: Option<DataSource>,
    pub loading: bool,
}

pub struct Dashboard {
    api: Arc<AdvisorClient>,
    policy: FallbackPolicy,
    state: Mutex<LoadState>,
}

#[derive(Default)]
struct LoadState {
    snapshot: DashboardSnapshot,
    in_flight: usize,
    latest: u64,
}

/// Leaves the in-flight count, also when a `load` future is dropped.
struct LoadingGuard<'a>(&'a Mutex<LoadState>);

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        let mut state = self.0.lock();
        state.in_flight = state.in_flight.saturating_sub(1);
        state.snapshot.loading = state.in_flight > 0;
    }
}

impl Dashboard {
    pub fn new(api: Arc<AdvisorClient>, policy: FallbackPolicy) -> Self {
        Self {
            api,
            policy,
            state: Mutex::new(LoadState::default()),
        }
    }

    pub fn policy(&self) -> FallbackPolicy {
        self.policy
    }

    /// Fetch all four collections concurrently and publish the result.
    ///
    /// Overlapping loads are allowed: only the most recently started one
    /// publishes, and `loading` stays set until every load has settled.
    /// Returns the snapshot as of this load's settlement.
    pub async fn load(&self) -> DashboardSnapshot {
        let seq = {
            let mut state = self.state.lock();
            state.in_flight += 1;
            state.latest += 1;
            state.snapshot.loading = true;
            state.latest
        };
        let guard = LoadingGuard(&self.state);

        let (data, source) = match self.policy {
            FallbackPolicy::AllOrNothing => self.load_all_or_nothing().await,
            FallbackPolicy::PartialFill => self.load_partial().await,
        };
        log::info!(
            "Dashboard: loaded {:?} ({} leads, {} opportunities, {} quotes, {} recent)",
            source,
            data.leads.len(),
            data.opportunities.len(),
            data.quotes.len(),
            data.recent_items.len()
        );

        {
            let mut state = self.state.lock();
            if seq == state.latest {
                state.snapshot.stats = DashboardStats::from_data(&data);
                state.snapshot.data = data;
                state.snapshot.source = Some(source);
            } else {
                log::debug!("Dashboard: discarding load #{seq}, #{} is newer", state.latest);
            }
        }
        drop(guard);
        self.snapshot()
    }

    async fn load_all_or_nothing(&self) -> (DashboardData, DataSource) {
        let result = tokio::try_join!(
            self.api.get_leads(),
            self.api.get_opportunities(),
            self.api.get_quotes(),
            self.api.get_recent_items(),
        );
        match result {
            Ok((leads, opportunities, quotes, recent_items)) => (
                DashboardData {
                    leads,
                    opportunities,
                    quotes,
                    recent_items,
                },
                DataSource::Live,
            ),
            Err(e) => {
                log::warn!("Dashboard: load failed, showing mock data: {e}");
                (mock_data::dashboard(), DataSource::Mock)
            }
        }
    }

    async fn load_partial(&self) -> (DashboardData, DataSource) {
        let (leads, opportunities, quotes, recent_items) = tokio::join!(
            self.api.get_leads(),
            self.api.get_opportunities(),
            self.api.get_quotes(),
            self.api.get_recent_items(),
        );

        let mut mocked = Vec::new();
        let mut data = DashboardData::default();
        if let Some(v) = keep_or_mark(leads, Collection::Leads, &mut mocked) {
            data.leads = v;
        }
        if let Some(v) = keep_or_mark(opportunities, Collection::Opportunities, &mut mocked) {
            data.opportunities = v;
        }
        if let Some(v) = keep_or_mark(quotes, Collection::Quotes, &mut mocked) {
            data.quotes = v;
        }
        if let Some(v) = keep_or_mark(recent_items, Collection::RecentItems, &mut mocked) {
            data.recent_items = v;
        }
        for collection in &mocked {
            mock_data::fill(&mut data, *collection);
        }

        let source = if mocked.is_empty() {
            DataSource::Live
        } else {
            DataSource::Partial { mocked }
        };
        (data, source)
    }

    pub fn snapshot(&self) -> DashboardSnapshot {
        self.state.lock().snapshot.clone()
    }

    pub fn stats(&self) -> DashboardStats {
        self.state.lock().snapshot.stats
    }

    pub fn loading(&self) -> bool {
        self.state.lock().in_flight > 0
    }
}

fn keep_or_mark<T>(
    result: Result<Vec<T>, DashboardError>,
    collection: Collection,
    mocked: &mut Vec<Collection>,
) -> Option<Vec<T>> {
    match result {
        Ok(items) => Some(items),
        Err(e) => {
            log::warn!("Dashboard: {collection:?} failed, using mock data: {e}");
            mocked.push(collection);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::stub::StubTransport;
    use serde_json::json;

    fn dashboard(stub: &Arc<StubTransport>, policy: FallbackPolicy) -> Dashboard {
        Dashboard::new(Arc::new(AdvisorClient::new(stub.clone())), policy)
    }

    fn stub_all_live(stub: &StubTransport) {
        stub.respond(
            "GET leads",
            json!([{ "sys_id": "a" }, { "sys_id": "b" }, { "sys_id": "c" }]),
        );
        stub.respond("GET opportunities", json!([{ "sys_id": "o1" }]));
        stub.respond("GET quotes", json!([]));
        stub.respond("GET recent", json!([{ "table": "lead" }, { "table": "quote" }]));
    }

    #[tokio::test]
    async fn test_live_load_counts_records() {
        let stub = StubTransport::new();
        stub_all_live(&stub);
        let dash = dashboard(&stub, FallbackPolicy::AllOrNothing);

        let snap = dash.load().await;

        assert_eq!(snap.source, Some(DataSource::Live));
        assert_eq!(
            snap.stats,
            DashboardStats {
                leads_count: 3,
                opportunities_count: 1,
                quotes_count: 0,
                recent_count: 2,
            }
        );
        assert!(!snap.loading);
        for route in ["GET leads", "GET opportunities", "GET quotes", "GET recent"] {
            assert_eq!(stub.call_count(route), 1, "{route}");
        }
    }

    #[tokio::test]
    async fn test_any_failure_shows_mock_dataset() {
        let stub = StubTransport::new();
        stub_all_live(&stub);
        stub.fail("GET quotes", 500, "Internal Server Error");
        let dash = dashboard(&stub, FallbackPolicy::AllOrNothing);

        let snap = dash.load().await;

        assert_eq!(snap.source, Some(DataSource::Mock));
        assert_eq!(snap.data, mock_data::dashboard());
        assert_eq!(snap.stats, DashboardStats::from_data(&mock_data::dashboard()));
    }

    #[tokio::test]
    async fn test_unreachable_backend_shows_mock_dataset() {
        let stub = StubTransport::new();
        let dash = dashboard(&stub, FallbackPolicy::AllOrNothing);

        let snap = dash.load().await;
        assert_eq!(snap.data, mock_data::dashboard());
        assert_eq!(dash.stats().total(), 4);
    }

    #[tokio::test]
    async fn test_sparse_records_still_render() {
        let stub = StubTransport::new();
        stub_all_live(&stub);
        stub.respond(
            "GET leads",
            json!([{ "sys_id": "a", "number": null, "first_name": "Ada", "company": null }]),
        );
        stub.respond(
            "GET opportunities",
            json!([{ "sys_id": "o1", "number": "OPP0009", "amount": 50000 }]),
        );
        let dash = dashboard(&stub, FallbackPolicy::AllOrNothing);

        let snap = dash.load().await;

        assert_eq!(snap.source, Some(DataSource::Live));
        assert_eq!(snap.data.leads[0].number, "");
        assert_eq!(snap.data.leads[0].display_name(), "Ada");
        assert_eq!(snap.data.opportunities[0].amount.as_deref(), Some("50000"));
        assert_eq!(snap.stats.leads_count, 1);
    }

    #[tokio::test]
    async fn test_partial_fill_mocks_only_failed_collections() {
        let stub = StubTransport::new();
        stub_all_live(&stub);
        stub.fail_network("GET opportunities", "connection reset");
        let dash = dashboard(&stub, FallbackPolicy::PartialFill);

        let snap = dash.load().await;

        assert_eq!(
            snap.source,
            Some(DataSource::Partial {
                mocked: vec![Collection::Opportunities]
            })
        );
        assert_eq!(snap.data.leads.len(), 3);
        assert_eq!(snap.data.opportunities, mock_data::opportunities());
        assert_eq!(snap.data.recent_items.len(), 2);
    }

    #[tokio::test]
    async fn test_partial_fill_all_live() {
        let stub = StubTransport::new();
        stub_all_live(&stub);
        let dash = dashboard(&stub, FallbackPolicy::PartialFill);
        assert_eq!(dash.load().await.source, Some(DataSource::Live));
    }

    #[tokio::test]
    async fn test_loading_while_pending() {
        let stub = StubTransport::new();
        stub_all_live(&stub);
        let release = stub.respond_gated("GET recent", json!([]));
        let dash = Arc::new(dashboard(&stub, FallbackPolicy::AllOrNothing));
        assert!(!dash.loading());

        let task = {
            let dash = dash.clone();
            tokio::spawn(async move { dash.load().await })
        };
        tokio::task::yield_now().await;
        assert!(dash.loading());

        release.send(()).unwrap();
        let snap = task.await.unwrap();
        assert!(!snap.loading);
        assert!(!dash.loading());
        assert_eq!(snap.stats.recent_count, 0);
    }

    #[tokio::test]
    async fn test_overlapping_loads_keep_newest_result() {
        let stub = StubTransport::new();
        stub_all_live(&stub);
        let release_old = stub.respond_gated("GET leads", json!([{ "sys_id": "old" }]));
        let dash = Arc::new(dashboard(&stub, FallbackPolicy::AllOrNothing));

        let older = {
            let dash = dash.clone();
            tokio::spawn(async move { dash.load().await })
        };
        tokio::task::yield_now().await;

        let newer = dash.load().await;
        assert_eq!(newer.stats.leads_count, 3);
        // The first load is still pending
        assert!(dash.loading());

        release_old.send(()).unwrap();
        let settled = older.await.unwrap();

        assert_eq!(settled.stats.leads_count, 3);
        assert_eq!(dash.snapshot().data.leads.len(), 3);
        assert!(!dash.loading());
        assert!(!dash.snapshot().loading);
    }

    #[test]
    fn test_source_serializes_tagged() {
        let source = DataSource::Partial {
            mocked: vec![Collection::RecentItems],
        };
        assert_eq!(
            serde_json::to_value(&source).unwrap(),
            json!({ "kind": "partial", "mocked": ["recentItems"] })
        );
    }
}
