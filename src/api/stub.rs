//! In-memory transport for tests.
//!
//! Routes are matched on `ApiRequest::route()` ("GET leads"). Sticky
//! responses answer every call; gated responses answer exactly one call
//! and hold it until the returned sender fires, which lets tests control
//! settlement order.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::Value;
use tokio::sync::oneshot;

use super::{ApiRequest, Transport};
use crate::error::DashboardError;

#[derive(Debug, Clone)]
enum Outcome {
    Value(Value),
    Api(u16, String),
    Network(String),
}

impl Outcome {
    fn into_result(self) -> Result<Value, DashboardError> {
        match self {
            Outcome::Value(v) => Ok(v),
            Outcome::Api(status, message) => Err(DashboardError::Api { status, message }),
            Outcome::Network(message) => Err(DashboardError::Network(message)),
        }
    }
}

struct Gated {
    outcome: Outcome,
    gate: oneshot::Receiver<()>,
}

#[derive(Default)]
pub(crate) struct StubTransport {
    sticky: Mutex<HashMap<String, Outcome>>,
    gated: Mutex<HashMap<String, VecDeque<Gated>>>,
    calls: Mutex<Vec<ApiRequest>>,
}

impl StubTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn respond(&self, route: &str, value: Value) {
        self.sticky
            .lock()
            .insert(route.to_string(), Outcome::Value(value));
    }

    pub fn fail(&self, route: &str, status: u16, message: &str) {
        self.sticky
            .lock()
            .insert(route.to_string(), Outcome::Api(status, message.to_string()));
    }

    pub fn fail_network(&self, route: &str, message: &str) {
        self.sticky
            .lock()
            .insert(route.to_string(), Outcome::Network(message.to_string()));
    }

    /// Queue a one-shot response that waits for the returned sender.
    pub fn respond_gated(&self, route: &str, value: Value) -> oneshot::Sender<()> {
        self.push_gated(route, Outcome::Value(value))
    }

    pub fn fail_gated(&self, route: &str, status: u16, message: &str) -> oneshot::Sender<()> {
        self.push_gated(route, Outcome::Api(status, message.to_string()))
    }

    fn push_gated(&self, route: &str, outcome: Outcome) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.gated
            .lock()
            .entry(route.to_string())
            .or_default()
            .push_back(Gated { outcome, gate: rx });
        tx
    }

    pub fn calls(&self) -> Vec<ApiRequest> {
        self.calls.lock().clone()
    }

    pub fn call_count(&self, route: &str) -> usize {
        self.calls
            .lock()
            .iter()
            .filter(|r| r.route() == route)
            .count()
    }
}

#[async_trait]
impl Transport for StubTransport {
    async fn execute(&self, request: ApiRequest) -> Result<Value, DashboardError> {
        let route = request.route();
        self.calls.lock().push(request);

        let gated = self
            .gated
            .lock()
            .get_mut(&route)
            .and_then(VecDeque::pop_front);
        if let Some(Gated { outcome, gate }) = gated {
            // A dropped sender releases the call too
            let _ = gate.await;
            return outcome.into_result();
        }

        let sticky = self.sticky.lock().get(&route).cloned();
        match sticky {
            Some(outcome) => outcome.into_result(),
            None => Err(DashboardError::Api {
                status: 404,
                message: format!("no stub for {route}"),
            }),
        }
    }
}
