//! Tracking core shared by the domain containers.
//!
//! Each tracked operation:
//! 1. counts itself in flight, clears `error`, stamps the request with a
//!    sequence number
//! 2. awaits the backend call
//! 3. on success merges the payload, on failure records the message
//! 4. leaves the in-flight count from a drop guard, so a dropped future
//!    cannot leave the container stuck loading
//!
//! `loading` is true while any tracked call is in flight.
//!
//! The newest stamp issued per slot key wins: a response that settles after
//! a newer request for the same key was issued is returned to its caller
//! but never written into state.

use std::collections::HashMap;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;
use serde::Serialize;

use crate::error::DashboardError;

/// Point-in-time copy of a container's state.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot<S> {
    pub data: S,
    pub loading: bool,
    pub error: Option<String>,
}

/// Identifies one tracked call: which slot it writes, and what to report
/// when the failure carries no message.
#[derive(Debug, Clone)]
pub(crate) struct Slot {
    pub key: String,
    pub fallback_error: &'static str,
}

impl Slot {
    /// Slot for a wholesale-replaced value.
    pub fn whole(name: &str, fallback_error: &'static str) -> Self {
        Self {
            key: name.to_string(),
            fallback_error,
        }
    }

    /// Slot for one entry of a per-identifier map.
    pub fn keyed(name: &str, id: &str, fallback_error: &'static str) -> Self {
        Self {
            key: format!("{name}:{id}"),
            fallback_error,
        }
    }
}

struct CoreState<S> {
    data: S,
    in_flight: usize,
    error: Option<String>,
    latest: HashMap<String, u64>,
}

pub(crate) struct ContainerCore<S> {
    name: &'static str,
    state: Mutex<CoreState<S>>,
    next_seq: AtomicU64,
}

struct SettleGuard<'a, S> {
    core: &'a ContainerCore<S>,
}

impl<S> Drop for SettleGuard<'_, S> {
    fn drop(&mut self) {
        let mut state = self.core.state.lock();
        state.in_flight = state.in_flight.saturating_sub(1);
    }
}

impl<S: Clone + Default> ContainerCore<S> {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            state: Mutex::new(CoreState {
                data: S::default(),
                in_flight: 0,
                error: None,
                latest: HashMap::new(),
            }),
            next_seq: AtomicU64::new(1),
        }
    }

    pub fn loading(&self) -> bool {
        self.state.lock().in_flight > 0
    }

    pub fn error(&self) -> Option<String> {
        self.state.lock().error.clone()
    }

    pub fn read<R>(&self, f: impl FnOnce(&S) -> R) -> R {
        f(&self.state.lock().data)
    }

    pub fn snapshot(&self) -> Snapshot<S> {
        let state = self.state.lock();
        Snapshot {
            data: state.data.clone(),
            loading: state.in_flight > 0,
            error: state.error.clone(),
        }
    }

    fn begin(&self, slot: &Slot) -> u64 {
        let seq = self.next_seq.fetch_add(1, Ordering::Relaxed);
        let mut state = self.state.lock();
        state.in_flight += 1;
        state.error = None;
        state.latest.insert(slot.key.clone(), seq);
        seq
    }

    /// Run `call` under the loading/error protocol, merging its payload
    /// with `apply` unless a newer request for the same slot was issued.
    pub async fn track<T, Fut>(
        &self,
        slot: Slot,
        call: Fut,
        apply: impl FnOnce(&mut S, &T),
    ) -> Result<T, DashboardError>
    where
        Fut: Future<Output = Result<T, DashboardError>>,
    {
        let seq = self.begin(&slot);
        let _settle = SettleGuard { core: self };

        let result = call.await;

        {
            let mut state = self.state.lock();
            let current = state.latest.get(&slot.key).copied() == Some(seq);
            match &result {
                Ok(payload) if current => apply(&mut state.data, payload),
                Ok(_) => {
                    log::debug!(
                        "{}: discarded stale response for {} (seq {})",
                        self.name,
                        slot.key,
                        seq
                    );
                }
                Err(e) => {
                    let message = if e.detail().trim().is_empty() {
                        slot.fallback_error.to_string()
                    } else {
                        e.to_string()
                    };
                    log::error!("{}: {} failed: {}", self.name, slot.key, message);
                    if current {
                        state.error = Some(message);
                    }
                }
            }
        }

        result
    }
}
