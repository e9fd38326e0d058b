//! Holds the active rate table and keeps it fresh.
//!
//! Readers get an `Arc` to an immutable snapshot; a successful refresh swaps
//! the whole snapshot in one assignment, so nobody ever sees a partly
//! updated table. A failed refresh leaves the snapshot alone.

use crate::core::rates::{RateError, RateTable};
use crate::core::source::JsonSource;
use chrono::{DateTime, Utc};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::{MissedTickBehavior, interval};
use tracing::{debug, info, instrument, warn};

/// Where the active table came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableOrigin {
    Fallback,
    Live,
}

#[derive(Debug, Clone)]
pub struct RateSnapshot {
    pub table: Arc<RateTable>,
    pub refreshed_at: Option<DateTime<Utc>>,
    pub origin: TableOrigin,
}

impl RateSnapshot {
    fn fallback() -> Self {
        Self {
            table: Arc::new(RateTable::fallback()),
            refreshed_at: None,
            origin: TableOrigin::Fallback,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RefreshOutcome {
    Refreshed {
        at: DateTime<Utc>,
        currencies: usize,
    },
    Failed(RateError),
}

impl RefreshOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, RefreshOutcome::Refreshed { .. })
    }
}

pub struct RateCache {
    source: Arc<dyn JsonSource>,
    min_coverage: f64,
    snapshot: RwLock<Arc<RateSnapshot>>,
    // Held for the duration of a fetch; stores the outcome of the last one.
    refresh_gate: Mutex<Option<RefreshOutcome>>,
    completed_refreshes: AtomicU64,
}

impl RateCache {
    pub fn new(source: Arc<dyn JsonSource>, min_coverage: f64) -> Self {
        Self {
            source,
            min_coverage,
            snapshot: RwLock::new(Arc::new(RateSnapshot::fallback())),
            refresh_gate: Mutex::new(None),
            completed_refreshes: AtomicU64::new(0),
        }
    }

    /// The active table. Never blocks on a refresh and never fails.
    pub fn current_rates(&self) -> Arc<RateTable> {
        Arc::clone(&self.snapshot().table)
    }

    pub fn snapshot(&self) -> Arc<RateSnapshot> {
        let guard = self.snapshot.read().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&guard)
    }

    pub fn last_refreshed_at(&self) -> Option<DateTime<Utc>> {
        self.snapshot().refreshed_at
    }

    pub fn is_refreshing(&self) -> bool {
        self.refresh_gate.try_lock().is_err()
    }

    /// Fetches a new table and installs it if it validates.
    ///
    /// A call made while another refresh is in flight waits for that one and
    /// returns its outcome instead of fetching again.
    pub async fn refresh(&self) -> RefreshOutcome {
        let observed = self.completed_refreshes.load(Ordering::SeqCst);
        let mut last_outcome = self.refresh_gate.lock().await;

        if self.completed_refreshes.load(Ordering::SeqCst) != observed {
            if let Some(outcome) = last_outcome.as_ref() {
                debug!("Joined in-flight refresh");
                return outcome.clone();
            }
        }

        let outcome = self.fetch_and_apply().await;
        *last_outcome = Some(outcome.clone());
        self.completed_refreshes.fetch_add(1, Ordering::SeqCst);
        outcome
    }

    #[instrument(name = "RateRefresh", skip(self))]
    async fn fetch_and_apply(&self) -> RefreshOutcome {
        let payload = match self.source.fetch_json().await {
            Ok(payload) => payload,
            Err(e) => return Self::failed(RateError::Fetch(format!("{e:#}"))),
        };

        let table = match RateTable::from_payload(&payload, self.min_coverage) {
            Ok(table) => table,
            Err(e) => return Self::failed(e),
        };

        let at = Utc::now();
        let currencies = table.len();
        let next = Arc::new(RateSnapshot {
            table: Arc::new(table),
            refreshed_at: Some(at),
            origin: TableOrigin::Live,
        });
        *self.snapshot.write().unwrap_or_else(PoisonError::into_inner) = next;

        info!(currencies, "Rates refreshed");
        RefreshOutcome::Refreshed { at, currencies }
    }

    fn failed(error: RateError) -> RefreshOutcome {
        warn!(error = %error, "Rate refresh failed, keeping current table");
        RefreshOutcome::Failed(error)
    }

    /// Refreshes now and then every `every` until the returned scheduler is
    /// stopped or dropped, or the cache itself is dropped.
    ///
    /// Failed refreshes are not retried early; the next tick tries again.
    pub fn start(self: &Arc<Self>, every: Duration) -> RefreshScheduler {
        let cache = Arc::downgrade(self);
        let every = every.max(Duration::from_millis(1));

        let handle = tokio::spawn(async move {
            let mut ticker = interval(every);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                let Some(cache) = cache.upgrade() else {
                    debug!("Rate cache dropped, stopping refresh timer");
                    break;
                };
                cache.refresh().await;
            }
        });

        debug!(?every, "Started rate refresh timer");
        RefreshScheduler { handle }
    }
}

/// Owns the periodic refresh task. Dropping it cancels the timer.
pub struct RefreshScheduler {
    handle: JoinHandle<()>,
}

impl RefreshScheduler {
    pub fn is_running(&self) -> bool {
        !self.handle.is_finished()
    }

    pub fn stop(self) {
        debug!("Stopping rate refresh timer");
    }
}

impl Drop for RefreshScheduler {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
