//! Dashboard state: the alert store, the current selection, and the
//! entry points that mutate them.
//!
//! [`Dashboard`] is a plain value; [`SharedDashboard`] wraps it for the
//! server, serializing every mutation behind one lock and publishing a
//! [`FeedEvent`] for each change.

use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;
use tokio::sync::{broadcast, RwLock};
use tracing::{debug, info};

use crate::alerts::chart::{self, ChartPoint};
use crate::alerts::metrics::KeyMetrics;
use crate::alerts::selection::choose_default;
use crate::alerts::{Alert, AlertId, AlertStore};

const EVENT_CAPACITY: usize = 64;

#[derive(Debug, Error)]
pub enum DashboardError {
    #[error("no alert with id {0}")]
    UnknownAlert(AlertId),
}

/// Change notifications pushed to live subscribers.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FeedEvent {
    AlertAdded { alert: Alert },
    SelectionChanged { selected: Option<AlertId> },
}

impl FeedEvent {
    /// SSE event name.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::AlertAdded { .. } => "alert_added",
            Self::SelectionChanged { .. } => "selection_changed",
        }
    }
}

/// Point-in-time copy of everything the views render.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardSnapshot {
    pub alerts: Vec<Alert>,
    pub selected: Option<Alert>,
    pub metrics: KeyMetrics,
    pub chart: Vec<ChartPoint>,
}

#[derive(Debug, Clone)]
pub struct Dashboard {
    store: AlertStore,
    selection: Option<AlertId>,
    seed_len: usize,
    total_logins_baseline: u64,
}

impl Dashboard {
    /// Start a session from `seed` (store order) and apply the default
    /// selection policy.
    pub fn from_seed(seed: Vec<Alert>, total_logins_baseline: u64) -> Self {
        let seed_len = seed.len();
        let mut dashboard = Self {
            store: AlertStore::from_alerts(seed),
            selection: None,
            seed_len,
            total_logins_baseline,
        };
        dashboard.apply_default_selection();
        dashboard
    }

    pub fn store(&self) -> &AlertStore {
        &self.store
    }

    pub fn selection(&self) -> Option<&AlertId> {
        self.selection.as_ref()
    }

    pub fn selected(&self) -> Option<&Alert> {
        self.selection.as_ref().and_then(|id| self.store.get(id))
    }

    pub fn metrics(&self) -> KeyMetrics {
        KeyMetrics::compute(&self.store, self.seed_len, self.total_logins_baseline)
    }

    pub fn chart(&self) -> Vec<ChartPoint> {
        chart::alerts_per_minute(&self.store)
    }

    /// Prepend `alert` and re-run the selection policy. Returns `true`
    /// when the selection changed (only possible while none was set).
    pub fn append(&mut self, alert: Alert) -> bool {
        self.store.prepend(alert);
        self.apply_default_selection()
    }

    /// Make `id` the selection, as when the user clicks a feed row.
    pub fn select(&mut self, id: &AlertId) -> Result<&Alert, DashboardError> {
        if !self.store.contains(id) {
            return Err(DashboardError::UnknownAlert(id.clone()));
        }
        self.selection = Some(id.clone());
        self.selected()
            .ok_or_else(|| DashboardError::UnknownAlert(id.clone()))
    }

    /// Drop the selection and let the policy pick again from the current
    /// store. Returns the new selection.
    pub fn clear_selection(&mut self) -> Option<&AlertId> {
        self.selection = None;
        self.apply_default_selection();
        self.selection.as_ref()
    }

    pub fn snapshot(&self) -> DashboardSnapshot {
        DashboardSnapshot {
            alerts: self.store.to_vec(),
            selected: self.selected().cloned(),
            metrics: self.metrics(),
            chart: self.chart(),
        }
    }

    fn apply_default_selection(&mut self) -> bool {
        let chosen = choose_default(&self.store, self.selection.as_ref());
        let changed = chosen != self.selection;
        self.selection = chosen;
        changed
    }
}

/// Cloneable handle to the session's single [`Dashboard`].
#[derive(Clone)]
pub struct SharedDashboard {
    inner: Arc<RwLock<Dashboard>>,
    events: broadcast::Sender<FeedEvent>,
}

impl SharedDashboard {
    pub fn new(dashboard: Dashboard) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            inner: Arc::new(RwLock::new(dashboard)),
            events,
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<FeedEvent> {
        self.events.subscribe()
    }

    pub async fn append(&self, alert: Alert) {
        self.append_if(alert, || true).await;
    }

    /// Append only if `proceed` still holds once the write lock is taken.
    /// Returns whether the alert was added.
    pub async fn append_if<F>(&self, alert: Alert, proceed: F) -> bool
    where
        F: FnOnce() -> bool,
    {
        let mut dashboard = self.inner.write().await;
        if !proceed() {
            return false;
        }
        let id = alert.id.clone();
        let selection_changed = dashboard.append(alert.clone());
        debug!(alert = %id, total = dashboard.store().len(), "alert appended");

        self.publish(FeedEvent::AlertAdded { alert });
        if selection_changed {
            self.publish(FeedEvent::SelectionChanged {
                selected: dashboard.selection().cloned(),
            });
        }
        true
    }

    pub async fn select(&self, id: &AlertId) -> Result<Alert, DashboardError> {
        let mut dashboard = self.inner.write().await;
        let alert = dashboard.select(id)?.clone();
        info!(alert = %id, "alert selected");
        self.publish(FeedEvent::SelectionChanged {
            selected: Some(id.clone()),
        });
        Ok(alert)
    }

    pub async fn clear_selection(&self) -> Option<Alert> {
        let mut dashboard = self.inner.write().await;
        let selected = dashboard.clear_selection().cloned();
        info!(selected = ?selected, "selection cleared");
        self.publish(FeedEvent::SelectionChanged { selected });
        dashboard.selected().cloned()
    }

    pub async fn alert(&self, id: &AlertId) -> Option<Alert> {
        self.inner.read().await.store().get(id).cloned()
    }

    pub async fn alerts(&self) -> Vec<Alert> {
        self.inner.read().await.store().to_vec()
    }

    pub async fn selected(&self) -> Option<Alert> {
        self.inner.read().await.selected().cloned()
    }

    pub async fn metrics(&self) -> KeyMetrics {
        self.inner.read().await.metrics()
    }

    pub async fn chart(&self) -> Vec<ChartPoint> {
        self.inner.read().await.chart()
    }

    pub async fn snapshot(&self) -> DashboardSnapshot {
        self.inner.read().await.snapshot()
    }

    fn publish(&self, event: FeedEvent) {
        // No subscribers is the normal case outside of live views.
        let _ = self.events.send(event);
    }
}
