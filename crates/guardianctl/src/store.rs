//! Dashboard state held between polls
//!
//! Each applied snapshot replaces the previous one wholesale. Acknowledgments
//! made during the session, or reported by the backend, are remembered and
//! merged into every later snapshot, so an alert never flips back to
//! unacknowledged locally. Fixture snapshots never add to that set.

use crate::api::DashboardApi;
use crate::poller::PollUpdate;
use chrono::{DateTime, Utc};
use guardian_common::{DashboardSnapshot, DerivedState, FetchError};
use std::collections::HashSet;
use tracing::{info, warn};

#[derive(Debug, Default)]
pub struct DashboardStore {
    snapshot: Option<DashboardSnapshot>,
    derived: DerivedState,
    acknowledged: HashSet<String>,
    last_update: Option<DateTime<Utc>>,
    last_error: Option<String>,
}

impl DashboardStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply a published poll update
    pub fn apply(&mut self, update: &PollUpdate) {
        self.apply_snapshot(
            update.snapshot.clone(),
            update.fallback.as_ref(),
            update.received_at,
        );
    }

    /// Replace the held snapshot and recompute derived state
    pub fn apply_snapshot(
        &mut self,
        mut snapshot: DashboardSnapshot,
        fallback: Option<&FetchError>,
        at: DateTime<Utc>,
    ) {
        let from_backend = fallback.is_none();
        for alert in &mut snapshot.alerts {
            if alert.acknowledged {
                if from_backend {
                    self.acknowledged.insert(alert.id.clone());
                }
            } else if self.acknowledged.contains(&alert.id) {
                alert.acknowledged = true;
            }
        }

        self.derived = DerivedState::from_snapshot(&snapshot);
        self.snapshot = Some(snapshot);
        self.last_update = Some(at);
        self.last_error = fallback.map(|e| e.to_string());
    }

    /// Acknowledge an alert through the backend.
    ///
    /// Local state changes only after the backend confirms. Returns whether
    /// the backend accepted the acknowledgment.
    pub async fn acknowledge(&mut self, api: &dyn DashboardApi, alert_id: &str) -> bool {
        match api.acknowledge(alert_id).await {
            Ok(()) => {
                info!("Alert {} acknowledged", alert_id);
                self.mark_acknowledged(alert_id);
                true
            }
            Err(e) => {
                warn!("Failed to acknowledge alert {}: {}", alert_id, e);
                false
            }
        }
    }

    /// Record a confirmed acknowledgment. Returns true if a held alert changed.
    pub fn mark_acknowledged(&mut self, alert_id: &str) -> bool {
        self.acknowledged.insert(alert_id.to_string());

        let Some(snapshot) = self.snapshot.as_mut() else {
            return false;
        };

        match snapshot.alerts.iter_mut().find(|a| a.id == alert_id) {
            Some(alert) if !alert.acknowledged => {
                alert.acknowledged = true;
                true
            }
            _ => false,
        }
    }

    pub fn snapshot(&self) -> Option<&DashboardSnapshot> {
        self.snapshot.as_ref()
    }

    pub fn derived(&self) -> &DerivedState {
        &self.derived
    }

    pub fn last_update(&self) -> Option<DateTime<Utc>> {
        self.last_update
    }

    /// Advisory message when the held snapshot is synthetic
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn is_acknowledged(&self, alert_id: &str) -> bool {
        self.acknowledged.contains(alert_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use guardian_common::fixture;

    #[test]
    fn test_apply_recomputes_derived() {
        let mut store = DashboardStore::new();
        assert!(store.snapshot().is_none());

        let now = Utc::now();
        store.apply_snapshot(fixture::baseline(now), None, now);

        let derived = store.derived();
        assert_eq!(derived.alert_summary.total, 5);
        assert_eq!(derived.machine_summary.total, 6);
        assert_eq!(store.last_update(), Some(now));
        assert!(store.last_error().is_none());
    }

    #[test]
    fn test_fallback_error_is_recorded_then_cleared() {
        let mut store = DashboardStore::new();
        let now = Utc::now();

        store.apply_snapshot(fixture::baseline(now), Some(&FetchError::Timeout), now);
        assert_eq!(store.last_error(), Some("Request timed out"));

        store.apply_snapshot(fixture::baseline(now), None, now);
        assert!(store.last_error().is_none());
    }

    #[test]
    fn test_acknowledgment_survives_new_snapshot() {
        let mut store = DashboardStore::new();
        let now = Utc::now();
        store.apply_snapshot(fixture::baseline(now), None, now);

        assert!(store.mark_acknowledged("alert-001"));
        store.apply_snapshot(fixture::baseline(now), None, now);

        let alert = store.snapshot().unwrap().alert("alert-001").unwrap();
        assert!(alert.acknowledged);
    }

    #[test]
    fn test_server_acknowledgments_join_session_set() {
        let mut store = DashboardStore::new();
        let now = Utc::now();
        store.apply_snapshot(fixture::baseline(now), None, now);
        // alert-003 arrives acknowledged from the fixture
        assert!(store.is_acknowledged("alert-003"));

        let mut reverted = fixture::baseline(now);
        for alert in &mut reverted.alerts {
            alert.acknowledged = false;
        }
        store.apply_snapshot(reverted, None, now);
        assert!(store.snapshot().unwrap().alert("alert-003").unwrap().acknowledged);
    }

    #[test]
    fn test_fixture_acknowledgments_do_not_leak_into_real_data() {
        let mut store = DashboardStore::new();
        let now = Utc::now();

        // alert-003 and alert-004 are acknowledged in the fixture
        store.apply_snapshot(fixture::baseline(now), Some(&FetchError::Timeout), now);
        assert!(store.snapshot().unwrap().alert("alert-003").unwrap().acknowledged);
        assert!(!store.is_acknowledged("alert-003"));

        let mut live = fixture::baseline(now);
        for alert in &mut live.alerts {
            alert.acknowledged = false;
        }
        store.apply_snapshot(live, None, now);

        let snapshot = store.snapshot().unwrap();
        assert!(!snapshot.alert("alert-003").unwrap().acknowledged);
        assert!(!snapshot.alert("alert-004").unwrap().acknowledged);
    }

    #[test]
    fn test_session_acknowledgment_applies_to_fixture() {
        let mut store = DashboardStore::new();
        let now = Utc::now();
        store.apply_snapshot(fixture::baseline(now), None, now);
        assert!(store.mark_acknowledged("alert-005"));

        store.apply_snapshot(fixture::baseline(now), Some(&FetchError::Timeout), now);
        assert!(store.snapshot().unwrap().alert("alert-005").unwrap().acknowledged);
    }

    #[test]
    fn test_mark_unknown_alert_is_noop() {
        let mut store = DashboardStore::new();
        let now = Utc::now();
        store.apply_snapshot(fixture::baseline(now), None, now);
        let before = store.snapshot().cloned();

        assert!(!store.mark_acknowledged("alert-999"));
        assert_eq!(store.snapshot().cloned(), before);
    }
}
