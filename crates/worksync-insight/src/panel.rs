//! On-demand insight state with a busy flag

use serde::Serialize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, warn};
use worksync_api::{AiInsight, AttendanceRecord};

use crate::{InsightProvider, InsightRequest};

/// What the insight area currently shows
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", content = "insight", rename_all = "snake_case")]
pub enum PanelState {
    Empty,
    Loading,
    Ready(AiInsight),
    Unavailable,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RefreshOutcome {
    Ready(AiInsight),
    /// The provider failed; details were logged
    Unavailable,
    /// Another refresh is still in flight
    Busy,
}

/// Holds the latest insight and runs one refresh at a time.
///
/// A second `refresh` while one is pending returns `Busy` immediately;
/// nothing is queued or cancelled. A failed refresh keeps the previous
/// insight if there was one.
pub struct InsightPanel {
    provider: Arc<dyn InsightProvider>,
    max_records: usize,
    state: Mutex<PanelState>,
    busy: AtomicBool,
}

impl InsightPanel {
    pub fn new(provider: Arc<dyn InsightProvider>, max_records: usize) -> Self {
        Self {
            provider,
            max_records,
            state: Mutex::new(PanelState::Empty),
            busy: AtomicBool::new(false),
        }
    }

    pub fn state(&self) -> PanelState {
        self.lock_state().clone()
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::SeqCst)
    }

    pub async fn refresh(&self, records: &[AttendanceRecord]) -> RefreshOutcome {
        if self.busy.swap(true, Ordering::SeqCst) {
            debug!("Insight refresh already in flight");
            return RefreshOutcome::Busy;
        }

        let mut guard = RefreshGuard {
            panel: self,
            previous: Some(std::mem::replace(&mut *self.lock_state(), PanelState::Loading)),
        };
        let request = InsightRequest::from_records(records, self.max_records);

        match self.provider.generate(&request).await {
            Ok(insight) => {
                guard.previous = None;
                *self.lock_state() = PanelState::Ready(insight.clone());
                RefreshOutcome::Ready(insight)
            }
            Err(e) => {
                warn!(error = %e, samples = request.len(), "Insight unavailable");
                RefreshOutcome::Unavailable
            }
        }
    }

    fn lock_state(&self) -> MutexGuard<'_, PanelState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Clears the busy flag when a refresh ends, including when its future is
/// dropped mid-flight. Unless disarmed by a successful result, the previous
/// insight is put back, or the panel becomes `Unavailable`.
struct RefreshGuard<'a> {
    panel: &'a InsightPanel,
    previous: Option<PanelState>,
}

impl Drop for RefreshGuard<'_> {
    fn drop(&mut self) {
        if let Some(previous) = self.previous.take() {
            *self.panel.lock_state() = match previous {
                PanelState::Ready(insight) => PanelState::Ready(insight),
                _ => PanelState::Unavailable,
            };
        }
        self.panel.busy.store(false, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MockInsightProvider;
    use chrono::{Local, TimeZone};
    use std::time::Duration;
    use worksync_util::{EmployeeId, RecordId};

    fn records(count: usize) -> Vec<AttendanceRecord> {
        (0..count)
            .map(|i| {
                AttendanceRecord::closed(
                    RecordId::new(format!("r{}", i)),
                    EmployeeId::new("1001"),
                    Local.with_ymd_and_hms(2025, 4, 1, 9, 0, 0).unwrap()
                        + chrono::Duration::days(i as i64),
                    480,
                )
            })
            .collect()
    }

    #[tokio::test]
    async fn successful_refresh_is_ready() {
        let provider = Arc::new(MockInsightProvider::canned());
        let panel = InsightPanel::new(provider.clone(), 50);
        assert_eq!(panel.state(), PanelState::Empty);

        let outcome = panel.refresh(&records(70)).await;
        assert!(matches!(outcome, RefreshOutcome::Ready(_)));
        assert!(matches!(panel.state(), PanelState::Ready(_)));
        assert!(!panel.is_busy());

        assert_eq!(provider.calls(), 1);
        assert_eq!(provider.last_request().map(|r| r.len()), Some(50));
    }

    #[tokio::test]
    async fn failure_is_swallowed() {
        let panel = InsightPanel::new(Arc::new(MockInsightProvider::failing("offline")), 50);

        let outcome = panel.refresh(&records(3)).await;
        assert_eq!(outcome, RefreshOutcome::Unavailable);
        assert_eq!(panel.state(), PanelState::Unavailable);
        assert!(!panel.is_busy());
    }

    #[tokio::test]
    async fn concurrent_refresh_is_busy() {
        let provider = Arc::new(MockInsightProvider::canned().with_delay(Duration::from_millis(50)));
        let panel = InsightPanel::new(provider.clone(), 50);
        let records = records(5);

        let (first, second) = tokio::join!(panel.refresh(&records), panel.refresh(&records));

        assert!(matches!(first, RefreshOutcome::Ready(_)));
        assert_eq!(second, RefreshOutcome::Busy);
        assert_eq!(provider.calls(), 1);

        // Once finished, a new refresh goes through
        assert!(matches!(panel.refresh(&records).await, RefreshOutcome::Ready(_)));
        assert_eq!(provider.calls(), 2);
    }

    #[tokio::test]
    async fn dropped_refresh_releases_busy_flag() {
        let provider = Arc::new(MockInsightProvider::canned().with_delay(Duration::from_millis(200)));
        let panel = InsightPanel::new(provider.clone(), 50);
        let records = records(5);

        let abandoned = tokio::time::timeout(Duration::from_millis(10), panel.refresh(&records)).await;
        assert!(abandoned.is_err());
        assert!(!panel.is_busy());
        assert_eq!(panel.state(), PanelState::Unavailable);

        assert!(matches!(panel.refresh(&records).await, RefreshOutcome::Ready(_)));
        assert!(matches!(panel.state(), PanelState::Ready(_)));
    }

    #[tokio::test]
    async fn dropped_refresh_keeps_previous_insight() {
        let provider = Arc::new(MockInsightProvider::canned().with_delay(Duration::from_millis(20)));
        let panel = InsightPanel::new(provider, 50);
        let records = records(5);

        let RefreshOutcome::Ready(first) = panel.refresh(&records).await else {
            panic!("first refresh should succeed");
        };

        let abandoned = tokio::time::timeout(Duration::from_millis(1), panel.refresh(&records)).await;
        assert!(abandoned.is_err());
        assert!(!panel.is_busy());
        assert_eq!(panel.state(), PanelState::Ready(first));
    }

    #[test]
    fn panel_state_serializes_with_tag() {
        let json = serde_json::to_value(PanelState::Unavailable).unwrap();
        assert_eq!(json, serde_json::json!({ "state": "unavailable" }));
    }
}
