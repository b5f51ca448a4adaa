//! Canned insight provider for tests and offline use

use async_trait::async_trait;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use worksync_api::AiInsight;

use crate::{InsightError, InsightProvider, InsightRequest, InsightResult};

#[derive(Debug, Clone)]
enum MockOutcome {
    Insight(AiInsight),
    Fail(String),
}

/// Returns a fixed insight (or a fixed failure) and records what it was asked
#[derive(Debug)]
pub struct MockInsightProvider {
    outcome: MockOutcome,
    delay: Option<Duration>,
    calls: AtomicUsize,
    last_request: Mutex<Option<InsightRequest>>,
}

impl MockInsightProvider {
    pub fn succeeding(insight: AiInsight) -> Self {
        Self::with_outcome(MockOutcome::Insight(insight))
    }

    pub fn failing(reason: impl Into<String>) -> Self {
        Self::with_outcome(MockOutcome::Fail(reason.into()))
    }

    /// A generic, always-successful provider
    pub fn canned() -> Self {
        Self::succeeding(AiInsight {
            summary: "Working hours are stable across the team.".into(),
            efficiency_score: 75.0,
            recommendations: vec![
                "Review overtime on the busiest days".into(),
                "Encourage taking full weekends off".into(),
            ],
        })
    }

    /// Hold each call open for `delay` before answering
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_request(&self) -> Option<InsightRequest> {
        self.last_request.lock().ok().and_then(|r| r.clone())
    }

    fn with_outcome(outcome: MockOutcome) -> Self {
        Self {
            outcome,
            delay: None,
            calls: AtomicUsize::new(0),
            last_request: Mutex::new(None),
        }
    }
}

#[async_trait]
impl InsightProvider for MockInsightProvider {
    async fn generate(&self, request: &InsightRequest) -> InsightResult<AiInsight> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut last) = self.last_request.lock() {
            *last = Some(request.clone());
        }

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        match &self.outcome {
            MockOutcome::Insight(insight) => Ok(insight.clone()),
            MockOutcome::Fail(reason) => Err(InsightError::Unavailable(reason.clone())),
        }
    }
}
