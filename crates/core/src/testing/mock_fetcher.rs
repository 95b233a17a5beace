//! Mock recommendation fetcher for testing.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

use crate::client::{ClientError, RecommendationFetcher};
use crate::ticket::Recommendation;

/// A recorded fetch for test assertions.
#[derive(Debug, Clone)]
pub struct RecordedFetch {
    pub ticket_id: String,
    /// When the fetch started.
    pub timestamp: Instant,
}

/// How a configured ticket fails.
#[derive(Debug, Clone)]
enum MockFailure {
    Status(u16),
    Request(String),
}

impl MockFailure {
    fn to_error(&self) -> ClientError {
        match self {
            MockFailure::Status(status) => ClientError::Http {
                status: *status,
                body: String::new(),
            },
            MockFailure::Request(message) => ClientError::Request(message.clone()),
        }
    }
}

/// Mock implementation of the RecommendationFetcher trait.
///
/// Provides controllable behavior for testing:
/// - Canned recommendations per ticket (a generic one otherwise)
/// - Per-ticket failures and delays
/// - Call recording and an in-flight high-water mark
///
/// # Example
///
/// ```rust,ignore
/// use triage_core::testing::{MockRecommendationFetcher, fixtures};
///
/// let fetcher = MockRecommendationFetcher::new();
/// fetcher.set_delay(Duration::from_millis(10)).await;
/// fetcher.fail_with_status("IN2", 500).await;
///
/// let err = fetcher.fetch("IN2").await.unwrap_err();
/// assert_eq!(err.to_string(), "HTTP error! status: 500");
/// assert_eq!(fetcher.max_in_flight(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct MockRecommendationFetcher {
    /// Recommendations by ticket id.
    responses: Arc<RwLock<HashMap<String, Recommendation>>>,
    /// Failures by ticket id.
    failures: Arc<RwLock<HashMap<String, MockFailure>>>,
    /// Per-ticket delays, overriding the default.
    delays: Arc<RwLock<HashMap<String, Duration>>>,
    default_delay: Arc<RwLock<Duration>>,
    calls: Arc<RwLock<Vec<RecordedFetch>>>,
    in_flight: Arc<AtomicUsize>,
    max_in_flight: Arc<AtomicUsize>,
}

impl MockRecommendationFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the delay applied to every fetch without a per-ticket delay.
    pub async fn set_delay(&self, delay: Duration) {
        *self.default_delay.write().await = delay;
    }

    pub async fn set_ticket_delay(&self, ticket_id: &str, delay: Duration) {
        self.delays
            .write()
            .await
            .insert(ticket_id.to_string(), delay);
    }

    pub async fn set_recommendation(&self, ticket_id: &str, recommendation: Recommendation) {
        self.responses
            .write()
            .await
            .insert(ticket_id.to_string(), recommendation);
    }

    /// Fail fetches for `ticket_id` with an HTTP status.
    pub async fn fail_with_status(&self, ticket_id: &str, status: u16) {
        self.failures
            .write()
            .await
            .insert(ticket_id.to_string(), MockFailure::Status(status));
    }

    /// Fail fetches for `ticket_id` with a transport error.
    pub async fn fail_with_message(&self, ticket_id: &str, message: &str) {
        self.failures.write().await.insert(
            ticket_id.to_string(),
            MockFailure::Request(message.to_string()),
        );
    }

    pub async fn clear_failures(&self) {
        self.failures.write().await.clear();
    }

    pub async fn recorded_calls(&self) -> Vec<RecordedFetch> {
        self.calls.read().await.clone()
    }

    /// Ticket ids in the order their fetches started.
    pub async fn fetched_ids(&self) -> Vec<String> {
        self.calls
            .read()
            .await
            .iter()
            .map(|c| c.ticket_id.clone())
            .collect()
    }

    pub async fn call_count(&self) -> usize {
        self.calls.read().await.len()
    }

    /// Highest number of fetches that were in flight at once.
    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RecommendationFetcher for MockRecommendationFetcher {
    async fn fetch(&self, ticket_id: &str) -> Result<Recommendation, ClientError> {
        self.calls.write().await.push(RecordedFetch {
            ticket_id: ticket_id.to_string(),
            timestamp: Instant::now(),
        });

        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);

        let delay = match self.delays.read().await.get(ticket_id) {
            Some(delay) => *delay,
            None => *self.default_delay.read().await,
        };
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        if let Some(failure) = self.failures.read().await.get(ticket_id) {
            return Err(failure.to_error());
        }

        let recommendation = self
            .responses
            .read()
            .await
            .get(ticket_id)
            .cloned()
            .unwrap_or_else(|| super::fixtures::recommendation(ticket_id, "Service Desk", "P3"));
        Ok(recommendation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::fixtures;

    #[tokio::test]
    async fn test_default_recommendation_and_recording() {
        let fetcher = MockRecommendationFetcher::new();

        let rec = fetcher.fetch("IN1").await.unwrap();

        assert_eq!(rec.recommended_support_group.as_deref(), Some("Service Desk"));
        assert_eq!(fetcher.fetched_ids().await, vec!["IN1".to_string()]);
        assert_eq!(fetcher.max_in_flight(), 1);
        assert_eq!(fetcher.in_flight(), 0);
    }

    #[tokio::test]
    async fn test_configured_failures_and_responses() {
        let fetcher = MockRecommendationFetcher::new();
        fetcher.fail_with_status("IN2", 503).await;
        fetcher.fail_with_message("IN3", "connection reset").await;
        fetcher
            .set_recommendation("IN4", fixtures::recommendation("IN4", "Network", "P1"))
            .await;

        let err = fetcher.fetch("IN2").await.unwrap_err();
        assert_eq!(err.to_string(), "HTTP error! status: 503");
        let err = fetcher.fetch("IN3").await.unwrap_err();
        assert!(matches!(err, ClientError::Request(m) if m == "connection reset"));
        let rec = fetcher.fetch("IN4").await.unwrap();
        assert_eq!(rec.recommended_priority_level.as_deref(), Some("P1"));

        fetcher.clear_failures().await;
        assert!(fetcher.fetch("IN2").await.is_ok());
        assert_eq!(fetcher.call_count().await, 4);
    }

    #[tokio::test]
    async fn test_tracks_concurrent_fetches() {
        let fetcher = MockRecommendationFetcher::new();
        fetcher.set_delay(Duration::from_millis(20)).await;

        let (a, b, c) = tokio::join!(fetcher.fetch("IN1"), fetcher.fetch("IN2"), fetcher.fetch("IN3"));

        assert!(a.is_ok() && b.is_ok() && c.is_ok());
        assert_eq!(fetcher.max_in_flight(), 3);
    }
}
