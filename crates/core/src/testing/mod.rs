//! Testing utilities and mock implementations.
//!
//! Provides a mock [`RecommendationFetcher`](crate::client::RecommendationFetcher)
//! so batch workflows can be tested without a helpdesk backend, plus payload
//! fixtures.
//!
//! # Example
//!
//! ```rust,ignore
//! use triage_core::testing::{fixtures, MockRecommendationFetcher};
//!
//! let fetcher = MockRecommendationFetcher::new();
//! fetcher.fail_with_status("IN2", 500).await;
//!
//! let tickets = fixtures::validation_tickets(&["IN1", "IN2", "IN3"]);
//! ```

mod mock_fetcher;

pub use mock_fetcher::{MockRecommendationFetcher, RecordedFetch};

/// Test fixtures and helper functions.
pub mod fixtures {
    use serde_json::json;

    use crate::ticket::{Recommendation, SearchTicket, SimilarTicket, ValidationTicket};

    /// Create a recommendation with reasonable defaults.
    pub fn recommendation(ticket_id: &str, support_group: &str, priority: &str) -> Recommendation {
        Recommendation {
            recommended_support_group: Some(support_group.to_string()),
            recommended_priority_level: Some(priority.to_string()),
            detailed_explanation: Some(json!({
                "reasoning": format!("Similar tickets were resolved by {}.", support_group)
            })),
            original_data: Some(json!({ "id": ticket_id })),
            similar_tickets: vec![SimilarTicket {
                id: format!("{}-SIM", ticket_id),
                title: Some("Earlier occurrence".to_string()),
                support_group: Some(support_group.to_string()),
                ..Default::default()
            }],
            ..Default::default()
        }
    }

    /// Create a validation ticket.
    pub fn validation_ticket(id: &str, index: usize) -> ValidationTicket {
        ValidationTicket {
            id: id.to_string(),
            index,
            title: Some(format!("Ticket {}", id)),
            description: Some(format!("Description of {}", id)),
            status: Some("New".to_string()),
            priority: Some("P3".to_string()),
            ..Default::default()
        }
    }

    /// Validation tickets indexed in order.
    pub fn validation_tickets(ids: &[&str]) -> Vec<ValidationTicket> {
        ids.iter()
            .enumerate()
            .map(|(index, id)| validation_ticket(id, index))
            .collect()
    }

    /// Create a search result ticket.
    pub fn search_ticket(id: &str, title: &str) -> SearchTicket {
        SearchTicket {
            id: id.to_string(),
            title: Some(title.to_string()),
            status_value: Some("Closed".to_string()),
            ..Default::default()
        }
    }

    /// A complete `text/event-stream` body for `tickets`: count, one event
    /// per ticket, then complete.
    pub fn validation_stream_body(tickets: &[ValidationTicket]) -> String {
        let mut body = format!("event: count\ndata: {}\n\n", json!({ "count": tickets.len() }));
        for ticket in tickets {
            let data = serde_json::to_string(ticket).unwrap_or_default();
            body.push_str(&format!("event: ticket\ndata: {}\n\n", data));
        }
        body.push_str(&format!(
            "event: complete\ndata: {}\n\n",
            json!({ "loaded": tickets.len() })
        ));
        body
    }
}
