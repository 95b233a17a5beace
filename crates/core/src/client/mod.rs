//! HTTP client for the helpdesk backend.
//!
//! [`HelpdeskClient`] talks to the search, advice and validation endpoints.
//! The batch workflow only needs [`RecommendationFetcher`], which lets tests
//! swap in a mock.

mod helpdesk;

pub use helpdesk::{HelpdeskClient, ValidationEventStream};

use async_trait::async_trait;
use thiserror::Error;

use crate::sse::SseError;
use crate::ticket::Recommendation;

/// Errors talking to the helpdesk backend.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Backend answered with a non-2xx status.
    #[error("HTTP error! status: {status}")]
    Http { status: u16, body: String },

    /// Request could not be sent or the connection failed.
    #[error("request failed: {0}")]
    Request(String),

    #[error("request timed out")]
    Timeout,

    /// Response body was not the expected JSON.
    #[error("failed to decode response: {0}")]
    Decode(String),

    /// Event stream broke or carried an undecodable event.
    #[error("event stream failed: {0}")]
    Stream(String),
}

impl From<reqwest::Error> for ClientError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            ClientError::Timeout
        } else if e.is_decode() {
            ClientError::Decode(e.to_string())
        } else {
            ClientError::Request(e.to_string())
        }
    }
}

impl From<SseError> for ClientError {
    fn from(e: SseError) -> Self {
        ClientError::Stream(e.to_string())
    }
}

/// Source of AI assignment recommendations, one ticket at a time.
#[async_trait]
pub trait RecommendationFetcher: Send + Sync {
    async fn fetch(&self, ticket_id: &str) -> Result<Recommendation, ClientError>;
}
