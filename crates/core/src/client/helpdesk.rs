//! reqwest-backed helpdesk client.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use futures::stream::{BoxStream, StreamExt};
use reqwest::header::ACCEPT;
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use crate::config::BackendConfig;
use crate::metrics;
use crate::search::SearchRequest;
use crate::sse::{decode_stream, ValidationStreamEvent};
use crate::ticket::{AdviceRequest, Recommendation, SearchResults, ValidationTicketsResponse};

use super::{ClientError, RecommendationFetcher};

const SEARCH_TICKETS: &str = "/api/search-tickets";
const GET_TICKET_ADVICE: &str = "/api/get-ticket-advice";
const GET_VALIDATION_TICKETS: &str = "/api/get-validation-tickets";
const GET_VALIDATION_TICKETS_STREAM: &str = "/api/get-validation-tickets-stream";

/// Decoded events of the validation ticket stream.
pub type ValidationEventStream = BoxStream<'static, Result<ValidationStreamEvent, ClientError>>;

/// Helpdesk backend client.
///
/// JSON requests carry the configured timeout. The validation event stream
/// only bounds connection setup, since it stays open while tickets load.
#[derive(Debug, Clone)]
pub struct HelpdeskClient {
    client: Client,
    base_url: String,
    api_token: Option<String>,
    timeout: Duration,
}

impl HelpdeskClient {
    pub fn new(config: &BackendConfig) -> Result<Self, ClientError> {
        let timeout = Duration::from_secs(u64::from(config.timeout_secs));
        let client = Client::builder().connect_timeout(timeout).build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_token: config.api_token.clone(),
            timeout,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Search tickets with a mode-specific request body.
    pub async fn search_tickets(
        &self,
        request: &SearchRequest,
    ) -> Result<SearchResults, ClientError> {
        debug!(mode = %request.mode(), "Searching tickets");
        self.post_json("search", SEARCH_TICKETS, request).await
    }

    /// Fetch the AI assignment recommendation for one ticket.
    pub async fn ticket_advice(&self, ticket_id: &str) -> Result<Recommendation, ClientError> {
        debug!(ticket_id, "Fetching ticket advice");
        let body = AdviceRequest {
            ticket_id: ticket_id.to_string(),
        };
        self.post_json("advice", GET_TICKET_ADVICE, &body).await
    }

    /// Fetch every validation ticket in one response.
    pub async fn validation_tickets(&self) -> Result<ValidationTicketsResponse, ClientError> {
        self.post_json("validation", GET_VALIDATION_TICKETS, &serde_json::json!({}))
            .await
    }

    /// Open the validation ticket event stream.
    ///
    /// Events arrive as the backend loads tickets. Unknown event names are
    /// skipped; transport and payload errors are yielded in place.
    pub async fn stream_validation_tickets(&self) -> Result<ValidationEventStream, ClientError> {
        let timer = Instant::now();
        let request = self
            .authorize(self.client.get(self.url(GET_VALIDATION_TICKETS_STREAM)))
            .header(ACCEPT, "text/event-stream");

        let response = record("validation_stream", timer, async move {
            check_status(request.send().await?).await
        })
        .await?;

        debug!("Validation ticket stream opened");

        let events = decode_stream(response.bytes_stream()).filter_map(|item| async move {
            match item {
                Ok(event) => ValidationStreamEvent::from_sse(&event)
                    .map_err(ClientError::from)
                    .transpose(),
                Err(e) => Some(Err(ClientError::Stream(e.to_string()))),
            }
        });

        Ok(events.boxed())
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.api_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn post_json<B, T>(
        &self,
        endpoint: &'static str,
        path: &str,
        body: &B,
    ) -> Result<T, ClientError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let timer = Instant::now();
        let request = self
            .authorize(self.client.post(self.url(path)))
            .timeout(self.timeout)
            .json(body);

        record(endpoint, timer, async move {
            let response = check_status(request.send().await?).await?;
            response
                .json::<T>()
                .await
                .map_err(|e| ClientError::Decode(e.to_string()))
        })
        .await
    }
}

#[async_trait]
impl RecommendationFetcher for HelpdeskClient {
    async fn fetch(&self, ticket_id: &str) -> Result<Recommendation, ClientError> {
        self.ticket_advice(ticket_id).await
    }
}

async fn check_status(response: Response) -> Result<Response, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(ClientError::Http {
        status: status.as_u16(),
        body,
    })
}

async fn record<T, F>(endpoint: &'static str, timer: Instant, request: F) -> Result<T, ClientError>
where
    F: std::future::Future<Output = Result<T, ClientError>>,
{
    let result = request.await;
    let outcome = if result.is_ok() { "success" } else { "failure" };
    metrics::BACKEND_REQUESTS
        .with_label_values(&[endpoint, outcome])
        .inc();
    metrics::BACKEND_REQUEST_DURATION
        .with_label_values(&[endpoint])
        .observe(timer.elapsed().as_secs_f64());
    if let Err(e) = &result {
        debug!(endpoint, error = %e, "Backend request failed");
    }
    result
}
