//! Decoding of the validation-ticket event stream.

use serde::Deserialize;
use serde_json::Value;

use crate::ticket::ValidationTicket;

use super::parser::SseEvent;
use super::SseError;

/// One event of the validation-ticket stream.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationStreamEvent {
    /// Number of tickets the backend is about to send.
    Count { count: usize },
    Ticket(ValidationTicket),
    /// Per-ticket when `ticket_id` is set, fatal for the whole stream otherwise.
    Error {
        ticket_id: Option<String>,
        message: String,
    },
    Complete { loaded: Option<usize> },
}

#[derive(Deserialize)]
struct CountPayload {
    count: usize,
}

#[derive(Deserialize)]
struct ErrorPayload {
    #[serde(default)]
    ticket_id: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

impl ValidationStreamEvent {
    /// Decode an SSE event. Unknown event names yield `Ok(None)`.
    pub fn from_sse(event: &SseEvent) -> Result<Option<Self>, SseError> {
        let name = event.event_name();
        let decoded = match name {
            "count" => {
                let payload: CountPayload = parse(name, &event.data)?;
                Self::Count {
                    count: payload.count,
                }
            }
            "ticket" => Self::Ticket(parse(name, &event.data)?),
            "error" => {
                let payload: ErrorPayload = parse(name, &event.data)?;
                Self::Error {
                    ticket_id: payload.ticket_id,
                    message: payload
                        .message
                        .unwrap_or_else(|| "Unknown error".to_string()),
                }
            }
            "complete" => {
                let payload: Value = if event.data.trim().is_empty() {
                    Value::Null
                } else {
                    parse(name, &event.data)?
                };
                Self::Complete {
                    loaded: payload
                        .get("loaded")
                        .and_then(Value::as_u64)
                        .map(|n| n as usize),
                }
            }
            other => {
                tracing::debug!(event = other, "Skipping unknown validation stream event");
                return Ok(None);
            }
        };
        Ok(Some(decoded))
    }

    /// Whether this event is an error that ends the stream.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Error { ticket_id: None, .. })
    }
}

fn parse<T: serde::de::DeserializeOwned>(event: &str, data: &str) -> Result<T, SseError> {
    serde_json::from_str(data).map_err(|e| SseError::InvalidPayload {
        event: event.to_string(),
        message: e.to_string(),
    })
}

/// Running fold of a validation stream.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidationStreamSummary {
    /// Count announced by the backend, once received.
    pub expected: Option<usize>,
    pub tickets: Vec<ValidationTicket>,
    /// `(ticket_id, message)` for tickets the backend could not load.
    pub ticket_errors: Vec<(String, String)>,
    pub fatal_error: Option<String>,
    pub completed: bool,
}

impl ValidationStreamSummary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one event in. Returns `false` once the stream should be closed:
    /// an announced count of zero, a fatal error, or completion.
    pub fn apply(&mut self, event: ValidationStreamEvent) -> bool {
        match event {
            ValidationStreamEvent::Count { count } => {
                self.expected = Some(count);
                count > 0
            }
            ValidationStreamEvent::Ticket(ticket) => {
                self.tickets.push(ticket);
                true
            }
            ValidationStreamEvent::Error {
                ticket_id: Some(id),
                message,
            } => {
                tracing::warn!(ticket_id = %id, error = %message, "Validation ticket failed to load");
                self.ticket_errors.push((id, message));
                true
            }
            ValidationStreamEvent::Error {
                ticket_id: None,
                message,
            } => {
                self.fatal_error = Some(message);
                false
            }
            ValidationStreamEvent::Complete { .. } => {
                self.completed = true;
                false
            }
        }
    }

    pub fn loaded(&self) -> usize {
        self.tickets.len()
    }

    /// True when the backend announced no tickets.
    pub fn is_empty_listing(&self) -> bool {
        self.expected == Some(0)
    }

    /// True when the stream ended without `complete`, a fatal error or an
    /// announced empty listing. The tickets loaded so far are partial.
    pub fn is_interrupted(&self) -> bool {
        !self.completed && self.fatal_error.is_none() && !self.is_empty_listing()
    }

    /// Progress heading, e.g. `"Loading tickets 3/12..."`.
    pub fn progress_line(&self) -> String {
        let total = self.expected.unwrap_or(0);
        if self.completed {
            format!("{} of {} tickets loaded", self.loaded(), total)
        } else {
            format!("Loading tickets {}/{}...", self.loaded(), total)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_count_and_ticket() {
        let count = ValidationStreamEvent::from_sse(&SseEvent::new("count", r#"{"count": 2}"#))
            .unwrap()
            .unwrap();
        assert_eq!(count, ValidationStreamEvent::Count { count: 2 });

        let ticket = ValidationStreamEvent::from_sse(&SseEvent::new(
            "ticket",
            r#"{"id": "IN5", "index": 1, "title": "VPN"}"#,
        ))
        .unwrap()
        .unwrap();
        match ticket {
            ValidationStreamEvent::Ticket(t) => {
                assert_eq!(t.id, "IN5");
                assert_eq!(t.index, 1);
            }
            other => panic!("unexpected event {:?}", other),
        }
    }

    #[test]
    fn test_decode_errors() {
        let per_ticket = ValidationStreamEvent::from_sse(&SseEvent::new(
            "error",
            r#"{"ticket_id": "IN9", "message": "not found"}"#,
        ))
        .unwrap()
        .unwrap();
        assert!(!per_ticket.is_fatal());

        let fatal = ValidationStreamEvent::from_sse(&SseEvent::new(
            "error",
            r#"{"message": "database unavailable"}"#,
        ))
        .unwrap()
        .unwrap();
        assert!(fatal.is_fatal());
    }

    #[test]
    fn test_decode_complete_without_payload() {
        let event = ValidationStreamEvent::from_sse(&SseEvent::new("complete", ""))
            .unwrap()
            .unwrap();
        assert_eq!(event, ValidationStreamEvent::Complete { loaded: None });

        let event = ValidationStreamEvent::from_sse(&SseEvent::new("complete", r#"{"loaded": 4}"#))
            .unwrap()
            .unwrap();
        assert_eq!(event, ValidationStreamEvent::Complete { loaded: Some(4) });
    }

    #[test]
    fn test_unknown_event_is_skipped() {
        let event = SseEvent::new("heartbeat", "{}");
        assert_eq!(ValidationStreamEvent::from_sse(&event).unwrap(), None);
    }

    #[test]
    fn test_invalid_payload() {
        let err = ValidationStreamEvent::from_sse(&SseEvent::new("count", "not json")).unwrap_err();
        assert!(err.to_string().starts_with("invalid count event payload"));
    }

    #[test]
    fn test_summary_fold() {
        let mut summary = ValidationStreamSummary::new();
        assert!(summary.apply(ValidationStreamEvent::Count { count: 2 }));
        assert!(summary.apply(ValidationStreamEvent::Ticket(ValidationTicket {
            id: "IN1".to_string(),
            ..Default::default()
        })));
        assert!(summary.apply(ValidationStreamEvent::Error {
            ticket_id: Some("IN2".to_string()),
            message: "missing".to_string(),
        }));
        assert_eq!(summary.progress_line(), "Loading tickets 1/2...");
        assert!(!summary.apply(ValidationStreamEvent::Complete { loaded: Some(1) }));

        assert!(summary.completed);
        assert_eq!(summary.loaded(), 1);
        assert_eq!(summary.ticket_errors.len(), 1);
        assert_eq!(summary.progress_line(), "1 of 2 tickets loaded");
    }

    #[test]
    fn test_summary_interrupted_until_terminal_event() {
        let mut summary = ValidationStreamSummary::new();
        assert!(summary.is_interrupted());

        summary.apply(ValidationStreamEvent::Count { count: 3 });
        summary.apply(ValidationStreamEvent::Ticket(ValidationTicket {
            id: "IN1".to_string(),
            ..Default::default()
        }));
        assert!(summary.is_interrupted());

        summary.apply(ValidationStreamEvent::Complete { loaded: None });
        assert!(!summary.is_interrupted());
    }

    #[test]
    fn test_summary_not_interrupted_by_empty_listing_or_fatal_error() {
        let mut empty = ValidationStreamSummary::new();
        assert!(!empty.apply(ValidationStreamEvent::Count { count: 0 }));
        assert!(!empty.is_interrupted());

        let mut failed = ValidationStreamSummary::new();
        failed.apply(ValidationStreamEvent::Error {
            ticket_id: None,
            message: "database unavailable".to_string(),
        });
        assert!(!failed.is_interrupted());
    }

    #[test]
    fn test_summary_stops_on_empty_count_and_fatal_error() {
        let mut summary = ValidationStreamSummary::new();
        assert!(!summary.apply(ValidationStreamEvent::Count { count: 0 }));
        assert!(summary.is_empty_listing());

        let mut summary = ValidationStreamSummary::new();
        assert!(!summary.apply(ValidationStreamEvent::Error {
            ticket_id: None,
            message: "down".to_string(),
        }));
        assert_eq!(summary.fatal_error.as_deref(), Some("down"));
        assert!(!summary.completed);
    }
}
