//! Server-Sent Events decoding.
//!
//! [`SseParser`] turns arbitrary byte chunks into [`SseEvent`]s;
//! [`decode_stream`] lifts it over a byte stream such as
//! `reqwest::Response::bytes_stream()`. The validation ticket stream is
//! decoded on top of that by [`ValidationStreamEvent`].

mod parser;
mod validation;

pub use parser::{decode_stream, SseEvent, SseParser};
pub use validation::{ValidationStreamEvent, ValidationStreamSummary};

use thiserror::Error;

/// Errors decoding an event stream.
#[derive(Debug, Error)]
pub enum SseError {
    /// An event's data was not the expected JSON.
    #[error("invalid {event} event payload: {message}")]
    InvalidPayload { event: String, message: String },
}
