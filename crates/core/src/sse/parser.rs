//! Incremental `text/event-stream` parser.

use futures::stream::{self, Stream, StreamExt};

/// A dispatched server-sent event.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SseEvent {
    /// Event type (`event:` field); `None` means the default "message".
    pub event: Option<String>,
    /// Event data, multiple `data:` lines joined with `\n`.
    pub data: String,
    /// Last event id seen on the stream.
    pub id: Option<String>,
}

impl SseEvent {
    pub fn new(event: &str, data: &str) -> Self {
        Self {
            event: Some(event.to_string()),
            data: data.to_string(),
            id: None,
        }
    }

    /// Event type, defaulting to "message".
    pub fn event_name(&self) -> &str {
        self.event.as_deref().unwrap_or("message")
    }
}

/// Incremental parser. Feed it chunks as they arrive; complete events come out.
///
/// Lines may end in `\n`, `\r\n` or `\r`, and may be split across chunks.
#[derive(Debug, Default)]
pub struct SseParser {
    buffer: Vec<u8>,
    event: Option<String>,
    data: Vec<String>,
    last_id: Option<String>,
    retry_ms: Option<u64>,
    seen_first_line: bool,
}

impl SseParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reconnection delay requested by the server, if any.
    pub fn retry_ms(&self) -> Option<u64> {
        self.retry_ms
    }

    /// Bytes buffered but not yet terminated by a line ending.
    pub fn pending_bytes(&self) -> usize {
        self.buffer.len()
    }

    /// Feed a chunk and return every event it completes.
    pub fn feed(&mut self, chunk: &[u8]) -> Vec<SseEvent> {
        self.buffer.extend_from_slice(chunk);

        let mut events = Vec::new();
        let mut start = 0;
        let mut i = 0;

        while i < self.buffer.len() {
            let (end, next) = match self.buffer[i] {
                b'\n' => (i, i + 1),
                b'\r' => {
                    // A trailing \r may be the first half of \r\n.
                    if i + 1 == self.buffer.len() {
                        break;
                    }
                    let next = if self.buffer[i + 1] == b'\n' { i + 2 } else { i + 1 };
                    (i, next)
                }
                _ => {
                    i += 1;
                    continue;
                }
            };

            let line = String::from_utf8_lossy(&self.buffer[start..end]).into_owned();
            if let Some(event) = self.process_line(&line) {
                events.push(event);
            }
            start = next;
            i = next;
        }

        self.buffer.drain(..start);
        events
    }

    fn process_line(&mut self, line: &str) -> Option<SseEvent> {
        let line = if self.seen_first_line {
            line
        } else {
            self.seen_first_line = true;
            line.strip_prefix('\u{feff}').unwrap_or(line)
        };

        if line.is_empty() {
            return self.dispatch();
        }
        if line.starts_with(':') {
            return None;
        }

        let (field, value) = match line.split_once(':') {
            Some((field, value)) => (field, value.strip_prefix(' ').unwrap_or(value)),
            None => (line, ""),
        };

        match field {
            "event" => self.event = Some(value.to_string()),
            "data" => self.data.push(value.to_string()),
            "id" => {
                if !value.contains('\0') {
                    self.last_id = Some(value.to_string());
                }
            }
            "retry" => {
                if let Ok(ms) = value.parse::<u64>() {
                    self.retry_ms = Some(ms);
                }
            }
            other => tracing::trace!(field = other, "Ignoring unknown SSE field"),
        }
        None
    }

    fn dispatch(&mut self) -> Option<SseEvent> {
        let event = self.event.take();
        if self.data.is_empty() {
            return None;
        }
        let data = std::mem::take(&mut self.data).join("\n");
        Some(SseEvent {
            event: event.filter(|e| !e.is_empty()),
            data,
            id: self.last_id.clone(),
        })
    }
}

/// Decode a stream of byte chunks into a stream of events.
///
/// Transport errors pass through in order. An event left incomplete when the
/// byte stream ends is discarded.
pub fn decode_stream<S, B, E>(bytes: S) -> impl Stream<Item = Result<SseEvent, E>>
where
    S: Stream<Item = Result<B, E>>,
    B: AsRef<[u8]>,
{
    bytes
        .scan(SseParser::new(), |parser, chunk| {
            let batch: Vec<Result<SseEvent, E>> = match chunk {
                Ok(bytes) => parser.feed(bytes.as_ref()).into_iter().map(Ok).collect(),
                Err(e) => vec![Err(e)],
            };
            futures::future::ready(Some(batch))
        })
        .flat_map(stream::iter)
}
