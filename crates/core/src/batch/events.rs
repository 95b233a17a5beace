//! Event-stream view of a batch.
//!
//! [`EventForwarder`] implements [`BatchCallbacks`] by pushing every hook into
//! a channel, so a consumer can read a batch as a sequence of
//! [`BatchEvent`]s instead of registering callbacks.

use tokio::sync::mpsc;

use super::runner::BatchCallbacks;
use super::types::{Outcome, WorkItem};

/// One lifecycle event of a batch.
#[derive(Debug, Clone, PartialEq)]
pub enum BatchEvent<T, R> {
    Started {
        total: usize,
    },
    ItemStarted {
        item: WorkItem<T>,
        current: usize,
        total: usize,
    },
    /// Terminal outcome of one item; always followed by `Progress`.
    Settled(Outcome<T, R>),
    Progress {
        completed: usize,
        total: usize,
    },
    Finished,
}

impl<T, R> BatchEvent<T, R> {
    pub fn is_finished(&self) -> bool {
        matches!(self, BatchEvent::Finished)
    }
}

/// Callbacks that forward every event into an unbounded channel.
///
/// A closed receiver is tolerated: events are dropped and the batch runs on.
pub struct EventForwarder<T, R> {
    tx: mpsc::UnboundedSender<BatchEvent<T, R>>,
}

impl<T, R> EventForwarder<T, R> {
    /// Create a forwarder and the receiving end of its channel.
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<BatchEvent<T, R>>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    fn send(&self, event: BatchEvent<T, R>) {
        if self.tx.send(event).is_err() {
            tracing::debug!("Batch event receiver dropped");
        }
    }
}

impl<T: Clone, R> BatchCallbacks<T, R> for EventForwarder<T, R> {
    fn on_batch_start(&mut self, total: usize) {
        self.send(BatchEvent::Started { total });
    }

    fn on_ticket_start(&mut self, item: &WorkItem<T>, current: usize, total: usize) {
        self.send(BatchEvent::ItemStarted {
            item: item.clone(),
            current,
            total,
        });
    }

    fn on_progress(&mut self, completed: usize, total: usize) {
        self.send(BatchEvent::Progress { completed, total });
    }

    fn on_ticket_complete(&mut self, item: &WorkItem<T>, result: R) {
        self.send(BatchEvent::Settled(Outcome::Success {
            item: item.clone(),
            result,
        }));
    }

    fn on_error(&mut self, item: &WorkItem<T>, error: &str) {
        self.send(BatchEvent::Settled(Outcome::Failure {
            item: item.clone(),
            error: error.to_string(),
        }));
    }

    fn on_complete(&mut self) {
        self.send(BatchEvent::Finished);
    }
}
