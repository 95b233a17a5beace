//! Types for the batch runner.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors returned by the batch runner itself.
///
/// Item failures are never reported here; they go to
/// [`BatchCallbacks::on_error`](super::BatchCallbacks::on_error).
#[derive(Debug, Error)]
pub enum BatchError {
    /// A batch is already running on this runner instance.
    #[error("batch already running")]
    AlreadyRunning,
}

/// One unit of batch work.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkItem<T> {
    /// Ticket identifier passed to the operation.
    pub id: String,
    /// Stable caller-assigned position used to correlate results.
    pub index: usize,
    /// Caller context, never interpreted by the runner.
    pub context: T,
}

impl<T> WorkItem<T> {
    pub fn new(id: impl Into<String>, index: usize, context: T) -> Self {
        Self {
            id: id.into(),
            index,
            context,
        }
    }
}

impl WorkItem<()> {
    /// Work item without caller context.
    pub fn bare(id: impl Into<String>, index: usize) -> Self {
        Self::new(id, index, ())
    }
}

/// Terminal outcome of one work item.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<T, R> {
    Success { item: WorkItem<T>, result: R },
    Failure { item: WorkItem<T>, error: String },
}

impl<T, R> Outcome<T, R> {
    pub fn item(&self) -> &WorkItem<T> {
        match self {
            Outcome::Success { item, .. } | Outcome::Failure { item, .. } => item,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success { .. })
    }
}

/// Lifecycle state of a runner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum BatchState {
    Idle = 0,
    Running = 1,
    Finished = 2,
}

impl BatchState {
    pub(crate) fn from_u8(value: u8) -> Self {
        match value {
            1 => BatchState::Running,
            2 => BatchState::Finished,
            _ => BatchState::Idle,
        }
    }
}

/// Aggregate result of a finished batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchSummary {
    /// Unique id of this run, used in logs.
    pub run_id: String,
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl BatchSummary {
    /// Number of items that reached a terminal outcome.
    pub fn completed(&self) -> usize {
        self.succeeded + self.failed
    }
}
