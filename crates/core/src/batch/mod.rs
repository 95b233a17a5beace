//! Bounded-concurrency batch runner.
//!
//! Runs one async operation per work item while keeping at most
//! `concurrency_limit` operations in flight:
//! - **Initial fill**: the first `min(limit, n)` items launch back-to-back
//! - **Refill**: every settle frees a slot, and the next item launches from the cursor
//! - **Isolation**: a failing item is reported and counted, the batch carries on

mod config;
mod events;
mod runner;
mod types;

pub use config::BatchConfig;
pub use events::{BatchEvent, EventForwarder};
pub use runner::{BatchCallbacks, BatchRunner, NoopCallbacks, DEFAULT_FAILURE_MESSAGE};
pub use types::{BatchError, BatchState, BatchSummary, Outcome, WorkItem};
