//! Batch runner implementation.
//!
//! All bookkeeping happens on the task that polls [`BatchRunner::run`]:
//! in-flight operations live in a `FuturesUnordered`, and the cursor is only
//! advanced at initial fill or right after a settle, so no two launches can
//! claim the same item.

use std::fmt::Display;
use std::future::Future;
use std::sync::atomic::{AtomicU8, Ordering};
use std::time::Instant;

use chrono::Utc;
use futures::stream::{FuturesUnordered, StreamExt};
use prometheus::IntGauge;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::metrics;

use super::config::BatchConfig;
use super::types::{BatchError, BatchState, BatchSummary, WorkItem};

/// Message reported when an operation fails with an empty error message.
pub const DEFAULT_FAILURE_MESSAGE: &str = "Failed to get recommendations";

/// Lifecycle hooks invoked by the runner.
///
/// Every hook is optional (default no-op) and called synchronously from the
/// task driving the batch. For each settled item the order is
/// `on_ticket_complete` or `on_error`, then `on_progress`; `on_complete`
/// always comes last.
pub trait BatchCallbacks<T, R> {
    /// A non-empty batch is about to launch its first item.
    fn on_batch_start(&mut self, _total: usize) {}

    /// An item is about to launch. `current` is the 1-based launch ordinal,
    /// not a completion order.
    fn on_ticket_start(&mut self, _item: &WorkItem<T>, _current: usize, _total: usize) {}

    /// An item reached a terminal outcome; `completed` is the running total.
    fn on_progress(&mut self, _completed: usize, _total: usize) {}

    /// An item's operation succeeded.
    fn on_ticket_complete(&mut self, _item: &WorkItem<T>, _result: R) {}

    /// An item's operation failed. The batch keeps going.
    fn on_error(&mut self, _item: &WorkItem<T>, _error: &str) {}

    /// Every item is terminal.
    fn on_complete(&mut self) {}
}

/// Callbacks that ignore every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopCallbacks;

impl<T, R> BatchCallbacks<T, R> for NoopCallbacks {}

/// Counters of one run.
struct BatchRun {
    total: usize,
    concurrency_limit: usize,
    next_index: usize,
    active: usize,
    completed: usize,
    succeeded: usize,
    failed: usize,
}

impl BatchRun {
    fn new(total: usize, concurrency_limit: usize) -> Self {
        Self {
            total,
            concurrency_limit,
            next_index: 0,
            active: 0,
            completed: 0,
            succeeded: 0,
            failed: 0,
        }
    }

    /// Claim the next cursor position if an item and a slot are available.
    fn claim(&mut self) -> Option<usize> {
        if self.next_index >= self.total || self.active >= self.concurrency_limit {
            return None;
        }
        let index = self.next_index;
        self.next_index += 1;
        self.active += 1;
        Some(index)
    }

    fn settle(&mut self, success: bool) {
        self.active -= 1;
        self.completed += 1;
        if success {
            self.succeeded += 1;
        } else {
            self.failed += 1;
        }
    }
}

/// Resets the runner state when a run ends or its future is dropped.
struct RunGuard<'a> {
    state: &'a AtomicU8,
    finished: bool,
}

impl RunGuard<'_> {
    fn finish(mut self) {
        self.finished = true;
    }
}

impl Drop for RunGuard<'_> {
    fn drop(&mut self) {
        let next = if self.finished {
            BatchState::Finished
        } else {
            BatchState::Idle
        };
        self.state.store(next as u8, Ordering::SeqCst);
    }
}

/// Runs one async operation per work item with bounded concurrency.
///
/// A runner handles one batch at a time; construct one per concern and pass
/// it where it is needed.
#[derive(Debug)]
pub struct BatchRunner {
    concurrency_limit: usize,
    state: AtomicU8,
    in_flight: IntGauge,
}

impl BatchRunner {
    /// Create a runner. A limit of 0 is clamped to 1.
    pub fn new(concurrency_limit: usize) -> Self {
        let concurrency_limit = if concurrency_limit == 0 {
            warn!("Batch concurrency limit of 0 requested, using 1");
            1
        } else {
            concurrency_limit
        };

        Self {
            concurrency_limit,
            state: AtomicU8::new(BatchState::Idle as u8),
            in_flight: metrics::BATCH_IN_FLIGHT.clone(),
        }
    }

    #[cfg(test)]
    fn with_in_flight_gauge(mut self, gauge: IntGauge) -> Self {
        self.in_flight = gauge;
        self
    }

    pub fn from_config(config: &BatchConfig) -> Self {
        Self::new(config.concurrency_limit)
    }

    pub fn concurrency_limit(&self) -> usize {
        self.concurrency_limit
    }

    pub fn state(&self) -> BatchState {
        BatchState::from_u8(self.state.load(Ordering::SeqCst))
    }

    fn begin(&self) -> Result<RunGuard<'_>, BatchError> {
        self.state
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |current| {
                if current == BatchState::Running as u8 {
                    None
                } else {
                    Some(BatchState::Running as u8)
                }
            })
            .map_err(|_| BatchError::AlreadyRunning)?;

        Ok(RunGuard {
            state: &self.state,
            finished: false,
        })
    }

    /// Run `operation` once per item and resolve when every item is terminal.
    ///
    /// Item failures are routed to [`BatchCallbacks::on_error`] and never
    /// returned. The only error is [`BatchError::AlreadyRunning`], raised
    /// before any callback fires.
    pub async fn run<T, R, E, F, Fut, C>(
        &self,
        items: Vec<WorkItem<T>>,
        operation: F,
        callbacks: &mut C,
    ) -> Result<BatchSummary, BatchError>
    where
        F: Fn(&WorkItem<T>) -> Fut,
        Fut: Future<Output = Result<R, E>>,
        E: Display,
        C: BatchCallbacks<T, R> + ?Sized,
    {
        let guard = self.begin()?;

        let run_id = Uuid::new_v4().to_string();
        let started_at = Utc::now();
        let timer = Instant::now();
        let total = items.len();
        let mut run = BatchRun::new(total, self.concurrency_limit);

        metrics::BATCH_RUNS.inc();

        if total == 0 {
            debug!(run_id = %run_id, "Empty batch, nothing to launch");
        } else {
            info!(
                run_id = %run_id,
                total,
                concurrency_limit = self.concurrency_limit,
                "Starting batch"
            );
            callbacks.on_batch_start(total);
        }

        let mut in_flight = FuturesUnordered::new();

        loop {
            while let Some(index) = run.claim() {
                let item = &items[index];
                debug!(
                    run_id = %run_id,
                    ticket_id = %item.id,
                    active = run.active,
                    next_index = run.next_index,
                    completed = run.completed,
                    "Launching item"
                );
                callbacks.on_ticket_start(item, index + 1, total);
                let slot = InFlightSlot::acquire(&self.in_flight);
                in_flight.push(tagged(index, slot, operation(item)));
            }

            let Some((index, result)) = in_flight.next().await else {
                break;
            };

            let item = &items[index];
            match result {
                Ok(value) => {
                    run.settle(true);
                    metrics::BATCH_ITEMS.with_label_values(&["success"]).inc();
                    debug!(run_id = %run_id, ticket_id = %item.id, "Item succeeded");
                    callbacks.on_ticket_complete(item, value);
                }
                Err(e) => {
                    run.settle(false);
                    metrics::BATCH_ITEMS.with_label_values(&["failure"]).inc();
                    let message = failure_message(&e);
                    warn!(run_id = %run_id, ticket_id = %item.id, error = %message, "Item failed");
                    callbacks.on_error(item, &message);
                }
            }
            callbacks.on_progress(run.completed, total);
        }

        debug_assert_eq!(run.completed, total);
        callbacks.on_complete();
        guard.finish();

        let elapsed = timer.elapsed();
        metrics::BATCH_DURATION.observe(elapsed.as_secs_f64());

        if total > 0 {
            info!(
                run_id = %run_id,
                total,
                succeeded = run.succeeded,
                failed = run.failed,
                elapsed_ms = elapsed.as_millis() as u64,
                "Batch complete"
            );
        }

        Ok(BatchSummary {
            run_id,
            total,
            succeeded: run.succeeded,
            failed: run.failed,
            started_at,
            finished_at: Utc::now(),
        })
    }
}

impl Default for BatchRunner {
    fn default() -> Self {
        Self::from_config(&BatchConfig::default())
    }
}

/// One unit of the in-flight gauge, given back when the operation settles
/// or is dropped with an abandoned run.
struct InFlightSlot(IntGauge);

impl InFlightSlot {
    fn acquire(gauge: &IntGauge) -> Self {
        gauge.inc();
        Self(gauge.clone())
    }
}

impl Drop for InFlightSlot {
    fn drop(&mut self) {
        self.0.dec();
    }
}

fn tagged<Fut: Future>(
    index: usize,
    slot: InFlightSlot,
    fut: Fut,
) -> impl Future<Output = (usize, Fut::Output)> {
    async move {
        let output = fut.await;
        drop(slot);
        (index, output)
    }
}

fn failure_message<E: Display>(error: &E) -> String {
    let message = error.to_string();
    if message.trim().is_empty() {
        DEFAULT_FAILURE_MESSAGE.to_string()
    } else {
        message
    }
}
