//! Position write queue state machine.
//!
//! # Responsibility
//! - Coalesce per-node position updates (last write wins).
//! - Schedule flushes with a restartable debounce capped by a max wait.
//! - Track retries for failed writes and surface exhausted ones.
//!
//! # Invariants
//! - `Idle`: nothing buffered, nothing in flight.
//! - `Pending`: updates buffered, nothing in flight.
//! - `Flushing`: one batch in flight; new updates go to a fresh buffer.
//! - A buffered write's deadline never exceeds its batch's first update
//!   time plus `max_wait_ms`.
//! - A batch dropped before `complete_flush` is reclaimed on the next queue
//!   call and counts as one failed attempt for each of its writes.

use crate::config::QueueConfig;
use crate::model::node::{NodeId, NodeKind, Position};
use crate::queue::clock::Clock;
use crate::queue::sink::{PersistError, PositionSink};
use log::{debug, error, info, warn};
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::{Arc, Weak};

const ABANDONED_FLUSH_ERROR: &str = "flush abandoned before completion";

/// Observable queue lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueueState {
    Idle,
    Pending,
    Flushing,
}

/// One coalesced write waiting for (or undergoing) persistence.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingWrite {
    pub node_id: NodeId,
    pub kind: NodeKind,
    pub position: Position,
    /// Failed attempts so far for this value.
    pub attempts: u32,
    pub last_error: Option<PersistError>,
}

/// Write that kept failing after every allowed retry.
#[derive(Debug, Clone, PartialEq)]
pub struct PositionWriteFailure {
    pub node_id: NodeId,
    pub kind: NodeKind,
    /// Last position the user dragged the node to.
    pub position: Position,
    pub attempts: u32,
    pub error: PersistError,
}

impl Display for PositionWriteFailure {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "position for {} node `{}` at ({}, {}) not saved after {} attempts: {}",
            self.kind, self.node_id, self.position.x, self.position.y, self.attempts, self.error
        )
    }
}

impl Error for PositionWriteFailure {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(&self.error)
    }
}

/// Snapshot of the buffer taken at flush start, sorted by node id.
///
/// Holds the queue's in-flight lease; dropping it (or the resulting
/// [`CompletedFlush`]) without [`PositionWriteQueue::complete_flush`] hands
/// the writes back to the queue.
#[derive(Debug)]
#[must_use = "an unfinished batch is retried as a failed attempt"]
pub struct FlushBatch {
    writes: Vec<PendingWrite>,
    lease: Arc<()>,
}

impl FlushBatch {
    pub fn writes(&self) -> &[PendingWrite] {
        &self.writes
    }

    pub fn len(&self) -> usize {
        self.writes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.writes.is_empty()
    }

    /// Persists every write through `sink`; one failure does not stop the rest.
    pub fn execute<S: PositionSink + ?Sized>(self, sink: &mut S) -> CompletedFlush {
        let results = self
            .writes
            .iter()
            .map(|write| sink.persist(&write.node_id, write.kind, write.position))
            .collect();
        self.resolve(results)
    }

    /// Pairs externally obtained results with the batch, in `writes()` order.
    ///
    /// Writes without a matching result count as failed.
    pub fn resolve(self, results: Vec<Result<(), PersistError>>) -> CompletedFlush {
        let mut results = results.into_iter();
        let outcomes = self
            .writes
            .into_iter()
            .map(|write| {
                let result = results
                    .next()
                    .unwrap_or_else(|| Err(PersistError::new("no result reported for write")));
                (write, result)
            })
            .collect();
        CompletedFlush {
            outcomes,
            _lease: self.lease,
        }
    }

    /// Marks every write as failed with `error`.
    pub fn fail_all(self, error: PersistError) -> CompletedFlush {
        let results = vec![Err(error); self.writes.len()];
        self.resolve(results)
    }
}

/// Batch paired with per-write persistence results.
#[derive(Debug)]
#[must_use = "results only apply once passed to complete_flush"]
pub struct CompletedFlush {
    outcomes: Vec<(PendingWrite, Result<(), PersistError>)>,
    _lease: Arc<()>,
}

/// Queue-side copy of the batch currently out for persistence.
#[derive(Debug)]
struct InFlight {
    writes: Vec<PendingWrite>,
    lease: Weak<()>,
}

impl InFlight {
    fn is_live(&self) -> bool {
        self.lease.strong_count() > 0
    }
}

/// Result summary for one flush cycle.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FlushReport {
    pub persisted: Vec<NodeId>,
    /// Failed this cycle, re-buffered for the next one.
    pub retrying: Vec<NodeId>,
    /// Failed this cycle but a newer value was already buffered.
    pub superseded: Vec<NodeId>,
    /// Out of retries; the caller must handle these.
    pub failed: Vec<PositionWriteFailure>,
}

impl FlushReport {
    pub fn is_clean(&self) -> bool {
        self.retrying.is_empty() && self.superseded.is_empty() && self.failed.is_empty()
    }
}

/// Debounced, coalescing writer of node positions.
pub struct PositionWriteQueue<C: Clock> {
    config: QueueConfig,
    clock: C,
    buffer: BTreeMap<NodeId, PendingWrite>,
    first_buffered_at: Option<u64>,
    deadline: Option<u64>,
    in_flight: Option<InFlight>,
    failures: Vec<PositionWriteFailure>,
}

impl<C: Clock> PositionWriteQueue<C> {
    pub fn new(config: QueueConfig, clock: C) -> Self {
        Self {
            config,
            clock,
            buffer: BTreeMap::new(),
            first_buffered_at: None,
            deadline: None,
            in_flight: None,
            failures: Vec::new(),
        }
    }

    pub fn state(&self) -> QueueState {
        if self.has_live_flight() {
            QueueState::Flushing
        } else if self.buffer.is_empty() && self.in_flight.is_none() {
            QueueState::Idle
        } else {
            QueueState::Pending
        }
    }

    /// Number of distinct nodes waiting for the next flush.
    pub fn pending_len(&self) -> usize {
        self.buffer.len()
    }

    pub fn pending(&self, node_id: &NodeId) -> Option<&PendingWrite> {
        self.buffer.get(node_id)
    }

    /// Drains failures surfaced since the last call.
    ///
    /// Every entry also appeared in the `failed` list of the report that
    /// surfaced it.
    pub fn take_failures(&mut self) -> Vec<PositionWriteFailure> {
        std::mem::take(&mut self.failures)
    }

    /// Clock time at which the buffered batch becomes due.
    pub fn next_deadline(&self) -> Option<u64> {
        self.deadline
    }

    /// Buffers `position` for `node_id`, replacing any earlier buffered value.
    ///
    /// Never blocks. Restarts the debounce deadline, capped at the batch's
    /// max wait.
    pub fn queue_update(&mut self, node_id: NodeId, kind: NodeKind, position: Position) {
        self.reclaim_abandoned();
        self.buffer.insert(
            node_id.clone(),
            PendingWrite {
                node_id,
                kind,
                position,
                attempts: 0,
                last_error: None,
            },
        );
        self.arm_deadline();
    }

    /// Whether a flush should run now.
    pub fn is_due(&self) -> bool {
        !self.has_live_flight()
            && !self.buffer.is_empty()
            && self
                .deadline
                .is_some_and(|deadline| self.clock.now_ms() >= deadline)
    }

    /// Flushes through `sink` if the debounce deadline has passed.
    pub fn poll<S: PositionSink + ?Sized>(&mut self, sink: &mut S) -> Option<FlushReport> {
        self.reclaim_abandoned();
        if !self.is_due() {
            return None;
        }
        self.flush_with(sink)
    }

    /// Flushes immediately, e.g. once dragging has stopped.
    ///
    /// Returns `None` when nothing is buffered or a batch is already in flight.
    pub fn flush_now<S: PositionSink + ?Sized>(&mut self, sink: &mut S) -> Option<FlushReport> {
        self.flush_with(sink)
    }

    /// Starts a flush by taking the buffer; pair with [`Self::complete_flush`].
    ///
    /// Returns `None` when nothing is buffered or a batch is already in flight.
    pub fn begin_flush(&mut self) -> Option<FlushBatch> {
        self.reclaim_abandoned();
        if self.in_flight.is_some() || self.buffer.is_empty() {
            return None;
        }

        let writes = std::mem::take(&mut self.buffer).into_values().collect::<Vec<_>>();
        self.first_buffered_at = None;
        self.deadline = None;
        let lease = Arc::new(());
        self.in_flight = Some(InFlight {
            writes: writes.clone(),
            lease: Arc::downgrade(&lease),
        });

        debug!(
            "event=position_flush module=queue status=start writes={}",
            writes.len()
        );
        Some(FlushBatch { writes, lease })
    }

    /// Gives up on the in-flight batch, e.g. when its persist task was
    /// cancelled. Each write counts as one failed attempt with `error`.
    pub fn abort_flush(&mut self, batch: FlushBatch, error: PersistError) -> FlushReport {
        warn!(
            "event=position_flush module=queue status=aborted writes={} error={}",
            batch.len(),
            error
        );
        self.complete_flush(batch.fail_all(error))
    }

    /// Applies results of the in-flight batch and returns to `Idle`/`Pending`.
    pub fn complete_flush(&mut self, completed: CompletedFlush) -> FlushReport {
        self.in_flight = None;
        let mut report = FlushReport::default();

        for (write, result) in completed.outcomes {
            match result {
                Ok(()) => report.persisted.push(write.node_id),
                Err(err) => self.handle_failure(write, err, &mut report),
            }
        }

        if !report.retrying.is_empty() {
            self.arm_deadline();
        }
        self.failures.extend(report.failed.iter().cloned());

        let status = if report.failed.is_empty() && report.retrying.is_empty() {
            "ok"
        } else {
            "partial"
        };
        info!(
            "event=position_flush module=queue status={} persisted={} retrying={} superseded={} failed={}",
            status,
            report.persisted.len(),
            report.retrying.len(),
            report.superseded.len(),
            report.failed.len()
        );
        report
    }

    fn has_live_flight(&self) -> bool {
        self.in_flight.as_ref().is_some_and(InFlight::is_live)
    }

    /// Hands writes of a dropped batch back to the buffer as failed attempts.
    fn reclaim_abandoned(&mut self) {
        if self.has_live_flight() {
            return;
        }
        let Some(flight) = self.in_flight.take() else {
            return;
        };

        warn!(
            "event=position_flush module=queue status=abandoned writes={}",
            flight.writes.len()
        );
        let mut report = FlushReport::default();
        for write in flight.writes {
            self.handle_failure(write, PersistError::new(ABANDONED_FLUSH_ERROR), &mut report);
        }
        if !report.retrying.is_empty() {
            self.arm_deadline();
        }
        self.failures.extend(report.failed);
    }

    fn flush_with<S: PositionSink + ?Sized>(&mut self, sink: &mut S) -> Option<FlushReport> {
        let batch = self.begin_flush()?;
        let completed = batch.execute(sink);
        Some(self.complete_flush(completed))
    }

    fn handle_failure(&mut self, write: PendingWrite, err: PersistError, report: &mut FlushReport) {
        let attempts = write.attempts + 1;

        if self.buffer.contains_key(&write.node_id) {
            debug!(
                "event=position_write module=queue status=superseded node_id={} attempts={}",
                write.node_id, attempts
            );
            report.superseded.push(write.node_id);
            return;
        }

        if attempts > self.config.max_retries {
            error!(
                "event=position_write module=queue status=error node_id={} kind={} attempts={} error={}",
                write.node_id, write.kind, attempts, err
            );
            report.failed.push(PositionWriteFailure {
                node_id: write.node_id,
                kind: write.kind,
                position: write.position,
                attempts,
                error: err,
            });
            return;
        }

        warn!(
            "event=position_write module=queue status=retry node_id={} attempts={} error={}",
            write.node_id, attempts, err
        );
        report.retrying.push(write.node_id.clone());
        self.buffer.insert(
            write.node_id.clone(),
            PendingWrite {
                attempts,
                last_error: Some(err),
                ..write
            },
        );
    }

    fn arm_deadline(&mut self) {
        let now = self.clock.now_ms();
        let first = *self.first_buffered_at.get_or_insert(now);
        let debounced = now.saturating_add(self.config.debounce_ms);
        let capped = first.saturating_add(self.config.max_wait_ms);
        self.deadline = Some(debounced.min(capped));
    }
}
