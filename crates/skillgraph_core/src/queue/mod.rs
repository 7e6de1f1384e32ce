//! Coalescing, debounced position write queue.
//!
//! # Responsibility
//! - Buffer drag-driven position updates per node and flush them at a
//!   bounded rate to an injected persistence sink.
//! - Retry failed writes a bounded number of times, then surface them.
//!
//! # Invariants
//! - At most one buffered write per node id; the latest update wins.
//! - A flush snapshots and clears the buffer before calling the sink.
//! - Failed writes are either retried, superseded by a newer value, or
//!   reported; never dropped silently.

pub mod clock;
pub mod sink;
pub mod write_queue;
