//! Repository layer for persisted graph state.
//!
//! # Responsibility
//! - Define data access contracts for node positions.
//! - Isolate SQLite query details from the queue and graph layers.
//!
//! # Invariants
//! - Writes reject non-finite coordinates before touching storage.
//! - Read paths reject invalid persisted rows instead of masking them.

pub mod position_repo;
