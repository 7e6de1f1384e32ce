//! Graph projection of the record set.
//!
//! # Responsibility
//! - Recompute nodes, edges, and progress from records on every pass.
//! - Resolve region membership and assemble render snapshots.
//!
//! # Invariants
//! - No graph state survives between passes; deleting a record removes its
//!   node, its edges, and its outline membership on the next pass.

pub mod builder;
pub mod region;
pub mod snapshot;
