//! Domain records consumed by the progression graph engine.
//!
//! # Responsibility
//! - Define the plain data shapes handed in by the surrounding application.
//! - Keep graph node identity and kind discriminators in one place.
//!
//! # Invariants
//! - Records are read-only inputs; progress fields are never stored on them.
//! - Every graph node is identified by a stable `NodeId` derived from its
//!   backing record.

pub mod node;
pub mod records;
pub mod rubric;
pub mod stage;
