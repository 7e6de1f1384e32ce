//! Rubric scoring and score aggregation.
//!
//! # Responsibility
//! - Turn linked work item contributions into 0-100 progress values.
//! - Derive per-stage and overall skill progress, and objective progress.
//!
//! # Invariants
//! - Every function here is pure and total: dangling links and empty rubrics
//!   produce defined values, never errors.
//! - Outputs are deterministic for a given input set.

pub mod aggregate;
pub mod progress;
pub mod rubric;
