//! Task domain model.
//!
//! # Responsibility
//! - Define the canonical task record and the ordered collection that owns it.
//! - Define the transient view filter used by list projections.
//!
//! # Invariants
//! - Every task is identified by a stable, never reused `TaskId`.
//! - A collection value is immutable; mutations produce a new value.

pub mod collection;
pub mod filter;
pub mod task;
