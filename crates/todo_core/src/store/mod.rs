//! Task list state transitions.
//!
//! # Responsibility
//! - Provide pure mutation and projection functions over `TaskCollection`.
//!
//! # Invariants
//! - Functions never fail; bad arguments degrade to no-ops.
//! - A no-op returns the input snapshot itself (`is_same` holds).

pub mod task_store;
