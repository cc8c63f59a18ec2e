//! Durable storage boundary for the task list.
//!
//! # Responsibility
//! - Define the key-value seam the core persists through.
//! - Provide in-memory and SQLite-backed implementations.
//! - Translate task collections to and from the stored encoding, repairing
//!   corrupt slots on load.
//!
//! # Invariants
//! - Persistence failures never reach callers of the gateway.
//! - A load rewrites the slot only when records were dropped, and clears it
//!   only when it is not a JSON array.

pub mod gateway;
pub mod kv;
pub mod memory;
pub mod schema;
pub mod sqlite_kv;
