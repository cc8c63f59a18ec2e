//! Core domain logic for the to-do list.
//! This crate is the single source of truth for task list invariants.

pub mod logging;
pub mod model;
pub mod persist;
pub mod service;
pub mod store;

pub use logging::{default_log_level, init_logging, logging_status};
pub use model::collection::TaskCollection;
pub use model::filter::{FilterParseError, FilterState};
pub use model::task::{Task, TaskId, TaskValidationError};
pub use persist::gateway::{PersistenceGateway, DEFAULT_STORAGE_KEY};
pub use persist::kv::{KeyValueStore, StoreError, StoreResult};
pub use persist::memory::MemoryStore;
pub use persist::sqlite_kv::SqliteKvStore;
pub use service::id_gen::{IdGenerator, UuidIdGenerator};
pub use service::task_service::TaskSession;

pub use mockable::{Clock, DefaultClock};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
