//! Key-value store contract.
//!
//! # Responsibility
//! - Describe the minimal `get`/`set`/`remove` surface over string slots.
//! - Carry backend failures as one typed error.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub type StoreResult<T> = Result<T, StoreError>;

/// Failure reported by a key-value backend.
#[derive(Debug)]
pub enum StoreError {
    Sqlite(rusqlite::Error),
    /// SQLite file was written by a build with a newer slot schema.
    UnsupportedSchemaVersion {
        db_version: u32,
        latest_supported: u32,
    },
    /// Backend cannot be reached (closed, poisoned, switched off).
    Unavailable(String),
    /// Write would exceed the backend size limit.
    QuotaExceeded {
        key: String,
        requested_bytes: usize,
        quota_bytes: usize,
    },
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "{err}"),
            Self::UnsupportedSchemaVersion {
                db_version,
                latest_supported,
            } => write!(
                f,
                "slot schema version {db_version} is newer than supported {latest_supported}"
            ),
            Self::Unavailable(message) => write!(f, "store unavailable: {message}"),
            Self::QuotaExceeded {
                key,
                requested_bytes,
                quota_bytes,
            } => write!(
                f,
                "quota exceeded writing `{key}`: {requested_bytes} bytes requested, {quota_bytes} allowed"
            ),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            Self::UnsupportedSchemaVersion { .. }
            | Self::Unavailable(_)
            | Self::QuotaExceeded { .. } => None,
        }
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}

impl StoreError {
    /// Short stable code used in structured log lines.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Sqlite(_) => "store_sqlite_error",
            Self::UnsupportedSchemaVersion { .. } => "store_schema_too_new",
            Self::Unavailable(_) => "store_unavailable",
            Self::QuotaExceeded { .. } => "store_quota_exceeded",
        }
    }
}

/// String slot storage used by the persistence gateway.
pub trait KeyValueStore {
    /// Returns the stored value, or `None` when the key is absent.
    fn get(&self, key: &str) -> StoreResult<Option<String>>;
    /// Inserts or overwrites the value for `key`.
    fn set(&self, key: &str, value: &str) -> StoreResult<()>;
    /// Deletes `key`; removing an absent key succeeds.
    fn remove(&self, key: &str) -> StoreResult<()>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for &S {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> StoreResult<()> {
        (**self).remove(key)
    }
}
