//! Slot table schema for the SQLite key-value store.
//!
//! # Responsibility
//! - Bring a connection's `kv_entries` table up to the layout this build
//!   reads and writes.
//!
//! # Invariants
//! - The schema version lives in `PRAGMA user_version` and only grows.
//! - A file stamped with a newer version is refused, never downgraded.
//! - Upgrades run in one transaction; a failed step leaves the file as it was.

use crate::persist::kv::{StoreError, StoreResult};
use log::info;
use rusqlite::Connection;

/// Ordered `(version, sql)` upgrade steps.
const SCHEMA_STEPS: &[(u32, &str)] = &[(1, include_str!("0001_kv_entries.sql"))];

/// Returns the slot schema version written by this build.
pub fn latest_version() -> u32 {
    SCHEMA_STEPS.last().map_or(0, |(version, _)| *version)
}

/// Returns the version stamped on `conn`, `0` for a fresh database.
pub fn schema_version(conn: &Connection) -> StoreResult<u32> {
    Ok(conn.query_row("PRAGMA user_version;", [], |row| row.get::<_, u32>(0))?)
}

/// Upgrades `conn` to `latest_version()` and returns the version it started at.
///
/// # Errors
/// - `UnsupportedSchemaVersion` when the file comes from a newer build.
/// - `Sqlite` when an upgrade step fails.
pub fn ensure_schema(conn: &mut Connection) -> StoreResult<u32> {
    let found = schema_version(conn)?;
    let latest = latest_version();

    if found > latest {
        return Err(StoreError::UnsupportedSchemaVersion {
            db_version: found,
            latest_supported: latest,
        });
    }
    if found == latest {
        return Ok(found);
    }

    let tx = conn.transaction()?;
    for (version, sql) in SCHEMA_STEPS.iter().filter(|(version, _)| *version > found) {
        tx.execute_batch(sql)?;
        tx.pragma_update(None, "user_version", version)?;
    }
    tx.commit()?;

    info!(
        "event=kv_schema_upgrade module=persist status=ok from_version={} to_version={}",
        found, latest
    );
    Ok(found)
}

#[cfg(test)]
mod tests {
    use super::{ensure_schema, latest_version, schema_version};
    use rusqlite::Connection;

    #[test]
    fn fresh_connection_is_upgraded_once() {
        let mut conn = Connection::open_in_memory().expect("in-memory sqlite should open");

        assert_eq!(ensure_schema(&mut conn).expect("first upgrade should succeed"), 0);
        assert_eq!(
            schema_version(&conn).expect("version should be readable"),
            latest_version()
        );
        assert_eq!(
            ensure_schema(&mut conn).expect("second upgrade should be a no-op"),
            latest_version()
        );
    }
}
