//! SQLite-backed key-value store.
//!
//! # Responsibility
//! - Open file or in-memory databases and bring the slot schema up to date.
//! - Persist string slots in the `kv_entries` table.
//!
//! # Invariants
//! - No slot is read or written before `schema::ensure_schema` succeeds.
//! - `set` is an upsert; `remove` of an absent key succeeds.

use crate::persist::kv::{KeyValueStore, StoreResult};
use crate::persist::schema::ensure_schema;
use log::{error, info};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::time::{Duration, Instant};

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Key-value store owning one SQLite connection.
pub struct SqliteKvStore {
    conn: Connection,
}

impl SqliteKvStore {
    /// Opens (creating when missing) a database file.
    ///
    /// # Side effects
    /// - Upgrades the slot schema when the file is older than this build.
    /// - Emits `kv_open` logging events with duration and status.
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        Self::open_with("file", || Connection::open(path))
    }

    pub fn open_in_memory() -> StoreResult<Self> {
        Self::open_with("memory", Connection::open_in_memory)
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    fn open_with(
        mode: &'static str,
        connect: impl FnOnce() -> rusqlite::Result<Connection>,
    ) -> StoreResult<Self> {
        let started_at = Instant::now();
        match bootstrap(connect) {
            Ok((conn, from_version)) => {
                info!(
                    "event=kv_open module=persist status=ok mode={} from_version={} duration_ms={}",
                    mode,
                    from_version,
                    started_at.elapsed().as_millis()
                );
                Ok(Self { conn })
            }
            Err(err) => {
                error!(
                    "event=kv_open module=persist status=error mode={} duration_ms={} error_code={} error={}",
                    mode,
                    started_at.elapsed().as_millis(),
                    err.code(),
                    err
                );
                Err(err)
            }
        }
    }
}

fn bootstrap(
    connect: impl FnOnce() -> rusqlite::Result<Connection>,
) -> StoreResult<(Connection, u32)> {
    let mut conn = connect()?;
    conn.busy_timeout(BUSY_TIMEOUT)?;
    let from_version = ensure_schema(&mut conn)?;
    Ok((conn, from_version))
}

impl KeyValueStore for SqliteKvStore {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM kv_entries WHERE key = ?1;",
                [key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        self.conn.execute(
            "INSERT INTO kv_entries (key, value)
             VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = (strftime('%s', 'now') * 1000);",
            params![key, value],
        )?;
        Ok(())
    }

    fn remove(&self, key: &str) -> StoreResult<()> {
        self.conn
            .execute("DELETE FROM kv_entries WHERE key = ?1;", [key])?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::SqliteKvStore;
    use crate::persist::kv::KeyValueStore;

    #[test]
    fn upsert_and_remove() {
        let store = SqliteKvStore::open_in_memory().expect("in-memory store should open");
        assert_eq!(store.get("slot").expect("get should succeed"), None);

        store.set("slot", "[]").expect("insert should succeed");
        store.set("slot", "[1]").expect("upsert should succeed");
        assert_eq!(
            store.get("slot").expect("get should succeed").as_deref(),
            Some("[1]")
        );

        let rows: i64 = store
            .connection()
            .query_row("SELECT COUNT(*) FROM kv_entries;", [], |row| row.get(0))
            .expect("count query should succeed");
        assert_eq!(rows, 1);

        store.remove("slot").expect("remove should succeed");
        store.remove("slot").expect("removing an absent key should succeed");
        assert_eq!(store.get("slot").expect("get should succeed"), None);
    }
}
