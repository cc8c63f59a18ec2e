//! Task list persistence with corruption recovery.
//!
//! # Responsibility
//! - Write the task collection to one fixed key as a JSON array.
//! - Hydrate the collection at startup, repairing whatever the slot holds.
//!
//! # Invariants
//! - `save`, `load` and `clear` never fail and never panic.
//! - `load` rewrites the slot only when records were dropped, so a kept
//!   record with an unreadable `createdAt` stays as stored.
//! - Record order in the slot is collection order.

use crate::model::collection::TaskCollection;
use crate::model::task::Task;
use crate::persist::kv::KeyValueStore;
use log::{debug, warn};
use serde_json::Value;
use std::collections::HashSet;

/// Slot name used when no key is configured.
pub const DEFAULT_STORAGE_KEY: &str = "todo.tasks.v1";

/// Bridges `TaskCollection` to a `KeyValueStore` slot.
pub struct PersistenceGateway<S: KeyValueStore> {
    store: S,
    key: String,
}

impl<S: KeyValueStore> PersistenceGateway<S> {
    pub fn new(store: S) -> Self {
        Self::with_key(store, DEFAULT_STORAGE_KEY)
    }

    pub fn with_key(store: S, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Writes `collection` to the slot.
    ///
    /// Failures are logged as warnings and dropped; there is no retry.
    pub fn save(&self, collection: &TaskCollection) {
        let encoded = match serde_json::to_string(collection) {
            Ok(encoded) => encoded,
            Err(err) => {
                warn!(
                    "event=tasks_save module=persist status=error key={} error_code=encode_failed error={}",
                    self.key, err
                );
                return;
            }
        };

        match self.store.set(&self.key, &encoded) {
            Ok(()) => debug!(
                "event=tasks_save module=persist status=ok key={} count={} bytes={}",
                self.key,
                collection.len(),
                encoded.len()
            ),
            Err(err) => warn!(
                "event=tasks_save module=persist status=error key={} count={} error_code={} error={}",
                self.key,
                collection.len(),
                err.code(),
                err
            ),
        }
    }

    /// Reads the slot and returns the recovered collection.
    ///
    /// # Recovery
    /// - Missing or empty slot: empty collection, slot untouched.
    /// - Store read failure: empty collection, slot untouched.
    /// - Not JSON, or JSON but not an array: slot cleared, empty collection.
    /// - Array with invalid records: invalid records dropped and the
    ///   cleaned array written back.
    pub fn load(&self) -> TaskCollection {
        let raw = match self.store.get(&self.key) {
            Ok(Some(raw)) if !raw.is_empty() => raw,
            Ok(_) => {
                debug!(
                    "event=tasks_load module=persist status=ok key={} count=0 source=missing",
                    self.key
                );
                return TaskCollection::empty();
            }
            Err(err) => {
                warn!(
                    "event=tasks_load module=persist status=error key={} error_code={} error={}",
                    self.key,
                    err.code(),
                    err
                );
                return TaskCollection::empty();
            }
        };

        let records = match serde_json::from_str::<Value>(&raw) {
            Ok(Value::Array(records)) => records,
            Ok(other) => return self.discard_corrupt("not_array", json_kind(&other)),
            Err(err) => return self.discard_corrupt("invalid_json", &err.to_string()),
        };

        let total = records.len();
        let collection = sanitize_records(&records);
        let dropped = total - collection.len();

        if dropped > 0 {
            warn!(
                "event=tasks_load module=persist status=recovered key={} kept={} dropped={}",
                self.key,
                collection.len(),
                dropped
            );
            self.save(&collection);
        } else {
            debug!(
                "event=tasks_load module=persist status=ok key={} count={}",
                self.key,
                collection.len()
            );
        }

        collection
    }

    /// Removes the slot. Failures are logged and dropped.
    pub fn clear(&self) {
        if let Err(err) = self.store.remove(&self.key) {
            warn!(
                "event=tasks_clear module=persist status=error key={} error_code={} error={}",
                self.key,
                err.code(),
                err
            );
        }
    }

    fn discard_corrupt(&self, reason: &str, details: &str) -> TaskCollection {
        warn!(
            "event=tasks_load module=persist status=recovered key={} error_code={} error={} action=reset",
            self.key, reason, details
        );
        self.clear();
        TaskCollection::empty()
    }
}

/// Keeps records that match the task shape, in their stored order.
///
/// A record is kept when `id` is a non-empty string not seen earlier,
/// `text` is a non-blank string and `completed` is a boolean. `createdAt`
/// is optional and ignored unless it is an integer.
fn sanitize_records(records: &[Value]) -> TaskCollection {
    let mut seen_ids = HashSet::new();
    records
        .iter()
        .filter_map(parse_task_record)
        .filter(|task| seen_ids.insert(task.id.clone()))
        .collect()
}

fn parse_task_record(value: &Value) -> Option<Task> {
    let record = value.as_object()?;
    let task = Task {
        id: record.get("id")?.as_str()?.to_string(),
        text: record.get("text")?.as_str()?.to_string(),
        completed: record.get("completed")?.as_bool()?,
        created_at: record.get("createdAt").and_then(Value::as_i64),
    };
    task.validate().ok()?;
    Some(task)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
