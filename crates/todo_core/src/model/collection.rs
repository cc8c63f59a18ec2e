//! Immutable ordered task collection.
//!
//! # Responsibility
//! - Hold the single source of truth for the task list.
//! - Let callers keep prior snapshots without aliasing later mutations.
//!
//! # Invariants
//! - Contents never change after construction.
//! - Order is list position; index 0 is the newest task.

use crate::model::task::Task;
use serde::{Serialize, Serializer};
use std::ops::Deref;
use std::sync::Arc;

/// Shared, immutable snapshot of the task list.
///
/// Cloning is a reference-count bump. Store operations that turn out to be
/// no-ops hand back a clone of their input, so `is_same` can tell an
/// effective mutation from a no-op without comparing elements.
#[derive(Debug, Clone)]
pub struct TaskCollection {
    tasks: Arc<[Task]>,
}

impl TaskCollection {
    pub fn empty() -> Self {
        Self::from(Vec::new())
    }

    pub fn as_slice(&self) -> &[Task] {
        &self.tasks
    }

    /// Returns whether both handles point at the same snapshot.
    pub fn is_same(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.tasks, &other.tasks)
    }

    pub fn contains_id(&self, id: &str) -> bool {
        self.tasks.iter().any(|task| task.id == id)
    }

    pub fn position(&self, id: &str) -> Option<usize> {
        self.tasks.iter().position(|task| task.id == id)
    }

    pub fn to_vec(&self) -> Vec<Task> {
        self.tasks.to_vec()
    }
}

impl Default for TaskCollection {
    fn default() -> Self {
        Self::empty()
    }
}

impl From<Vec<Task>> for TaskCollection {
    fn from(value: Vec<Task>) -> Self {
        Self {
            tasks: Arc::from(value),
        }
    }
}

impl FromIterator<Task> for TaskCollection {
    fn from_iter<I: IntoIterator<Item = Task>>(iter: I) -> Self {
        Self {
            tasks: iter.into_iter().collect(),
        }
    }
}

impl Deref for TaskCollection {
    type Target = [Task];

    fn deref(&self) -> &Self::Target {
        &self.tasks
    }
}

impl<'a> IntoIterator for &'a TaskCollection {
    type Item = &'a Task;
    type IntoIter = std::slice::Iter<'a, Task>;

    fn into_iter(self) -> Self::IntoIter {
        self.tasks.iter()
    }
}

impl PartialEq for TaskCollection {
    fn eq(&self, other: &Self) -> bool {
        self.is_same(other) || self.tasks[..] == other.tasks[..]
    }
}

impl Eq for TaskCollection {}

impl Serialize for TaskCollection {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.tasks.serialize(serializer)
    }
}
