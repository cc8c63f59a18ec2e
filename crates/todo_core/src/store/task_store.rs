//! Pure task list operations.
//!
//! # Responsibility
//! - Implement add/toggle/edit/remove/clear-completed over an immutable
//!   collection value.
//! - Provide read-only filtered projections and counters.
//!
//! # Invariants
//! - Ids stay unique across the collection.
//! - Task text is never set to an empty or whitespace-only value.
//! - New tasks are prepended; every other operation preserves order.
//! - Unknown ids and blank text are silent no-ops, never errors.

use crate::model::collection::TaskCollection;
use crate::model::filter::FilterState;
use crate::model::task::Task;

/// Prepends a new active task built from `raw_text`.
///
/// No-op when the trimmed text is empty, or when `new_id` is empty or
/// already taken.
pub fn add(collection: &TaskCollection, raw_text: &str, new_id: &str, now: i64) -> TaskCollection {
    let trimmed = raw_text.trim();
    if trimmed.is_empty() || new_id.is_empty() || collection.contains_id(new_id) {
        return collection.clone();
    }

    std::iter::once(Task::new(new_id, trimmed, now))
        .chain(collection.iter().cloned())
        .collect()
}

/// Inverts `completed` on the task with `id`.
pub fn toggle(collection: &TaskCollection, id: &str) -> TaskCollection {
    replace_at(collection, id, Task::toggled)
}

/// Replaces the text of the task with `id`.
///
/// No-op when the trimmed text is empty or equals the current text, so
/// callers do not persist unchanged state.
pub fn edit(collection: &TaskCollection, id: &str, raw_text: &str) -> TaskCollection {
    let trimmed = raw_text.trim();
    if trimmed.is_empty() {
        return collection.clone();
    }
    match find(collection, id) {
        Some(task) if task.text != trimmed => {
            replace_at(collection, id, |task| task.with_text(trimmed))
        }
        _ => collection.clone(),
    }
}

/// Drops the task with `id`.
pub fn remove(collection: &TaskCollection, id: &str) -> TaskCollection {
    if !collection.contains_id(id) {
        return collection.clone();
    }
    collection
        .iter()
        .filter(|task| task.id != id)
        .cloned()
        .collect()
}

/// Drops every completed task, keeping the relative order of the rest.
pub fn clear_completed(collection: &TaskCollection) -> TaskCollection {
    if collection.iter().all(Task::is_active) {
        return collection.clone();
    }
    collection
        .iter()
        .filter(|task| task.is_active())
        .cloned()
        .collect()
}

/// Returns the tasks visible under `filter`, in collection order.
pub fn view(collection: &TaskCollection, filter: FilterState) -> Vec<&Task> {
    collection
        .iter()
        .filter(|task| match filter {
            FilterState::All => true,
            FilterState::Active => !task.completed,
            FilterState::Completed => task.completed,
        })
        .collect()
}

pub fn active_count(collection: &TaskCollection) -> usize {
    collection.iter().filter(|task| task.is_active()).count()
}

pub fn completed_count(collection: &TaskCollection) -> usize {
    collection.len() - active_count(collection)
}

pub fn find<'a>(collection: &'a TaskCollection, id: &str) -> Option<&'a Task> {
    collection.iter().find(|task| task.id == id)
}

fn replace_at(
    collection: &TaskCollection,
    id: &str,
    update: impl FnOnce(&Task) -> Task,
) -> TaskCollection {
    let Some(index) = collection.position(id) else {
        return collection.clone();
    };

    let mut tasks = collection.to_vec();
    tasks[index] = update(&collection[index]);
    TaskCollection::from(tasks)
}

#[cfg(test)]
mod tests {
    use super::{add, clear_completed, edit, remove, toggle};
    use crate::model::collection::TaskCollection;

    #[test]
    fn no_ops_return_the_same_snapshot() {
        let base = add(&TaskCollection::empty(), "one", "a", 1);

        assert!(add(&base, "   ", "b", 2).is_same(&base));
        assert!(add(&base, "dup", "a", 2).is_same(&base));
        assert!(add(&base, "no id", "", 2).is_same(&base));
        assert!(toggle(&base, "missing").is_same(&base));
        assert!(edit(&base, "a", " one ").is_same(&base));
        assert!(edit(&base, "a", "\n").is_same(&base));
        assert!(remove(&base, "missing").is_same(&base));
        assert!(clear_completed(&base).is_same(&base));
    }

    #[test]
    fn mutations_produce_new_snapshots() {
        let base = add(&TaskCollection::empty(), "one", "a", 1);

        let toggled = toggle(&base, "a");
        assert!(!toggled.is_same(&base));
        assert!(!base[0].completed, "prior snapshot must not change");
        assert!(toggled[0].completed);
    }
}
