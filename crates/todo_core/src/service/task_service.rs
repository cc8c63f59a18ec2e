//! Task session service.
//!
//! # Responsibility
//! - Seed the task list from the persistence gateway once per session.
//! - Apply user mutations through `task_store` and persist effective ones.
//! - Hold the transient view filter and expose the filtered projection.
//!
//! # Invariants
//! - `load` runs exactly once, in `open`, before any mutation.
//! - `save` runs once per mutation that changed the list and never for
//!   a no-op.
//! - Persistence failures never change in-memory state.

use crate::model::collection::TaskCollection;
use crate::model::filter::FilterState;
use crate::model::task::{Task, TaskId};
use crate::persist::gateway::PersistenceGateway;
use crate::persist::kv::KeyValueStore;
use crate::service::id_gen::{IdGenerator, UuidIdGenerator};
use crate::store::task_store;
use log::{debug, info};
use mockable::{Clock, DefaultClock};

/// One user session over a persisted task list.
pub struct TaskSession<S, G = UuidIdGenerator, C = DefaultClock>
where
    S: KeyValueStore,
{
    gateway: PersistenceGateway<S>,
    ids: G,
    clock: C,
    tasks: TaskCollection,
    filter: FilterState,
}

impl<S: KeyValueStore> TaskSession<S> {
    /// Opens a session with random UUID ids and the system clock.
    pub fn open_default(gateway: PersistenceGateway<S>) -> Self {
        Self::open(gateway, UuidIdGenerator, DefaultClock)
    }
}

impl<S, G, C> TaskSession<S, G, C>
where
    S: KeyValueStore,
    G: IdGenerator,
    C: Clock,
{
    /// Hydrates the task list from `gateway` and starts on `FilterState::All`.
    pub fn open(gateway: PersistenceGateway<S>, ids: G, clock: C) -> Self {
        let tasks = gateway.load();
        info!(
            "event=session_open module=service status=ok key={} count={}",
            gateway.key(),
            tasks.len()
        );
        Self {
            gateway,
            ids,
            clock,
            tasks,
            filter: FilterState::default(),
        }
    }

    /// Adds a task and returns its id, or `None` when `text` is blank.
    pub fn add(&mut self, text: &str) -> Option<TaskId> {
        if text.trim().is_empty() {
            return None;
        }
        let id = self.ids.next_id();
        let now = self.clock.utc().timestamp_millis();
        let next = task_store::add(&self.tasks, text, &id, now);
        if self.commit("task_add", next) {
            debug!("event=task_add module=service status=ok task_id={id}");
            Some(id)
        } else {
            None
        }
    }

    /// Returns whether a task with `id` existed and was flipped.
    pub fn toggle(&mut self, id: &str) -> bool {
        let next = task_store::toggle(&self.tasks, id);
        self.commit("task_toggle", next)
    }

    /// Returns whether the text actually changed.
    pub fn edit(&mut self, id: &str, text: &str) -> bool {
        let next = task_store::edit(&self.tasks, id, text);
        self.commit("task_edit", next)
    }

    pub fn remove(&mut self, id: &str) -> bool {
        let next = task_store::remove(&self.tasks, id);
        self.commit("task_remove", next)
    }

    /// Removes completed tasks and returns how many were dropped.
    pub fn clear_completed(&mut self) -> usize {
        let before = self.tasks.len();
        let next = task_store::clear_completed(&self.tasks);
        self.commit("tasks_clear_completed", next);
        before - self.tasks.len()
    }

    /// Drops every task and the persisted slot.
    pub fn reset(&mut self) {
        self.tasks = TaskCollection::empty();
        self.gateway.clear();
        info!("event=session_reset module=service status=ok");
    }

    pub fn set_filter(&mut self, filter: FilterState) {
        self.filter = filter;
    }
}

impl<S, G, C> TaskSession<S, G, C>
where
    S: KeyValueStore,
{
    pub fn filter(&self) -> FilterState {
        self.filter
    }

    /// Tasks under the current filter, newest first.
    pub fn visible(&self) -> Vec<&Task> {
        task_store::view(&self.tasks, self.filter)
    }

    /// Current snapshot; later mutations do not affect it.
    pub fn tasks(&self) -> TaskCollection {
        self.tasks.clone()
    }

    pub fn find(&self, id: &str) -> Option<&Task> {
        task_store::find(&self.tasks, id)
    }

    pub fn active_count(&self) -> usize {
        task_store::active_count(&self.tasks)
    }

    pub fn completed_count(&self) -> usize {
        task_store::completed_count(&self.tasks)
    }

    pub fn gateway(&self) -> &PersistenceGateway<S> {
        &self.gateway
    }

    fn commit(&mut self, event: &str, next: TaskCollection) -> bool {
        if next.is_same(&self.tasks) {
            debug!("event={event} module=service status=noop");
            return false;
        }
        self.tasks = next;
        self.gateway.save(&self.tasks);
        true
    }
}
