use todo_core::{
    Clock, DefaultClock, FilterState, KeyValueStore, MemoryStore, PersistenceGateway, TaskSession,
    DEFAULT_STORAGE_KEY,
};

fn sequential_ids() -> impl FnMut() -> String {
    let mut next = 0;
    move || {
        next += 1;
        format!("task-{next}")
    }
}

fn open(store: &MemoryStore) -> TaskSession<&MemoryStore, impl FnMut() -> String, DefaultClock> {
    TaskSession::open(PersistenceGateway::new(store), sequential_ids(), DefaultClock)
}

fn stored(store: &MemoryStore) -> Option<String> {
    store
        .get(DEFAULT_STORAGE_KEY)
        .expect("memory store read should succeed")
}

fn now_millis() -> i64 {
    DefaultClock.utc().timestamp_millis()
}

#[test]
fn session_persists_effective_mutations_and_reloads() {
    let store = MemoryStore::new();
    let started = now_millis();
    {
        let mut session = open(&store);
        assert_eq!(session.add("  water plants "), Some("task-1".to_string()));
        assert_eq!(session.add("pay rent"), Some("task-2".to_string()));
        assert!(session.toggle("task-1"));
        assert!(session.edit("task-2", "pay rent today"));
    }

    let reopened = open(&store);
    let tasks = reopened.tasks();
    assert_eq!(tasks.len(), 2);
    assert_eq!(tasks[0].id, "task-2");
    assert_eq!(tasks[0].text, "pay rent today");
    assert_eq!(tasks[1].text, "water plants");
    assert!(tasks[1].completed);
    let created = tasks[1].created_at.expect("added task should carry createdAt");
    assert!(created >= started && created <= now_millis());
}

#[test]
fn no_ops_do_not_write() {
    let store = MemoryStore::new();
    let mut session = open(&store);
    session.add("one");
    let before = stored(&store);

    store.set_fail_writes(true);
    assert_eq!(session.add("   "), None);
    assert!(!session.toggle("missing"));
    assert!(!session.edit("task-1", " one "));
    assert!(!session.remove("missing"));
    assert_eq!(session.clear_completed(), 0);
    store.set_fail_writes(false);

    assert_eq!(stored(&store), before);
}

#[test]
fn blank_add_does_not_consume_an_id() {
    let store = MemoryStore::new();
    let mut session = open(&store);
    assert_eq!(session.add(""), None);
    assert_eq!(session.add("real"), Some("task-1".to_string()));
}

#[test]
fn save_failures_leave_memory_state_intact() {
    let store = MemoryStore::new();
    let mut session = open(&store);

    store.set_fail_writes(true);
    assert!(session.add("offline task").is_some());
    assert_eq!(session.tasks().len(), 1);
    assert_eq!(stored(&store), None);

    store.set_fail_writes(false);
    assert!(session.add("back online").is_some());
    assert_eq!(open(&store).tasks().len(), 2);
}

#[test]
fn filter_drives_visible_tasks() {
    let store = MemoryStore::new();
    let mut session = open(&store);
    session.add("a");
    session.add("b");
    session.add("c");
    session.toggle("task-2");

    assert_eq!(session.filter(), FilterState::All);
    assert_eq!(session.visible().len(), 3);

    session.set_filter(FilterState::Active);
    let active: Vec<&str> = session.visible().iter().map(|task| task.id.as_str()).collect();
    assert_eq!(active, vec!["task-3", "task-1"]);

    session.set_filter(FilterState::Completed);
    let done: Vec<&str> = session.visible().iter().map(|task| task.id.as_str()).collect();
    assert_eq!(done, vec!["task-2"]);

    assert_eq!(session.active_count(), 2);
    assert_eq!(session.completed_count(), 1);
}

#[test]
fn clear_completed_reports_removed_count_and_persists() {
    let store = MemoryStore::new();
    let mut session = open(&store);
    session.add("a");
    session.add("b");
    session.add("c");
    session.toggle("task-1");
    session.toggle("task-3");

    assert_eq!(session.clear_completed(), 2);
    assert_eq!(session.clear_completed(), 0);
    let reloaded = open(&store).tasks();
    assert_eq!(reloaded.len(), 1);
    assert_eq!(reloaded[0].id, "task-2");
}

#[test]
fn remove_and_find() {
    let store = MemoryStore::new();
    let mut session = open(&store);
    session.add("a");
    assert!(session.find("task-1").is_some());
    assert!(session.remove("task-1"));
    assert!(session.find("task-1").is_none());
    assert!(!session.remove("task-1"));
}

#[test]
fn snapshots_are_not_affected_by_later_mutations() {
    let store = MemoryStore::new();
    let mut session = open(&store);
    session.add("a");
    let snapshot = session.tasks();
    session.toggle("task-1");
    session.add("b");

    assert_eq!(snapshot.len(), 1);
    assert!(!snapshot[0].completed);
}

#[test]
fn open_repairs_corrupt_slot() {
    let store = MemoryStore::new();
    store
        .set(DEFAULT_STORAGE_KEY, "{ bad json")
        .expect("seeding the slot should succeed");

    let session = open(&store);
    assert!(session.tasks().is_empty());
    assert_eq!(stored(&store), None);
}

#[test]
fn reset_clears_memory_and_slot() {
    let store = MemoryStore::new();
    let mut session = open(&store);
    session.add("a");
    session.reset();

    assert!(session.tasks().is_empty());
    assert_eq!(stored(&store), None);
}

#[test]
fn clock_is_read_per_add() {
    let store = MemoryStore::new();
    let mut session = open(&store);
    let before = now_millis();
    session.add("first");
    session.add("second");
    let after = now_millis();

    let tasks = session.tasks();
    let first = tasks[1].created_at.expect("first task should carry createdAt");
    let second = tasks[0].created_at.expect("second task should carry createdAt");
    assert!(before <= first && first <= second && second <= after);
}

#[test]
fn default_session_uses_uuid_ids() {
    let store = MemoryStore::new();
    let mut session = TaskSession::open_default(PersistenceGateway::new(&store));
    let id = session.add("uuid backed").expect("non-blank add should return an id");
    assert_eq!(id.len(), 36);
    assert!(session.tasks()[0]
        .created_at
        .is_some_and(|created| created > 0));
}
