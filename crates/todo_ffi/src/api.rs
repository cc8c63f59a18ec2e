//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose the task list session to Dart via FRB as sync calls.
//! - Keep error semantics simple: envelopes with `ok` and a message.
//!
//! # Invariants
//! - Exported functions must not panic across FFI boundary.
//! - One session per process; storage is loaded once, on first use.

use log::warn;
use std::path::PathBuf;
use std::sync::{Mutex, OnceLock, PoisonError};
use todo_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, ping as ping_inner,
    FilterState, PersistenceGateway, SqliteKvStore, Task, TaskSession,
};

const STORE_DB_FILE_NAME: &str = "todo_tasks.sqlite3";
const STORE_PATH_ENV: &str = "TODO_DB_PATH";

type FfiSession = TaskSession<SqliteKvStore>;

static STORE_PATH: OnceLock<PathBuf> = OnceLock::new();
static SESSION: Mutex<Option<FfiSession>> = Mutex::new(None);

/// Minimal health-check API for FRB smoke integration.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Safe to call repeatedly with the same `level + log_dir` (idempotent).
/// - Never panics; returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// Pins the SQLite file backing the task session.
///
/// Must run before the first task call; afterwards only the already
/// active path is accepted. Falls back to `TODO_DB_PATH`, then to a file
/// in the system temp directory, when never called.
///
/// # FFI contract
/// - Never panics; returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn configure_store_path(path: String) -> String {
    let trimmed = path.trim();
    if trimmed.is_empty() {
        return "store path cannot be empty".to_string();
    }

    let requested = PathBuf::from(trimmed);
    let active = STORE_PATH.get_or_init(|| requested.clone());
    if *active == requested {
        String::new()
    } else {
        format!(
            "store path already set to `{}`; refusing to switch to `{}`",
            active.display(),
            requested.display()
        )
    }
}

/// One task row for list rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskItem {
    pub id: String,
    pub text: String,
    pub completed: bool,
    /// Creation time in epoch milliseconds, when known.
    pub created_at: Option<i64>,
}

/// List response envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskListResponse {
    pub ok: bool,
    /// Tasks under `filter`, newest first.
    pub items: Vec<TaskItem>,
    /// Count of not-completed tasks across the whole list.
    pub active_count: u32,
    /// Applied filter (`all|active|completed`).
    pub filter: String,
    /// Human-readable response message for diagnostics.
    pub message: String,
}

/// Generic action response envelope for task mutations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskActionResponse {
    /// Whether the call reached the session.
    pub ok: bool,
    /// Whether the list actually changed.
    pub changed: bool,
    /// Created task ID for `task_add`; target ID otherwise.
    pub task_id: Option<String>,
    pub message: String,
}

impl TaskActionResponse {
    fn applied(changed: bool, task_id: Option<String>, message: impl Into<String>) -> Self {
        Self {
            ok: true,
            changed,
            task_id,
            message: message.into(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            changed: false,
            task_id: None,
            message: message.into(),
        }
    }
}

/// Lists tasks, optionally switching the session filter first.
///
/// # FFI contract
/// - `filter = None` keeps the current session filter.
/// - Unknown filter names fail without changing the session filter.
/// - Never panics.
#[flutter_rust_bridge::frb(sync)]
pub fn tasks_list(filter: Option<String>) -> TaskListResponse {
    let requested = match filter.as_deref().map(str::parse::<FilterState>) {
        Some(Ok(parsed)) => Some(parsed),
        Some(Err(err)) => return list_failure(format!("tasks_list failed: {err}")),
        None => None,
    };

    let outcome = with_session(|session| {
        if let Some(parsed) = requested {
            session.set_filter(parsed);
        }
        let items = session
            .visible()
            .into_iter()
            .map(to_task_item)
            .collect::<Vec<_>>();
        (items, session.active_count(), session.filter())
    });

    match outcome {
        Ok((items, active_count, applied)) => {
            let message = if items.is_empty() {
                "No tasks.".to_string()
            } else {
                format!("{} task(s).", items.len())
            };
            TaskListResponse {
                ok: true,
                items,
                active_count: saturating_u32(active_count),
                filter: applied.as_str().to_string(),
                message,
            }
        }
        Err(err) => list_failure(format!("tasks_list failed: {err}")),
    }
}

/// Adds a task; blank text is accepted as a no-op.
#[flutter_rust_bridge::frb(sync)]
pub fn task_add(text: String) -> TaskActionResponse {
    match with_session(|session| session.add(&text)) {
        Ok(Some(task_id)) => TaskActionResponse::applied(true, Some(task_id), "Task added."),
        Ok(None) => TaskActionResponse::applied(false, None, "Nothing to add."),
        Err(err) => TaskActionResponse::failure(format!("task_add failed: {err}")),
    }
}

/// Flips completion of one task; unknown IDs are no-ops.
#[flutter_rust_bridge::frb(sync)]
pub fn task_toggle(id: String) -> TaskActionResponse {
    mutate_one("task_toggle", id, "Task toggled.", |session, id| {
        session.toggle(id)
    })
}

/// Replaces task text; blank or unchanged text is a no-op.
#[flutter_rust_bridge::frb(sync)]
pub fn task_edit(id: String, text: String) -> TaskActionResponse {
    mutate_one("task_edit", id, "Task updated.", |session, id| {
        session.edit(id, &text)
    })
}

/// Deletes one task; unknown IDs are no-ops.
#[flutter_rust_bridge::frb(sync)]
pub fn task_delete(id: String) -> TaskActionResponse {
    mutate_one("task_delete", id, "Task deleted.", |session, id| {
        session.remove(id)
    })
}

/// Removes every completed task.
#[flutter_rust_bridge::frb(sync)]
pub fn tasks_clear_completed() -> TaskActionResponse {
    match with_session(|session| session.clear_completed()) {
        Ok(removed) => TaskActionResponse::applied(
            removed > 0,
            None,
            format!("Cleared {removed} completed task(s)."),
        ),
        Err(err) => TaskActionResponse::failure(format!("tasks_clear_completed failed: {err}")),
    }
}

/// Count of not-completed tasks; `0` when the store cannot be opened.
#[flutter_rust_bridge::frb(sync)]
pub fn tasks_active_count() -> u32 {
    with_session(|session| saturating_u32(session.active_count())).unwrap_or(0)
}

fn mutate_one(
    operation: &str,
    id: String,
    changed_message: &str,
    apply: impl FnOnce(&mut FfiSession, &str) -> bool,
) -> TaskActionResponse {
    match with_session(|session| apply(session, id.as_str())) {
        Ok(true) => TaskActionResponse::applied(true, Some(id), changed_message),
        Ok(false) => TaskActionResponse::applied(false, Some(id), "No change."),
        Err(err) => TaskActionResponse::failure(format!("{operation} failed: {err}")),
    }
}

fn with_session<T>(f: impl FnOnce(&mut FfiSession) -> T) -> Result<T, String> {
    let mut guard = SESSION.lock().unwrap_or_else(PoisonError::into_inner);
    if let Some(session) = guard.as_mut() {
        return Ok(f(session));
    }

    let path = resolve_store_path();
    let store = SqliteKvStore::open(&path).map_err(|err| {
        warn!(
            "event=ffi_session_open module=ffi status=error path={} error={}",
            path.display(),
            err
        );
        format!("task store open failed: {err}")
    })?;
    let session = guard.insert(TaskSession::open_default(PersistenceGateway::new(store)));
    Ok(f(session))
}

fn resolve_store_path() -> PathBuf {
    STORE_PATH
        .get_or_init(|| {
            if let Ok(raw) = std::env::var(STORE_PATH_ENV) {
                let trimmed = raw.trim();
                if !trimmed.is_empty() {
                    return PathBuf::from(trimmed);
                }
            }
            std::env::temp_dir().join(STORE_DB_FILE_NAME)
        })
        .clone()
}

fn list_failure(message: String) -> TaskListResponse {
    TaskListResponse {
        ok: false,
        items: Vec::new(),
        active_count: 0,
        filter: FilterState::default().as_str().to_string(),
        message,
    }
}

fn to_task_item(task: &Task) -> TaskItem {
    TaskItem {
        id: task.id.clone(),
        text: task.text.clone(),
        completed: task.completed,
        created_at: task.created_at,
    }
}

fn saturating_u32(value: usize) -> u32 {
    u32::try_from(value).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::{
        configure_store_path, core_version, init_logging, ping, resolve_store_path, task_add,
        task_delete, task_edit, task_toggle, tasks_active_count, tasks_clear_completed,
        tasks_list,
    };
    use std::sync::{Mutex, MutexGuard, PoisonError};
    use std::time::{SystemTime, UNIX_EPOCH};
    use todo_core::DEFAULT_STORAGE_KEY;

    static SERIAL: Mutex<()> = Mutex::new(());

    fn serial_session() -> MutexGuard<'static, ()> {
        let guard = SERIAL.lock().unwrap_or_else(PoisonError::into_inner);
        let path = std::env::temp_dir().join(format!("todo-ffi-test-{}.sqlite3", std::process::id()));
        let error = configure_store_path(path.display().to_string());
        assert!(error.is_empty(), "{error}");
        guard
    }

    fn unique_token(prefix: &str) -> String {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("time went backwards")
            .as_nanos();
        format!("{prefix}-{nanos}")
    }

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }

    #[test]
    fn init_logging_rejects_empty_log_dir() {
        let error = init_logging("info".to_string(), String::new());
        assert!(!error.is_empty());
    }

    #[test]
    fn init_logging_rejects_unsupported_level() {
        let error = init_logging("verbose".to_string(), "tmp/logs".to_string());
        assert!(!error.is_empty());
    }

    #[test]
    fn configure_store_path_rejects_blank_and_conflicting_paths() {
        let _guard = serial_session();
        assert!(!configure_store_path("   ".to_string()).is_empty());

        let conflict = configure_store_path("/definitely/another/place.sqlite3".to_string());
        assert!(conflict.contains("refusing to switch"), "{conflict}");
    }

    #[test]
    fn add_then_list_returns_new_task_first() {
        let _guard = serial_session();
        let token = unique_token("ffi-add");

        let created = task_add(format!("  {token}  "));
        assert!(created.ok && created.changed, "{}", created.message);
        let task_id = created.task_id.expect("task_add should return task_id");

        let listed = tasks_list(Some("all".to_string()));
        assert!(listed.ok, "{}", listed.message);
        assert_eq!(listed.filter, "all");
        assert_eq!(listed.items[0].id, task_id);
        assert_eq!(listed.items[0].text, token);
        assert!(!listed.items[0].completed);
        assert!(listed.items[0].created_at.is_some());
    }

    #[test]
    fn blank_add_is_a_successful_no_op() {
        let _guard = serial_session();
        let response = task_add(" \n ".to_string());
        assert!(response.ok);
        assert!(!response.changed);
        assert_eq!(response.task_id, None);
    }

    #[test]
    fn toggle_edit_delete_roundtrip() {
        let _guard = serial_session();
        let created = task_add(unique_token("ffi-flow"));
        let task_id = created.task_id.expect("task_add should return task_id");
        let active_before = tasks_active_count();

        let toggled = task_toggle(task_id.clone());
        assert!(toggled.changed, "{}", toggled.message);
        assert_eq!(tasks_active_count(), active_before - 1);

        let completed = tasks_list(Some("Completed".to_string()));
        assert_eq!(completed.filter, "completed");
        assert!(completed.items.iter().any(|item| item.id == task_id));

        let renamed = unique_token("ffi-renamed");
        assert!(task_edit(task_id.clone(), renamed.clone()).changed);
        assert!(!task_edit(task_id.clone(), renamed.clone()).changed);
        assert!(!task_edit(task_id.clone(), "   ".to_string()).changed);

        let deleted = task_delete(task_id.clone());
        assert!(deleted.changed);
        let again = task_delete(task_id.clone());
        assert!(again.ok && !again.changed);

        let all = tasks_list(Some("all".to_string()));
        assert!(all.items.iter().all(|item| item.id != task_id));
    }

    #[test]
    fn unknown_id_is_a_no_op() {
        let _guard = serial_session();
        let response = task_toggle("no-such-task".to_string());
        assert!(response.ok);
        assert!(!response.changed);
        assert_eq!(response.message, "No change.");
    }

    #[test]
    fn list_rejects_unknown_filter_and_keeps_current_one() {
        let _guard = serial_session();
        let active = tasks_list(Some("active".to_string()));
        assert_eq!(active.filter, "active");

        let rejected = tasks_list(Some("done".to_string()));
        assert!(!rejected.ok);
        assert!(rejected.message.contains("unsupported filter"));

        let current = tasks_list(None);
        assert!(current.ok);
        assert_eq!(current.filter, "active");
        assert!(current.items.iter().all(|item| !item.completed));
        tasks_list(Some("all".to_string()));
    }

    #[test]
    fn clear_completed_persists_to_sqlite() {
        let _guard = serial_session();
        let keep = task_add(unique_token("ffi-keep"))
            .task_id
            .expect("add should return an id");
        let done = task_add(unique_token("ffi-done"))
            .task_id
            .expect("add should return an id");
        task_toggle(done.clone());

        let cleared = tasks_clear_completed();
        assert!(cleared.ok && cleared.changed, "{}", cleared.message);

        let conn = rusqlite::Connection::open(resolve_store_path()).expect("open db");
        let raw: String = conn
            .query_row(
                "SELECT value FROM kv_entries WHERE key = ?1",
                [DEFAULT_STORAGE_KEY],
                |row| row.get(0),
            )
            .expect("query task slot");
        assert!(raw.contains(&keep));
        assert!(!raw.contains(&done));
    }
}
