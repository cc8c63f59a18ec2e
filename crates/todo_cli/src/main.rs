//! CLI driver for the task list.
//!
//! # Responsibility
//! - Provide a small executable that drives `todo_core` against a SQLite
//!   file, for local sanity checks without a UI shell.
//! - Keep output plain and deterministic.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use todo_core::{
    init_logging, FilterState, KeyValueStore, PersistenceGateway, SqliteKvStore, TaskSession,
};

const LOG_DIR_ENV: &str = "TODO_LOG_DIR";
const DEFAULT_DB_FILE_NAME: &str = "todo_tasks.sqlite3";

#[derive(Debug, Parser)]
#[command(name = "todo_cli", about = "Drive the todo task list from a terminal")]
struct Cli {
    /// SQLite file holding the task slot; defaults to the temp dir.
    #[arg(long, env = "TODO_DB_PATH")]
    db: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
enum Command {
    /// Print core liveness and version
    Ping,
    #[command(flatten)]
    Task(TaskCommand),
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
enum TaskCommand {
    /// Add a task
    Add {
        #[arg(required = true, value_name = "TEXT")]
        text: Vec<String>,
    },
    /// List tasks through a filter
    List {
        #[arg(default_value_t = FilterState::All)]
        filter: FilterState,
    },
    /// Flip a task between active and completed
    Toggle { id: String },
    /// Replace a task's text
    Edit {
        id: String,
        #[arg(required = true, value_name = "TEXT")]
        text: Vec<String>,
    },
    /// Delete a task
    #[command(name = "rm")]
    Remove { id: String },
    /// Delete every completed task
    ClearCompleted,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Ok(log_dir) = std::env::var(LOG_DIR_ENV) {
        if let Err(err) = init_logging(todo_core::default_log_level(), &log_dir) {
            eprintln!("logging disabled: {err}");
        }
    }

    let command = match cli.command {
        Command::Ping => {
            println!("todo_core ping={}", todo_core::ping());
            println!("todo_core version={}", todo_core::core_version());
            return ExitCode::SUCCESS;
        }
        Command::Task(command) => command,
    };

    let db_path = cli
        .db
        .filter(|path| !path.as_os_str().is_empty())
        .unwrap_or_else(|| std::env::temp_dir().join(DEFAULT_DB_FILE_NAME));
    let store = match SqliteKvStore::open(&db_path) {
        Ok(store) => store,
        Err(err) => {
            eprintln!("failed to open `{}`: {err}", db_path.display());
            return ExitCode::from(1);
        }
    };

    let mut session = TaskSession::open_default(PersistenceGateway::new(store));
    for line in run(&mut session, command) {
        println!("{line}");
    }
    ExitCode::SUCCESS
}

/// Applies one task command and returns the lines to print.
fn run<S: KeyValueStore>(session: &mut TaskSession<S>, command: TaskCommand) -> Vec<String> {
    match command {
        TaskCommand::Add { text } => match session.add(&text.join(" ")) {
            Some(id) => vec![format!("added {id}")],
            None => vec!["nothing to add".to_string()],
        },
        TaskCommand::List { filter } => {
            session.set_filter(filter);
            let mut lines = session
                .visible()
                .into_iter()
                .map(|task| {
                    let mark = if task.completed { 'x' } else { ' ' };
                    format!("[{mark}] {} {}", task.id, task.text)
                })
                .collect::<Vec<_>>();
            lines.push(format!("{} item(s) left", session.active_count()));
            lines
        }
        TaskCommand::Toggle { id } => vec![change_line(session.toggle(&id), "toggled", &id)],
        TaskCommand::Edit { id, text } => {
            vec![change_line(session.edit(&id, &text.join(" ")), "edited", &id)]
        }
        TaskCommand::Remove { id } => vec![change_line(session.remove(&id), "removed", &id)],
        TaskCommand::ClearCompleted => {
            vec![format!("cleared {} completed", session.clear_completed())]
        }
    }
}

fn change_line(changed: bool, verb: &str, id: &str) -> String {
    if changed {
        format!("{verb} {id}")
    } else {
        format!("no change for {id}")
    }
}
