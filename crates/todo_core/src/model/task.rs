//! Task record.
//!
//! # Responsibility
//! - Define the persisted shape of one to-do item.
//! - Provide the validity rules shared by creation and hydration paths.
//!
//! # Invariants
//! - `id` is non-empty and never reassigned.
//! - `text` is never empty or whitespace-only.
//! - `created_at` is provenance only and never drives ordering.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Opaque task identifier.
///
/// Kept as a type alias to make semantic intent explicit in signatures.
pub type TaskId = String;

/// One user-visible to-do item.
///
/// Serialized with camelCase field names; `createdAt` is omitted when
/// unknown so records written by older clients round-trip unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: TaskId,
    /// Trimmed, non-empty content.
    pub text: String,
    pub completed: bool,
    /// Unix epoch milliseconds at creation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<i64>,
}

/// Validation failures for task records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskValidationError {
    EmptyId,
    BlankText { id: TaskId },
}

impl Display for TaskValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyId => write!(f, "task id must not be empty"),
            Self::BlankText { id } => write!(f, "task `{id}` has blank text"),
        }
    }
}

impl Error for TaskValidationError {}

impl Task {
    /// Creates an active task stamped with its creation time.
    ///
    /// Text is stored as given; callers trim before constructing.
    pub fn new(id: impl Into<TaskId>, text: impl Into<String>, created_at: i64) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            completed: false,
            created_at: Some(created_at),
        }
    }

    /// Returns whether this task still needs doing.
    pub fn is_active(&self) -> bool {
        !self.completed
    }

    /// Checks record-level invariants.
    pub fn validate(&self) -> Result<(), TaskValidationError> {
        if self.id.is_empty() {
            return Err(TaskValidationError::EmptyId);
        }
        if self.text.trim().is_empty() {
            return Err(TaskValidationError::BlankText {
                id: self.id.clone(),
            });
        }
        Ok(())
    }

    pub(crate) fn toggled(&self) -> Self {
        Self {
            completed: !self.completed,
            ..self.clone()
        }
    }

    pub(crate) fn with_text(&self, text: &str) -> Self {
        Self {
            text: text.to_string(),
            ..self.clone()
        }
    }
}
