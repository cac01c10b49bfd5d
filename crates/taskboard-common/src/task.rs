use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::board::ColumnId;

/// An authenticated caller.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct User {
    pub id: String,
}

impl User {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

/// A task as persisted by the service.
///
/// The column a task lives in is its status; there is no separate status
/// field, so `status` is accepted as an alias on input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub user_id: String,
    #[serde(alias = "status")]
    pub column_id: ColumnId,
    pub created_at: DateTime<Utc>,
}

/// Payload for creating a task. The owner comes from the caller's identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTask {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(alias = "status")]
    pub column_id: ColumnId,
}

/// Payload for updating a task. `None` fields are left unchanged; an empty
/// description clears it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskUpdate {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", alias = "status")]
    pub column_id: Option<ColumnId>,
}

impl TaskUpdate {
    /// An update that writes every mutable field of `task`.
    pub fn full(task: &Task) -> Self {
        Self {
            id: task.id.clone(),
            title: Some(task.title.clone()),
            description: Some(task.description.clone().unwrap_or_default()),
            column_id: Some(task.column_id),
        }
    }
}

/// A user edit applied from the presentation layer.
///
/// Setting `column_id` to a column other than the task's current one moves the
/// task to the end of that column.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskPatch {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, alias = "status")]
    pub column_id: Option<ColumnId>,
}

impl TaskPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.description.is_none() && self.column_id.is_none()
    }
}

/// Trimmed title, or `None` when nothing but whitespace remains.
pub fn normalize_title(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Trimmed description; blank descriptions are stored as absent.
pub fn normalize_description(raw: Option<&str>) -> Option<String> {
    raw.map(str::trim)
        .filter(|d| !d.is_empty())
        .map(str::to_string)
}
