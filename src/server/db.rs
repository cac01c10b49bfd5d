use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;

use anyhow::{Context, anyhow};
use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::{Connection, OptionalExtension, params};
use taskboard_common::{
    Column, ColumnId, NewTask, Task, TaskUpdate, normalize_description, normalize_title,
};
use thiserror::Error;

/// Outcome of a storage call that the caller may be able to act on.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Task {0} not found")]
    NotFound(String),

    #[error("Task {0} belongs to another user")]
    Forbidden(String),

    #[error("{0}")]
    Invalid(String),

    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Async-safe handle to the task database.
///
/// Wraps `TaskDb` behind `Arc<Mutex>` and runs all access on tokio's
/// blocking thread pool via `spawn_blocking`, so synchronous SQLite I/O never
/// ties up async worker threads.
#[derive(Clone)]
pub struct DbHandle {
    inner: Arc<std::sync::Mutex<TaskDb>>,
}

impl DbHandle {
    pub fn new(db: TaskDb) -> Self {
        Self {
            inner: Arc::new(std::sync::Mutex::new(db)),
        }
    }

    /// Run a closure with access to the database on a blocking thread.
    /// All data passed into `f` must be owned (`'static`).
    pub async fn call<F, R>(&self, f: F) -> StoreResult<R>
    where
        F: FnOnce(&TaskDb) -> StoreResult<R> + Send + 'static,
        R: Send + 'static,
    {
        let db = self.inner.clone();
        tokio::task::spawn_blocking(move || {
            let guard = db
                .lock()
                .map_err(|e| anyhow!("DB lock poisoned: {}", e))?;
            f(&guard)
        })
        .await
        .context("DB task panicked")?
    }
}

pub struct TaskDb {
    conn: Connection,
}

impl TaskDb {
    /// Open (or create) a SQLite database at the given path and run migrations.
    pub fn new(path: &Path) -> anyhow::Result<Self> {
        let conn = Connection::open(path).context("Failed to open SQLite database")?;
        let db = Self { conn };
        db.init()?;
        Ok(db)
    }

    /// Create an in-memory SQLite database (for testing).
    pub fn new_in_memory() -> anyhow::Result<Self> {
        let conn =
            Connection::open_in_memory().context("Failed to open in-memory SQLite database")?;
        let db = Self { conn };
        db.init()?;
        Ok(db)
    }

    fn init(&self) -> anyhow::Result<()> {
        self.conn
            .execute_batch("PRAGMA foreign_keys = ON;")
            .context("Failed to enable foreign keys")?;
        self.run_migrations().context("Failed to run migrations")?;
        Ok(())
    }

    fn run_migrations(&self) -> anyhow::Result<()> {
        self.conn
            .execute_batch(
                "
                CREATE TABLE IF NOT EXISTS columns (
                    id TEXT PRIMARY KEY,
                    title TEXT NOT NULL
                );

                CREATE TABLE IF NOT EXISTS tasks (
                    id TEXT PRIMARY KEY,
                    title TEXT NOT NULL,
                    description TEXT,
                    column_id TEXT NOT NULL REFERENCES columns(id),
                    user_id TEXT NOT NULL,
                    created_at TEXT NOT NULL,
                    updated_at TEXT NOT NULL
                );

                CREATE INDEX IF NOT EXISTS idx_tasks_user ON tasks(user_id, created_at);
                ",
            )
            .context("Failed to create tables")?;
        Ok(())
    }

    // ── Columns ───────────────────────────────────────────────────────

    /// Insert the fixed columns if they are missing. Safe to call repeatedly
    /// and from racing callers.
    pub fn seed_columns(&self) -> StoreResult<()> {
        for column in ColumnId::ALL {
            self.conn
                .execute(
                    "INSERT OR IGNORE INTO columns (id, title) VALUES (?1, ?2)",
                    params![column.as_str(), column.title()],
                )
                .context("Failed to seed columns")?;
        }
        Ok(())
    }

    /// All columns in canonical order, each holding `user_id`'s tasks by
    /// creation time.
    pub fn list_columns(&self, user_id: &str) -> StoreResult<Vec<Column>> {
        self.seed_columns()?;

        let mut stmt = self
            .conn
            .prepare("SELECT id, title FROM columns")
            .context("Failed to prepare list_columns")?;
        let rows = stmt
            .query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)))
            .context("Failed to query columns")?;
        let mut columns = Vec::new();
        for row in rows {
            let (id, title) = row.context("Failed to read column row")?;
            let Ok(id) = ColumnId::from_str(&id) else {
                tracing::warn!(column = %id, "skipping unknown column in storage");
                continue;
            };
            let mut column = Column::empty(id);
            column.title = title;
            columns.push(column);
        }
        columns.sort_by_key(|c| c.id.rank());

        for task in self.list_tasks(user_id)? {
            if let Some(column) = columns.iter_mut().find(|c| c.id == task.column_id) {
                column.tasks.push(task);
            }
        }
        Ok(columns)
    }

    // ── Task CRUD ─────────────────────────────────────────────────────

    pub fn list_tasks(&self, user_id: &str) -> StoreResult<Vec<Task>> {
        let mut stmt = self
            .conn
            .prepare(
                "SELECT id, title, description, column_id, user_id, created_at
                 FROM tasks WHERE user_id = ?1 ORDER BY created_at, rowid",
            )
            .context("Failed to prepare list_tasks")?;
        let rows = stmt
            .query_map(params![user_id], TaskRow::from_row)
            .context("Failed to query tasks")?;
        let mut tasks = Vec::new();
        for row in rows {
            let r = row.context("Failed to read task row")?;
            tasks.push(r.into_task()?);
        }
        Ok(tasks)
    }

    pub fn get_task(&self, id: &str) -> StoreResult<Option<Task>> {
        let row = self
            .conn
            .query_row(
                "SELECT id, title, description, column_id, user_id, created_at
                 FROM tasks WHERE id = ?1",
                params![id],
                TaskRow::from_row,
            )
            .optional()
            .context("Failed to query task")?;
        row.map(TaskRow::into_task).transpose()
    }

    pub fn create_task(&self, user_id: &str, task: &NewTask) -> StoreResult<Task> {
        let title = normalize_title(&task.title)
            .ok_or_else(|| StoreError::Invalid("Task title must not be empty".into()))?;
        let description = normalize_description(task.description.as_deref());
        self.seed_columns()?;

        let id = uuid::Uuid::new_v4().to_string();
        let now = timestamp(Utc::now());
        self.conn
            .execute(
                "INSERT INTO tasks (id, title, description, column_id, user_id, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6)",
                params![id, title, description, task.column_id.as_str(), user_id, now],
            )
            .context("Failed to insert task")?;
        self.get_task(&id)?
            .ok_or_else(|| anyhow!("Task not found after insert").into())
    }

    /// Apply `update` to a task owned by `user_id`.
    pub fn update_task(&self, user_id: &str, update: &TaskUpdate) -> StoreResult<Task> {
        let mut task = self.owned_task(user_id, &update.id)?;

        if let Some(raw) = update.title.as_deref() {
            task.title = normalize_title(raw)
                .ok_or_else(|| StoreError::Invalid("Task title must not be empty".into()))?;
        }
        if let Some(raw) = update.description.as_deref() {
            task.description = normalize_description(Some(raw));
        }
        if let Some(column) = update.column_id {
            task.column_id = column;
        }

        self.conn
            .execute(
                "UPDATE tasks SET title = ?1, description = ?2, column_id = ?3, updated_at = ?4
                 WHERE id = ?5",
                params![
                    task.title,
                    task.description,
                    task.column_id.as_str(),
                    timestamp(Utc::now()),
                    task.id
                ],
            )
            .context("Failed to update task")?;
        self.get_task(&task.id)?
            .ok_or_else(|| StoreError::NotFound(task.id.clone()))
    }

    pub fn delete_task(&self, user_id: &str, id: &str) -> StoreResult<()> {
        self.owned_task(user_id, id)?;
        self.conn
            .execute("DELETE FROM tasks WHERE id = ?1", params![id])
            .context("Failed to delete task")?;
        Ok(())
    }

    fn owned_task(&self, user_id: &str, id: &str) -> StoreResult<Task> {
        let task = self
            .get_task(id)?
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        if task.user_id != user_id {
            return Err(StoreError::Forbidden(id.to_string()));
        }
        Ok(task)
    }
}

/// Fixed-width RFC 3339 so lexical order in SQLite matches time order.
fn timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Intermediate row struct for tasks.
struct TaskRow {
    id: String,
    title: String,
    description: Option<String>,
    column_id: String,
    user_id: String,
    created_at: String,
}

impl TaskRow {
    fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            title: row.get(1)?,
            description: row.get(2)?,
            column_id: row.get(3)?,
            user_id: row.get(4)?,
            created_at: row.get(5)?,
        })
    }

    fn into_task(self) -> StoreResult<Task> {
        let column_id = ColumnId::from_str(&self.column_id)
            .map_err(|e| anyhow!(e))
            .context("Failed to parse task column")?;
        let created_at = DateTime::parse_from_rfc3339(&self.created_at)
            .context("Failed to parse task created_at")?
            .with_timezone(&Utc);
        Ok(Task {
            id: self.id,
            title: self.title,
            description: self.description,
            user_id: self.user_id,
            column_id,
            created_at,
        })
    }
}

// ── Tests ─────────────────────────────────────────────────────────────
