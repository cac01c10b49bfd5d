//! The persistence boundary consumed by the board synchronizer.
//!
//! `HttpPersistence` talks to a running taskboard service. `LocalPersistence`
//! writes straight to a local database.

use async_trait::async_trait;
use taskboard_common::{Column, NewTask, Task, TaskUpdate, User};

use crate::errors::SyncError;

pub mod http;
pub mod local;

pub use http::HttpPersistence;
pub use local::LocalPersistence;

/// Storage for columns and tasks, scoped to the calling user.
///
/// Implementations own authorization: updates and deletes of a task the user
/// does not own fail with `SyncError::Forbidden`, unknown ids with
/// `SyncError::NotFound`.
#[async_trait]
pub trait PersistenceService: Send + Sync {
    /// All columns with the user's tasks, seeding the fixed columns on first
    /// use. Seeding must be safe to race.
    async fn list_columns(&self, user: &User) -> Result<Vec<Column>, SyncError>;

    /// Create a task owned by `user`. The service assigns id and timestamp.
    async fn create_task(&self, user: &User, task: NewTask) -> Result<Task, SyncError>;

    async fn update_task(&self, user: &User, update: TaskUpdate) -> Result<Task, SyncError>;

    async fn delete_task(&self, user: &User, task_id: &str) -> Result<(), SyncError>;
}
