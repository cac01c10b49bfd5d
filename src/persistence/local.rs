//! Embedded persistence: the synchronizer writes straight to a local SQLite
//! database, with the same ownership rules as the HTTP service.

use async_trait::async_trait;
use taskboard_common::{Column, NewTask, Task, TaskUpdate, User};

use super::PersistenceService;
use crate::errors::SyncError;
use crate::server::db::{DbHandle, StoreError};

impl From<StoreError> for SyncError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(id) => SyncError::NotFound(format!("Task {}", id)),
            StoreError::Forbidden(_) => SyncError::Forbidden(err.to_string()),
            StoreError::Invalid(msg) => SyncError::Validation(msg),
            StoreError::Storage(e) => SyncError::Transport(e),
        }
    }
}

#[derive(Clone)]
pub struct LocalPersistence {
    db: DbHandle,
}

impl LocalPersistence {
    pub fn new(db: DbHandle) -> Self {
        Self { db }
    }
}

#[async_trait]
impl PersistenceService for LocalPersistence {
    async fn list_columns(&self, user: &User) -> Result<Vec<Column>, SyncError> {
        let user_id = user.id.clone();
        Ok(self.db.call(move |db| db.list_columns(&user_id)).await?)
    }

    async fn create_task(&self, user: &User, task: NewTask) -> Result<Task, SyncError> {
        let user_id = user.id.clone();
        Ok(self.db.call(move |db| db.create_task(&user_id, &task)).await?)
    }

    async fn update_task(&self, user: &User, update: TaskUpdate) -> Result<Task, SyncError> {
        let user_id = user.id.clone();
        Ok(self
            .db
            .call(move |db| db.update_task(&user_id, &update))
            .await?)
    }

    async fn delete_task(&self, user: &User, task_id: &str) -> Result<(), SyncError> {
        let user_id = user.id.clone();
        let task_id = task_id.to_string();
        Ok(self
            .db
            .call(move |db| db.delete_task(&user_id, &task_id))
            .await?)
    }
}
