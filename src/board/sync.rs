use std::future::Future;
use std::sync::Arc;

use taskboard_common::{
    Board, ColumnId, NewTask, Task, TaskPatch, TaskUpdate, User, normalize_description,
    normalize_title,
};
use tokio::sync::{Mutex, watch};
use tracing::{debug, info, warn};

use super::ordering;
use super::transition::{self, TaskMove};
use crate::errors::SyncError;
use crate::identity::IdentityProvider;
use crate::persistence::PersistenceService;

/// Owns the client's board and keeps it in step with the persistence service.
///
/// Mutations are optimistic: the new board is published before the service
/// answers, and replaced by the operation's own pre-mutation snapshot if the
/// service refuses. Only one operation is in flight at a time (`flight`), so a
/// revert never discards another operation's unconfirmed change; callers
/// arriving while one is pending wait their turn in FIFO order.
pub struct BoardSynchronizer {
    persistence: Arc<dyn PersistenceService>,
    identity: Arc<dyn IdentityProvider>,
    state: watch::Sender<Board>,
    flight: Mutex<()>,
}

impl BoardSynchronizer {
    pub fn new(
        persistence: Arc<dyn PersistenceService>,
        identity: Arc<dyn IdentityProvider>,
    ) -> Self {
        let (state, _) = watch::channel(Board::default());
        Self {
            persistence,
            identity,
            state,
            flight: Mutex::new(()),
        }
    }

    /// Read-only snapshot of the current board.
    pub fn board(&self) -> Board {
        self.state.borrow().clone()
    }

    /// Receive every board the synchronizer publishes: optimistic states as
    /// they are applied, and reverted states when a reconciliation fails.
    pub fn subscribe(&self) -> watch::Receiver<Board> {
        self.state.subscribe()
    }

    fn require_user(&self) -> Result<User, SyncError> {
        self.identity.current_user().ok_or(SyncError::Unauthorized)
    }

    fn publish(&self, board: Board) {
        self.state.send_replace(board);
    }

    /// Fetch the user's board and replace the local one with it.
    ///
    /// On failure the local board is left as it was.
    pub async fn load_board(&self) -> Result<Board, SyncError> {
        let user = self.require_user()?;
        let _flight = self.flight.lock().await;

        let columns = self.persistence.list_columns(&user).await.inspect_err(|e| {
            warn!(user = %user.id, kind = %e.kind(), error = %e, "failed to load board");
        })?;
        let board = ordering::canonicalize(columns);
        info!(
            user = %user.id,
            tasks = board.task_count(),
            layout = ?board.layout(),
            "board loaded"
        );
        self.publish(board.clone());
        Ok(board)
    }

    /// Drag-and-drop move. Dropping a task where it started does nothing.
    pub async fn move_task(&self, mv: TaskMove) -> Result<(), SyncError> {
        if mv.is_noop() {
            debug!(task_id = %mv.task_id, "move dropped at origin, ignoring");
            return Ok(());
        }
        let user = self.require_user()?;
        let _flight = self.flight.lock().await;

        let snapshot = self.board();
        let applied = transition::move_task(&snapshot, &mv)?;
        if applied.board == snapshot {
            debug!(task_id = %mv.task_id, "move leaves the board unchanged, ignoring");
            return Ok(());
        }
        debug!(
            task_id = %mv.task_id,
            from = %mv.from,
            to = %mv.to,
            index = mv.to_index,
            "applying optimistic move"
        );

        let update = TaskUpdate::full(&applied.task);
        let request = self.persistence.update_task(&user, update);
        self.reconcile("move", snapshot, applied.board, request)
            .await
            .map(|_| ())
    }

    /// Create a task in `column`. Not optimistic: the task appears once the
    /// service has assigned its id.
    pub async fn add_task(
        &self,
        column: ColumnId,
        title: &str,
        description: &str,
    ) -> Result<Task, SyncError> {
        let title = normalize_title(title)
            .ok_or_else(|| SyncError::Validation("Task title must not be empty".into()))?;
        let user = self.require_user()?;
        let _flight = self.flight.lock().await;

        let has_column = self.state.borrow().column(column).is_some();
        if !has_column {
            return Err(SyncError::NotFound(format!("Column {}", column)));
        }

        let new_task = NewTask {
            title,
            description: normalize_description(Some(description)),
            column_id: column,
        };
        let task = self
            .persistence
            .create_task(&user, new_task)
            .await
            .inspect_err(|e| {
                warn!(column = %column, kind = %e.kind(), error = %e, "failed to create task");
            })?;

        let next = transition::append_task(&self.board(), task.clone())?;
        debug!(task_id = %task.id, column = %task.column_id, "task created");
        self.publish(next);
        Ok(task)
    }

    /// Edit a task's fields. A patch naming another column moves the task to
    /// the end of that column. Returns the task as now shown on the board.
    pub async fn edit_task(
        &self,
        column: ColumnId,
        task_id: &str,
        patch: TaskPatch,
    ) -> Result<Task, SyncError> {
        let user = self.require_user()?;
        let _flight = self.flight.lock().await;

        let snapshot = self.board();
        let applied = transition::edit_task(&snapshot, column, task_id, &patch)?;
        if applied.board == snapshot {
            debug!(task_id, "edit changes nothing, skipping update");
            return Ok(applied.task);
        }
        debug!(task_id, column = %applied.task.column_id, "applying optimistic edit");

        let update = TaskUpdate::full(&applied.task);
        let request = self.persistence.update_task(&user, update);
        self.reconcile("edit", snapshot, applied.board, request)
            .await?;
        Ok(applied.task)
    }

    /// Remove a task. A failed delete puts it back at its original index.
    pub async fn delete_task(&self, column: ColumnId, task_id: &str) -> Result<(), SyncError> {
        let user = self.require_user()?;
        let _flight = self.flight.lock().await;

        let snapshot = self.board();
        let applied = transition::remove_task(&snapshot, column, task_id)?;
        debug!(task_id, column = %column, "applying optimistic delete");

        let request = self.persistence.delete_task(&user, task_id);
        self.reconcile("delete", snapshot, applied.board, request)
            .await
    }

    /// Publish the optimistic board, await the service, and restore the
    /// snapshot if it fails. The caller holds the flight lock throughout.
    async fn reconcile<T, F>(
        &self,
        op: &'static str,
        snapshot: Board,
        optimistic: Board,
        request: F,
    ) -> Result<T, SyncError>
    where
        F: Future<Output = Result<T, SyncError>>,
    {
        self.publish(optimistic);
        match request.await {
            Ok(value) => Ok(value),
            Err(err) => {
                warn!(op, kind = %err.kind(), error = %err, "persistence rejected change, reverting");
                self.publish(snapshot);
                Err(err)
            }
        }
    }
}
