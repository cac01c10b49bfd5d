//! Pure board transitions: old board + operation → new board.
//!
//! Nothing here touches the network. Each function either returns the board
//! the operation produces, or an error and no new board at all, so a caller
//! can never observe a task in two columns or in none.

use taskboard_common::{
    Board, ColumnId, Task, TaskPatch, normalize_description, normalize_title,
};

use super::ordering::{insertion_index, resolve_index};
use crate::errors::SyncError;

/// A drag-and-drop move, as reported by the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskMove {
    pub task_id: String,
    pub from: ColumnId,
    pub from_index: usize,
    pub to: ColumnId,
    pub to_index: usize,
}

impl TaskMove {
    /// Dropped back where it started.
    pub fn is_noop(&self) -> bool {
        self.from == self.to && self.from_index == self.to_index
    }
}

/// The board after a transition, plus the task it touched (as it now is, or
/// as it was for a removal).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Applied {
    pub board: Board,
    pub task: Task,
}

fn missing_column(id: ColumnId) -> SyncError {
    SyncError::NotFound(format!("Column {}", id))
}

fn missing_task(task_id: &str, column: ColumnId) -> SyncError {
    SyncError::NotFound(format!("Task {} in column {}", task_id, column))
}

/// Move a task to `to_index` of the destination column.
///
/// `to_index` is the index the task should have once the move is done; it is
/// clamped to the destination length. Moving across columns updates the
/// task's column in the same step.
pub fn move_task(board: &Board, mv: &TaskMove) -> Result<Applied, SyncError> {
    let source = board.column(mv.from).ok_or_else(|| missing_column(mv.from))?;
    board.column(mv.to).ok_or_else(|| missing_column(mv.to))?;
    let index = resolve_index(source, &mv.task_id, mv.from_index)
        .ok_or_else(|| missing_task(&mv.task_id, mv.from))?;

    let mut next = board.clone();
    let mut task = next
        .column_mut(mv.from)
        .ok_or_else(|| missing_column(mv.from))?
        .tasks
        .remove(index);
    task.column_id = mv.to;

    let dest = next.column_mut(mv.to).ok_or_else(|| missing_column(mv.to))?;
    let at = insertion_index(dest.tasks.len(), mv.to_index);
    dest.tasks.insert(at, task.clone());

    Ok(Applied { board: next, task })
}

/// Merge an edit into a task.
///
/// A patch naming a different column moves the task to the end of that
/// column; otherwise the task keeps its index.
pub fn edit_task(
    board: &Board,
    column: ColumnId,
    task_id: &str,
    patch: &TaskPatch,
) -> Result<Applied, SyncError> {
    let source = board.column(column).ok_or_else(|| missing_column(column))?;
    let index = source
        .position_of(task_id)
        .ok_or_else(|| missing_task(task_id, column))?;

    let title = match patch.title.as_deref() {
        Some(raw) => Some(
            normalize_title(raw)
                .ok_or_else(|| SyncError::Validation("Task title must not be empty".into()))?,
        ),
        None => None,
    };
    let target = patch.column_id.unwrap_or(column);
    if target != column {
        board.column(target).ok_or_else(|| missing_column(target))?;
    }

    let mut next = board.clone();
    let src = next.column_mut(column).ok_or_else(|| missing_column(column))?;
    let task = &mut src.tasks[index];
    if let Some(title) = title {
        task.title = title;
    }
    if let Some(description) = patch.description.as_deref() {
        task.description = normalize_description(Some(description));
    }

    if target == column {
        let task = task.clone();
        return Ok(Applied { board: next, task });
    }

    let mut task = src.tasks.remove(index);
    task.column_id = target;
    next.column_mut(target)
        .ok_or_else(|| missing_column(target))?
        .tasks
        .push(task.clone());

    Ok(Applied { board: next, task })
}

/// Remove a task from a column.
pub fn remove_task(board: &Board, column: ColumnId, task_id: &str) -> Result<Applied, SyncError> {
    let mut next = board.clone();
    let col = next.column_mut(column).ok_or_else(|| missing_column(column))?;
    let index = col
        .position_of(task_id)
        .ok_or_else(|| missing_task(task_id, column))?;
    let task = col.tasks.remove(index);
    Ok(Applied { board: next, task })
}

/// Append a newly created task to the end of its column.
///
/// A task whose id is already on the board leaves the board as it is.
pub fn append_task(board: &Board, task: Task) -> Result<Board, SyncError> {
    if board.locate(&task.id).is_some() {
        return Ok(board.clone());
    }
    let mut next = board.clone();
    next.column_mut(task.column_id)
        .ok_or_else(|| missing_column(task.column_id))?
        .tasks
        .push(task);
    Ok(next)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::test_support::{assert_each_task_once, sample_board, task};
    use crate::errors::ErrorKind;

    fn ids(board: &Board, column: ColumnId) -> Vec<String> {
        board
            .column(column)
            .unwrap()
            .tasks
            .iter()
            .map(|t| t.id.clone())
            .collect()
    }

    fn mv(task_id: &str, from: ColumnId, from_index: usize, to: ColumnId, to_index: usize) -> TaskMove {
        TaskMove {
            task_id: task_id.to_string(),
            from,
            from_index,
            to,
            to_index,
        }
    }

    #[test]
    fn noop_detection() {
        assert!(mv("a", ColumnId::Todo, 0, ColumnId::Todo, 0).is_noop());
        assert!(!mv("a", ColumnId::Todo, 0, ColumnId::Todo, 1).is_noop());
        assert!(!mv("a", ColumnId::Todo, 0, ColumnId::Done, 0).is_noop());
    }

    #[test]
    fn move_across_columns_updates_membership() {
        let board = sample_board();
        let applied = move_task(&board, &mv("t1", ColumnId::Todo, 0, ColumnId::Done, 0)).unwrap();

        assert_eq!(ids(&applied.board, ColumnId::Todo), vec!["t2"]);
        assert_eq!(ids(&applied.board, ColumnId::Done), vec!["t1", "t4"]);
        assert_eq!(applied.task.column_id, ColumnId::Done);
        assert_eq!(
            applied.board.task("t1").unwrap().column_id,
            ColumnId::Done
        );
        assert_each_task_once(&applied.board, 4);
    }

    #[test]
    fn move_within_column_reorders() {
        let board = sample_board();
        let applied = move_task(&board, &mv("t1", ColumnId::Todo, 0, ColumnId::Todo, 1)).unwrap();
        assert_eq!(ids(&applied.board, ColumnId::Todo), vec!["t2", "t1"]);
        assert_eq!(applied.task.column_id, ColumnId::Todo);
        assert_each_task_once(&applied.board, 4);
    }

    #[test]
    fn move_clamps_destination_index() {
        let board = sample_board();
        let applied =
            move_task(&board, &mv("t2", ColumnId::Todo, 1, ColumnId::InProgress, 99)).unwrap();
        assert_eq!(ids(&applied.board, ColumnId::InProgress), vec!["t3", "t2"]);
    }

    #[test]
    fn move_with_stale_source_index_finds_task_by_id() {
        let board = sample_board();
        let applied = move_task(&board, &mv("t2", ColumnId::Todo, 0, ColumnId::Done, 1)).unwrap();
        assert_eq!(ids(&applied.board, ColumnId::Todo), vec!["t1"]);
        assert_eq!(ids(&applied.board, ColumnId::Done), vec!["t4", "t2"]);
    }

    #[test]
    fn move_of_task_not_in_source_fails_without_change() {
        let board = sample_board();
        let err = move_task(&board, &mv("t4", ColumnId::Todo, 0, ColumnId::Done, 0)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn move_on_unloaded_board_fails() {
        let err = move_task(&Board::default(), &mv("t1", ColumnId::Todo, 0, ColumnId::Done, 0))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn move_leaves_input_board_untouched() {
        let board = sample_board();
        let before = board.clone();
        let _ = move_task(&board, &mv("t1", ColumnId::Todo, 0, ColumnId::Done, 0)).unwrap();
        assert_eq!(board, before);
    }

    #[test]
    fn edit_in_place_keeps_index() {
        let board = sample_board();
        let patch = TaskPatch {
            title: Some("  Renamed  ".into()),
            description: Some("new details".into()),
            column_id: None,
        };
        let applied = edit_task(&board, ColumnId::Todo, "t1", &patch).unwrap();
        assert_eq!(ids(&applied.board, ColumnId::Todo), vec!["t1", "t2"]);
        let edited = applied.board.task("t1").unwrap();
        assert_eq!(edited.title, "Renamed");
        assert_eq!(edited.description.as_deref(), Some("new details"));
        assert_eq!(applied.task, *edited);
    }

    #[test]
    fn edit_with_same_status_is_in_place() {
        let board = sample_board();
        let patch = TaskPatch {
            column_id: Some(ColumnId::Todo),
            ..Default::default()
        };
        let applied = edit_task(&board, ColumnId::Todo, "t2", &patch).unwrap();
        assert_eq!(applied.board, board);
    }

    #[test]
    fn edit_with_new_status_appends_to_target() {
        let board = sample_board();
        let patch = TaskPatch {
            column_id: Some(ColumnId::Done),
            ..Default::default()
        };
        let applied = edit_task(&board, ColumnId::Todo, "t1", &patch).unwrap();
        assert_eq!(ids(&applied.board, ColumnId::Todo), vec!["t2"]);
        assert_eq!(ids(&applied.board, ColumnId::Done), vec!["t4", "t1"]);
        assert_eq!(applied.task.column_id, ColumnId::Done);
        assert_each_task_once(&applied.board, 4);
    }

    #[test]
    fn edit_rejects_blank_title() {
        let board = sample_board();
        let patch = TaskPatch {
            title: Some("   ".into()),
            ..Default::default()
        };
        let err = edit_task(&board, ColumnId::Todo, "t1", &patch).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
    }

    #[test]
    fn edit_clears_blank_description() {
        let board = sample_board();
        let patch = TaskPatch {
            description: Some(" ".into()),
            ..Default::default()
        };
        let applied = edit_task(&board, ColumnId::InProgress, "t3", &patch).unwrap();
        assert!(applied.task.description.is_none());
    }

    #[test]
    fn edit_of_unknown_task_fails() {
        let err = edit_task(&sample_board(), ColumnId::Done, "t1", &TaskPatch::default())
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn remove_returns_removed_task() {
        let board = sample_board();
        let applied = remove_task(&board, ColumnId::Todo, "t2").unwrap();
        assert_eq!(applied.task.id, "t2");
        assert_eq!(ids(&applied.board, ColumnId::Todo), vec!["t1"]);
        assert_each_task_once(&applied.board, 3);
    }

    #[test]
    fn remove_from_wrong_column_fails() {
        let err = remove_task(&sample_board(), ColumnId::Done, "t2").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn append_adds_to_end_of_task_column() {
        let board = sample_board();
        let next = append_task(&board, task("t5", ColumnId::InProgress)).unwrap();
        assert_eq!(ids(&next, ColumnId::InProgress), vec!["t3", "t5"]);
    }

    #[test]
    fn append_of_known_id_is_ignored() {
        let board = sample_board();
        let next = append_task(&board, task("t1", ColumnId::Done)).unwrap();
        assert_eq!(next, board);
    }
}
