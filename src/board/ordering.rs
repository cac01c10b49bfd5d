//! Column and task ordering rules.
//!
//! Columns always appear in the fixed `ColumnId::ALL` order. Tasks keep the
//! order the user arranged locally and are only sorted by creation time when a
//! board is (re)loaded.

use std::collections::HashSet;

use taskboard_common::{Board, Column, ColumnId};

/// Build a well-formed board from a backend listing.
///
/// - columns are sorted into canonical order, whatever order they arrived in
/// - a column the backend omitted is added empty; repeated columns are merged
/// - tasks within a column are sorted by creation time (stable, so ties keep
///   the backend's order)
/// - a task id seen twice is kept only at its first occurrence
/// - every task's `column_id` is set to the column that holds it
pub fn canonicalize(columns: Vec<Column>) -> Board {
    let mut slots: Vec<Column> = ColumnId::ALL.iter().map(|id| Column::empty(*id)).collect();

    for column in columns {
        let slot = &mut slots[column.id.rank()];
        if !column.title.trim().is_empty() {
            slot.title = column.title;
        }
        slot.tasks.extend(column.tasks);
    }

    let mut seen = HashSet::new();
    for slot in &mut slots {
        slot.tasks.retain(|task| {
            let first = seen.insert(task.id.clone());
            if !first {
                tracing::warn!(task_id = %task.id, "dropping duplicate task from board listing");
            }
            first
        });
        sort_by_creation(slot);
        for task in &mut slot.tasks {
            task.column_id = slot.id;
        }
    }

    Board::new(slots)
}

/// Stable sort of a column's tasks by creation timestamp.
pub fn sort_by_creation(column: &mut Column) {
    column.tasks.sort_by_key(|t| t.created_at);
}

/// Resolve where a task sits in a column.
///
/// The caller's index is trusted when the task id matches there; otherwise the
/// column is searched by id. Drag sources can report a stale index when the
/// list shifted under the pointer.
pub fn resolve_index(column: &Column, task_id: &str, hint: usize) -> Option<usize> {
    match column.tasks.get(hint) {
        Some(task) if task.id == task_id => Some(hint),
        _ => column.position_of(task_id),
    }
}

/// Clamp a requested insertion index to the valid range `0..=len`.
pub fn insertion_index(len: usize, requested: usize) -> usize {
    requested.min(len)
}
