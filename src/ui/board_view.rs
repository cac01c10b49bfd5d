use console::{Emoji, style};
use taskboard_common::{Board, ColumnId, Task};

use crate::errors::SyncError;
use crate::ui::icons::{CROSS, DOING, DONE, TODO};

fn column_icon(id: ColumnId) -> Emoji<'static, 'static> {
    match id {
        ColumnId::Todo => TODO,
        ColumnId::InProgress => DOING,
        ColumnId::Done => DONE,
    }
}

/// One task as a list entry: position, title, then the short id dimmed.
pub fn render_task_line(index: usize, task: &Task) -> String {
    let short_id: String = task.id.chars().take(8).collect();
    let mut line = format!(
        "  {}. {}  {}",
        index + 1,
        style(&task.title).bold(),
        style(format!("[{}]", short_id)).dim()
    );
    if let Some(description) = &task.description {
        line.push_str(&format!("\n     {}", style(description).italic()));
    }
    line
}

/// Render the whole board, one column after another.
pub fn render_board(board: &Board) -> String {
    if !board.is_loaded() {
        return format!("{}", style("Board not loaded").yellow());
    }

    let mut out = Vec::new();
    for column in &board.columns {
        out.push(format!(
            "{}{} {}",
            column_icon(column.id),
            style(&column.title).cyan().bold(),
            style(format!("({})", column.tasks.len())).dim()
        ));
        if column.tasks.is_empty() {
            out.push(format!("  {}", style("(empty)").dim()));
        }
        for (i, task) in column.tasks.iter().enumerate() {
            out.push(render_task_line(i, task));
        }
        out.push(String::new());
    }
    out.join("\n")
}

/// A failure as shown to the user, kind first.
pub fn render_error(err: &SyncError) -> String {
    format!(
        "{}{} {}",
        CROSS,
        style(format!("[{}]", err.kind())).red().bold(),
        err
    )
}
