//! Board commands — `taskboard board show|add|move|edit|delete`.
//!
//! Each invocation loads the board, applies one operation through the
//! synchronizer, and prints the board as it stands afterwards.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Result, anyhow, bail};
use taskboard::board::{BoardSynchronizer, TaskMove};
use taskboard::common::{Board, ColumnId, TaskPatch};
use taskboard::config::ClientSettings;
use taskboard::errors::SyncError;
use taskboard::identity::StaticIdentity;
use taskboard::persistence::{HttpPersistence, LocalPersistence, PersistenceService};
use taskboard::server::{self, db::DbHandle};
use taskboard::ui::icons::CHECK;
use taskboard::ui::{render_board, render_error};

use super::super::BoardCommands;

/// Where board commands read and write.
pub enum Backend {
    /// The service at `ClientSettings::base_url`
    Http,
    /// A SQLite database on this machine
    Local(PathBuf),
}

/// A task located on the board by id or unique id prefix.
#[derive(Debug, PartialEq, Eq)]
struct Located {
    id: String,
    column: ColumnId,
    index: usize,
}

fn find_task(board: &Board, needle: &str) -> Result<Located> {
    let mut matches = Vec::new();
    for column in &board.columns {
        for (index, task) in column.tasks.iter().enumerate() {
            let located = Located {
                id: task.id.clone(),
                column: column.id,
                index,
            };
            if task.id == needle {
                return Ok(located);
            }
            if task.id.starts_with(needle) {
                matches.push(located);
            }
        }
    }
    match matches.len() {
        0 => bail!("No task matches '{}'", needle),
        1 => Ok(matches.remove(0)),
        n => bail!("'{}' matches {} tasks; use more of the id", needle, n),
    }
}

fn report(err: SyncError) -> anyhow::Error {
    anyhow!(console::strip_ansi_codes(&render_error(&err)).to_string())
}

pub async fn cmd_board(settings: ClientSettings, backend: Backend, command: BoardCommands) -> Result<()> {
    let persistence: Arc<dyn PersistenceService> = match backend {
        Backend::Http => Arc::new(HttpPersistence::new(
            settings.base_url.clone(),
            settings.request_timeout,
        )?),
        Backend::Local(db_path) => {
            let db = server::open_database(&db_path)?;
            Arc::new(LocalPersistence::new(DbHandle::new(db)))
        }
    };
    let identity = Arc::new(StaticIdentity::from_option(settings.user_id.clone()));
    let sync = BoardSynchronizer::new(persistence, identity);

    let board = sync.load_board().await.map_err(report)?;

    match command {
        BoardCommands::Show => {}
        BoardCommands::Add {
            title,
            column,
            description,
        } => {
            let task = sync
                .add_task(column, &title, &description)
                .await
                .map_err(report)?;
            println!(
                "{}Added '{}' to {} (id {})",
                CHECK,
                task.title,
                task.column_id.title(),
                task.id
            );
        }
        BoardCommands::Move { task, to, index } => {
            let found = find_task(&board, &task)?;
            let to_index = index.unwrap_or_else(|| board.column(to).map_or(0, |c| c.tasks.len()));
            sync.move_task(TaskMove {
                task_id: found.id,
                from: found.column,
                from_index: found.index,
                to,
                to_index,
            })
            .await
            .map_err(report)?;
            println!("{}Moved to {}", CHECK, to.title());
        }
        BoardCommands::Edit {
            task,
            title,
            description,
            status,
        } => {
            let patch = TaskPatch {
                title,
                description,
                column_id: status,
            };
            if patch.is_empty() {
                bail!("Nothing to change: pass --title, --description or --status");
            }
            let found = find_task(&board, &task)?;
            let edited = sync
                .edit_task(found.column, &found.id, patch)
                .await
                .map_err(report)?;
            println!("{}Updated '{}'", CHECK, edited.title);
        }
        BoardCommands::Delete { task } => {
            let found = find_task(&board, &task)?;
            sync.delete_task(found.column, &found.id)
                .await
                .map_err(report)?;
            println!("{}Deleted", CHECK);
        }
    }

    println!();
    println!("{}", render_board(&sync.board()));
    Ok(())
}
