//! Shared domain types for the taskboard workspace.
//!
//! These types travel over the wire between the persistence service and the
//! board synchronizer, so both sides agree on one serialized shape.

pub mod board;
pub mod task;

pub use board::{Board, Column, ColumnId};
pub use task::{NewTask, Task, TaskPatch, TaskUpdate, User, normalize_description, normalize_title};

/// Request header carrying the caller's user id to the persistence service.
pub const USER_HEADER: &str = "x-user-id";
