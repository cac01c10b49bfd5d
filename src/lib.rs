//! Taskboard: a three-column task board with optimistic client-side sync.
//!
//! The client half is [`board::BoardSynchronizer`], which applies every change
//! locally at once and rolls it back if the [`persistence::PersistenceService`]
//! refuses it. The server half is the HTTP service in [`server`].

pub mod board;
pub mod config;
pub mod errors;
pub mod identity;
pub mod logging;
pub mod persistence;
pub mod server;
pub mod ui;

pub use taskboard_common as common;
