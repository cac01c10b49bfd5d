//! Typed errors for the board synchronizer and its collaborators.
//!
//! Every failure the synchronizer can report is a `SyncError`. Rollback treats
//! all variants the same; `ErrorKind` keeps them apart for user-facing text.

use std::fmt;

use thiserror::Error;

/// Failure category, preserved for messaging after a rollback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Unauthorized,
    Forbidden,
    NotFound,
    Validation,
    Transport,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unauthorized => "unauthorized",
            Self::Forbidden => "forbidden",
            Self::NotFound => "not_found",
            Self::Validation => "validation",
            Self::Transport => "transport",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors from board synchronization and the persistence boundary.
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("Not signed in")]
    Unauthorized,

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("{0} not found")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Persistence service unavailable: {0}")]
    Transport(#[source] anyhow::Error),
}

impl SyncError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Unauthorized => ErrorKind::Unauthorized,
            Self::Forbidden(_) => ErrorKind::Forbidden,
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::Validation(_) => ErrorKind::Validation,
            Self::Transport(_) => ErrorKind::Transport,
        }
    }

    pub fn transport(message: impl fmt::Display) -> Self {
        Self::Transport(anyhow::anyhow!("{}", message))
    }
}
