//! Persistence service: the HTTP backend the board synchronizer talks to.
//!
//! ```text
//! ┌─────────────────┐  HTTP + x-user-id  ┌──────────────────────────┐
//! │ HttpPersistence │ ─────────────────> │ api.rs  (axum Router)    │
//! └─────────────────┘                    └────────────┬─────────────┘
//! ┌──────────────────┐   DbHandle::call  ┌────────────v─────────────┐
//! │ LocalPersistence │ ────────────────> │ db.rs   (TaskDb, SQLite) │
//! └──────────────────┘                   └──────────────────────────┘
//! ```
//!
//! Every route except `/health` acts for the user named in the `x-user-id`
//! header and only ever sees or changes that user's tasks.

pub mod api;
pub mod db;

use std::future::Future;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::Router;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;

use api::{AppState, SharedState};
use db::{DbHandle, TaskDb};

pub const DEFAULT_PORT: u16 = 3142;
pub const DEFAULT_DB_PATH: &str = ".taskboard/taskboard.db";

/// Configuration for the persistence service.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub port: u16,
    pub db_path: PathBuf,
    pub dev_mode: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            db_path: PathBuf::from(DEFAULT_DB_PATH),
            dev_mode: false,
        }
    }
}

/// Build the full application router.
pub fn build_router(state: SharedState, dev_mode: bool) -> Router {
    let app = api::api_router().with_state(state);
    if dev_mode {
        app.layer(CorsLayer::permissive())
    } else {
        app
    }
}

/// Open (or create) the database at `path`, creating its parent directory.
pub fn open_database(path: &std::path::Path) -> Result<TaskDb> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent).context("Failed to create database directory")?;
    }
    let db = TaskDb::new(path).context("Failed to initialize task database")?;
    db.seed_columns().context("Failed to seed columns")?;
    Ok(db)
}

/// Serve on an already-bound listener until `shutdown` resolves.
pub async fn serve<F>(listener: TcpListener, db: DbHandle, dev_mode: bool, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let state = Arc::new(AppState { db });
    let app = build_router(state, dev_mode);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
        .context("Server error")
}

/// Start the persistence service and run until Ctrl+C.
pub async fn start_server(config: ServerConfig) -> Result<()> {
    let db = open_database(&config.db_path)?;

    let host = if config.dev_mode { "0.0.0.0" } else { "127.0.0.1" };
    let addr = format!("{}:{}", host, config.port);
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    let local_addr = listener.local_addr()?;
    tracing::info!(
        addr = %local_addr,
        db = %config.db_path.display(),
        dev_mode = config.dev_mode,
        "taskboard service started"
    );
    println!("Taskboard service running at http://{}", local_addr);

    serve(listener, DbHandle::new(db), config.dev_mode, shutdown_signal()).await?;

    println!("Server shut down gracefully.");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to install Ctrl+C handler");
        std::future::pending::<()>().await;
    }
    println!("\nShutting down...");
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    fn test_router(dev_mode: bool) -> Router {
        let db = TaskDb::new_in_memory().unwrap();
        let state = Arc::new(AppState {
            db: DbHandle::new(db),
        });
        build_router(state, dev_mode)
    }

    #[tokio::test]
    async fn test_health_via_full_router() {
        let app = test_router(false);
        let req = Request::builder()
            .uri("/health")
            .body(Body::empty())
            .unwrap();
        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_dev_mode_allows_cross_origin() {
        let app = test_router(true);
        let req = Request::builder()
            .uri("/health")
            .header("origin", "http://localhost:5173")
            .body(Body::empty())
            .unwrap();
        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert!(resp.headers().contains_key("access-control-allow-origin"));
    }

    #[tokio::test]
    async fn test_unknown_route_is_404() {
        let app = test_router(false);
        let req = Request::builder()
            .uri("/api/projects")
            .body(Body::empty())
            .unwrap();
        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_open_database_creates_parent_dir() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("taskboard.db");
        let db = open_database(&path).unwrap();
        assert!(path.exists());
        assert_eq!(db.list_columns("alice").unwrap().len(), 3);
    }

    #[test]
    fn test_server_config_default() {
        let config = ServerConfig::default();
        assert_eq!(config.port, 3142);
        assert_eq!(config.db_path, PathBuf::from(".taskboard/taskboard.db"));
        assert!(!config.dev_mode);
    }
}
