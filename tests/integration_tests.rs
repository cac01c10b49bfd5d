//! Integration tests for taskboard
//!
//! These tests run the real persistence service on an ephemeral port and drive
//! it through the board synchronizer, and exercise the binary end to end.

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use tempfile::TempDir;

/// Helper to create a taskboard Command with a clean environment
fn taskboard(dir: &TempDir) -> Command {
    let mut cmd = cargo_bin_cmd!("taskboard");
    cmd.current_dir(dir.path())
        .env_remove("TASKBOARD_USER")
        .env_remove("TASKBOARD_URL")
        .env_remove("RUST_LOG");
    cmd
}

/// Pull the task id out of `board add` output.
fn added_id(stdout: &[u8]) -> String {
    let text = String::from_utf8_lossy(stdout);
    let start = text.find("(id ").expect("add prints the new id") + 4;
    let end = start + text[start..].find(')').unwrap();
    text[start..end].to_string()
}

// =============================================================================
// Basic CLI Tests
// =============================================================================

mod cli_basics {
    use super::*;

    #[test]
    fn test_taskboard_help() {
        let dir = TempDir::new().unwrap();
        taskboard(&dir)
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains("serve"))
            .stdout(predicate::str::contains("board"));
    }

    #[test]
    fn test_taskboard_version() {
        let dir = TempDir::new().unwrap();
        taskboard(&dir).arg("--version").assert().success();
    }

    #[test]
    fn test_serve_init_creates_database() {
        let dir = TempDir::new().unwrap();
        taskboard(&dir)
            .args(["serve", "--init", "--db-path", "data/board.db"])
            .assert()
            .success()
            .stdout(predicate::str::contains("database initialized"));
        assert!(dir.path().join("data/board.db").exists());
    }

    #[test]
    fn test_config_init_then_show() {
        let dir = TempDir::new().unwrap();
        taskboard(&dir)
            .args(["config", "init"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Created taskboard.toml"));
        assert!(dir.path().join(".taskboard/taskboard.toml").exists());

        taskboard(&dir)
            .args(["config", "show"])
            .assert()
            .success()
            .stdout(predicate::str::contains("port = 3142"));

        taskboard(&dir)
            .args(["config", "validate"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Configuration is valid"));
    }

    #[test]
    fn test_bad_column_is_rejected() {
        let dir = TempDir::new().unwrap();
        taskboard(&dir)
            .args(["board", "--local", "--user", "alice", "add", "x", "--column", "archived"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Invalid column"));
    }
}

// =============================================================================
// Board commands against a local database
// =============================================================================

mod local_board {
    use super::*;

    #[test]
    fn test_show_without_user_is_unauthorized() {
        let dir = TempDir::new().unwrap();
        taskboard(&dir)
            .args(["board", "--local", "show"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("[unauthorized]"));
    }

    #[test]
    fn test_show_empty_board() {
        let dir = TempDir::new().unwrap();
        taskboard(&dir)
            .args(["board", "--local", "--user", "alice", "show"])
            .assert()
            .success()
            .stdout(predicate::str::contains("To Do (0)"))
            .stdout(predicate::str::contains("In Progress (0)"))
            .stdout(predicate::str::contains("Done (0)"));
    }

    #[test]
    fn test_add_move_edit_delete() {
        let dir = TempDir::new().unwrap();

        let output = taskboard(&dir)
            .args(["board", "--local", "--user", "alice", "add", "Buy milk", "-d", "semi-skimmed"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Added 'Buy milk' to To Do"))
            .get_output()
            .stdout
            .clone();
        let id = added_id(&output);

        taskboard(&dir)
            .args(["board", "--local", "--user", "alice", "move", &id[..8], "done"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Done (1)"));

        taskboard(&dir)
            .args(["board", "--local", "--user", "alice", "edit", &id, "--title", "Buy oat milk", "--status", "in-progress"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Updated 'Buy oat milk'"))
            .stdout(predicate::str::contains("In Progress (1)"));

        // Another user neither sees nor can touch it
        taskboard(&dir)
            .args(["board", "--local", "--user", "bob", "delete", &id])
            .assert()
            .failure()
            .stderr(predicate::str::contains("No task matches"));

        taskboard(&dir)
            .env("TASKBOARD_USER", "alice")
            .args(["board", "--local", "delete", &id])
            .assert()
            .success()
            .stdout(predicate::str::contains("In Progress (0)"));
    }

    #[test]
    fn test_edit_without_changes_is_rejected() {
        let dir = TempDir::new().unwrap();
        let output = taskboard(&dir)
            .args(["board", "--local", "--user", "alice", "add", "Buy milk"])
            .assert()
            .success()
            .get_output()
            .stdout
            .clone();
        let id = added_id(&output);

        taskboard(&dir)
            .args(["board", "--local", "--user", "alice", "edit", &id])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Nothing to change"));
    }

    #[test]
    fn test_blank_title_is_a_validation_error() {
        let dir = TempDir::new().unwrap();
        taskboard(&dir)
            .args(["board", "--local", "--user", "alice", "add", "   "])
            .assert()
            .failure()
            .stderr(predicate::str::contains("[validation]"));
    }
}

// =============================================================================
// Synchronizer against the HTTP service
// =============================================================================

mod http_service {
    use std::sync::Arc;

    use taskboard::board::{BoardSynchronizer, TaskMove};
    use taskboard::common::{ColumnId, TaskPatch, User};
    use taskboard::errors::ErrorKind;
    use taskboard::identity::{SessionIdentity, StaticIdentity};
    use taskboard::persistence::{HttpPersistence, PersistenceService};
    use taskboard::server::{
        self,
        db::{DbHandle, TaskDb},
    };
    use tokio::net::TcpListener;
    use tokio::sync::oneshot;

    struct Service {
        url: String,
        _shutdown: oneshot::Sender<()>,
    }

    async fn spawn_service() -> Service {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let db = DbHandle::new(TaskDb::new_in_memory().unwrap());
        let (tx, rx) = oneshot::channel::<()>();
        tokio::spawn(server::serve(listener, db, false, async move {
            let _ = rx.await;
        }));
        Service {
            url: format!("http://{}", addr),
            _shutdown: tx,
        }
    }

    fn http(service: &Service) -> Arc<HttpPersistence> {
        Arc::new(HttpPersistence::new(service.url.clone(), None).unwrap())
    }

    fn synchronizer(service: &Service, user: &str) -> BoardSynchronizer {
        BoardSynchronizer::new(http(service), Arc::new(StaticIdentity::signed_in(user)))
    }

    #[tokio::test]
    async fn test_first_load_seeds_three_columns() {
        let service = spawn_service().await;
        let sync = synchronizer(&service, "alice");

        let board = sync.load_board().await.unwrap();
        let ids: Vec<ColumnId> = board.columns.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![ColumnId::Todo, ColumnId::InProgress, ColumnId::Done]);
        assert_eq!(board.task_count(), 0);

        let again = sync.load_board().await.unwrap();
        assert_eq!(board, again);
    }

    #[tokio::test]
    async fn test_changes_survive_reload() {
        let service = spawn_service().await;
        let sync = synchronizer(&service, "alice");
        sync.load_board().await.unwrap();

        let milk = sync.add_task(ColumnId::Todo, "Buy milk", "").await.unwrap();
        let bread = sync.add_task(ColumnId::Todo, "Buy bread", "wholemeal").await.unwrap();

        sync.move_task(TaskMove {
            task_id: milk.id.clone(),
            from: ColumnId::Todo,
            from_index: 0,
            to: ColumnId::Done,
            to_index: 0,
        })
        .await
        .unwrap();

        let patch = TaskPatch {
            column_id: Some(ColumnId::InProgress),
            ..Default::default()
        };
        sync.edit_task(ColumnId::Todo, &bread.id, patch).await.unwrap();

        let local = sync.board();
        let reloaded = sync.load_board().await.unwrap();
        assert_eq!(local, reloaded);
        assert_eq!(reloaded.locate(&milk.id), Some((ColumnId::Done, 0)));
        assert_eq!(reloaded.locate(&bread.id), Some((ColumnId::InProgress, 0)));
        assert_eq!(
            reloaded.task(&bread.id).unwrap().description.as_deref(),
            Some("wholemeal")
        );

        sync.delete_task(ColumnId::Done, &milk.id).await.unwrap();
        assert!(sync.load_board().await.unwrap().locate(&milk.id).is_none());
    }

    #[tokio::test]
    async fn test_stale_move_is_reverted() {
        let service = spawn_service().await;
        let laptop = synchronizer(&service, "alice");
        let phone = synchronizer(&service, "alice");

        laptop.load_board().await.unwrap();
        let task = laptop.add_task(ColumnId::Todo, "Call mum", "").await.unwrap();

        phone.load_board().await.unwrap();
        phone.delete_task(ColumnId::Todo, &task.id).await.unwrap();

        let before = laptop.board();
        let err = laptop
            .move_task(TaskMove {
                task_id: task.id.clone(),
                from: ColumnId::Todo,
                from_index: 0,
                to: ColumnId::InProgress,
                to_index: 0,
            })
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert_eq!(laptop.board(), before);
    }

    #[tokio::test]
    async fn test_other_users_tasks_are_forbidden() {
        let service = spawn_service().await;
        let alice = synchronizer(&service, "alice");
        alice.load_board().await.unwrap();
        let task = alice.add_task(ColumnId::Todo, "Private", "").await.unwrap();

        let bob = synchronizer(&service, "bob");
        assert_eq!(bob.load_board().await.unwrap().task_count(), 0);

        let err = http(&service)
            .delete_task(&User::new("bob"), &task.id)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Forbidden);
        assert!(alice.load_board().await.unwrap().locate(&task.id).is_some());
    }

    #[tokio::test]
    async fn test_blank_identity_is_unauthorized() {
        let service = spawn_service().await;
        let err = http(&service)
            .list_columns(&User::new("  "))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Unauthorized);
    }

    #[tokio::test]
    async fn test_logout_blocks_further_changes() {
        let service = spawn_service().await;
        let session = Arc::new(SessionIdentity::new());
        session.login("alice");
        let sync = BoardSynchronizer::new(http(&service), session.clone());
        sync.load_board().await.unwrap();

        session.logout();
        let err = sync.add_task(ColumnId::Todo, "Buy milk", "").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Unauthorized);
        assert_eq!(sync.board().task_count(), 0);
    }
}
