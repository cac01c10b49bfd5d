//! Configuration for the taskboard binary, read from `.taskboard/taskboard.toml`.
//!
//! Layered as file → environment → CLI, with defaults for anything unset.
//!
//! # Configuration File Format
//!
//! ```toml
//! [server]
//! port = 3142
//! db_path = ".taskboard/taskboard.db"
//! dev_mode = false
//!
//! [client]
//! base_url = "http://127.0.0.1:3142"
//! user_id = "alice"
//! request_timeout_secs = 30
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::server::{DEFAULT_DB_PATH, DEFAULT_PORT, ServerConfig};

pub const CONFIG_DIR: &str = ".taskboard";
pub const CONFIG_FILE: &str = "taskboard.toml";
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:3142";

/// Environment variable overriding `client.base_url`.
pub const ENV_URL: &str = "TASKBOARD_URL";
/// Environment variable overriding `client.user_id`.
pub const ENV_USER: &str = "TASKBOARD_USER";

/// `[server]` section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerSection {
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_db_path")]
    pub db_path: PathBuf,
    /// Bind on all interfaces and allow cross-origin requests
    #[serde(default)]
    pub dev_mode: bool,
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_db_path() -> PathBuf {
    PathBuf::from(DEFAULT_DB_PATH)
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            port: default_port(),
            db_path: default_db_path(),
            dev_mode: false,
        }
    }
}

/// `[client]` section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientSection {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Identity to act as; absent means signed out
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    /// Per-request timeout; absent means no timeout
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_timeout_secs: Option<u64>,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

impl Default for ClientSection {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            user_id: None,
            request_timeout_secs: None,
        }
    }
}

/// Root of `taskboard.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TaskboardToml {
    #[serde(default)]
    pub server: ServerSection,
    #[serde(default)]
    pub client: ClientSection,
}

impl TaskboardToml {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::parse(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse taskboard.toml")
    }


    /// Save configuration to a TOML file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self).context("Failed to serialize taskboard.toml")?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;
        Ok(())
    }

    /// Validate the configuration and return any warnings.
    pub fn validate(&self) -> Vec<String> {
        let mut warnings = Vec::new();

        let url = self.client.base_url.trim();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            warnings.push(format!(
                "client.base_url '{}' should start with http:// or https://",
                self.client.base_url
            ));
        }
        if self.client.request_timeout_secs == Some(0) {
            warnings.push("client.request_timeout_secs = 0 disables every request".to_string());
        }
        if self.server.port == 0 {
            warnings.push("server.port = 0 binds a random port".to_string());
        }

        warnings
    }
}

/// Client settings after applying environment and CLI overrides.
#[derive(Debug, Clone, PartialEq)]
pub struct ClientSettings {
    pub base_url: String,
    pub user_id: Option<String>,
    pub request_timeout: Option<Duration>,
}

/// Everything the binary needs, merged from:
/// 1. taskboard.toml
/// 2. Environment variables
/// 3. CLI arguments
#[derive(Debug, Clone)]
pub struct TaskboardConfig {
    /// Where the file was (or would have been) read from
    pub path: PathBuf,
    /// Parsed taskboard.toml
    pub toml: TaskboardToml,
}

impl TaskboardConfig {
    /// Load from an explicit file, or from `.taskboard/taskboard.toml` under
    /// the current directory. A missing file means defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let path = explicit
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from(CONFIG_DIR).join(CONFIG_FILE));
        let toml = if path.exists() {
            TaskboardToml::load(&path)?
        } else {
            TaskboardToml::default()
        };
        Ok(Self { path, toml })
    }

    /// Client settings (CLI → env → file → default). `env` looks up an
    /// environment variable.
    pub fn client_settings<E>(
        &self,
        env: E,
        cli_url: Option<&str>,
        cli_user: Option<&str>,
    ) -> ClientSettings
    where
        E: Fn(&str) -> Option<String>,
    {
        let non_blank = |v: String| {
            let v = v.trim().to_string();
            (!v.is_empty()).then_some(v)
        };
        let base_url = cli_url
            .map(str::to_string)
            .or_else(|| env(ENV_URL).and_then(non_blank))
            .unwrap_or_else(|| self.toml.client.base_url.clone());
        let user_id = cli_user
            .map(str::to_string)
            .or_else(|| env(ENV_USER).and_then(non_blank))
            .or_else(|| self.toml.client.user_id.clone())
            .and_then(non_blank);

        ClientSettings {
            base_url,
            user_id,
            request_timeout: self.toml.client.request_timeout_secs.map(Duration::from_secs),
        }
    }

    /// Server settings (CLI → file → default).
    pub fn server_config(
        &self,
        port: Option<u16>,
        db_path: Option<PathBuf>,
        dev_mode: bool,
    ) -> ServerConfig {
        ServerConfig {
            port: port.unwrap_or(self.toml.server.port),
            db_path: db_path.unwrap_or_else(|| self.toml.server.db_path.clone()),
            dev_mode: dev_mode || self.toml.server.dev_mode,
        }
    }
}
