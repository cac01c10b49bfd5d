//! Configuration view and validation commands — `taskboard config`.

use anyhow::Result;
use taskboard::config::{ENV_URL, ENV_USER, TaskboardConfig, TaskboardToml};

use super::super::ConfigCommands;

pub fn cmd_config(config: &TaskboardConfig, command: Option<ConfigCommands>) -> Result<()> {
    let config_path = &config.path;

    match command {
        None | Some(ConfigCommands::Show) => {
            println!();
            println!("Taskboard Configuration");
            println!("=======================");
            println!();

            if config_path.exists() {
                println!("Config file: {}", config_path.display());
            } else {
                println!("No taskboard.toml found at {}", config_path.display());
                println!("Using default configuration.");
            }
            println!();

            let toml = &config.toml;
            println!("[server]");
            println!("  port = {}", toml.server.port);
            println!("  db_path = \"{}\"", toml.server.db_path.display());
            println!("  dev_mode = {}", toml.server.dev_mode);
            println!();

            println!("[client]");
            println!("  base_url = \"{}\"", toml.client.base_url);
            if let Some(user) = &toml.client.user_id {
                println!("  user_id = \"{}\"", user);
            }
            if let Some(secs) = toml.client.request_timeout_secs {
                println!("  request_timeout_secs = {}", secs);
            }
            println!();

            println!("Effective values (with env overrides):");
            let settings = config.client_settings(|key| std::env::var(key).ok(), None, None);
            println!("  base_url = \"{}\"  ({} to override)", settings.base_url, ENV_URL);
            println!(
                "  user_id = {}  ({} to override)",
                settings
                    .user_id
                    .as_deref()
                    .map(|u| format!("\"{}\"", u))
                    .unwrap_or_else(|| "(signed out)".to_string()),
                ENV_USER
            );
            println!();
        }
        Some(ConfigCommands::Validate) => {
            println!();
            println!("Validating configuration...");
            println!();

            if !config_path.exists() {
                println!("No taskboard.toml found. Using defaults (valid).");
                return Ok(());
            }

            let warnings = config.toml.validate();
            if warnings.is_empty() {
                println!("Configuration is valid.");
            } else {
                println!("Configuration warnings:");
                for warning in warnings {
                    println!("  - {}", warning);
                }
            }
            println!();
        }
        Some(ConfigCommands::Init) => {
            if config_path.exists() {
                println!("taskboard.toml already exists at {}", config_path.display());
                println!("Delete it first if you want to recreate it.");
                return Ok(());
            }

            if let Some(dir) = config_path.parent()
                && !dir.as_os_str().is_empty()
            {
                std::fs::create_dir_all(dir)?;
            }

            TaskboardToml::default().save(config_path)?;

            println!("Created taskboard.toml at {}", config_path.display());
            println!();
            println!("You can now customize:");
            println!("  - [server] port, db_path, dev_mode");
            println!("  - [client] base_url, user_id, request_timeout_secs");
            println!();
        }
    }

    Ok(())
}
