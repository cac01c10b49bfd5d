//! Persistence service command — `taskboard serve`.

use anyhow::Result;
use taskboard::server::{self, ServerConfig};

pub async fn cmd_serve(config: ServerConfig, init: bool) -> Result<()> {
    if init {
        server::open_database(&config.db_path)?;
        println!("Taskboard database initialized at {}", config.db_path.display());
        return Ok(());
    }

    server::start_server(config).await
}
