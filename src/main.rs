use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use taskboard::common::ColumnId;
use taskboard::config::TaskboardConfig;

mod cmd;

#[derive(Parser)]
#[command(name = "taskboard")]
#[command(version, about = "Three-column task board with optimistic sync")]
pub struct Cli {
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Emit logs as JSON lines on stderr
    #[arg(long, global = true)]
    pub log_json: bool,

    /// Path to taskboard.toml (defaults to .taskboard/taskboard.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the persistence service
    Serve {
        /// Port to serve on (overrides taskboard.toml)
        #[arg(short, long)]
        port: Option<u16>,

        /// Database path (overrides taskboard.toml)
        #[arg(long)]
        db_path: Option<PathBuf>,

        /// Enable dev mode (bind all interfaces, permissive CORS)
        #[arg(long)]
        dev: bool,

        /// Initialize database only (don't start server)
        #[arg(long)]
        init: bool,
    },
    /// View and change your board
    Board {
        /// Service URL (overrides TASKBOARD_URL and taskboard.toml)
        #[arg(long, global = true)]
        url: Option<String>,

        /// User to act as (overrides TASKBOARD_USER and taskboard.toml)
        #[arg(long, global = true)]
        user: Option<String>,

        /// Use the local database directly instead of the service
        #[arg(long, global = true)]
        local: bool,

        #[command(subcommand)]
        command: BoardCommands,
    },
    /// View or validate configuration
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },
}

#[derive(Subcommand, Clone)]
pub enum BoardCommands {
    /// Print the board
    Show,
    /// Add a task to a column
    Add {
        title: String,
        /// Column to add to: todo, in-progress, done
        #[arg(short, long, default_value = "todo")]
        column: ColumnId,
        #[arg(short, long, default_value = "")]
        description: String,
    },
    /// Move a task to another column or position
    Move {
        /// Task id (a unique prefix is enough)
        task: String,
        /// Destination column
        to: ColumnId,
        /// Position in the destination column, starting at 0 (default: end)
        #[arg(short, long)]
        index: Option<usize>,
    },
    /// Edit a task's title, description or status
    Edit {
        /// Task id (a unique prefix is enough)
        task: String,
        #[arg(short, long)]
        title: Option<String>,
        /// New description; an empty string clears it
        #[arg(short, long)]
        description: Option<String>,
        /// Move the task to the end of this column
        #[arg(short, long)]
        status: Option<ColumnId>,
    },
    /// Delete a task
    Delete {
        /// Task id (a unique prefix is enough)
        task: String,
    },
}

#[derive(Subcommand, Clone)]
pub enum ConfigCommands {
    /// Show current configuration
    Show,
    /// Validate configuration and show any warnings
    Validate,
    /// Write a default taskboard.toml
    Init,
}

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();
    taskboard::logging::configure_logging(cli.verbose, cli.log_json);

    let config = TaskboardConfig::load(cli.config.as_deref())?;

    match &cli.command {
        Commands::Serve {
            port,
            db_path,
            dev,
            init,
        } => {
            let server = config.server_config(*port, db_path.clone(), *dev);
            cmd::cmd_serve(server, *init).await?;
        }
        Commands::Board {
            url,
            user,
            local,
            command,
        } => {
            let settings =
                config.client_settings(|key| std::env::var(key).ok(), url.as_deref(), user.as_deref());
            let db_path = config.toml.server.db_path.clone();
            let backend = if *local {
                cmd::Backend::Local(db_path)
            } else {
                cmd::Backend::Http
            };
            cmd::cmd_board(settings, backend, command.clone()).await?;
        }
        Commands::Config { command } => cmd::cmd_config(&config, command.clone())?,
    }

    Ok(())
}
