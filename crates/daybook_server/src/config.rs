//! Server configuration from command-line flags and environment.

use anyhow::{Context, Result};
use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;

/// Daybook HTTP server settings.
#[derive(Debug, Clone, Parser)]
#[command(name = "daybook-server")]
#[command(about = "Serve the Daybook calendar event API over HTTP")]
pub struct ServerConfig {
    /// SQLite database file. Created and migrated on first start.
    #[arg(long, env = "DAYBOOK_DB_PATH", default_value = "schedule.db")]
    pub db_path: PathBuf,

    /// Interface to bind.
    #[arg(long, env = "DAYBOOK_HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port to bind.
    #[arg(long, env = "DAYBOOK_PORT", default_value_t = 5000)]
    pub port: u16,

    /// trace|debug|info|warn|error (defaults by build mode)
    #[arg(long, env = "DAYBOOK_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Directory for rolling log files (defaults to `./logs`).
    #[arg(long, env = "DAYBOOK_LOG_DIR")]
    pub log_dir: Option<PathBuf>,

    /// Origins allowed by CORS. Repeat the flag or pass a comma list.
    #[arg(
        long = "allowed-origin",
        env = "DAYBOOK_ALLOWED_ORIGINS",
        value_delimiter = ',',
        default_values = ["http://localhost:5173", "http://localhost:3000"]
    )]
    pub allowed_origins: Vec<String>,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr> {
        let addr = format!("{}:{}", self.host, self.port);
        addr.parse()
            .with_context(|| format!("invalid listen address `{addr}`"))
    }

    pub fn log_level(&self) -> &str {
        self.log_level
            .as_deref()
            .unwrap_or(daybook_core::default_log_level())
    }

    /// Absolute log directory; relative paths resolve against the cwd.
    pub fn resolved_log_dir(&self) -> Result<PathBuf> {
        let dir = self
            .log_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from("logs"));
        if dir.is_absolute() {
            return Ok(dir);
        }
        let cwd = std::env::current_dir().context("failed to read current directory")?;
        Ok(cwd.join(dir))
    }
}
