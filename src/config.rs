//! Process configuration: CLI flags with environment fallbacks.
//!
//! Environment:
//!   PORT - HTTP listen port (default: 5000)
//!   DATABASE_PATH - SQLite file for notices (default: noticeboard.db)
//!   JWT_SECRET - token signing secret (falls back to an insecure built-in)

use crate::auth::jwt::INSECURE_DEFAULT_SECRET;
use clap::Parser;
use std::net::SocketAddr;
use std::path::Path;

#[derive(Parser, Debug, Clone)]
#[command(name = "noticeboard")]
#[command(about = "Notice board backend - fixed-credential login and admin-managed notices")]
pub struct Config {
    /// HTTP listen port
    #[arg(long, env = "PORT", default_value = "5000")]
    pub port: u16,

    /// SQLite database path (":memory:" for a throwaway store)
    #[arg(long, env = "DATABASE_PATH", default_value = "noticeboard.db")]
    pub database_path: String,

    /// Token signing secret
    #[arg(long, env = "JWT_SECRET", hide_env_values = true)]
    pub jwt_secret: Option<String>,
}

impl Config {
    /// The configured secret, or the insecure fallback when unset or empty.
    pub fn signing_secret(&self) -> &str {
        self.jwt_secret
            .as_deref()
            .filter(|s| !s.is_empty())
            .unwrap_or(INSECURE_DEFAULT_SECRET)
    }

    pub fn uses_insecure_secret(&self) -> bool {
        self.signing_secret() == INSECURE_DEFAULT_SECRET
    }

    pub fn listen_addr(&self) -> SocketAddr {
        SocketAddr::from(([0, 0, 0, 0], self.port))
    }
}

/// Load `.env` from the cwd search path, then from the manifest directory.
pub fn load_env() {
    let _ = dotenv::dotenv();

    let manifest_dir = Path::new(env!("CARGO_MANIFEST_DIR"));
    let candidate = manifest_dir.join(".env");
    if candidate.exists() {
        let _ = dotenv::from_path(&candidate);
    }
}
