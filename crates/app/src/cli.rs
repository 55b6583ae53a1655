//! Command-line arguments.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Sign in to a JWT-issuing backend and keep the session fresh.
#[derive(Debug, Parser)]
#[command(name = "warden", version, about)]
pub struct Cli {
    /// Config file (TOML). Defaults to the platform config directory.
    #[arg(long, global = true, env = "WARDEN_CONFIG")]
    pub config: Option<PathBuf>,

    /// What to do.
    #[command(subcommand)]
    pub command: Command,
}

/// Subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Exchange credentials for a session.
    Login {
        /// Account email.
        #[arg(long)]
        email: String,
        /// Account password.
        #[arg(long, env = "WARDEN_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Refresh the access token if it has expired.
    Refresh,
    /// End the session.
    Logout,
    /// Print the claims of the current access token.
    Whoami,
    /// Print the session state and time left.
    Status,
    /// Send an authorized GET to a backend path and print the body.
    Get {
        /// Path relative to the base URL, e.g. `/api/me`.
        path: String,
    },
}
