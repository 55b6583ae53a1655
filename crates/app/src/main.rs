//! Warden - Main Entry Point
//!
//! Loads settings, opens the stored session and runs one command against
//! the backend.

mod cli;
mod session;

use clap::Parser;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};
use warden_domain::{Credentials, token_preview};
use warden_infrastructure::SettingsLoader;

use crate::cli::{Cli, Command};
use crate::session::Session;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let mut loader = SettingsLoader::new();
    if let Some(path) = &cli.config {
        loader = loader.with_file(path);
    }
    let settings = loader.load()?;
    tracing::debug!(
        "Starting Warden v{} against {}",
        env!("CARGO_PKG_VERSION"),
        settings.base_url
    );

    let session = Session::open(&settings).await?;
    run(cli.command, &session).await
}

async fn run(command: Command, session: &Session) -> anyhow::Result<()> {
    match command {
        Command::Login { email, password } => {
            let token = session
                .manager
                .login(&Credentials::new(email, password))
                .await?;
            println!("Signed in ({})", token_preview(&token));
        }
        Command::Refresh => {
            session.manager.ensure_valid_token().await?;
            println!("{}", session.manager.state().await?.message());
        }
        Command::Logout => {
            session.manager.logout().await;
            println!("Signed out");
        }
        Command::Whoami => {
            let principal = session.provider.current_principal().await;
            if !principal.is_authenticated() {
                println!("Not signed in");
                return Ok(());
            }
            for (name, value) in principal.claims() {
                println!("{name}: {value}");
            }
        }
        Command::Status => {
            let state = session.manager.state().await?;
            match session.manager.session().await? {
                Some(stored) => println!(
                    "{} (expires {}, {}s left)",
                    state.message(),
                    stored.token_expiry,
                    stored.seconds_remaining(session.manager.now())
                ),
                None => println!("{}", state.message()),
            }
        }
        Command::Get { path } => {
            session.manager.ensure_valid_token().await?;
            let response = session.api.get(&path).await?;
            let status = response.status();
            let body = response.text().await?;
            println!("HTTP {}\n{body}", status.as_u16());
        }
    }
    Ok(())
}
