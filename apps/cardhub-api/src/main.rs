use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use cardhub_api::cli::{Cli, Command};
use cardhub_api::routes;
use cardhub_api::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let pool = cardhub_db::db::init_db().await?;
    let state = AppState::new(pool);

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => {
            let listener = tokio::net::TcpListener::bind(&cli.bind)
                .await
                .with_context(|| format!("Failed to bind {}", cli.bind))?;
            info!("listening on {}", cli.bind);
            axum::serve(listener, routes::router(state))
                .await
                .context("HTTP server exited")?;
        }
        Command::Reconcile => {
            let repaired = state.assignments.reconcile_ledger().await?;
            info!(repaired, "ledger reconciliation complete");
        }
    }

    Ok(())
}
