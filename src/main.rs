use clap::{Parser, Subcommand};

mod app;
mod config;
mod db;
mod error;
mod state;
mod users;

use crate::{config::AppConfig, state::AppState, users::repo::PgUserStore};

#[derive(Debug, Parser)]
#[command(name = "users-service", about = "User registry HTTP service")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run migrations and serve HTTP (default).
    Serve,
    /// Drop and recreate the users table.
    RecreateDb,
    /// Insert the admin and test users.
    SeedDb,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    let config = AppConfig::from_env()?;

    let env_filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| config.environment.default_log_filter().to_string());
    let json_logs = std::env::var("LOG_FORMAT")
        .map(|v| v == "json")
        .unwrap_or(false);

    if json_logs {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    }

    tracing::debug!(environment = ?config.environment, "configuration loaded");
    let db = db::connect(&config).await?;

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => {
            if let Err(e) = db::migrate(&db).await {
                tracing::warn!(error = %e, "migration failed; continuing");
            }
            let app = app::build_app(AppState::new(db));
            app::serve(app, config.listen_addr()?).await?;
        }
        Command::RecreateDb => db::recreate(&db).await?,
        Command::SeedDb => {
            let inserted = db::seed(&PgUserStore::new(db)).await?;
            tracing::info!(inserted, "seed complete");
        }
    }

    Ok(())
}
