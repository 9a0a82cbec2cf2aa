use anyhow::Context;
use clap::{Parser, Subcommand};
use configuration::ServerOverrides;
use database::{DbRepository, connect, ensure_schema};
use std::path::PathBuf;

/// The main entry point for the reporting service.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env file is fine; the environment may already be set.
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let mut settings = configuration::load_settings(cli.config.as_deref())
        .context("Failed to load configuration")?;
    let _log_guard = configuration::init_tracing(&settings.logging)?;

    // Initialize the database connection and create the tables if needed.
    let db_pool = connect(&settings.database)
        .await
        .context("Failed to connect to the database")?;
    ensure_schema(&db_pool)
        .await
        .context("Failed to create the database schema")?;

    match cli.command {
        Commands::Serve(overrides) => {
            overrides.apply(&mut settings.server);
            let addr = settings.server.socket_addr()?;
            web_server::run_server(addr, DbRepository::new(db_pool)).await?;
        }
        Commands::InitDb => {
            tracing::info!(url = %settings.database.url, "Database schema is ready.");
            db_pool.close().await;
        }
    }

    Ok(())
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// A CRUD service for agencies and the reports they issue.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to a TOML settings file. Defaults to `config.toml` when present.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP API.
    Serve(ServerOverrides),
    /// Create the database tables and exit.
    InitDb,
}
