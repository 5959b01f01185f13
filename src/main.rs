//! Lab APIs - Unified CLI
//!
//! Runs the HTTP server or prepares its database.

#![warn(missing_docs)]

mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Command};
use lab_apis::{
    AppState, EmployeeRepository, EmployeeStore, InMemoryEmployeeStore, ServerConfig,
    SessionManager, serve, spawn_session_sweeper,
};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, instrument};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();
    initialize_tracing();

    let cli = Cli::parse();

    match cli.command {
        Command::Serve {
            config,
            host,
            port,
            db_path,
            seed,
            no_repeats,
        } => {
            let config = resolve_config(config, host, port, db_path, seed, no_repeats)?;
            run_server(config).await
        }
        Command::Migrate { db_path } => run_migrate(db_path),
    }
}

fn initialize_tracing() {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,lab_apis=debug")),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Merges the optional config file with command-line overrides.
fn resolve_config(
    path: Option<PathBuf>,
    host: Option<String>,
    port: Option<u16>,
    db_path: Option<String>,
    seed: bool,
    no_repeats: bool,
) -> Result<ServerConfig> {
    let mut config = match path {
        Some(path) => ServerConfig::from_file(&path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => ServerConfig::default(),
    };

    if let Some(host) = host {
        config = config.with_host(host);
    }
    if let Some(port) = port {
        config = config.with_port(port);
    }
    if let Some(db_path) = db_path {
        config = config.with_db_path(db_path);
    }
    if seed {
        config = config.with_seed(true);
    }
    if no_repeats {
        config = config.with_allow_repeats(false);
    }
    Ok(config)
}

/// Opens the configured employee store, migrating a SQLite file first.
fn open_store(config: &ServerConfig) -> Result<Arc<dyn EmployeeStore>> {
    let store: Arc<dyn EmployeeStore> = if config.uses_memory_store() {
        Arc::new(InMemoryEmployeeStore::new())
    } else {
        let repo = EmployeeRepository::new(config.db_path().clone())?;
        repo.run_migrations()?;
        Arc::new(repo)
    };

    if *config.seed() {
        store.seed_defaults()?;
    }
    Ok(store)
}

/// Run the HTTP server
#[instrument(skip_all, fields(address = %config.bind_address()))]
async fn run_server(config: ServerConfig) -> Result<()> {
    info!(db_path = %config.db_path(), "Starting lab_apis");

    let employees = open_store(&config)?;
    let sessions = SessionManager::new();
    let sweeper = config
        .session_idle_ttl()
        .map(|ttl| spawn_session_sweeper(sessions.clone(), ttl));

    let state = AppState::new(sessions, employees, *config.allow_repeats());
    let listener = tokio::net::TcpListener::bind(config.bind_address())
        .await
        .with_context(|| format!("binding {}", config.bind_address()))?;

    let result = serve(listener, state).await;
    if let Some(sweeper) = sweeper {
        sweeper.abort();
    }
    result?;
    Ok(())
}

/// Apply migrations without serving
#[instrument]
fn run_migrate(db_path: String) -> Result<()> {
    let repo = EmployeeRepository::new(db_path)?;
    let applied = repo.run_migrations()?;
    info!(applied, "Database is up to date");
    Ok(())
}
