// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! issues-server: REST API for project-scoped issue tracking.
//!
//! Serves `/api/issues/:project` over HTTP, backed by either a SQLite file or
//! a volatile in-memory store.

mod config;
mod error;
mod payload;
mod server;
mod state;

use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

use config::{ServerConfig, StoreConfig};

/// issues-server: Project-scoped issue tracker API
#[derive(Parser, Debug)]
#[command(name = "issues-server")]
#[command(about = "REST API for tracking issues per project")]
struct Args {
    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Address to bind the server to (overrides config)
    #[arg(short, long)]
    bind: Option<SocketAddr>,

    /// SQLite database file (overrides config)
    #[arg(long, conflicts_with = "memory")]
    db: Option<PathBuf>,

    /// Keep issues in memory only
    #[arg(long)]
    memory: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    /// Resolves the effective configuration: file first, then flags.
    fn resolve(&self) -> Result<ServerConfig, config::ConfigError> {
        let mut config = match self.config {
            Some(ref path) => ServerConfig::load(path)?,
            None => ServerConfig::default(),
        };
        if let Some(bind) = self.bind {
            config.bind = bind;
        }
        if self.memory {
            config.store = StoreConfig::Memory;
        } else if let Some(ref path) = self.db {
            config.store = StoreConfig::Sqlite { path: path.clone() };
        }
        Ok(config)
    }
}

fn setup_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    setup_logging(args.verbose);

    let config = args.resolve()?;

    info!("Starting issues-server");
    info!("  Bind address: {}", config.bind);
    info!("  Store: {}", config.store_description());

    let state = state::AppState::from_config(&config.store)?;

    server::run(config.bind, state).await?;

    Ok(())
}
