//! Command implementations for the coursemate CLI

pub mod migrate;
pub mod serve;

pub use migrate::run_migrate;
pub use serve::run_serve;

use std::time::Duration;

use anyhow::{Context, Result};
use clap::Args;
use coursemate_server::db::{create_pool_with_options, PgPool, PoolConfig};

/// Database connection arguments shared by every command
#[derive(Args, Debug)]
pub struct DatabaseArgs {
    /// Postgres connection URL
    #[arg(long, env = "DATABASE_URL")]
    pub database_url: Option<String>,

    /// Maximum pool connections
    #[arg(long, default_value_t = 5)]
    pub max_connections: u32,

    /// Seconds to wait for a free connection before failing a request
    #[arg(long, default_value_t = 30)]
    pub acquire_timeout_secs: u64,
}

impl DatabaseArgs {
    /// Open the pool, failing early with a readable message.
    pub async fn connect(&self) -> Result<PgPool> {
        let url = self
            .database_url
            .as_deref()
            .context("DATABASE_URL not set. Set via --database-url, DATABASE_URL env, or .env")?;

        let config = PoolConfig {
            max_connections: self.max_connections,
            acquire_timeout: Duration::from_secs(self.acquire_timeout_secs),
        };

        create_pool_with_options(url, &config)
            .await
            .context("Failed to create database pool")
    }
}
