//! Database layer - connection pool, migrations and repositories
//!
//! # Design Principles
//!
//! - One connection pool per process (max 5 connections by default)
//! - List operations use JOINs - no N+1 queries
//! - Rely on DB constraints, handle conflicts - no check-then-insert
//! - Transactions for multi-step writes

pub mod migrations;
pub mod pool;
pub mod repos;

#[cfg(test)]
pub(crate) mod testing;

pub use pool::{create_pool, create_pool_with_options, PoolConfig};
pub use sqlx::PgPool;
pub use repos::*;
