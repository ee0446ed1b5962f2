//! coursemate-server: review and course recommendation backend
//!
//! Visitors write reviews with free-form tags and ask for a short course of
//! spots in a region. Admins manage accounts, notices, inquiries and the tag
//! catalogue.
//!
//! - [`db`]: connection pool, schema and repositories
//! - [`models`]: validated input types
//! - [`recommend`]: region-based spot selection
//! - [`http`]: axum router and server

pub mod db;
pub mod http;
pub mod models;
pub mod password;
pub mod recommend;

pub use db::{create_pool, create_pool_with_options, DbError, PoolConfig};
pub use http::{build_router, run_server, AppState, ServerConfig, ServerError};
