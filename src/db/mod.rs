//! Database layer
//!
//! The content store behind the read model. It supports:
//! - SQLite (default, for single-binary deployment)
//! - MySQL (for larger deployments)
//!
//! The driver is selected from configuration. Repositories dispatch on
//! `DatabasePool::driver()` and run driver-specific SQL.
//!
//! # Usage
//!
//! ```ignore
//! use blogfront::config::DatabaseConfig;
//! use blogfront::db::{create_pool, migrations};
//!
//! let pool = create_pool(&DatabaseConfig::default()).await?;
//! migrations::run_migrations(&pool).await?;
//! pool.ping().await?;
//! ```

pub mod migrations;
pub mod pool;
pub mod repositories;

#[cfg(test)]
pub(crate) mod fixtures;

pub use pool::{create_pool, create_test_pool, DatabasePool, DynDatabasePool};
