//! Database layer
//!
//! PostgreSQL connection pooling and schema migrations. Queries live in
//! [`crate::store::postgres`].
//!
//! # Modules
//!
//! - `pool`: connection pool management with health checks
//! - `migrations`: embedded migration runner
//!
//! # Example
//!
//! ```no_run
//! use avafund_shared::db::{migrations::run_migrations, pool::{create_pool, DatabaseConfig}};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = DatabaseConfig {
//!         url: std::env::var("DATABASE_URL")?,
//!         ..Default::default()
//!     };
//!
//!     let pool = create_pool(config).await?;
//!     run_migrations(&pool).await?;
//!     Ok(())
//! }
//! ```

pub mod migrations;
pub mod pool;
