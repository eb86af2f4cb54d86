//! Database migration runner
//!
//! Migrations live in `avafund-shared/migrations/` and are embedded into the
//! binary at compile time. Each migration is a reversible pair:
//! - `{timestamp}_{name}.up.sql`
//! - `{timestamp}_{name}.down.sql`

use sqlx::postgres::PgPool;
use tracing::{info, warn};

/// Runs all pending database migrations
///
/// Already-applied migrations are skipped, so this is safe to call on every
/// startup.
///
/// # Errors
///
/// Returns an error if a migration fails to apply or an applied migration
/// no longer matches its embedded checksum.
///
/// # Example
///
/// ```no_run
/// use avafund_shared::db::pool::{create_pool, DatabaseConfig};
/// use avafund_shared::db::migrations::run_migrations;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
/// run_migrations(&pool).await?;
/// # Ok(())
/// # }
/// ```
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    info!("Starting database migrations");

    match sqlx::migrate!("./migrations").run(pool).await {
        Ok(()) => {
            info!("All database migrations completed successfully");
            Ok(())
        }
        Err(e) => {
            warn!("Migration failed: {}", e);
            Err(e)
        }
    }
}
