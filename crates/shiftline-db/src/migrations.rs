//! # Schema Migrations
//!
//! SQL files under `migrations/sqlite/` are compiled into the binary and
//! applied by [`Database::new`](crate::Database::new).
//!
//! New schema goes in a new `NNN_description.sql` file. Shipped files are
//! never edited: players' databases have already recorded their checksums.

use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::error::PersistenceResult;

static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("../../migrations/sqlite");

/// Applies whatever the database hasn't seen yet.
pub async fn run_migrations(pool: &SqlitePool) -> PersistenceResult<()> {
    debug!(known = MIGRATOR.migrations.len(), "Applying stats schema migrations");
    MIGRATOR.run(pool).await?;
    info!("Stats schema up to date");
    Ok(())
}

/// `(known, applied)` migration counts.
///
/// A database that was never migrated has no bookkeeping table and reports
/// zero applied.
pub async fn migration_status(pool: &SqlitePool) -> PersistenceResult<(usize, usize)> {
    let applied: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM _sqlx_migrations WHERE success = 1")
        .fetch_one(pool)
        .await
        .unwrap_or(0);

    Ok((MIGRATOR.migrations.len(), usize::try_from(applied).unwrap_or(0)))
}
