//! # Stats Database
//!
//! Opens the SQLite file that holds player snapshots and hands out the
//! stats repository.
//!
//! ```text
//! DbConfig::new("shiftline.db") ──► Database::new ──► migrations ──► db.player_stats()
//!                                        │
//!                                        └── failure: PersistenceError::ConnectionFailed
//!                                            (the caller keeps playing without a store)
//! ```
//!
//! A shift save is a burst of small upserts, one per field path. File
//! databases run in WAL mode with NORMAL sync and a busy timeout so a save
//! never trips over a concurrent leaderboard read. In-memory databases keep a
//! single connection, since each SQLite connection would otherwise open its
//! own empty database.

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::SqlitePool;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, info};

use crate::error::{PersistenceError, PersistenceResult};
use crate::migrations;
use crate::repository::player_stats::PlayerStatsRepository;

const IN_MEMORY: &str = ":memory:";

// =============================================================================
// Configuration
// =============================================================================

/// Where the stats database lives and how the pool behaves.
#[derive(Debug, Clone)]
pub struct DbConfig {
    pub database_path: PathBuf,
    pub max_connections: u32,
    /// How long a writer waits on a locked database before giving up.
    pub busy_timeout: Duration,
    pub acquire_timeout: Duration,
    pub run_migrations: bool,
}

impl DbConfig {
    /// A file database at `path`, created on first use.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        DbConfig {
            database_path: path.into(),
            max_connections: 4,
            busy_timeout: Duration::from_secs(5),
            acquire_timeout: Duration::from_secs(10),
            run_migrations: true,
        }
    }

    /// A private in-memory database, gone when the pool closes.
    pub fn in_memory() -> Self {
        DbConfig {
            max_connections: 1,
            ..Self::new(IN_MEMORY)
        }
    }

    pub fn max_connections(mut self, max: u32) -> Self {
        self.max_connections = max.max(1);
        self
    }

    pub fn busy_timeout(mut self, timeout: Duration) -> Self {
        self.busy_timeout = timeout;
        self
    }

    pub fn run_migrations(mut self, run: bool) -> Self {
        self.run_migrations = run;
        self
    }

    pub fn is_in_memory(&self) -> bool {
        self.database_path.as_os_str() == IN_MEMORY
    }

    fn connect_options(&self) -> PersistenceResult<SqliteConnectOptions> {
        if self.is_in_memory() {
            return SqliteConnectOptions::from_str("sqlite::memory:")
                .map_err(|e| PersistenceError::ConnectionFailed(e.to_string()));
        }

        Ok(SqliteConnectOptions::new()
            .filename(&self.database_path)
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .busy_timeout(self.busy_timeout))
    }
}

// =============================================================================
// Database
// =============================================================================

/// Handle to the stats database. Cheap to clone; clones share the pool.
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Connects and, unless disabled, brings the schema up to date.
    pub async fn new(config: DbConfig) -> PersistenceResult<Self> {
        info!(path = %config.database_path.display(), "Opening stats database");

        let options = config.connect_options()?;
        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(config.acquire_timeout)
            .connect_with(options)
            .await
            .map_err(|e| PersistenceError::ConnectionFailed(e.to_string()))?;
        debug!(max_connections = config.max_connections, "Stats pool ready");

        let db = Database { pool };
        if config.run_migrations {
            db.run_migrations().await?;
        }
        Ok(db)
    }

    pub async fn run_migrations(&self) -> PersistenceResult<()> {
        migrations::run_migrations(&self.pool).await
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub fn player_stats(&self) -> PlayerStatsRepository {
        PlayerStatsRepository::new(self.pool.clone())
    }

    /// Closes the pool. Stores built on it then report `Unavailable`.
    pub async fn close(&self) {
        info!("Closing stats database");
        self.pool.close().await;
    }

    pub async fn health_check(&self) -> bool {
        sqlx::query("SELECT 1").execute(&self.pool).await.is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PersistenceError;
    use crate::store::SnapshotStore;

    #[tokio::test]
    async fn test_in_memory_database_is_migrated() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        assert!(db.health_check().await);

        let (total, applied) = migrations::migration_status(db.pool()).await.unwrap();
        assert_eq!(total, applied);
    }

    #[tokio::test]
    async fn test_closed_database_reports_unavailable() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let stats = db.player_stats();
        db.close().await;

        assert!(!db.health_check().await);
        let err = stats.load_snapshot("p1").await.unwrap_err();
        assert!(matches!(err, PersistenceError::Unavailable(_)));
    }

    #[tokio::test]
    async fn test_file_database_persists_across_pools() {
        let path = std::env::temp_dir().join(format!("shiftline-pool-{}.db", std::process::id()));
        let snapshot = shiftline_core::ShiftSnapshot {
            shifts_completed: 3,
            ..Default::default()
        };

        let db = Database::new(DbConfig::new(&path)).await.unwrap();
        db.player_stats().save_snapshot("p1", &snapshot).await.unwrap();
        db.close().await;

        let reopened = Database::new(DbConfig::new(&path)).await.unwrap();
        assert_eq!(reopened.player_stats().load_snapshot("p1").await.unwrap(), snapshot);
        reopened.close().await;

        for suffix in ["", "-wal", "-shm"] {
            let _ = std::fs::remove_file(format!("{}{}", path.display(), suffix));
        }
    }

    #[test]
    fn test_config_builder() {
        let config = DbConfig::new("/tmp/shiftline.db")
            .max_connections(0)
            .busy_timeout(Duration::from_millis(250))
            .run_migrations(false);

        assert_eq!(config.max_connections, 1);
        assert_eq!(config.busy_timeout, Duration::from_millis(250));
        assert!(!config.run_migrations);
        assert!(!config.is_in_memory());

        let memory = DbConfig::in_memory();
        assert!(memory.is_in_memory());
        assert_eq!(memory.max_connections, 1);
    }
}
