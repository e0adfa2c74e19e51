//! # shiftline-db: Snapshot Stores for Shiftline
//!
//! Where players' cumulative shift snapshots live between shifts. The engine
//! only sees the [`SnapshotStore`] trait; this crate provides a SQLite store
//! and an in-memory one.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Shiftline Data Flow                              │
//! │                                                                         │
//! │  shift-sim (load baseline / save snapshot)                             │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                   shiftline-db (THIS CRATE)                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌────────────────────┐  ┌────────────┐  │   │
//! │  │   │   Database    │    │ PlayerStatsRepo    │  │ Migrations │  │   │
//! │  │   │   (pool.rs)   │◄───│ MemorySnapshotStore│  │ (embedded) │  │   │
//! │  │   └───────────────┘    └─────────┬──────────┘  └────────────┘  │   │
//! │  │                                  │ impl SnapshotStore           │   │
//! │  └──────────────────────────────────┼──────────────────────────────┘   │
//! │                                     ▼                                   │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │   SQLite: player_stats (player_id, path, value, updated_at)    │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use shiftline_db::{Database, DbConfig, SnapshotStore};
//!
//! let db = Database::new(DbConfig::new("shiftline.db")).await?;
//! let stats = db.player_stats();
//! let snapshot = stats.load_snapshot("player-1").await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod memory;
pub mod migrations;
pub mod pool;
pub mod repository;
pub mod store;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{PersistenceError, PersistenceResult};
pub use memory::MemorySnapshotStore;
pub use pool::{Database, DbConfig};
pub use repository::player_stats::{LeaderboardEntry, PlayerStatsRepository};
pub use store::{load_baseline, save_shift, SnapshotStore};
