//! # Snapshot Store
//!
//! The load/save boundary between the engine and whatever keeps player stats.
//!
//! ## Shift Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  shift start ──► load_baseline ──► ShiftBaseline (read-only)           │
//! │                      │                                                  │
//! │                      └── store down? default snapshot, keep going      │
//! │                                                                         │
//! │  shift end   ──► save_shift ──► one write per field path               │
//! │                      │                                                  │
//! │                      └── store down? log, return the error, no retry   │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tracing::{error, info, warn};

use shiftline_core::{ShiftBaseline, ShiftSnapshot};

use crate::error::PersistenceResult;

/// Persistent home of players' cumulative snapshots.
///
/// `save_snapshot` writes fields individually by path. A failed save may
/// leave some paths updated; readers must tolerate that.
#[async_trait]
pub trait SnapshotStore: Send + Sync {
    /// Loads a player's snapshot. Missing fields take their defaults.
    async fn load_snapshot(&self, player_id: &str) -> PersistenceResult<ShiftSnapshot>;

    /// Writes a player's snapshot, one field path at a time.
    async fn save_snapshot(&self, player_id: &str, snapshot: &ShiftSnapshot) -> PersistenceResult<()>;
}

/// Loads the shift baseline, falling back to a fresh snapshot when the store
/// fails. Shift start never fails.
pub async fn load_baseline(
    store: &dyn SnapshotStore,
    player_id: &str,
    loaded_at: DateTime<Utc>,
) -> ShiftBaseline {
    let snapshot = match store.load_snapshot(player_id).await {
        Ok(snapshot) => {
            info!(
                player = player_id,
                shifts_completed = snapshot.shifts_completed,
                "Baseline loaded"
            );
            snapshot
        }
        Err(e) => {
            warn!(player = player_id, error = %e, "Snapshot load failed, starting from defaults");
            ShiftSnapshot::default()
        }
    };
    ShiftBaseline::new(player_id, snapshot, loaded_at)
}

/// Saves the end-of-shift snapshot once.
///
/// Failures are logged and returned for optional user notification; they
/// are never retried.
pub async fn save_shift(
    store: &dyn SnapshotStore,
    player_id: &str,
    snapshot: &ShiftSnapshot,
) -> PersistenceResult<()> {
    match store.save_snapshot(player_id, snapshot).await {
        Ok(()) => {
            info!(player = player_id, "Shift snapshot saved");
            Ok(())
        }
        Err(e) => {
            error!(player = player_id, error = %e, "Shift snapshot not saved");
            Err(e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PersistenceError;
    use crate::memory::MemorySnapshotStore;

    #[tokio::test]
    async fn test_unavailable_store_gives_default_baseline() {
        let store = MemorySnapshotStore::new();
        store.set_available(false);

        let baseline = load_baseline(&store, "p1", Utc::now()).await;
        assert_eq!(baseline.snapshot(), &ShiftSnapshot::default());
        assert_eq!(baseline.player_id(), "p1");
    }

    #[tokio::test]
    async fn test_save_failure_is_returned() {
        let store = MemorySnapshotStore::new();
        store.set_available(false);

        let err = save_shift(&store, "p1", &ShiftSnapshot::default()).await.unwrap_err();
        assert!(matches!(err, PersistenceError::Unavailable(_)));
    }
}
