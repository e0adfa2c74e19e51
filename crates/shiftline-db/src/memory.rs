//! # In-Memory Snapshot Store
//!
//! A [`SnapshotStore`] kept in process memory. Used by tests and by the
//! simulator's `--memory` mode. It can be switched off, or made to fail
//! partway through a save, to exercise the store-failure paths.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use tokio::sync::RwLock;
use tracing::debug;

use shiftline_core::ShiftSnapshot;

use crate::error::{PersistenceError, PersistenceResult};
use crate::store::SnapshotStore;

type Fields = HashMap<String, Value>;

#[derive(Debug)]
pub struct MemorySnapshotStore {
    players: RwLock<HashMap<String, Fields>>,
    available: AtomicBool,
    /// Field writes left before the store goes down; `None` is unlimited.
    write_budget: Mutex<Option<usize>>,
}

impl Default for MemorySnapshotStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemorySnapshotStore {
    pub fn new() -> Self {
        MemorySnapshotStore {
            players: RwLock::new(HashMap::new()),
            available: AtomicBool::new(true),
            write_budget: Mutex::new(None),
        }
    }

    /// Switches the store on or off.
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    /// Lets only `writes` more field writes through, then fails.
    pub fn set_write_budget(&self, writes: Option<usize>) {
        if let Ok(mut budget) = self.write_budget.lock() {
            *budget = writes;
        }
    }

    /// Raw stored fields for a player.
    pub async fn fields(&self, player_id: &str) -> Fields {
        self.players
            .read()
            .await
            .get(player_id)
            .cloned()
            .unwrap_or_default()
    }

    fn ensure_available(&self) -> PersistenceResult<()> {
        if self.available.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(PersistenceError::Unavailable("in-memory store is offline".to_string()))
        }
    }

    fn take_write(&self) -> PersistenceResult<()> {
        self.ensure_available()?;
        let mut budget = self
            .write_budget
            .lock()
            .map_err(|e| PersistenceError::Internal(e.to_string()))?;
        match budget.as_mut() {
            None => Ok(()),
            Some(0) => {
                self.set_available(false);
                Err(PersistenceError::Unavailable("store went offline mid-save".to_string()))
            }
            Some(left) => {
                *left -= 1;
                Ok(())
            }
        }
    }
}

#[async_trait]
impl SnapshotStore for MemorySnapshotStore {
    async fn load_snapshot(&self, player_id: &str) -> PersistenceResult<ShiftSnapshot> {
        self.ensure_available()?;
        let fields = self.fields(player_id).await;
        Ok(ShiftSnapshot::from_fields(&fields))
    }

    async fn save_snapshot(&self, player_id: &str, snapshot: &ShiftSnapshot) -> PersistenceResult<()> {
        for (path, value) in snapshot.to_field_updates() {
            self.take_write()?;
            self.players
                .write()
                .await
                .entry(player_id.to_string())
                .or_default()
                .insert(path.to_string(), value);
        }
        debug!(player = player_id, "Snapshot written to memory");
        Ok(())
    }
}
