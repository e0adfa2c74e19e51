//! # Player Stats Repository
//!
//! Snapshots stored one row per field path.
//!
//! ## Table Layout
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │ player_stats                                                            │
//! │                                                                         │
//! │  player_id │ path                              │ value  │ updated_at   │
//! │  ──────────┼───────────────────────────────────┼────────┼──────────── │
//! │  p-17      │ shiftsCompleted                   │ 4      │ 2026-10-19…  │
//! │  p-17      │ profitsEarned                     │ 98765  │ 2026-10-19…  │
//! │  p-17      │ mistakesMade/excessChangeGiven    │ 2      │ 2026-10-19…  │
//! │  …                                                                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//! Each path is upserted on its own, without a surrounding transaction, so a
//! failed save can leave a mix of old and new values.

use async_trait::async_trait;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::SqlitePool;
use std::collections::HashMap;
use tracing::{debug, warn};
use ts_rs::TS;

use shiftline_core::snapshot::{HIGH_SCORE, PROFITS_EARNED, SHIFTS_COMPLETED};
use shiftline_core::{Money, ShiftSnapshot};

use crate::error::{PersistenceError, PersistenceResult};
use crate::store::SnapshotStore;

/// One row of the leaderboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntry {
    pub player_id: String,
    pub high_score: i64,
    pub profits_earned: Money,
    pub shifts_completed: u32,
}

/// Repository for per-path player stats.
#[derive(Debug, Clone)]
pub struct PlayerStatsRepository {
    pool: SqlitePool,
}

impl PlayerStatsRepository {
    pub fn new(pool: SqlitePool) -> Self {
        PlayerStatsRepository { pool }
    }

    /// Every stored field for a player, keyed by path.
    ///
    /// Rows whose value is not valid JSON are skipped with a warning; the
    /// snapshot reader defaults them.
    pub async fn load_fields(&self, player_id: &str) -> PersistenceResult<HashMap<String, Value>> {
        let rows: Vec<(String, String)> =
            sqlx::query_as("SELECT path, value FROM player_stats WHERE player_id = ?1")
                .bind(player_id)
                .fetch_all(&self.pool)
                .await?;

        let mut fields = HashMap::with_capacity(rows.len());
        for (path, raw) in rows {
            match serde_json::from_str::<Value>(&raw) {
                Ok(value) => {
                    fields.insert(path, value);
                }
                Err(e) => {
                    warn!(player = player_id, path = %path, error = %e, "Skipping corrupt stats row");
                }
            }
        }

        debug!(player = player_id, count = fields.len(), "Loaded stats fields");
        Ok(fields)
    }

    /// Upserts one field.
    pub async fn write_field(&self, player_id: &str, path: &str, value: &Value) -> PersistenceResult<()> {
        let encoded = serde_json::to_string(value).map_err(|e| PersistenceError::corrupt(path, e))?;

        sqlx::query(
            r#"
            INSERT INTO player_stats (player_id, path, value, updated_at)
            VALUES (?1, ?2, ?3, ?4)
            ON CONFLICT (player_id, path) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(player_id)
        .bind(path)
        .bind(encoded)
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Top players by high score, then lifetime profit.
    pub async fn leaderboard(&self, limit: u32) -> PersistenceResult<Vec<LeaderboardEntry>> {
        let rows: Vec<(String, i64, i64, i64)> = sqlx::query_as(
            r#"
            SELECT
                player_id,
                COALESCE(MAX(CASE WHEN path = ?1 THEN CAST(value AS INTEGER) END), 0) AS high_score,
                COALESCE(MAX(CASE WHEN path = ?2 THEN CAST(value AS INTEGER) END), 0) AS profits_earned,
                COALESCE(MAX(CASE WHEN path = ?3 THEN CAST(value AS INTEGER) END), 0) AS shifts_completed
            FROM player_stats
            GROUP BY player_id
            ORDER BY high_score DESC, profits_earned DESC, player_id ASC
            LIMIT ?4
            "#,
        )
        .bind(HIGH_SCORE)
        .bind(PROFITS_EARNED)
        .bind(SHIFTS_COMPLETED)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|(player_id, high_score, profits, shifts)| LeaderboardEntry {
                player_id,
                high_score,
                profits_earned: Money::from_cents(profits),
                shifts_completed: u32::try_from(shifts).unwrap_or(0),
            })
            .collect())
    }

    /// Removes every stored field for a player. Returns the rows deleted.
    pub async fn delete_player(&self, player_id: &str) -> PersistenceResult<u64> {
        let result = sqlx::query("DELETE FROM player_stats WHERE player_id = ?1")
            .bind(player_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}

#[async_trait]
impl SnapshotStore for PlayerStatsRepository {
    async fn load_snapshot(&self, player_id: &str) -> PersistenceResult<ShiftSnapshot> {
        let fields = self.load_fields(player_id).await?;
        Ok(ShiftSnapshot::from_fields(&fields))
    }

    async fn save_snapshot(&self, player_id: &str, snapshot: &ShiftSnapshot) -> PersistenceResult<()> {
        for (path, value) in snapshot.to_field_updates() {
            self.write_field(player_id, path, &value).await?;
        }
        debug!(player = player_id, "Snapshot written");
        Ok(())
    }
}
