//! # Shift Snapshot
//!
//! The durable baseline of a player's cumulative stats: read once when a
//! shift starts, replaced once when it ends.
//!
//! ## Field Paths
//! Stores write the snapshot one field at a time, addressed by path:
//! ```text
//! shiftsCompleted            customersServed          itemsScanned
//! profitsEarned (cents)      highScore                proficiencyScore
//! averageTimePerTransaction (seconds)
//! mistakesMade/restrictedSalesToMinors    mistakesMade/excessChangeGiven
//! mistakesMade/insufficientChangeGiven    mistakesMade/customersOvercharged
//! mistakesMade/customersUndercharged      mistakesMade/insufficientCustomerPayment
//! ```
//! A reader may observe a half-written snapshot; anything missing falls back
//! to the defaults below rather than failing the shift start.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use tracing::warn;
use ts_rs::TS;

use crate::ledger::MistakeCounters;
use crate::money::Money;
use crate::DEFAULT_AVERAGE_TRANSACTION_SECS;

pub const SHIFTS_COMPLETED: &str = "shiftsCompleted";
pub const CUSTOMERS_SERVED: &str = "customersServed";
pub const ITEMS_SCANNED: &str = "itemsScanned";
pub const PROFITS_EARNED: &str = "profitsEarned";
pub const HIGH_SCORE: &str = "highScore";
pub const PROFICIENCY_SCORE: &str = "proficiencyScore";
pub const AVERAGE_TIME_PER_TRANSACTION: &str = "averageTimePerTransaction";
pub const MISTAKES_PREFIX: &str = "mistakesMade";

const RESTRICTED_SALES: &str = "mistakesMade/restrictedSalesToMinors";
const EXCESS_CHANGE: &str = "mistakesMade/excessChangeGiven";
const INSUFFICIENT_CHANGE: &str = "mistakesMade/insufficientChangeGiven";
const OVERCHARGED: &str = "mistakesMade/customersOvercharged";
const UNDERCHARGED: &str = "mistakesMade/customersUndercharged";
const INSUFFICIENT_PAYMENT: &str = "mistakesMade/insufficientCustomerPayment";

/// Every path a snapshot is written under, in write order.
pub const FIELD_PATHS: [&str; 13] = [
    SHIFTS_COMPLETED,
    CUSTOMERS_SERVED,
    ITEMS_SCANNED,
    PROFITS_EARNED,
    HIGH_SCORE,
    PROFICIENCY_SCORE,
    AVERAGE_TIME_PER_TRANSACTION,
    RESTRICTED_SALES,
    EXCESS_CHANGE,
    INSUFFICIENT_CHANGE,
    OVERCHARGED,
    UNDERCHARGED,
    INSUFFICIENT_PAYMENT,
];

/// A player's cumulative stats.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ShiftSnapshot {
    pub shifts_completed: u32,
    pub customers_served: u32,
    pub items_scanned: u32,
    pub profits_earned: Money,
    pub high_score: i64,
    pub proficiency_score: u32,
    /// Seconds.
    pub average_time_per_transaction: f64,
    pub mistakes: MistakeCounters,
}

impl Default for ShiftSnapshot {
    /// A brand-new player.
    fn default() -> Self {
        ShiftSnapshot {
            shifts_completed: 0,
            customers_served: 0,
            items_scanned: 0,
            profits_earned: Money::zero(),
            high_score: 0,
            proficiency_score: 0,
            average_time_per_transaction: DEFAULT_AVERAGE_TRANSACTION_SECS,
            mistakes: MistakeCounters::default(),
        }
    }
}

impl ShiftSnapshot {
    /// Flattens the snapshot into `(path, value)` pairs for per-field writes.
    pub fn to_field_updates(&self) -> Vec<(&'static str, Value)> {
        let m = &self.mistakes;
        vec![
            (SHIFTS_COMPLETED, Value::from(self.shifts_completed)),
            (CUSTOMERS_SERVED, Value::from(self.customers_served)),
            (ITEMS_SCANNED, Value::from(self.items_scanned)),
            (PROFITS_EARNED, Value::from(self.profits_earned.cents())),
            (HIGH_SCORE, Value::from(self.high_score)),
            (PROFICIENCY_SCORE, Value::from(self.proficiency_score)),
            (
                AVERAGE_TIME_PER_TRANSACTION,
                Value::from(self.average_time_per_transaction),
            ),
            (RESTRICTED_SALES, Value::from(m.restricted_sales_to_minors)),
            (EXCESS_CHANGE, Value::from(m.excess_change_given)),
            (INSUFFICIENT_CHANGE, Value::from(m.insufficient_change_given)),
            (OVERCHARGED, Value::from(m.customers_overcharged)),
            (UNDERCHARGED, Value::from(m.customers_undercharged)),
            (INSUFFICIENT_PAYMENT, Value::from(m.insufficient_customer_payment)),
        ]
    }

    /// Rebuilds a snapshot from stored fields.
    ///
    /// Missing or unreadable fields take their defaults: counts 0, profits
    /// 0, average time 480 seconds.
    pub fn from_fields(fields: &HashMap<String, Value>) -> Self {
        let count = |path: &str| -> u32 {
            read_field(fields, path, |v| v.as_u64().and_then(|n| u32::try_from(n).ok())).unwrap_or(0)
        };

        ShiftSnapshot {
            shifts_completed: count(SHIFTS_COMPLETED),
            customers_served: count(CUSTOMERS_SERVED),
            items_scanned: count(ITEMS_SCANNED),
            profits_earned: read_field(fields, PROFITS_EARNED, Value::as_i64)
                .map(Money::from_cents)
                .unwrap_or_default(),
            high_score: read_field(fields, HIGH_SCORE, Value::as_i64).unwrap_or(0),
            proficiency_score: count(PROFICIENCY_SCORE),
            average_time_per_transaction: read_field(fields, AVERAGE_TIME_PER_TRANSACTION, Value::as_f64)
                .unwrap_or(DEFAULT_AVERAGE_TRANSACTION_SECS),
            mistakes: MistakeCounters {
                restricted_sales_to_minors: count(RESTRICTED_SALES),
                excess_change_given: count(EXCESS_CHANGE),
                insufficient_change_given: count(INSUFFICIENT_CHANGE),
                customers_overcharged: count(OVERCHARGED),
                customers_undercharged: count(UNDERCHARGED),
                insufficient_customer_payment: count(INSUFFICIENT_PAYMENT),
            },
        }
    }
}

fn read_field<T>(
    fields: &HashMap<String, Value>,
    path: &str,
    parse: impl Fn(&Value) -> Option<T>,
) -> Option<T> {
    let value = fields.get(path)?;
    if value.is_null() {
        return None;
    }
    let parsed = parse(value);
    if parsed.is_none() {
        warn!(path, %value, "Unreadable snapshot field, using default");
    }
    parsed
}

// =============================================================================
// Baseline
// =============================================================================

/// The snapshot as loaded at shift start. Read-only for the whole shift.
#[derive(Debug, Clone, PartialEq)]
pub struct ShiftBaseline {
    player_id: String,
    snapshot: ShiftSnapshot,
    loaded_at: DateTime<Utc>,
}

impl ShiftBaseline {
    pub fn new(player_id: impl Into<String>, snapshot: ShiftSnapshot, loaded_at: DateTime<Utc>) -> Self {
        ShiftBaseline {
            player_id: player_id.into(),
            snapshot,
            loaded_at,
        }
    }

    pub fn player_id(&self) -> &str {
        &self.player_id
    }

    pub fn snapshot(&self) -> &ShiftSnapshot {
        &self.snapshot
    }

    pub fn loaded_at(&self) -> DateTime<Utc> {
        self.loaded_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_missing_fields_take_defaults() {
        let snapshot = ShiftSnapshot::from_fields(&HashMap::new());
        assert_eq!(snapshot, ShiftSnapshot::default());
        assert_eq!(snapshot.average_time_per_transaction, 480.0);
    }

    #[test]
    fn test_partial_write_is_readable() {
        // Only the first few paths made it to the store
        let mut fields = HashMap::new();
        fields.insert(SHIFTS_COMPLETED.to_string(), json!(4));
        fields.insert(PROFITS_EARNED.to_string(), json!(12345));
        fields.insert(EXCESS_CHANGE.to_string(), json!(2));

        let snapshot = ShiftSnapshot::from_fields(&fields);
        assert_eq!(snapshot.shifts_completed, 4);
        assert_eq!(snapshot.profits_earned, Money::from_cents(12345));
        assert_eq!(snapshot.mistakes.excess_change_given, 2);
        assert_eq!(snapshot.customers_served, 0);
        assert_eq!(snapshot.average_time_per_transaction, 480.0);
    }

    #[test]
    fn test_unreadable_field_falls_back() {
        let mut fields = HashMap::new();
        fields.insert(ITEMS_SCANNED.to_string(), json!("lots"));
        fields.insert(HIGH_SCORE.to_string(), Value::Null);

        let snapshot = ShiftSnapshot::from_fields(&fields);
        assert_eq!(snapshot.items_scanned, 0);
        assert_eq!(snapshot.high_score, 0);
    }

    #[test]
    fn test_field_updates_cover_every_path() {
        let snapshot = ShiftSnapshot {
            shifts_completed: 3,
            customers_served: 20,
            items_scanned: 61,
            profits_earned: Money::from_cents(45_210),
            high_score: 180,
            proficiency_score: 1,
            average_time_per_transaction: 95.5,
            mistakes: MistakeCounters {
                customers_overcharged: 2,
                ..Default::default()
            },
        };

        let updates = snapshot.to_field_updates();
        let paths: Vec<&str> = updates.iter().map(|(p, _)| *p).collect();
        assert_eq!(paths, FIELD_PATHS.to_vec());

        let fields: HashMap<String, Value> =
            updates.into_iter().map(|(p, v)| (p.to_string(), v)).collect();
        assert_eq!(ShiftSnapshot::from_fields(&fields), snapshot);
    }
}
