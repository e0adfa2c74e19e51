//! # Shift Accumulator
//!
//! Per-shift deltas and the end-of-shift merge.
//!
//! ## Merge Rules
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  field                        new value                                 │
//! │  ───────────────────────────  ──────────────────────────────────────── │
//! │  shifts_completed             baseline + 1                              │
//! │  customers_served             baseline + delta                          │
//! │  items_scanned                baseline + delta                          │
//! │  profits_earned               baseline + delta                          │
//! │  mistakes.*                   baseline + delta                          │
//! │  average_time_per_transaction total_time / served   (or 480 s)          │
//! │  proficiency_score            round(100·served / ((mistakes+1)·avg))    │
//! │                               only if served > 0 and mistakes > 0      │
//! │  high_score                   max(baseline, floor(shift profit))        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//! The last three are replaced, never summed. The high score compares the
//! shift's own profit, not the cumulative total.

use tracing::{debug, info};

use crate::ledger::{MistakeKind, MistakeLedger};
use crate::money::Money;
use crate::snapshot::ShiftSnapshot;
use crate::DEFAULT_AVERAGE_TRANSACTION_SECS;

/// In-progress counters for one shift, all zero at shift start.
#[derive(Debug, Clone, Default)]
pub struct ShiftAccumulator {
    customers_served: u32,
    items_scanned: u32,
    profit: Money,
    total_time_secs: f64,
    ledger: MistakeLedger,
}

impl ShiftAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one scanned item.
    ///
    /// A mischarged item is added and then taken back out of the profit, so
    /// it contributes nothing. The flag is tallied in its category but not in
    /// the mistake total, so it leaves the proficiency score unchanged.
    pub fn track_item_scan(&mut self, price: Money, overcharged: bool, undercharged: bool) {
        self.items_scanned += 1;
        self.profit += price;

        if overcharged {
            self.profit -= price;
            self.ledger.tally(MistakeKind::CustomerOvercharged);
        }
        if undercharged {
            self.profit -= price;
            self.ledger.tally(MistakeKind::CustomerUndercharged);
        }

        debug!(
            price = %price,
            items_scanned = self.items_scanned,
            profit = %self.profit,
            "Item scan tracked"
        );
    }

    /// Records a single mistake.
    pub fn track_mistake(&mut self, kind: MistakeKind) {
        self.ledger.record(kind);
    }

    /// Records a served customer and the time the transaction took.
    pub fn complete_transaction(&mut self, duration_secs: f64) {
        self.customers_served += 1;
        self.total_time_secs += duration_secs;

        info!(
            duration_secs,
            customers_served = self.customers_served,
            "Customer served"
        );
    }

    pub fn customers_served(&self) -> u32 {
        self.customers_served
    }

    pub fn items_scanned(&self) -> u32 {
        self.items_scanned
    }

    pub fn profit(&self) -> Money {
        self.profit
    }

    pub fn total_time_secs(&self) -> f64 {
        self.total_time_secs
    }

    pub fn ledger(&self) -> &MistakeLedger {
        &self.ledger
    }

    /// Average seconds per transaction, or the 480 s default when nobody was
    /// served.
    pub fn average_time_per_transaction(&self) -> f64 {
        if self.customers_served > 0 {
            self.total_time_secs / f64::from(self.customers_served)
        } else {
            DEFAULT_AVERAGE_TRANSACTION_SECS
        }
    }

    /// Proficiency score for this shift.
    pub fn proficiency_score(&self) -> u32 {
        let mistakes = self.ledger.total();
        if self.customers_served == 0 || mistakes == 0 {
            return 0;
        }

        let served = f64::from(self.customers_served);
        let average = self.average_time_per_transaction();
        let score = (100.0 * served / ((f64::from(mistakes) + 1.0) * average)).round_ties_even();
        if score.is_finite() && score > 0.0 {
            score as u32
        } else {
            0
        }
    }

    /// Merges this shift into `baseline`, producing the next snapshot.
    ///
    /// Consumes the accumulator: a shift's deltas can be merged only once.
    pub fn end_shift(self, baseline: &ShiftSnapshot) -> ShiftSnapshot {
        let snapshot = ShiftSnapshot {
            shifts_completed: baseline.shifts_completed + 1,
            customers_served: baseline.customers_served + self.customers_served,
            items_scanned: baseline.items_scanned + self.items_scanned,
            profits_earned: baseline.profits_earned + self.profit,
            high_score: baseline.high_score.max(self.profit.floor_dollars()),
            proficiency_score: self.proficiency_score(),
            average_time_per_transaction: self.average_time_per_transaction(),
            mistakes: baseline.mistakes.merged_with(self.ledger.counters()),
        };

        info!(
            shifts_completed = snapshot.shifts_completed,
            shift_profit = %self.profit,
            high_score = snapshot.high_score,
            proficiency = snapshot.proficiency_score,
            mistakes = self.ledger.total(),
            "Shift merged into snapshot"
        );

        snapshot
    }
}
