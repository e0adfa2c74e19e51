//! # Mistake Ledger
//!
//! Typed counters for every classified cashier error.
//!
//! The six persisted categories live in [`MistakeCounters`]. An unjustified
//! customer rejection is also a mistake: it counts toward the shift's total
//! (and therefore its proficiency score) but has no persisted category.
//!
//! A mischarge flagged on a scan is tallied in its category only. It shows up
//! in the saved counters but never in the total.

use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

/// Classification of a cashier error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MistakeKind {
    RestrictedSaleToMinor,
    ExcessChangeGiven,
    InsufficientChangeGiven,
    CustomerOvercharged,
    CustomerUndercharged,
    InsufficientPayment,
    InvalidRejection,
}

impl MistakeKind {
    /// Every kind, in ledger order.
    pub const ALL: [MistakeKind; 7] = [
        MistakeKind::RestrictedSaleToMinor,
        MistakeKind::ExcessChangeGiven,
        MistakeKind::InsufficientChangeGiven,
        MistakeKind::CustomerOvercharged,
        MistakeKind::CustomerUndercharged,
        MistakeKind::InsufficientPayment,
        MistakeKind::InvalidRejection,
    ];
}

impl fmt::Display for MistakeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            MistakeKind::RestrictedSaleToMinor => "restricted sale to minor",
            MistakeKind::ExcessChangeGiven => "excess change given",
            MistakeKind::InsufficientChangeGiven => "insufficient change given",
            MistakeKind::CustomerOvercharged => "customer overcharged",
            MistakeKind::CustomerUndercharged => "customer undercharged",
            MistakeKind::InsufficientPayment => "insufficient payment",
            MistakeKind::InvalidRejection => "invalid rejection",
        };
        f.write_str(s)
    }
}

/// The six persisted mistake counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct MistakeCounters {
    pub restricted_sales_to_minors: u32,
    pub excess_change_given: u32,
    pub insufficient_change_given: u32,
    pub customers_overcharged: u32,
    pub customers_undercharged: u32,
    pub insufficient_customer_payment: u32,
}

impl MistakeCounters {
    /// Sum of all six counters.
    pub fn total(&self) -> u32 {
        self.restricted_sales_to_minors
            + self.excess_change_given
            + self.insufficient_change_given
            + self.customers_overcharged
            + self.customers_undercharged
            + self.insufficient_customer_payment
    }

    /// Field-wise sum, used when merging a shift into its baseline.
    pub fn merged_with(&self, other: &MistakeCounters) -> MistakeCounters {
        MistakeCounters {
            restricted_sales_to_minors: self.restricted_sales_to_minors + other.restricted_sales_to_minors,
            excess_change_given: self.excess_change_given + other.excess_change_given,
            insufficient_change_given: self.insufficient_change_given + other.insufficient_change_given,
            customers_overcharged: self.customers_overcharged + other.customers_overcharged,
            customers_undercharged: self.customers_undercharged + other.customers_undercharged,
            insufficient_customer_payment: self.insufficient_customer_payment
                + other.insufficient_customer_payment,
        }
    }

    /// Counter for a persisted kind; `None` for kinds without a category.
    pub fn get(&self, kind: MistakeKind) -> Option<u32> {
        match kind {
            MistakeKind::RestrictedSaleToMinor => Some(self.restricted_sales_to_minors),
            MistakeKind::ExcessChangeGiven => Some(self.excess_change_given),
            MistakeKind::InsufficientChangeGiven => Some(self.insufficient_change_given),
            MistakeKind::CustomerOvercharged => Some(self.customers_overcharged),
            MistakeKind::CustomerUndercharged => Some(self.customers_undercharged),
            MistakeKind::InsufficientPayment => Some(self.insufficient_customer_payment),
            MistakeKind::InvalidRejection => None,
        }
    }

    fn slot_mut(&mut self, kind: MistakeKind) -> Option<&mut u32> {
        match kind {
            MistakeKind::RestrictedSaleToMinor => Some(&mut self.restricted_sales_to_minors),
            MistakeKind::ExcessChangeGiven => Some(&mut self.excess_change_given),
            MistakeKind::InsufficientChangeGiven => Some(&mut self.insufficient_change_given),
            MistakeKind::CustomerOvercharged => Some(&mut self.customers_overcharged),
            MistakeKind::CustomerUndercharged => Some(&mut self.customers_undercharged),
            MistakeKind::InsufficientPayment => Some(&mut self.insufficient_customer_payment),
            MistakeKind::InvalidRejection => None,
        }
    }
}

/// Per-shift mistake ledger.
///
/// `record` is the only mutation; counters never go down.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MistakeLedger {
    counters: MistakeCounters,
    total: u32,
}

impl MistakeLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one occurrence of `kind`.
    pub fn record(&mut self, kind: MistakeKind) {
        self.total += 1;
        if let Some(slot) = self.counters.slot_mut(kind) {
            *slot += 1;
        }
        tracing::debug!(mistake = %kind, total = self.total, "Mistake recorded");
    }

    /// Bumps the category counter of `kind` without adding to the total.
    pub fn tally(&mut self, kind: MistakeKind) {
        if let Some(slot) = self.counters.slot_mut(kind) {
            *slot += 1;
        }
        tracing::debug!(mistake = %kind, total = self.total, "Mistake tallied");
    }

    /// Persisted category counters.
    pub fn counters(&self) -> &MistakeCounters {
        &self.counters
    }

    /// Every recorded mistake, including those without a persisted category.
    pub fn total(&self) -> u32 {
        self.total
    }
}
