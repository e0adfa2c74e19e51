//! # Payment Reconciliation
//!
//! Payment evaluation, change assessment and the register-close checks.
//!
//! ## Register Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Cash Register                                    │
//! │                                                                         │
//! │  open(total, payment) ──► evaluate_payment                             │
//! │        │                      ├── Sufficient { change }                │
//! │        │                      └── Insufficient { amount_owed }         │
//! │        ▼                                                                │
//! │  request_more_cash(extra)   (repeatable, re-evaluated each time)       │
//! │        │                                                                │
//! │        ▼                                                                │
//! │  grab_cash(denomination)    (repeatable, order is kept)                │
//! │        │                                                                │
//! │        ▼                                                                │
//! │  close(...) ──► ExcessChangeGiven        first time running sum > owed │
//! │             ──► InsufficientChangeGiven  final sum < owed              │
//! │             ──► InsufficientPayment      payment < total at close      │
//! │             ──► RestrictedSaleToMinor    minor + restricted item       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//! Each check fires at most once per close and independently of the others.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::accumulator::ShiftAccumulator;
use crate::error::CoreResult;
use crate::ledger::MistakeKind;
use crate::money::Money;
use crate::types::{Customer, Item};
use crate::validation::validate_denomination;

// =============================================================================
// Payment Evaluation
// =============================================================================

/// Result of comparing a payment against the amount due.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "status")]
pub enum PaymentStatus {
    Sufficient { change: Money },
    Insufficient { amount_owed: Money },
}

impl PaymentStatus {
    pub fn is_sufficient(&self) -> bool {
        matches!(self, PaymentStatus::Sufficient { .. })
    }

    /// Change the cashier should hand back; zero while underpaid.
    pub fn change_owed(&self) -> Money {
        match self {
            PaymentStatus::Sufficient { change } => *change,
            PaymentStatus::Insufficient { .. } => Money::zero(),
        }
    }
}

/// Compares `payment` against `total`.
///
/// ```rust
/// use shiftline_core::{evaluate_payment, Money, PaymentStatus};
///
/// let status = evaluate_payment(Money::from_cents(1000), Money::from_cents(700));
/// assert_eq!(status, PaymentStatus::Insufficient { amount_owed: Money::from_cents(300) });
/// ```
pub fn evaluate_payment(total: Money, payment: Money) -> PaymentStatus {
    if payment >= total {
        PaymentStatus::Sufficient {
            change: payment - total,
        }
    } else {
        PaymentStatus::Insufficient {
            amount_owed: total - payment,
        }
    }
}

/// Adds a top-up to the payment so far.
pub fn request_more_cash(current: Money, additional: Money) -> Money {
    current + additional
}

// =============================================================================
// Change Assessment
// =============================================================================

/// Change-giving mistakes found in one register close.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChangeAssessment {
    pub excess: bool,
    pub insufficient: bool,
    pub total_grabbed: Money,
}

/// Walks the grabbed cash in order against `change_owed`.
///
/// `excess` is set the first time the running sum passes `change_owed`;
/// `insufficient` when the final sum is still short. Both can be set.
pub fn assess_change(change_owed: Money, grabbed: &[Money]) -> ChangeAssessment {
    let mut running = Money::zero();
    let mut excess = false;

    for &cash in grabbed {
        running += cash;
        if !excess && running > change_owed {
            excess = true;
        }
    }

    ChangeAssessment {
        excess,
        insufficient: running < change_owed,
        total_grabbed: running,
    }
}

// =============================================================================
// Cash Register
// =============================================================================

/// What a register close found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisterReport {
    pub total: Money,
    pub payment: Money,
    pub change_owed: Money,
    pub change_given: Money,
    pub mistakes: Vec<MistakeKind>,
}

/// The open register for one transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CashRegister {
    total: Money,
    payment: Money,
    grabbed: Vec<Money>,
}

impl CashRegister {
    /// Opens the register for `total` with the customer's first offer.
    pub fn open(total: Money, payment: Money) -> Self {
        let register = CashRegister {
            total,
            payment: payment.non_negative(),
            grabbed: Vec::new(),
        };
        info!(total = %total, payment = %register.payment, "Register opened");
        register
    }

    pub fn total(&self) -> Money {
        self.total
    }

    pub fn payment(&self) -> Money {
        self.payment
    }

    /// Cash taken out of the drawer so far, in order.
    pub fn grabbed(&self) -> &[Money] {
        &self.grabbed
    }

    pub fn status(&self) -> PaymentStatus {
        evaluate_payment(self.total, self.payment)
    }

    /// The customer hands over more cash.
    pub fn request_more_cash(&mut self, additional: Money) -> PaymentStatus {
        self.payment = request_more_cash(self.payment, additional.non_negative());
        let status = self.status();
        debug!(payment = %self.payment, ?status, "Additional cash received");
        status
    }

    /// Takes one note or coin out of the drawer.
    pub fn grab_cash(&mut self, denomination: Money) -> CoreResult<()> {
        validate_denomination(denomination)?;
        self.grabbed.push(denomination);
        debug!(denomination = %denomination, count = self.grabbed.len(), "Cash grabbed");
        Ok(())
    }

    /// Closes the register and records every mistake the close reveals.
    pub fn close(
        self,
        customer: &Customer,
        scanned: &[Item],
        acc: &mut ShiftAccumulator,
    ) -> RegisterReport {
        let change_owed = self.status().change_owed();
        let change = assess_change(change_owed, &self.grabbed);
        let mut mistakes = Vec::new();

        if change.excess {
            mistakes.push(MistakeKind::ExcessChangeGiven);
        }
        if change.insufficient {
            mistakes.push(MistakeKind::InsufficientChangeGiven);
        }
        if self.payment < self.total {
            mistakes.push(MistakeKind::InsufficientPayment);
        }
        if customer.is_underage() && scanned.iter().any(Item::is_restricted) {
            mistakes.push(MistakeKind::RestrictedSaleToMinor);
        }

        for &kind in &mistakes {
            acc.track_mistake(kind);
        }

        info!(
            customer = %customer.id(),
            total = %self.total,
            payment = %self.payment,
            change_owed = %change_owed,
            change_given = %change.total_grabbed,
            mistakes = mistakes.len(),
            "Register closed"
        );

        RegisterReport {
            total: self.total,
            payment: self.payment,
            change_owed,
            change_given: change.total_grabbed,
            mistakes,
        }
    }
}
