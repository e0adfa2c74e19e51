//! # Money
//!
//! Every amount that crosses the lane: item prices, cart totals, customer
//! cash, change and shift profit.
//!
//! ## Integer Cents at the Register
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  scan 0.10 ─► scan 0.20 ─► void 0.10 ─► scan 0.10                       │
//! │                                                                         │
//! │  float total:  0.30000000000000004   change owed drifts off the drawer  │
//! │  cents total:  30                    change owed is an exact sum of     │
//! │                                      DENOMINATIONS                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ```rust
//! use shiftline_core::money::Money;
//!
//! let cart = Money::from_cents(1099) + Money::from_cents(500);
//! assert_eq!(cart.to_string(), "$15.99");
//! assert_eq!(cart.floor_dollars(), 15);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Sub, SubAssign};
use ts_rs::TS;

/// An amount in cents.
///
/// Signed: an underpaid register or a shift full of overcharges can go
/// below zero.
///
/// ```text
/// Item.price ──► Cart.running_total ──► evaluate_payment ──► change owed
///      │                                                         │
///      └──► ShiftAccumulator.profit ──► ShiftSnapshot            └──► close_register
/// ```
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS,
)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Whole dollars, rounded down. The high score is the floor of a shift's
    /// profit, so `-$0.50` scores `-1`.
    ///
    /// ```rust
    /// use shiftline_core::money::Money;
    ///
    /// assert_eq!(Money::from_cents(8099).floor_dollars(), 80);
    /// assert_eq!(Money::from_cents(-50).floor_dollars(), -1);
    /// ```
    #[inline]
    pub const fn floor_dollars(&self) -> i64 {
        self.0.div_euclid(100)
    }

    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Negative amounts become zero. Nobody hands over negative cash.
    #[inline]
    pub const fn non_negative(&self) -> Self {
        if self.0 < 0 {
            Money(0)
        } else {
            *self
        }
    }
}

/// `$10.99`, `-$5.50`. Honors width and alignment flags.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        f.pad(&format!("{}${}.{:02}", sign, abs / 100, abs % 100))
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Self) -> Self {
        Money(self.0 + rhs.0)
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Money(self.0 - rhs.0)
    }
}

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, rhs: Self) {
        self.0 -= rhs.0;
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        Money(iter.map(|m| m.0).sum())
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.copied().sum()
    }
}
