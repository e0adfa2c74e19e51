//! # Automated Cashier
//!
//! Plays the player's part at the lane: checks IDs, scans the shopping
//! list, takes payment and counts out change. Each step costs virtual time
//! on the [`ManualClock`], and each has a configurable chance of going
//! wrong so the shift produces a realistic spread of mistakes.
//!
//! ## One Customer
//! ```text
//! ┌──────────┐ fake ID? ┌──────────┐ underage + restricted? ┌──────────┐
//! │ ID check │────────► │  reject  │ ◄──────────────────────│  scan    │
//! └────┬─────┘          └──────────┘                        │  items   │
//!      └───────────────────────────────────────────────────►└────┬─────┘
//!                                                                 ▼
//!      ┌──────────┐   ┌─────────────┐   ┌──────────────┐   ┌───────────┐
//!      │  close   │◄──│ count change│◄──│ top-ups until│◄──│ open with │
//!      │ register │   │  (greedy)   │   │   covered    │   │ first cash│
//!      └──────────┘   └─────────────┘   └──────────────┘   └───────────┘
//! ```

use chrono::{DateTime, Utc};
use rand::Rng;
use tracing::debug;

use shiftline_core::{
    simulate_payment, simulate_top_up, CheckoutLane, Clock, Disposition, ManualClock, Money,
    DENOMINATIONS,
};

use crate::config::{CashierSettings, ShiftSettings};
use crate::error::SimResult;

/// What became of the cashier's attempt to serve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Served {
    /// Nobody at the lane.
    Idle,
    Finished(Disposition),
    /// Closing time arrived mid-transaction; the customer is still at the lane.
    Interrupted,
}

#[derive(Debug, Clone)]
pub struct Cashier {
    settings: CashierSettings,
    scan_secs: f64,
    payment_secs: f64,
}

impl Cashier {
    pub fn new(settings: CashierSettings, shift: &ShiftSettings) -> Self {
        Cashier {
            settings,
            scan_secs: shift.scan_secs,
            payment_secs: shift.payment_secs,
        }
    }

    /// Serves the customer currently at the lane, start to finish.
    ///
    /// Stops with [`Served::Interrupted`] as soon as a step would run past
    /// `closing`, leaving the clock at `closing`.
    pub fn serve(
        &self,
        lane: &mut CheckoutLane<ManualClock>,
        clock: &ManualClock,
        closing: DateTime<Utc>,
        rng: &mut impl Rng,
    ) -> SimResult<Served> {
        let customer = match lane.session().customer() {
            Some(customer) => customer.clone(),
            None => return Ok(Served::Idle),
        };

        // ID check
        if !spend(clock, self.payment_secs, closing) {
            return Ok(Served::Interrupted);
        }
        if customer.is_fake() && !slips(rng, self.settings.missed_id_rate) {
            return Ok(Served::Finished(lane.reject_customer()?.disposition));
        }
        if slips(rng, self.settings.wrong_rejection_rate) {
            debug!(customer = %customer.id(), "Cashier turns away a customer on a hunch");
            return Ok(Served::Finished(lane.reject_customer()?.disposition));
        }

        for item in customer.shopping_list() {
            if !spend(clock, self.scan_secs, closing) {
                return Ok(Served::Interrupted);
            }
            if slips(rng, self.settings.skip_item_rate) {
                debug!(item = item.name(), "Cashier skips an item");
                continue;
            }
            lane.scan_item(item.clone())?;

            if slips(rng, self.settings.double_scan_rate) {
                lane.scan_item(item.clone())?;
                if !spend(clock, self.scan_secs, closing) {
                    return Ok(Served::Interrupted);
                }
                lane.void_item(item)?;
            }

            if item.is_restricted()
                && customer.is_underage()
                && !slips(rng, self.settings.missed_id_rate)
            {
                return Ok(Served::Finished(lane.reject_customer()?.disposition));
            }
        }

        // Payment
        if !spend(clock, self.payment_secs, closing) {
            return Ok(Served::Interrupted);
        }
        let total = lane.session().cart().running_total();
        let mut status = lane.open_register(simulate_payment(rng, total))?;
        while !status.is_sufficient() {
            if slips(rng, self.settings.accept_underpayment_rate) {
                debug!(customer = %customer.id(), "Cashier lets an underpayment go");
                break;
            }
            if !spend(clock, self.payment_secs, closing) {
                return Ok(Served::Interrupted);
            }
            status = lane.request_more_cash(simulate_top_up(rng))?;
        }

        // Change
        let mut change = make_change(status.change_owed());
        if slips(rng, self.settings.wrong_change_rate) {
            miscount(&mut change, rng);
        }
        if !spend(clock, self.payment_secs, closing) {
            return Ok(Served::Interrupted);
        }
        for note in change {
            lane.grab_cash(note)?;
        }

        let receipt = lane.close_register()?;
        Ok(Served::Finished(receipt.outcome.disposition))
    }
}

/// Fewest notes and coins adding up to `amount`.
pub fn make_change(amount: Money) -> Vec<Money> {
    let mut left = amount.cents();
    let mut change = Vec::new();
    for denomination in DENOMINATIONS {
        while left >= denomination.cents() {
            change.push(denomination);
            left -= denomination.cents();
        }
    }
    change
}

/// Either drops a coin or adds a stray one.
fn miscount(change: &mut Vec<Money>, rng: &mut impl Rng) {
    if !change.is_empty() && rng.gen_bool(0.5) {
        change.pop();
    } else {
        change.push(DENOMINATIONS[rng.gen_range(0..DENOMINATIONS.len())]);
    }
}

fn slips(rng: &mut impl Rng, rate: f64) -> bool {
    rate > 0.0 && rng.gen_bool(rate.min(1.0))
}

/// Advances the clock by `secs`, or to `closing` if that comes first.
/// Returns false when closing time was reached.
fn spend(clock: &ManualClock, secs: f64, closing: DateTime<Utc>) -> bool {
    let now = clock.now();
    let left = shiftline_core::clock::elapsed_secs(now, closing);
    if secs >= left {
        clock.advance(closing - now);
        return false;
    }
    clock.advance_secs(secs);
    true
}
