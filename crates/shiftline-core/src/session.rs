//! # Checkout Session
//!
//! The state machine for one customer's transaction at the single lane.
//!
//! ## State Machine
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Checkout Session States                             │
//! │                                                                         │
//! │            assign_customer                                              │
//! │   ┌──────┐ ─────────────► ┌──────────┐  scan_item   ┌──────────┐      │
//! │   │ Idle │                │ Assigned │ ───────────► │ Scanning │      │
//! │   └──────┘                └────┬─────┘              └────┬─────┘      │
//! │      ▲                         │   begin_reconciliation    │            │
//! │      │                         └────────────┬──────────────┘            │
//! │      │                                      ▼                           │
//! │      │                              ┌─────────────┐                     │
//! │      │                              │ Reconciling │                     │
//! │      │                              └──────┬──────┘                     │
//! │      │                                     │ complete_checkout          │
//! │      │        reset (missed items,         ▼                            │
//! │      └──────── transaction time) ◄── ┌──────────┐                      │
//! │                                      │ Complete │ ◄── reject_customer  │
//! │                                      └──────────┘     abandon          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! `Complete` is transient: every path into it runs the reset immediately and
//! the session is back in `Idle` when the call returns. A call made from the
//! wrong state fails with [`CoreError::InvalidState`] and changes nothing.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, info, warn};

use crate::accumulator::ShiftAccumulator;
use crate::clock::elapsed_secs;
use crate::error::{CoreError, CoreResult};
use crate::ledger::MistakeKind;
use crate::money::Money;
use crate::types::{Customer, Item};

// =============================================================================
// Session State
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionState {
    Idle,
    Assigned,
    Scanning,
    Reconciling,
    Complete,
}

impl SessionState {
    /// Items may be scanned or voided.
    pub fn accepts_items(&self) -> bool {
        matches!(self, SessionState::Assigned | SessionState::Scanning)
    }

    /// A customer is at the lane.
    pub fn is_busy(&self) -> bool {
        !matches!(self, SessionState::Idle)
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SessionState::Idle => "Idle",
            SessionState::Assigned => "Assigned",
            SessionState::Scanning => "Scanning",
            SessionState::Reconciling => "Reconciling",
            SessionState::Complete => "Complete",
        };
        f.write_str(s)
    }
}

// =============================================================================
// Cart
// =============================================================================

/// Items scanned for the active customer.
///
/// ## Invariant
/// `running_total == sum(scanned prices)` at all times. Every mutation adjusts
/// the total by exactly the price of the item it adds or removes; nothing
/// ever recomputes it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cart {
    scanned: Vec<Item>,
    running_total: Money,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&mut self, item: Item) {
        self.running_total += item.price();
        self.scanned.push(item);
    }

    /// Removes the most recently scanned entry equal to `item`.
    fn remove_last(&mut self, item: &Item) -> Option<Item> {
        let index = self.scanned.iter().rposition(|scanned| scanned == item)?;
        let removed = self.scanned.remove(index);
        self.running_total -= removed.price();
        Some(removed)
    }

    fn clear(&mut self) {
        self.scanned.clear();
        self.running_total = Money::zero();
    }

    /// Scanned items, in scan order.
    pub fn items(&self) -> &[Item] {
        &self.scanned
    }

    pub fn running_total(&self) -> Money {
        self.running_total
    }

    pub fn len(&self) -> usize {
        self.scanned.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scanned.is_empty()
    }

    /// Any scanned item is age-restricted.
    pub fn has_restricted(&self) -> bool {
        self.scanned.iter().any(Item::is_restricted)
    }
}

// =============================================================================
// Transaction Outcome
// =============================================================================

/// How a transaction left the lane.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Disposition {
    /// Paid for and checked out through the register.
    Completed,
    /// Turned away by the cashier.
    Rejected { justified: bool },
    /// Cut short by the end of the shift.
    Abandoned,
}

/// Summary of a finished transaction, produced by the reset.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionOutcome {
    pub customer: Customer,
    pub disposition: Disposition,
    pub items_scanned: usize,
    pub total: Money,
    /// Shopping-list items that never reached the cart.
    pub missed_items: usize,
    pub duration_secs: f64,
}

// =============================================================================
// Checkout Session
// =============================================================================

/// The single checkout session of the lane.
#[derive(Debug, Clone)]
pub struct CheckoutSession {
    state: SessionState,
    customer: Option<Customer>,
    cart: Cart,
    started_at: Option<DateTime<Utc>>,
}

impl Default for CheckoutSession {
    fn default() -> Self {
        Self::new()
    }
}

impl CheckoutSession {
    pub fn new() -> Self {
        CheckoutSession {
            state: SessionState::Idle,
            customer: None,
            cart: Cart::new(),
            started_at: None,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn customer(&self) -> Option<&Customer> {
        self.customer.as_ref()
    }

    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    /// The customer's shopping list: items presented at the counter.
    pub fn available_items(&self) -> &[Item] {
        self.customer.as_ref().map(Customer::shopping_list).unwrap_or(&[])
    }

    /// Takes a customer at the lane and starts the transaction timer.
    pub fn assign_customer(&mut self, customer: Customer, now: DateTime<Utc>) -> CoreResult<()> {
        if self.state != SessionState::Idle {
            return Err(CoreError::invalid_state("assign a customer", self.state));
        }

        info!(
            customer = %customer.id(),
            name = %customer.full_name(),
            items = customer.shopping_list().len(),
            "Customer assigned to checkout"
        );

        self.customer = Some(customer);
        self.started_at = Some(now);
        self.state = SessionState::Assigned;
        Ok(())
    }

    /// Scans one item into the cart.
    ///
    /// Items that are not on the shopping list are accepted; the comparison
    /// happens only at reset.
    pub fn scan_item(&mut self, item: Item, acc: &mut ShiftAccumulator) -> CoreResult<()> {
        if !self.state.accepts_items() {
            return Err(CoreError::invalid_state("scan an item", self.state));
        }

        acc.track_item_scan(item.price(), false, false);
        self.cart.push(item);
        self.state = SessionState::Scanning;

        debug!(
            items = self.cart.len(),
            running_total = %self.cart.running_total(),
            "Item scanned"
        );
        Ok(())
    }

    /// Voids the most recent scan of `item`.
    ///
    /// A void counts as an overcharge: the cashier billed something that had
    /// to be taken back off.
    pub fn void_item(&mut self, item: &Item, acc: &mut ShiftAccumulator) -> CoreResult<()> {
        if !self.state.accepts_items() {
            return Err(CoreError::invalid_state("void an item", self.state));
        }

        let removed = self
            .cart
            .remove_last(item)
            .ok_or_else(|| CoreError::ItemNotInCart(item.name().to_string()))?;
        acc.track_mistake(MistakeKind::CustomerOvercharged);

        debug!(
            item = removed.name(),
            running_total = %self.cart.running_total(),
            "Item voided"
        );
        Ok(())
    }

    /// Turns the current customer away.
    ///
    /// Justified only for a fake ID, or for a minor with a restricted item in
    /// the cart. Anything else records an invalid rejection.
    pub fn reject_customer(
        &mut self,
        acc: &mut ShiftAccumulator,
        now: DateTime<Utc>,
    ) -> CoreResult<TransactionOutcome> {
        let customer = match &self.customer {
            Some(customer) => customer,
            None => return Err(CoreError::invalid_state("reject a customer", self.state)),
        };

        let justified =
            customer.is_fake() || (customer.is_underage() && self.cart.has_restricted());
        if justified {
            info!(customer = %customer.id(), "Customer rejected (fake ID or underage)");
        } else {
            warn!(customer = %customer.id(), "Customer rejected without a valid reason");
            acc.track_mistake(MistakeKind::InvalidRejection);
        }

        self.finish(Disposition::Rejected { justified }, acc, now)
    }

    /// The register was opened: payment handling begins.
    pub fn begin_reconciliation(&mut self) -> CoreResult<()> {
        if !self.state.accepts_items() {
            return Err(CoreError::invalid_state("open the register", self.state));
        }
        self.state = SessionState::Reconciling;
        Ok(())
    }

    /// Finishes a reconciled transaction and resets the session.
    pub fn complete_checkout(
        &mut self,
        acc: &mut ShiftAccumulator,
        now: DateTime<Utc>,
    ) -> CoreResult<TransactionOutcome> {
        if self.state != SessionState::Reconciling {
            return Err(CoreError::invalid_state("complete checkout", self.state));
        }
        self.finish(Disposition::Completed, acc, now)
    }

    /// Ends the active transaction because the shift is over.
    ///
    /// Returns `None` when the lane was idle.
    pub fn abandon(&mut self, acc: &mut ShiftAccumulator, now: DateTime<Utc>) -> Option<TransactionOutcome> {
        if self.customer.is_none() {
            return None;
        }
        self.finish(Disposition::Abandoned, acc, now).ok()
    }

    /// `Complete` and the reset back to `Idle`.
    ///
    /// Records one undercharge when any listed item was never scanned, then
    /// the transaction time.
    fn finish(
        &mut self,
        disposition: Disposition,
        acc: &mut ShiftAccumulator,
        now: DateTime<Utc>,
    ) -> CoreResult<TransactionOutcome> {
        let customer = self
            .customer
            .take()
            .ok_or_else(|| CoreError::invalid_state("finish a transaction", self.state))?;
        self.state = SessionState::Complete;

        let missed_items = customer.shopping_list().len().saturating_sub(self.cart.len());
        if missed_items > 0 {
            acc.track_mistake(MistakeKind::CustomerUndercharged);
            debug!(customer = %customer.id(), missed_items, "Listed items were not scanned");
        }

        let duration_secs = self
            .started_at
            .take()
            .map(|start| elapsed_secs(start, now).max(0.0))
            .unwrap_or(0.0);
        acc.complete_transaction(duration_secs);

        let outcome = TransactionOutcome {
            customer,
            disposition,
            items_scanned: self.cart.len(),
            total: self.cart.running_total(),
            missed_items,
            duration_secs,
        };

        self.cart.clear();
        self.state = SessionState::Idle;
        debug!(?disposition, "Checkout reset");

        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate};
    use proptest::prelude::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn item(name: &str, cents: i64, restricted: bool) -> Item {
        Item::new(name, Money::from_cents(cents), restricted).unwrap()
    }

    fn customer(dob: NaiveDate, is_fake: bool, list: Vec<Item>) -> Customer {
        Customer::new("Grace", "Young", dob, date(2030, 1, 1), is_fake, list, date(2026, 10, 19)).unwrap()
    }

    fn adult(list: Vec<Item>) -> Customer {
        customer(date(1985, 4, 2), false, list)
    }

    fn minor(list: Vec<Item>) -> Customer {
        customer(date(2012, 4, 2), false, list)
    }

    #[test]
    fn test_scan_while_idle_fails_and_leaves_cart_unchanged() {
        let mut session = CheckoutSession::new();
        let mut acc = ShiftAccumulator::new();

        let err = session.scan_item(item("Milk", 199, false), &mut acc).unwrap_err();
        assert!(matches!(err, CoreError::InvalidState { .. }));
        assert!(session.cart().is_empty());
        assert_eq!(session.cart().running_total(), Money::zero());
        assert_eq!(acc.items_scanned(), 0);
    }

    #[test]
    fn test_assign_only_from_idle() {
        let mut session = CheckoutSession::new();
        let now = Utc::now();
        session.assign_customer(adult(vec![]), now).unwrap();

        let err = session.assign_customer(adult(vec![]), now).unwrap_err();
        assert!(matches!(err, CoreError::InvalidState { .. }));
        assert_eq!(session.state(), SessionState::Assigned);
    }

    #[test]
    fn test_running_total_tracks_scans_and_voids() {
        let mut session = CheckoutSession::new();
        let mut acc = ShiftAccumulator::new();
        session.assign_customer(adult(vec![]), Utc::now()).unwrap();

        let milk = item("Milk", 199, false);
        let bread = item("Bread", 250, false);
        let cheese = item("Cheese", 475, false);

        for it in [&milk, &bread, &milk, &cheese, &milk] {
            session.scan_item(it.clone(), &mut acc).unwrap();
        }
        session.void_item(&milk, &mut acc).unwrap();
        session.void_item(&cheese, &mut acc).unwrap();

        let cart = session.cart();
        let sum: Money = cart.items().iter().map(Item::price).sum();
        assert_eq!(cart.running_total(), sum);
        assert_eq!(cart.running_total(), Money::from_cents(199 + 250 + 199));
        // The most recent milk went; order of the rest is kept
        let names: Vec<&str> = cart.items().iter().map(Item::name).collect();
        assert_eq!(names, vec!["Milk", "Bread", "Milk"]);
    }

    // Indices 0..3 are scanned; 3 is never in the cart, so voiding it fails.
    fn shelf() -> [Item; 4] {
        [
            item("Milk", 199, false),
            item("Bread", 250, false),
            item("Cheese", 475, false),
            item("Caviar", 9999, false),
        ]
    }

    proptest! {
        #[test]
        fn running_total_matches_cart_after_every_step(
            ops in prop::collection::vec((any::<bool>(), 0usize..4), 0..40)
        ) {
            let shelf = shelf();
            let mut session = CheckoutSession::new();
            let mut acc = ShiftAccumulator::new();
            session.assign_customer(adult(vec![]), Utc::now()).unwrap();

            for (scan, idx) in ops {
                let it = &shelf[idx];
                if scan && idx < 3 {
                    session.scan_item(it.clone(), &mut acc).unwrap();
                } else {
                    let before = session.cart().clone();
                    let mistakes = acc.ledger().total();
                    match session.void_item(it, &mut acc) {
                        Ok(()) => prop_assert_eq!(session.cart().len() + 1, before.len()),
                        Err(err) => {
                            prop_assert!(matches!(err, CoreError::ItemNotInCart(_)));
                            prop_assert_eq!(session.cart(), &before);
                            prop_assert_eq!(acc.ledger().total(), mistakes);
                        }
                    }
                }

                let cart = session.cart();
                let sum: Money = cart.items().iter().map(Item::price).sum();
                prop_assert_eq!(cart.running_total(), sum);
            }
        }
    }

    #[test]
    fn test_void_records_overcharge() {
        let mut session = CheckoutSession::new();
        let mut acc = ShiftAccumulator::new();
        session.assign_customer(adult(vec![]), Utc::now()).unwrap();

        let soda = item("Soda", 150, false);
        session.scan_item(soda.clone(), &mut acc).unwrap();
        session.void_item(&soda, &mut acc).unwrap();

        assert_eq!(acc.ledger().counters().customers_overcharged, 1);
    }

    #[test]
    fn test_void_absent_item_fails() {
        let mut session = CheckoutSession::new();
        let mut acc = ShiftAccumulator::new();
        session.assign_customer(adult(vec![]), Utc::now()).unwrap();
        session.scan_item(item("Soda", 150, false), &mut acc).unwrap();

        let err = session.void_item(&item("Chips", 300, false), &mut acc).unwrap_err();
        assert_eq!(err, CoreError::ItemNotInCart("Chips".to_string()));
        assert_eq!(session.cart().len(), 1);
        assert_eq!(acc.ledger().total(), 0);
    }

    #[test]
    fn test_reject_fake_id_is_justified() {
        let mut session = CheckoutSession::new();
        let mut acc = ShiftAccumulator::new();
        session
            .assign_customer(customer(date(1990, 1, 1), true, vec![]), Utc::now())
            .unwrap();

        let outcome = session.reject_customer(&mut acc, Utc::now()).unwrap();
        assert_eq!(outcome.disposition, Disposition::Rejected { justified: true });
        assert_eq!(acc.ledger().total(), 0);
        assert_eq!(session.state(), SessionState::Idle);
    }

    #[test]
    fn test_reject_adult_with_valid_id_is_a_mistake() {
        let mut session = CheckoutSession::new();
        let mut acc = ShiftAccumulator::new();
        session.assign_customer(adult(vec![]), Utc::now()).unwrap();

        let outcome = session.reject_customer(&mut acc, Utc::now()).unwrap();
        assert_eq!(outcome.disposition, Disposition::Rejected { justified: false });
        assert_eq!(acc.ledger().total(), 1);
        assert_eq!(acc.ledger().counters().total(), 0);
    }

    #[test]
    fn test_reject_minor_needs_restricted_item_in_cart() {
        let beer = item("Beer", 899, true);
        let mut acc = ShiftAccumulator::new();

        // Nothing restricted scanned yet
        let mut session = CheckoutSession::new();
        session.assign_customer(minor(vec![]), Utc::now()).unwrap();
        session.scan_item(item("Gum", 99, false), &mut acc).unwrap();
        let outcome = session.reject_customer(&mut acc, Utc::now()).unwrap();
        assert_eq!(outcome.disposition, Disposition::Rejected { justified: false });

        let mut acc = ShiftAccumulator::new();
        session.assign_customer(minor(vec![]), Utc::now()).unwrap();
        session.scan_item(beer, &mut acc).unwrap();
        let outcome = session.reject_customer(&mut acc, Utc::now()).unwrap();
        assert_eq!(outcome.disposition, Disposition::Rejected { justified: true });
        assert_eq!(acc.ledger().total(), 0);
    }

    #[test]
    fn test_reject_without_customer_fails() {
        let mut session = CheckoutSession::new();
        let mut acc = ShiftAccumulator::new();
        let err = session.reject_customer(&mut acc, Utc::now()).unwrap_err();
        assert!(matches!(err, CoreError::InvalidState { .. }));
        assert_eq!(acc.customers_served(), 0);
    }

    #[test]
    fn test_complete_requires_reconciling() {
        let mut session = CheckoutSession::new();
        let mut acc = ShiftAccumulator::new();
        session.assign_customer(adult(vec![]), Utc::now()).unwrap();

        let err = session.complete_checkout(&mut acc, Utc::now()).unwrap_err();
        assert!(matches!(err, CoreError::InvalidState { .. }));
        assert_eq!(session.state(), SessionState::Assigned);
    }

    #[test]
    fn test_missed_items_record_one_undercharge() {
        let list = vec![
            item("Apples", 300, false),
            item("Rice", 450, false),
            item("Beans", 120, false),
        ];
        let mut session = CheckoutSession::new();
        let mut acc = ShiftAccumulator::new();
        let start = Utc::now();
        session.assign_customer(adult(list.clone()), start).unwrap();
        session.scan_item(list[0].clone(), &mut acc).unwrap();
        session.begin_reconciliation().unwrap();

        let outcome = session
            .complete_checkout(&mut acc, start + Duration::seconds(42))
            .unwrap();

        assert_eq!(outcome.missed_items, 2);
        assert_eq!(acc.ledger().counters().customers_undercharged, 1);
        assert_eq!(outcome.duration_secs, 42.0);
        assert_eq!(acc.customers_served(), 1);
        assert_eq!(acc.total_time_secs(), 42.0);
        assert_eq!(session.state(), SessionState::Idle);
        assert!(session.cart().is_empty());
        assert!(session.customer().is_none());
    }

    #[test]
    fn test_scan_after_register_opened_fails() {
        let mut session = CheckoutSession::new();
        let mut acc = ShiftAccumulator::new();
        session.assign_customer(adult(vec![]), Utc::now()).unwrap();
        session.begin_reconciliation().unwrap();

        let err = session.scan_item(item("Tea", 350, false), &mut acc).unwrap_err();
        assert!(matches!(err, CoreError::InvalidState { .. }));
    }

    #[test]
    fn test_abandon_runs_reset() {
        let list = vec![item("Flour", 220, false)];
        let mut session = CheckoutSession::new();
        let mut acc = ShiftAccumulator::new();
        assert!(session.abandon(&mut acc, Utc::now()).is_none());

        session.assign_customer(adult(list), Utc::now()).unwrap();
        let outcome = session.abandon(&mut acc, Utc::now()).unwrap();
        assert_eq!(outcome.disposition, Disposition::Abandoned);
        assert_eq!(acc.ledger().counters().customers_undercharged, 1);
        assert_eq!(session.state(), SessionState::Idle);
    }
}
