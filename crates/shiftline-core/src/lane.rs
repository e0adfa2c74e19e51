//! # Checkout Lane
//!
//! The single checkout lane: queue, session, register and shift accumulator
//! owned together and driven through one object.
//!
//! ## Ownership
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          CheckoutLane                                   │
//! │                                                                         │
//! │   enqueue ──► ┌───────────────┐  serve_next  ┌─────────────────┐       │
//! │               │ CustomerQueue │ ───────────► │ CheckoutSession │       │
//! │               └───────────────┘              └────────┬────────┘       │
//! │                       ▲                               │ open_register  │
//! │                       │ next customer                 ▼                │
//! │                       │                      ┌─────────────────┐       │
//! │                       └───────────────────── │  CashRegister   │       │
//! │                          close_register      └─────────────────┘       │
//! │                                                                         │
//! │   ShiftAccumulator ◄── every scan, void, reject, close                 │
//! │   ShiftBaseline    ──► end_shift ──► ShiftSnapshot (exactly once)      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The lane is never left idle while customers wait: enqueueing into an idle
//! lane serves immediately, and every finished transaction serves the next
//! customer in line.

use tracing::{info, warn};

use crate::accumulator::ShiftAccumulator;
use crate::clock::Clock;
use crate::error::{CoreError, CoreResult};
use crate::events::{LaneEvent, LaneObserver, ObserverList};
use crate::money::Money;
use crate::payment::{CashRegister, PaymentStatus, RegisterReport};
use crate::queue::CustomerQueue;
use crate::session::{CheckoutSession, SessionState, TransactionOutcome};
use crate::snapshot::{ShiftBaseline, ShiftSnapshot};
use crate::types::{Customer, Item};

/// Result of checking a customer out through the register.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckoutReceipt {
    pub register: RegisterReport,
    pub outcome: TransactionOutcome,
}

/// One checkout lane for one shift.
#[derive(Debug)]
pub struct CheckoutLane<C: Clock> {
    queue: CustomerQueue,
    session: CheckoutSession,
    register: Option<CashRegister>,
    /// `None` once the shift has ended.
    accumulator: Option<ShiftAccumulator>,
    baseline: ShiftBaseline,
    clock: C,
    observers: ObserverList,
}

impl<C: Clock> CheckoutLane<C> {
    /// Opens the lane for a shift against the loaded baseline.
    pub fn new(baseline: ShiftBaseline, clock: C) -> Self {
        info!(player = baseline.player_id(), "Checkout lane opened");
        CheckoutLane {
            queue: CustomerQueue::new(),
            session: CheckoutSession::new(),
            register: None,
            accumulator: Some(ShiftAccumulator::new()),
            baseline,
            clock,
            observers: ObserverList::default(),
        }
    }

    pub fn subscribe(&mut self, observer: Box<dyn LaneObserver>) {
        self.observers.subscribe(observer);
    }

    // =========================================================================
    // Read Access
    // =========================================================================

    pub fn state(&self) -> SessionState {
        self.session.state()
    }

    /// A customer is being served.
    pub fn peek_busy(&self) -> bool {
        self.session.state().is_busy()
    }

    pub fn queue_len(&self) -> usize {
        self.queue.len()
    }

    pub fn session(&self) -> &CheckoutSession {
        &self.session
    }

    pub fn register(&self) -> Option<&CashRegister> {
        self.register.as_ref()
    }

    pub fn baseline(&self) -> &ShiftBaseline {
        &self.baseline
    }

    /// Running deltas for the shift; `None` after the shift ended.
    pub fn accumulator(&self) -> Option<&ShiftAccumulator> {
        self.accumulator.as_ref()
    }

    pub fn is_closed(&self) -> bool {
        self.accumulator.is_none()
    }

    // =========================================================================
    // Queue
    // =========================================================================

    /// Puts a customer in line, serving them at once if the lane is idle.
    pub fn enqueue(&mut self, customer: Customer) -> CoreResult<()> {
        self.ensure_open()?;

        let customer_id = customer.id();
        self.queue.enqueue(customer);
        self.observers.publish(LaneEvent::CustomerQueued {
            customer_id,
            queue_len: self.queue.len(),
        });

        if !self.peek_busy() {
            self.serve_next()?;
        }
        Ok(())
    }

    /// Assigns the head of the queue to the idle session.
    pub fn serve_next(&mut self) -> CoreResult<()> {
        self.ensure_open()?;
        if self.peek_busy() {
            return Err(CoreError::invalid_state("serve the next customer", self.session.state()));
        }

        let customer = self.queue.dequeue()?;
        let event = LaneEvent::CustomerAssigned {
            customer_id: customer.id(),
            name: customer.full_name(),
        };
        self.session.assign_customer(customer, self.clock.now())?;
        self.observers.publish(event);
        Ok(())
    }

    // =========================================================================
    // Scanning
    // =========================================================================

    pub fn scan_item(&mut self, item: Item) -> CoreResult<()> {
        let acc = self.accumulator.as_mut().ok_or(CoreError::ShiftClosed)?;

        let (name, price) = (item.name().to_string(), item.price());
        self.session.scan_item(item, acc)?;
        self.observers.publish(LaneEvent::ItemScanned {
            name,
            price,
            running_total: self.session.cart().running_total(),
        });
        Ok(())
    }

    pub fn void_item(&mut self, item: &Item) -> CoreResult<()> {
        let acc = self.accumulator.as_mut().ok_or(CoreError::ShiftClosed)?;

        self.session.void_item(item, acc)?;
        self.observers.publish(LaneEvent::ItemVoided {
            name: item.name().to_string(),
            price: item.price(),
            running_total: self.session.cart().running_total(),
        });
        Ok(())
    }

    /// Turns the current customer away and serves the next one.
    pub fn reject_customer(&mut self) -> CoreResult<TransactionOutcome> {
        let acc = self.accumulator.as_mut().ok_or(CoreError::ShiftClosed)?;

        let outcome = self.session.reject_customer(acc, self.clock.now())?;
        if self.register.take().is_some() {
            info!("Register closed without payment after rejection");
        }
        self.after_transaction(&outcome)?;
        Ok(outcome)
    }

    // =========================================================================
    // Register
    // =========================================================================

    /// Opens the register with the customer's first cash offer.
    pub fn open_register(&mut self, payment: Money) -> CoreResult<PaymentStatus> {
        self.ensure_open()?;
        self.session.begin_reconciliation()?;

        let register = CashRegister::open(self.session.cart().running_total(), payment);
        let status = register.status();
        self.observers.publish(LaneEvent::PaymentUpdated {
            payment: register.payment(),
            status,
        });
        self.register = Some(register);
        Ok(status)
    }

    /// The customer hands over more cash.
    pub fn request_more_cash(&mut self, additional: Money) -> CoreResult<PaymentStatus> {
        self.ensure_open()?;
        let state = self.session.state();
        let register = self
            .register
            .as_mut()
            .ok_or_else(|| CoreError::invalid_state("request more cash", state))?;

        let status = register.request_more_cash(additional);
        self.observers.publish(LaneEvent::PaymentUpdated {
            payment: register.payment(),
            status,
        });
        Ok(status)
    }

    /// Takes one note or coin out of the drawer as change.
    pub fn grab_cash(&mut self, denomination: Money) -> CoreResult<()> {
        self.ensure_open()?;
        let state = self.session.state();
        self.register
            .as_mut()
            .ok_or_else(|| CoreError::invalid_state("grab cash", state))?
            .grab_cash(denomination)
    }

    /// Closes the register, completes the checkout and serves the next
    /// customer.
    pub fn close_register(&mut self) -> CoreResult<CheckoutReceipt> {
        let acc = self.accumulator.as_mut().ok_or(CoreError::ShiftClosed)?;
        if self.session.state() != SessionState::Reconciling {
            return Err(CoreError::invalid_state("close the register", self.session.state()));
        }
        let (register, customer) = match (self.register.take(), self.session.customer()) {
            (Some(register), Some(customer)) => (register, customer),
            (register, _) => {
                self.register = register;
                return Err(CoreError::invalid_state("close the register", self.session.state()));
            }
        };

        let report = register.close(customer, self.session.cart().items(), acc);
        self.observers.publish(LaneEvent::RegisterClosed {
            change_owed: report.change_owed,
            change_given: report.change_given,
            mistakes: report.mistakes.clone(),
        });

        let outcome = self.session.complete_checkout(acc, self.clock.now())?;
        self.after_transaction(&outcome)?;

        Ok(CheckoutReceipt {
            register: report,
            outcome,
        })
    }

    // =========================================================================
    // Shift End
    // =========================================================================

    /// Ends the shift and merges its deltas into the baseline.
    ///
    /// An active transaction is abandoned through the normal reset and the
    /// waiting line is sent home. Works exactly once; later calls fail with
    /// [`CoreError::ShiftClosed`].
    pub fn end_shift(&mut self) -> CoreResult<ShiftSnapshot> {
        let mut acc = self.accumulator.take().ok_or(CoreError::ShiftClosed)?;

        self.register = None;
        if let Some(outcome) = self.session.abandon(&mut acc, self.clock.now()) {
            self.observers.publish(LaneEvent::TransactionFinished {
                customer_id: outcome.customer.id(),
                disposition: outcome.disposition,
                duration_secs: outcome.duration_secs,
            });
        }
        let sent_home = self.queue.clear();
        if sent_home > 0 {
            warn!(sent_home, "Shift ended with customers still waiting");
        }

        let snapshot = acc.end_shift(self.baseline.snapshot());
        info!(
            player = self.baseline.player_id(),
            shifts_completed = snapshot.shifts_completed,
            "Shift ended"
        );
        self.observers.publish(LaneEvent::ShiftEnded {
            snapshot: snapshot.clone(),
        });
        Ok(snapshot)
    }

    fn ensure_open(&self) -> CoreResult<()> {
        if self.accumulator.is_none() {
            return Err(CoreError::ShiftClosed);
        }
        Ok(())
    }

    fn after_transaction(&mut self, outcome: &TransactionOutcome) -> CoreResult<()> {
        self.observers.publish(LaneEvent::TransactionFinished {
            customer_id: outcome.customer.id(),
            disposition: outcome.disposition,
            duration_secs: outcome.duration_secs,
        });
        if !self.queue.is_empty() {
            self.serve_next()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::events::RecordingObserver;
    use crate::session::Disposition;
    use chrono::{NaiveDate, Utc};

    fn lane() -> (CheckoutLane<ManualClock>, ManualClock) {
        let clock = ManualClock::new(Utc::now());
        let baseline = ShiftBaseline::new("player-1", ShiftSnapshot::default(), clock.now());
        (CheckoutLane::new(baseline, clock.clone()), clock)
    }

    fn item(name: &str, cents: i64) -> Item {
        Item::new(name, Money::from_cents(cents), false).unwrap()
    }

    fn adult(first: &str, list: Vec<Item>) -> Customer {
        let dob = NaiveDate::from_ymd_opt(1975, 5, 5).unwrap();
        let expiry = NaiveDate::from_ymd_opt(2030, 5, 5).unwrap();
        let today = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
        Customer::new(first, "Taylor", dob, expiry, false, list, today).unwrap()
    }

    #[test]
    fn test_enqueue_into_idle_lane_serves_immediately() {
        let (mut lane, _) = lane();
        assert!(!lane.peek_busy());

        lane.enqueue(adult("Alice", vec![])).unwrap();
        assert!(lane.peek_busy());
        assert_eq!(lane.queue_len(), 0);
        assert_eq!(lane.state(), SessionState::Assigned);

        lane.enqueue(adult("Bob", vec![])).unwrap();
        assert_eq!(lane.queue_len(), 1);
        assert_eq!(lane.session().customer().unwrap().first_name(), "Alice");
    }

    #[test]
    fn test_serve_next_on_empty_queue() {
        let (mut lane, _) = lane();
        assert_eq!(lane.serve_next().unwrap_err(), CoreError::EmptyQueue);
    }

    #[test]
    fn test_checkout_serves_next_in_line() {
        let (mut lane, clock) = lane();
        let bread = item("Bread", 250);
        lane.enqueue(adult("Alice", vec![bread.clone()])).unwrap();
        lane.enqueue(adult("Bob", vec![])).unwrap();

        lane.scan_item(bread).unwrap();
        let status = lane.open_register(Money::from_cents(500)).unwrap();
        assert_eq!(status, PaymentStatus::Sufficient { change: Money::from_cents(250) });
        lane.grab_cash(Money::from_cents(200)).unwrap();
        lane.grab_cash(Money::from_cents(50)).unwrap();
        clock.advance_secs(30.0);

        let receipt = lane.close_register().unwrap();
        assert!(receipt.register.mistakes.is_empty());
        assert_eq!(receipt.outcome.disposition, Disposition::Completed);
        assert_eq!(receipt.outcome.duration_secs, 30.0);

        assert_eq!(lane.session().customer().unwrap().first_name(), "Bob");
        assert_eq!(lane.queue_len(), 0);
        assert_eq!(lane.accumulator().unwrap().customers_served(), 1);
    }

    #[test]
    fn test_register_operations_need_open_register() {
        let (mut lane, _) = lane();
        lane.enqueue(adult("Alice", vec![])).unwrap();

        assert!(matches!(
            lane.request_more_cash(Money::from_cents(100)),
            Err(CoreError::InvalidState { .. })
        ));
        assert!(matches!(lane.grab_cash(Money::from_cents(100)), Err(CoreError::InvalidState { .. })));
        assert!(matches!(lane.close_register(), Err(CoreError::InvalidState { .. })));
        assert_eq!(lane.state(), SessionState::Assigned);
    }

    #[test]
    fn test_reject_while_register_open_discards_it() {
        let (mut lane, _) = lane();
        lane.enqueue(adult("Alice", vec![])).unwrap();
        lane.open_register(Money::from_cents(100)).unwrap();

        lane.reject_customer().unwrap();
        assert!(lane.register().is_none());
        assert_eq!(lane.state(), SessionState::Idle);
    }

    #[test]
    fn test_end_shift_only_once() {
        let (mut lane, _) = lane();
        lane.enqueue(adult("Alice", vec![])).unwrap();
        lane.scan_item(item("Tea", 350)).unwrap();

        let snapshot = lane.end_shift().unwrap();
        assert_eq!(snapshot.shifts_completed, 1);
        assert_eq!(snapshot.items_scanned, 1);
        // The abandoned customer still went through the reset
        assert_eq!(snapshot.customers_served, 1);

        assert_eq!(lane.end_shift().unwrap_err(), CoreError::ShiftClosed);
        assert_eq!(lane.scan_item(item("Tea", 350)).unwrap_err(), CoreError::ShiftClosed);
        assert_eq!(lane.enqueue(adult("Bob", vec![])).unwrap_err(), CoreError::ShiftClosed);
        assert!(lane.is_closed());
    }

    #[test]
    fn test_events_follow_operation_order() {
        let (mut lane, _) = lane();
        let recorder = std::rc::Rc::new(std::cell::RefCell::new(RecordingObserver::new()));

        struct Shared(std::rc::Rc<std::cell::RefCell<RecordingObserver>>);
        impl LaneObserver for Shared {
            fn on_event(&mut self, event: &LaneEvent) {
                self.0.borrow_mut().on_event(event);
            }
        }
        lane.subscribe(Box::new(Shared(recorder.clone())));

        lane.enqueue(adult("Alice", vec![])).unwrap();
        lane.scan_item(item("Tea", 350)).unwrap();
        lane.reject_customer().unwrap();

        let recorder = recorder.borrow();
        let kinds: Vec<&str> = recorder
            .events()
            .iter()
            .map(|e| match e {
                LaneEvent::CustomerQueued { .. } => "queued",
                LaneEvent::CustomerAssigned { .. } => "assigned",
                LaneEvent::ItemScanned { .. } => "scanned",
                LaneEvent::TransactionFinished { .. } => "finished",
                _ => "other",
            })
            .collect();
        assert_eq!(kinds, vec!["queued", "assigned", "scanned", "finished"]);
    }
}
