//! # Lane Events
//!
//! Notifications the checkout lane publishes to whoever drives the display:
//! a VR scene, a terminal, a test.
//!
//! ## Delivery
//! Observers are called synchronously, inside the lane operation that caused
//! the event, in the order they subscribed. Events from one operation are
//! delivered in the order they happened.

use serde::Serialize;
use uuid::Uuid;

use crate::ledger::MistakeKind;
use crate::money::Money;
use crate::payment::PaymentStatus;
use crate::session::Disposition;
use crate::snapshot::ShiftSnapshot;

/// Something that happened at the lane.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LaneEvent {
    CustomerQueued {
        customer_id: Uuid,
        queue_len: usize,
    },
    CustomerAssigned {
        customer_id: Uuid,
        name: String,
    },
    ItemScanned {
        name: String,
        price: Money,
        running_total: Money,
    },
    ItemVoided {
        name: String,
        price: Money,
        running_total: Money,
    },
    PaymentUpdated {
        payment: Money,
        status: PaymentStatus,
    },
    RegisterClosed {
        change_owed: Money,
        change_given: Money,
        mistakes: Vec<MistakeKind>,
    },
    TransactionFinished {
        customer_id: Uuid,
        disposition: Disposition,
        duration_secs: f64,
    },
    ShiftEnded {
        snapshot: ShiftSnapshot,
    },
}

/// Subscriber to lane events.
pub trait LaneObserver {
    fn on_event(&mut self, event: &LaneEvent);
}

/// Observer that ignores everything.
pub struct NoOpObserver;

impl LaneObserver for NoOpObserver {
    fn on_event(&mut self, _event: &LaneEvent) {}
}

/// Observer that keeps every event, for tests and replays.
#[derive(Debug, Default)]
pub struct RecordingObserver {
    events: Vec<LaneEvent>,
}

impl RecordingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> &[LaneEvent] {
        &self.events
    }
}

impl LaneObserver for RecordingObserver {
    fn on_event(&mut self, event: &LaneEvent) {
        self.events.push(event.clone());
    }
}

/// Ordered list of observers.
#[derive(Default)]
pub(crate) struct ObserverList {
    observers: Vec<Box<dyn LaneObserver>>,
}

impl ObserverList {
    pub(crate) fn subscribe(&mut self, observer: Box<dyn LaneObserver>) {
        self.observers.push(observer);
    }

    pub(crate) fn publish(&mut self, event: LaneEvent) {
        for observer in &mut self.observers {
            observer.on_event(&event);
        }
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.observers.len()
    }
}

impl std::fmt::Debug for ObserverList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObserverList")
            .field("observers", &self.observers.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    struct Tagged {
        tag: &'static str,
        log: Rc<RefCell<Vec<&'static str>>>,
    }

    impl LaneObserver for Tagged {
        fn on_event(&mut self, _event: &LaneEvent) {
            self.log.borrow_mut().push(self.tag);
        }
    }

    #[test]
    fn test_observers_called_in_subscription_order() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut list = ObserverList::default();
        list.subscribe(Box::new(Tagged { tag: "first", log: log.clone() }));
        list.subscribe(Box::new(NoOpObserver));
        list.subscribe(Box::new(Tagged { tag: "second", log: log.clone() }));

        list.publish(LaneEvent::CustomerQueued {
            customer_id: Uuid::new_v4(),
            queue_len: 1,
        });
        list.publish(LaneEvent::CustomerQueued {
            customer_id: Uuid::new_v4(),
            queue_len: 2,
        });

        assert_eq!(list.len(), 3);
        assert_eq!(*log.borrow(), vec!["first", "second", "first", "second"]);
    }
}
