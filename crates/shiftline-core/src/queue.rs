//! # Customer Queue
//!
//! Strict FIFO line of customers waiting for the checkout lane. No priority
//! reordering: the head of the line is always served next.
//!
//! The "serve automatically when the lane is idle" rule belongs to
//! [`CheckoutLane`](crate::lane::CheckoutLane), which owns both the queue
//! and the session.

use std::collections::VecDeque;
use tracing::debug;

use crate::error::{CoreError, CoreResult};
use crate::types::Customer;

#[derive(Debug, Clone, Default)]
pub struct CustomerQueue {
    waiting: VecDeque<Customer>,
}

impl CustomerQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a customer to the tail.
    pub fn enqueue(&mut self, customer: Customer) {
        debug!(
            customer = %customer.id(),
            name = %customer.full_name(),
            position = self.waiting.len() + 1,
            "Customer joined the queue"
        );
        self.waiting.push_back(customer);
    }

    /// Removes the customer at the head.
    pub fn dequeue(&mut self) -> CoreResult<Customer> {
        self.waiting.pop_front().ok_or(CoreError::EmptyQueue)
    }

    /// Customer at the head, if any.
    pub fn peek(&self) -> Option<&Customer> {
        self.waiting.front()
    }

    pub fn len(&self) -> usize {
        self.waiting.len()
    }

    pub fn is_empty(&self) -> bool {
        self.waiting.is_empty()
    }

    /// Drops everyone still waiting; returns how many left.
    pub fn clear(&mut self) -> usize {
        let n = self.waiting.len();
        self.waiting.clear();
        n
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn customer(first: &str) -> Customer {
        let d = NaiveDate::from_ymd_opt(1990, 1, 1).unwrap();
        let today = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
        Customer::new(first, "Walker", d, d, false, vec![], today).unwrap()
    }

    #[test]
    fn test_fifo_order() {
        let mut queue = CustomerQueue::new();
        queue.enqueue(customer("Alice"));
        queue.enqueue(customer("Bob"));
        queue.enqueue(customer("Charlie"));

        assert_eq!(queue.dequeue().unwrap().first_name(), "Alice");
        assert_eq!(queue.dequeue().unwrap().first_name(), "Bob");
        assert_eq!(queue.dequeue().unwrap().first_name(), "Charlie");
    }

    #[test]
    fn test_dequeue_empty_fails() {
        let mut queue = CustomerQueue::new();
        assert_eq!(queue.dequeue().unwrap_err(), CoreError::EmptyQueue);
    }

    #[test]
    fn test_clear() {
        let mut queue = CustomerQueue::new();
        queue.enqueue(customer("Diana"));
        queue.enqueue(customer("Eve"));
        assert_eq!(queue.clear(), 2);
        assert!(queue.is_empty());
    }
}
