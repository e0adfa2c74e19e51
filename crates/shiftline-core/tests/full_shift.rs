//! A whole shift driven through the public lane API.

use chrono::{NaiveDate, Utc};
use rand::rngs::StdRng;
use rand::SeedableRng;
use shiftline_core::{
    default_catalog, simulate_payment, CheckoutLane, Clock, CoreError, Customer, CustomerGenerator, Disposition,
    GeneratorConfig, Item, ManualClock, Money, PaymentStatus, ShiftBaseline, ShiftSnapshot,
};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn item(name: &str, cents: i64, restricted: bool) -> Item {
    Item::new(name, Money::from_cents(cents), restricted).unwrap()
}

fn customer(first: &str, dob: NaiveDate, is_fake: bool, list: Vec<Item>) -> Customer {
    Customer::new(first, "Garcia", dob, date(2030, 1, 1), is_fake, list, date(2026, 10, 19)).unwrap()
}

fn returning_player() -> ShiftSnapshot {
    let mut snapshot = ShiftSnapshot {
        shifts_completed: 2,
        customers_served: 14,
        items_scanned: 40,
        profits_earned: Money::from_cents(21_000),
        high_score: 50,
        proficiency_score: 3,
        average_time_per_transaction: 75.0,
        ..Default::default()
    };
    snapshot.mistakes.excess_change_given = 1;
    snapshot
}

#[test]
fn scripted_shift_merges_into_baseline() {
    let clock = ManualClock::new(Utc::now());
    let baseline = ShiftBaseline::new("player-7", returning_player(), clock.now());
    let mut lane = CheckoutLane::new(baseline, clock.clone());

    let milk = item("Whole Milk", 199, false);
    let cereal = item("Breakfast Cereal", 459, false);
    let beer = item("Lager 6-Pack", 1299, true);

    // Adult pays 10.00 for 6.58; change is exact
    lane.enqueue(customer("Alice", date(1980, 1, 1), false, vec![milk.clone(), cereal.clone()]))
        .unwrap();
    // Minor sneaking beer
    lane.enqueue(customer("Ivy", date(2011, 6, 1), false, vec![beer.clone()]))
        .unwrap();
    // Forged ID, correctly refused
    lane.enqueue(customer("Jack", date(1990, 1, 1), true, vec![milk.clone()]))
        .unwrap();
    assert_eq!(lane.queue_len(), 2);

    lane.scan_item(milk.clone()).unwrap();
    lane.scan_item(cereal.clone()).unwrap();
    assert_eq!(
        lane.open_register(Money::from_cents(1000)).unwrap(),
        PaymentStatus::Sufficient { change: Money::from_cents(342) }
    );
    for cents in [200, 100, 20, 20, 1, 1] {
        lane.grab_cash(Money::from_cents(cents)).unwrap();
    }
    clock.advance_secs(40.0);
    let receipt = lane.close_register().unwrap();
    assert!(receipt.register.mistakes.is_empty());

    // Ivy: cashier sells beer to a minor and gives too much change
    lane.scan_item(beer.clone()).unwrap();
    lane.open_register(Money::from_cents(1300)).unwrap();
    lane.grab_cash(Money::from_cents(5)).unwrap();
    clock.advance_secs(20.0);
    let receipt = lane.close_register().unwrap();
    assert_eq!(receipt.register.mistakes.len(), 2);

    // Jack: rejected before anything was scanned
    clock.advance_secs(30.0);
    let outcome = lane.reject_customer().unwrap();
    assert_eq!(outcome.disposition, Disposition::Rejected { justified: true });
    assert!(!lane.peek_busy());

    let snapshot = lane.end_shift().unwrap();

    assert_eq!(snapshot.shifts_completed, 3);
    assert_eq!(snapshot.customers_served, 14 + 3);
    assert_eq!(snapshot.items_scanned, 40 + 3);
    assert_eq!(snapshot.profits_earned, Money::from_cents(21_000 + 199 + 459 + 1299));
    // Shift profit 19.57 does not beat 50
    assert_eq!(snapshot.high_score, 50);
    assert_eq!(snapshot.average_time_per_transaction, 30.0);
    assert_eq!(snapshot.mistakes.excess_change_given, 2);
    assert_eq!(snapshot.mistakes.restricted_sales_to_minors, 1);
    // Jack's milk was never scanned
    assert_eq!(snapshot.mistakes.customers_undercharged, 1);
    // 100 * 3 / ((3 + 1) * 30) = 2.5, rounded to even
    assert_eq!(snapshot.proficiency_score, 2);

    // Deltas cannot be merged a second time
    assert_eq!(lane.end_shift().unwrap_err(), CoreError::ShiftClosed);
}

#[test]
fn generated_shift_is_reproducible() {
    fn run(seed: u64) -> ShiftSnapshot {
        let mut rng = StdRng::seed_from_u64(seed);
        let clock = ManualClock::new(Utc::now());
        let generator = CustomerGenerator::new(default_catalog(), GeneratorConfig::default());
        let mut lane = CheckoutLane::new(
            ShiftBaseline::new("seeded", ShiftSnapshot::default(), clock.now()),
            clock.clone(),
        );

        for _ in 0..10 {
            let customer = generator.generate(&mut rng, date(2026, 10, 19)).unwrap();
            lane.enqueue(customer).unwrap();

            let list = lane.session().available_items().to_vec();
            for item in list {
                lane.scan_item(item).unwrap();
            }
            let total = lane.session().cart().running_total();
            let mut status = lane.open_register(simulate_payment(&mut rng, total)).unwrap();
            while !status.is_sufficient() {
                status = lane.request_more_cash(Money::from_cents(500)).unwrap();
            }
            clock.advance_secs(15.0);
            lane.close_register().unwrap();
        }
        lane.end_shift().unwrap()
    }

    let a = run(42);
    let b = run(42);
    assert_eq!(a, b);
    assert_eq!(a.customers_served, 10);
    assert_eq!(a.average_time_per_transaction, 15.0);
}
