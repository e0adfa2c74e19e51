//! # Customer Generator
//!
//! Randomized customers, shopping lists and cash offers. Every function takes
//! the random source as a parameter, so a seeded `StdRng` reproduces a shift
//! exactly.

use chrono::{Duration, NaiveDate};
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::CoreResult;
use crate::money::Money;
use crate::types::Customer;
use crate::types::Item;
use crate::MAX_SHOPPING_LIST_ITEMS;

static FIRST_NAMES: &[&str] = &[
    "Alice", "Bob", "Charlie", "Diana", "Eve", "Frank", "Grace", "Hank", "Ivy", "Jack",
];

static LAST_NAMES: &[&str] = &[
    "Smith", "Johnson", "Brown", "Taylor", "Anderson", "Lee", "Garcia", "Martinez", "Clark", "Walker",
];

/// Store shelf: (name, price in cents, age-restricted).
static DEFAULT_SHELF: &[(&str, i64, bool)] = &[
    ("Whole Milk", 199, false),
    ("Sourdough Bread", 349, false),
    ("Free Range Eggs", 425, false),
    ("Cheddar Cheese", 575, false),
    ("Bananas", 129, false),
    ("Apples", 299, false),
    ("Breakfast Cereal", 459, false),
    ("Orange Juice", 389, false),
    ("Pasta", 149, false),
    ("Tomato Sauce", 229, false),
    ("Potato Chips", 319, false),
    ("Chocolate Bar", 159, false),
    ("Lager 6-Pack", 1299, true),
    ("Red Wine", 1499, true),
    ("Cigarettes", 1150, true),
];

/// The default store catalog, including restricted items.
pub fn default_catalog() -> Vec<Item> {
    DEFAULT_SHELF
        .iter()
        .filter_map(|&(name, cents, restricted)| Item::new(name, Money::from_cents(cents), restricted).ok())
        .collect()
}

/// Knobs for customer generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Youngest customer, in whole years.
    pub min_age: u32,
    pub max_age: u32,
    /// Probability that a customer carries a fake ID.
    pub fake_id_rate: f64,
    pub min_items: usize,
    pub max_items: usize,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        GeneratorConfig {
            min_age: 14,
            max_age: 70,
            fake_id_rate: 0.5,
            min_items: 1,
            max_items: MAX_SHOPPING_LIST_ITEMS,
        }
    }
}

/// Produces customers from a catalog.
#[derive(Debug, Clone)]
pub struct CustomerGenerator {
    catalog: Vec<Item>,
    config: GeneratorConfig,
}

impl Default for CustomerGenerator {
    fn default() -> Self {
        CustomerGenerator::new(default_catalog(), GeneratorConfig::default())
    }
}

impl CustomerGenerator {
    pub fn new(catalog: Vec<Item>, config: GeneratorConfig) -> Self {
        CustomerGenerator { catalog, config }
    }

    pub fn catalog(&self) -> &[Item] {
        &self.catalog
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Generates one customer whose ID is checked on `checked_on`.
    pub fn generate(&self, rng: &mut impl Rng, checked_on: NaiveDate) -> CoreResult<Customer> {
        let first = FIRST_NAMES[rng.gen_range(0..FIRST_NAMES.len())];
        let last = LAST_NAMES[rng.gen_range(0..LAST_NAMES.len())];

        let min_age = self.config.min_age.min(self.config.max_age);
        let max_age = self.config.max_age.max(min_age);
        let age_days = rng.gen_range(i64::from(min_age) * 365..=i64::from(max_age) * 365 + 364);
        let date_of_birth = checked_on - Duration::days(age_days);

        // Expired up to three years ago, or valid for up to five more
        let id_expiry = checked_on + Duration::days(rng.gen_range(-3 * 365..=5 * 365));
        let is_fake = rng.gen_bool(self.config.fake_id_rate.clamp(0.0, 1.0));

        let customer = Customer::new(
            first,
            last,
            date_of_birth,
            id_expiry,
            is_fake,
            self.shopping_list(rng),
            checked_on,
        )?;

        debug!(
            customer = %customer.id(),
            name = %customer.full_name(),
            underage = customer.is_underage(),
            fake = customer.is_fake(),
            items = customer.shopping_list().len(),
            "Customer generated"
        );
        Ok(customer)
    }

    /// A shopping list of `min_items..=max_items` catalog picks, repeats allowed.
    pub fn shopping_list(&self, rng: &mut impl Rng) -> Vec<Item> {
        if self.catalog.is_empty() {
            return Vec::new();
        }
        let min = self.config.min_items.min(self.config.max_items);
        let max = self.config.max_items.max(min);
        let count = rng.gen_range(min..=max);

        (0..count)
            .map(|_| self.catalog[rng.gen_range(0..self.catalog.len())].clone())
            .collect()
    }
}

/// The customer's first cash offer: `total` plus between -1.00 and 5.00,
/// never negative.
pub fn simulate_payment(rng: &mut impl Rng, total: Money) -> Money {
    (total + Money::from_cents(rng.gen_range(-100..=500))).non_negative()
}

/// Extra cash handed over when asked: 1.00 to 10.00.
pub fn simulate_top_up(rng: &mut impl Rng) -> Money {
    Money::from_cents(rng.gen_range(100..=1000))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
    }

    #[test]
    fn test_default_catalog_has_restricted_items() {
        let catalog = default_catalog();
        assert_eq!(catalog.len(), DEFAULT_SHELF.len());
        assert!(catalog.iter().any(Item::is_restricted));
        assert!(catalog.iter().any(|item| !item.is_restricted()));
    }

    #[test]
    fn test_same_seed_same_customers() {
        let generator = CustomerGenerator::default();
        let mut a = StdRng::seed_from_u64(7);
        let mut b = StdRng::seed_from_u64(7);

        for _ in 0..20 {
            let x = generator.generate(&mut a, today()).unwrap();
            let y = generator.generate(&mut b, today()).unwrap();
            assert_eq!(x.full_name(), y.full_name());
            assert_eq!(x.date_of_birth(), y.date_of_birth());
            assert_eq!(x.shopping_list(), y.shopping_list());
        }
    }

    #[test]
    fn test_shopping_list_size_bounds() {
        let generator = CustomerGenerator::default();
        let mut rng = StdRng::seed_from_u64(99);
        for _ in 0..200 {
            let list = generator.shopping_list(&mut rng);
            assert!((1..=MAX_SHOPPING_LIST_ITEMS).contains(&list.len()));
        }
    }

    #[test]
    fn test_age_range_is_respected() {
        let config = GeneratorConfig {
            min_age: 10,
            max_age: 12,
            fake_id_rate: 0.0,
            ..Default::default()
        };
        let generator = CustomerGenerator::new(default_catalog(), config);
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..50 {
            let customer = generator.generate(&mut rng, today()).unwrap();
            assert!(customer.is_underage());
            assert!(!customer.is_fake());
        }
    }

    #[test]
    fn test_empty_catalog_gives_empty_list() {
        let generator = CustomerGenerator::new(vec![], GeneratorConfig::default());
        let mut rng = StdRng::seed_from_u64(1);
        assert!(generator.shopping_list(&mut rng).is_empty());
    }

    #[test]
    fn test_payment_simulation_bounds() {
        let mut rng = StdRng::seed_from_u64(11);
        let total = Money::from_cents(2000);
        for _ in 0..500 {
            let offer = simulate_payment(&mut rng, total);
            assert!(offer >= Money::from_cents(1900) && offer <= Money::from_cents(2500));

            let top_up = simulate_top_up(&mut rng);
            assert!(top_up >= Money::from_cents(100) && top_up <= Money::from_cents(1000));
        }

        // Small totals clamp at zero
        for _ in 0..100 {
            assert!(!simulate_payment(&mut rng, Money::from_cents(50)).is_negative());
        }
    }
}
