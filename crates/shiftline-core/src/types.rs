//! # Domain Types
//!
//! The records the checkout lane moves around.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐        ┌──────────────────────────────┐          │
//! │  │      Item       │        │          Customer            │          │
//! │  │  ─────────────  │   *    │  ──────────────────────────  │          │
//! │  │  name           │◄───────│  id (UUID)                   │          │
//! │  │  price (Money)  │        │  first_name / last_name      │          │
//! │  │  restricted     │        │  date_of_birth, id_expiry    │          │
//! │  └─────────────────┘        │  is_fake, is_underage        │          │
//! │                             │  shopping_list: Vec<Item>    │          │
//! │                             └──────────────────────────────┘          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Both types are immutable once built: fields are private and only the
//! validating constructors can produce them.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::money::Money;
use crate::validation::{validate_item_name, validate_person_name, validate_price, ValidationResult};
use crate::LEGAL_AGE_YEARS;

// =============================================================================
// Item
// =============================================================================

/// A grocery item that can be presented at the register.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Item {
    name: String,
    price: Money,
    restricted: bool,
}

impl Item {
    /// Creates a validated item.
    ///
    /// ```rust
    /// use shiftline_core::{Item, Money};
    ///
    /// let beer = Item::new("Lager 6-pack", Money::from_cents(1299), true).unwrap();
    /// assert!(beer.is_restricted());
    /// assert!(Item::new("", Money::zero(), false).is_err());
    /// ```
    pub fn new(name: impl Into<String>, price: Money, restricted: bool) -> ValidationResult<Self> {
        let name = name.into();
        validate_item_name(&name)?;
        validate_price(price)?;

        Ok(Item {
            name: name.trim().to_string(),
            price,
            restricted,
        })
    }

    /// Display name shown on the register screen.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Shelf price.
    #[inline]
    pub fn price(&self) -> Money {
        self.price
    }

    /// Age-restricted (alcohol, tobacco).
    #[inline]
    pub fn is_restricted(&self) -> bool {
        self.restricted
    }
}

// =============================================================================
// Customer
// =============================================================================

/// A shopper waiting for, or being served at, the checkout.
///
/// `is_underage` is derived from the date of birth against the date the ID
/// was checked, and fixed at construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    id: Uuid,
    first_name: String,
    last_name: String,
    date_of_birth: NaiveDate,
    id_expiry: NaiveDate,
    is_fake: bool,
    is_underage: bool,
    shopping_list: Vec<Item>,
}

impl Customer {
    /// Creates a customer whose ID is checked on `checked_on`.
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        date_of_birth: NaiveDate,
        id_expiry: NaiveDate,
        is_fake: bool,
        shopping_list: Vec<Item>,
        checked_on: NaiveDate,
    ) -> ValidationResult<Self> {
        let first_name = first_name.into();
        let last_name = last_name.into();
        validate_person_name("first_name", &first_name)?;
        validate_person_name("last_name", &last_name)?;

        Ok(Customer {
            id: Uuid::new_v4(),
            first_name,
            last_name,
            date_of_birth,
            id_expiry,
            is_fake,
            is_underage: age_on(date_of_birth, checked_on) < LEGAL_AGE_YEARS,
            shopping_list,
        })
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn first_name(&self) -> &str {
        &self.first_name
    }

    pub fn last_name(&self) -> &str {
        &self.last_name
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    pub fn date_of_birth(&self) -> NaiveDate {
        self.date_of_birth
    }

    pub fn id_expiry(&self) -> NaiveDate {
        self.id_expiry
    }

    /// The presented ID is forged.
    pub fn is_fake(&self) -> bool {
        self.is_fake
    }

    pub fn is_underage(&self) -> bool {
        self.is_underage
    }

    /// Items the customer brought to the counter, in presentation order.
    pub fn shopping_list(&self) -> &[Item] {
        &self.shopping_list
    }

    /// Shelf value of the whole shopping list.
    pub fn shopping_list_total(&self) -> Money {
        self.shopping_list.iter().map(Item::price).sum()
    }

    /// Multi-line summary shown on the ID-check panel.
    pub fn stats_summary(&self) -> String {
        let mut stats = format!(
            "Customer Stats:\nFull Name: {}\nDate of Birth: {}\nID Expiry Date: {}\nTotal Price: {}\nShopping List:",
            self.full_name(),
            self.date_of_birth,
            self.id_expiry,
            self.shopping_list_total(),
        );
        for item in &self.shopping_list {
            stats.push_str(&format!("\n - {}: {}", item.name(), item.price()));
        }
        stats
    }
}

/// Whole years between `date_of_birth` and `on`.
pub fn age_on(date_of_birth: NaiveDate, on: NaiveDate) -> u32 {
    let mut years = on.year() - date_of_birth.year();
    if (on.month(), on.day()) < (date_of_birth.month(), date_of_birth.day()) {
        years -= 1;
    }
    years.max(0) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_age_on_birthday_boundary() {
        let dob = date(2008, 6, 15);
        assert_eq!(age_on(dob, date(2026, 6, 14)), 17);
        assert_eq!(age_on(dob, date(2026, 6, 15)), 18);
    }

    #[test]
    fn test_underage_is_derived_from_birth_date() {
        let today = date(2026, 10, 19);
        let minor = Customer::new("Ivy", "Lee", date(2010, 1, 1), date(2030, 1, 1), false, vec![], today)
            .unwrap();
        let adult = Customer::new("Hank", "Clark", date(1980, 1, 1), date(2030, 1, 1), false, vec![], today)
            .unwrap();

        assert!(minor.is_underage());
        assert!(!adult.is_underage());
    }

    #[test]
    fn test_item_name_is_trimmed() {
        let item = Item::new("  Bread ", Money::from_cents(250), false).unwrap();
        assert_eq!(item.name(), "Bread");
    }

    #[test]
    fn test_stats_summary_lists_items() {
        let today = date(2026, 10, 19);
        let list = vec![
            Item::new("Bread", Money::from_cents(250), false).unwrap(),
            Item::new("Eggs", Money::from_cents(399), false).unwrap(),
        ];
        let customer =
            Customer::new("Alice", "Smith", date(1990, 3, 2), date(2029, 1, 1), false, list, today).unwrap();

        let summary = customer.stats_summary();
        assert!(summary.contains("Full Name: Alice Smith"));
        assert!(summary.contains("Total Price: $6.49"));
        assert!(summary.contains(" - Eggs: $3.99"));
    }
}
