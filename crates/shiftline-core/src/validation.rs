//! # Validation
//!
//! Input validation for data entering the engine: catalog items, customer
//! names and the cash denominations a cashier can take from the register.
//!
//! ## Usage
//! ```rust
//! use shiftline_core::money::Money;
//! use shiftline_core::validation::{validate_item_name, validate_price};
//!
//! assert!(validate_item_name("Whole Milk").is_ok());
//! assert!(validate_price(Money::from_cents(-1)).is_err());
//! ```

use crate::error::ValidationError;
use crate::money::Money;
use crate::DENOMINATIONS;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

const MAX_ITEM_NAME: usize = 100;
const MAX_PERSON_NAME: usize = 50;

/// Non-blank once trimmed and no longer than `max` characters.
fn validate_text(field: &str, value: &str, max: usize) -> ValidationResult<()> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ValidationError::Required { field: field.into() });
    }
    if value.chars().count() > max {
        return Err(ValidationError::TooLong { field: field.into(), max });
    }
    Ok(())
}

pub fn validate_item_name(name: &str) -> ValidationResult<()> {
    validate_text("name", name, MAX_ITEM_NAME)
}

/// Free items are fine; negative prices are not.
pub fn validate_price(price: Money) -> ValidationResult<()> {
    if price.is_negative() {
        return Err(ValidationError::MustNotBeNegative { field: "price".into() });
    }
    Ok(())
}

/// A customer's first or last name, reported under `field`.
pub fn validate_person_name(field: &str, name: &str) -> ValidationResult<()> {
    validate_text(field, name, MAX_PERSON_NAME)
}

/// Only notes and coins the drawer actually holds can be grabbed.
///
/// ```rust
/// use shiftline_core::money::Money;
/// use shiftline_core::validation::validate_denomination;
///
/// assert!(validate_denomination(Money::from_cents(500)).is_ok());
/// assert!(validate_denomination(Money::from_cents(300)).is_err());
/// ```
pub fn validate_denomination(denomination: Money) -> ValidationResult<()> {
    if DENOMINATIONS.contains(&denomination) {
        return Ok(());
    }

    Err(ValidationError::NotAllowed {
        field: "denomination".into(),
        allowed: DENOMINATIONS.iter().map(Money::to_string).collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_item_name() {
        assert!(validate_item_name("Lager 6-pack").is_ok());
        assert!(validate_item_name("   ").is_err());
        assert!(validate_item_name(&"x".repeat(101)).is_err());
    }

    #[test]
    fn test_validate_price() {
        assert!(validate_price(Money::zero()).is_ok());
        assert!(validate_price(Money::from_cents(199)).is_ok());
        assert!(matches!(
            validate_price(Money::from_cents(-1)),
            Err(ValidationError::MustNotBeNegative { .. })
        ));
    }

    #[test]
    fn test_name_length_counts_characters() {
        assert!(validate_person_name("first_name", &"é".repeat(50)).is_ok());
        assert!(validate_person_name("first_name", &"é".repeat(51)).is_err());
    }

    #[test]
    fn test_validate_person_name() {
        assert!(validate_person_name("first_name", "Alice").is_ok());
        assert_eq!(
            validate_person_name("last_name", "").unwrap_err(),
            ValidationError::Required {
                field: "last_name".to_string()
            }
        );
    }

    #[test]
    fn test_validate_denomination() {
        for d in DENOMINATIONS {
            assert!(validate_denomination(d).is_ok());
        }
        assert!(validate_denomination(Money::from_cents(25)).is_err());
    }
}
