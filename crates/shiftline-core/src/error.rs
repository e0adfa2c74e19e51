//! # Error Types
//!
//! Domain-specific error types for shiftline-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  shiftline-core errors (this file)                                     │
//! │  ├── CoreError        - Lane / session / queue rule violations         │
//! │  └── ValidationError  - Bad input (item data, denominations)           │
//! │                                                                         │
//! │  shiftline-db errors (separate crate)                                  │
//! │  └── PersistenceError - Snapshot store unavailable or corrupt          │
//! │                                                                         │
//! │  Every error here is recoverable: the rejected call changed nothing.   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Checkout engine errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// Operation attempted from the wrong checkout session state.
    ///
    /// ## When This Occurs
    /// - Scanning with no customer at the lane (`Idle`)
    /// - Assigning a customer while another is being served
    /// - Completing a checkout before the register was opened
    #[error("Cannot {operation} while checkout is {state}")]
    InvalidState {
        operation: &'static str,
        state: String,
    },

    /// Serve requested with no waiting customers.
    #[error("No customers waiting in the queue")]
    EmptyQueue,

    /// Void requested for an item that is not in the cart.
    #[error("Item not in cart: {0}")]
    ItemNotInCart(String),

    /// The shift has already been ended; its deltas were merged once.
    #[error("Shift has already ended")]
    ShiftClosed,

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

impl CoreError {
    /// Creates an InvalidState error for an operation and the current state.
    pub fn invalid_state(operation: &'static str, state: impl ToString) -> Self {
        CoreError::InvalidState {
            operation,
            state: state.to_string(),
        }
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Value must not be negative.
    #[error("{field} must not be negative")]
    MustNotBeNegative { field: String },

    /// Value is not in allowed set.
    #[error("{field} must be one of: {allowed:?}")]
    NotAllowed { field: String, allowed: Vec<String> },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::invalid_state("scan an item", "Idle");
        assert_eq!(err.to_string(), "Cannot scan an item while checkout is Idle");

        let err = CoreError::ItemNotInCart("Milk".to_string());
        assert_eq!(err.to_string(), "Item not in cart: Milk");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::Required {
            field: "name".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
