//! # shiftline-core: Checkout & Shift Accounting Engine
//!
//! The deterministic core of the Shiftline cashier-training simulation:
//! customer queueing, scanning and voiding, payment reconciliation, mistake
//! classification and shift score aggregation. It has zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Shiftline Architecture                            │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │              Driver (VR scene / shift-sim CLI)                  │   │
//! │  │    spawn customers ──► scan ──► take payment ──► end shift      │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ &mut CheckoutLane                      │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │             ★ shiftline-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │ generator │  │   queue   │  │  session  │  │  payment  │  │   │
//! │  │   │ Customer  │─►│   FIFO    │─►│ Cart, SM  │─►│ Register  │  │   │
//! │  │   └───────────┘  └───────────┘  └─────┬─────┘  └─────┬─────┘  │   │
//! │  │                                       ▼              ▼         │   │
//! │  │                        ┌──────────────────────────────────┐    │   │
//! │  │                        │ accumulator + ledger ──► snapshot │    │   │
//! │  │                        └──────────────────────────────────┘    │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • INJECTED CLOCK & RNG     │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │ ShiftSnapshot                          │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                shiftline-db (Snapshot Stores)                   │   │
//! │  │          SQLite per-path player stats, in-memory store          │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`lane`] - The checkout lane that owns everything below
//! - [`session`] - Checkout state machine and cart
//! - [`payment`] - Payment evaluation and the cash register
//! - [`queue`] - FIFO customer queue
//! - [`accumulator`] - Per-shift deltas and the end-of-shift merge
//! - [`ledger`] - Mistake counters
//! - [`snapshot`] - Persisted cumulative stats
//! - [`generator`] - Random customers and cash offers
//! - [`clock`] - Injected clocks and the virtual shift clock
//! - [`events`], [`presence`] - Observer interfaces
//! - [`money`], [`types`], [`error`], [`validation`]
//!
//! ## Example Usage
//!
//! ```rust
//! use shiftline_core::{evaluate_payment, Money, PaymentStatus};
//!
//! let total = Money::from_cents(1000);
//! let status = evaluate_payment(total, Money::from_cents(1000));
//! assert_eq!(status, PaymentStatus::Sufficient { change: Money::zero() });
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod accumulator;
pub mod clock;
pub mod error;
pub mod events;
pub mod generator;
pub mod lane;
pub mod ledger;
pub mod money;
pub mod payment;
pub mod presence;
pub mod queue;
pub mod session;
pub mod snapshot;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use accumulator::ShiftAccumulator;
pub use clock::{Clock, ManualClock, ShiftClock, ShiftTime, SystemClock};
pub use error::{CoreError, CoreResult, ValidationError};
pub use events::{LaneEvent, LaneObserver, NoOpObserver, RecordingObserver};
pub use generator::{default_catalog, simulate_payment, simulate_top_up, CustomerGenerator, GeneratorConfig};
pub use lane::{CheckoutLane, CheckoutReceipt};
pub use ledger::{MistakeCounters, MistakeKind, MistakeLedger};
pub use money::Money;
pub use payment::{assess_change, evaluate_payment, request_more_cash, CashRegister, PaymentStatus, RegisterReport};
pub use presence::{PresenceChange, PresenceObserver, PresenceSignal};
pub use queue::CustomerQueue;
pub use session::{Cart, CheckoutSession, Disposition, SessionState, TransactionOutcome};
pub use snapshot::{ShiftBaseline, ShiftSnapshot};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Notes and coins in the register drawer, largest first.
pub const DENOMINATIONS: [Money; 10] = [
    Money::from_cents(2000),
    Money::from_cents(1000),
    Money::from_cents(500),
    Money::from_cents(200),
    Money::from_cents(100),
    Money::from_cents(50),
    Money::from_cents(20),
    Money::from_cents(10),
    Money::from_cents(5),
    Money::from_cents(1),
];

/// Minimum age for buying restricted items.
pub const LEGAL_AGE_YEARS: u32 = 18;

/// Average transaction time reported when nobody was served.
pub const DEFAULT_AVERAGE_TRANSACTION_SECS: f64 = 480.0;

/// Real seconds in a default shift (an 8-hour virtual day).
pub const DEFAULT_SHIFT_SECS: f64 = 480.0;

/// Largest shopping list a generated customer carries.
pub const MAX_SHOPPING_LIST_ITEMS: usize = 5;
