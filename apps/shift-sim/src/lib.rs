//! # shiftline-sim
//!
//! Drives a full cashier shift through the Shiftline engine without a
//! headset: customers arrive on a virtual clock, an automated cashier serves
//! them with configurable sloppiness, and the end-of-shift snapshot is merged
//! into the player's stored totals.
//!
//! ```text
//! ┌─────────────┐   ┌──────────────┐   ┌─────────────────┐   ┌──────────────┐
//! │  SimConfig  │──►│ StatsBackend │──►│    run_shift    │──►│ ShiftReport  │
//! │ toml + env  │   │ SQLite / mem │   │ lane + cashier  │   │  (JSON out)  │
//! └─────────────┘   └──────────────┘   └─────────────────┘   └──────────────┘
//! ```

pub mod cashier;
pub mod config;
pub mod error;
pub mod runner;

pub use cashier::{make_change, Cashier, Served};
pub use config::SimConfig;
pub use error::{SimError, SimResult};
pub use runner::{run_shift, simulate, ShiftReport, ShiftTally, StatsBackend};
