//! # Clocks
//!
//! Transaction timing is sampled from an injected [`Clock`] so the lane is
//! deterministic under test. [`ShiftClock`] maps real shift time onto the
//! virtual 09:00–17:00 store day shown to the player.

use chrono::{DateTime, Duration, Utc};
use std::cell::Cell;
use std::rc::Rc;

/// Source of "now" for transaction timing.
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Manually advanced clock. Clones share the same time.
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Rc<Cell<DateTime<Utc>>>,
}

impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        ManualClock {
            now: Rc::new(Cell::new(start)),
        }
    }

    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }

    pub fn advance_secs(&self, secs: f64) {
        self.advance(Duration::milliseconds((secs * 1000.0).round() as i64));
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        self.now.get()
    }
}

/// Seconds between two instants, as a float.
pub fn elapsed_secs(start: DateTime<Utc>, end: DateTime<Utc>) -> f64 {
    (end - start).num_milliseconds() as f64 / 1000.0
}

// =============================================================================
// Shift Clock
// =============================================================================

const OPENING_HOUR: f64 = 9.0;
const CLOSING_HOUR: f64 = 17.0;

/// Reading of the virtual store clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShiftTime {
    /// Shift still running; whole virtual hour (9..=16).
    Open { hour: u32 },
    Over,
}

/// Virtual day clock for one shift.
#[derive(Debug, Clone)]
pub struct ShiftClock {
    duration_secs: f64,
    elapsed_secs: f64,
}

impl ShiftClock {
    pub fn new(duration_secs: f64) -> Self {
        ShiftClock {
            duration_secs: duration_secs.max(0.0),
            elapsed_secs: 0.0,
        }
    }

    /// Advances the clock by `delta_secs` and returns the new reading.
    pub fn tick(&mut self, delta_secs: f64) -> ShiftTime {
        self.elapsed_secs += delta_secs.max(0.0);
        self.reading()
    }

    pub fn reading(&self) -> ShiftTime {
        if self.is_over() {
            return ShiftTime::Over;
        }
        let t = self.elapsed_secs / self.duration_secs;
        let hour = OPENING_HOUR + (CLOSING_HOUR - OPENING_HOUR) * t;
        ShiftTime::Open {
            hour: hour.floor() as u32,
        }
    }

    pub fn is_over(&self) -> bool {
        self.elapsed_secs >= self.duration_secs
    }

    pub fn elapsed_secs(&self) -> f64 {
        self.elapsed_secs
    }

    /// Text for the wall display: `"13:00"` or `"Shift Over!"`.
    pub fn display(&self) -> String {
        match self.reading() {
            ShiftTime::Open { hour } => format!("{}:00", hour),
            ShiftTime::Over => "Shift Over!".to_string(),
        }
    }
}
