//! # Shift Runner
//!
//! Runs one complete shift: baseline in, simulated day, snapshot out.
//!
//! ```text
//! load_baseline ──► simulate (virtual clock, no I/O) ──► end_shift ──► save_shift
//!      │                                                                   │
//!      └── store down: defaults                         store down: logged ┘
//! ```
//!
//! The simulated day runs on a [`ManualClock`], so a full shift finishes in
//! milliseconds and a seed reproduces it exactly.

use chrono::{DateTime, Duration, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use std::cell::RefCell;
use std::rc::Rc;
use tracing::{debug, info, warn};

use shiftline_core::clock::elapsed_secs;
use shiftline_core::{
    default_catalog, CheckoutLane, Clock, CustomerGenerator, Disposition, LaneEvent,
    LaneObserver, ManualClock, ShiftBaseline, ShiftClock, ShiftSnapshot, ShiftTime,
};
use shiftline_db::{load_baseline, save_shift, MemorySnapshotStore, PlayerStatsRepository, SnapshotStore};
use shiftline_db::{Database, DbConfig};

use crate::cashier::{Cashier, Served};
use crate::config::SimConfig;
use crate::error::{SimError, SimResult};

// =============================================================================
// Report
// =============================================================================

/// How the shift's transactions ended, counted from lane events.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShiftTally {
    pub customers_arrived: u32,
    pub completed: u32,
    pub rejected_justified: u32,
    pub rejected_unjustified: u32,
    pub abandoned: u32,
    pub items_voided: u32,
    pub register_mistakes: u32,
    pub sent_home: u32,
}

/// Everything the simulator prints at the end of a shift.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShiftReport {
    pub player_id: String,
    pub seed: u64,
    pub tally: ShiftTally,
    pub baseline: ShiftSnapshot,
    pub snapshot: ShiftSnapshot,
    pub saved: bool,
}

struct TallyObserver(Rc<RefCell<ShiftTally>>);

impl LaneObserver for TallyObserver {
    fn on_event(&mut self, event: &LaneEvent) {
        let mut tally = self.0.borrow_mut();
        match event {
            LaneEvent::CustomerQueued { .. } => tally.customers_arrived += 1,
            LaneEvent::ItemVoided { .. } => tally.items_voided += 1,
            LaneEvent::RegisterClosed { mistakes, .. } => {
                tally.register_mistakes += mistakes.len() as u32;
            }
            LaneEvent::TransactionFinished { disposition, .. } => match disposition {
                Disposition::Completed => tally.completed += 1,
                Disposition::Rejected { justified: true } => tally.rejected_justified += 1,
                Disposition::Rejected { justified: false } => tally.rejected_unjustified += 1,
                Disposition::Abandoned => tally.abandoned += 1,
            },
            _ => {}
        }
    }
}

// =============================================================================
// Snapshot Backend
// =============================================================================

/// Where snapshots go for this run.
#[derive(Debug)]
pub enum StatsBackend {
    Sqlite {
        db: Database,
        stats: PlayerStatsRepository,
    },
    Memory(MemorySnapshotStore),
}

impl StatsBackend {
    /// Opens SQLite as configured, falling back to memory when it can't be
    /// opened. Stats are then lost at exit, but the shift still runs.
    pub async fn open(config: &SimConfig) -> Self {
        if config.database.in_memory {
            info!("Using in-memory snapshot store");
            return StatsBackend::Memory(MemorySnapshotStore::new());
        }

        let path = config.database_path();
        if let Some(parent) = path.parent() {
            if let Err(e) = std::fs::create_dir_all(parent) {
                warn!(?parent, error = %e, "Could not create data directory");
            }
        }

        match Database::new(DbConfig::new(&path)).await {
            Ok(db) => {
                let stats = db.player_stats();
                StatsBackend::Sqlite { db, stats }
            }
            Err(e) => {
                warn!(?path, error = %e, "SQLite unavailable, stats will not outlive this run");
                StatsBackend::Memory(MemorySnapshotStore::new())
            }
        }
    }

    pub fn store(&self) -> &dyn SnapshotStore {
        match self {
            StatsBackend::Sqlite { stats, .. } => stats,
            StatsBackend::Memory(store) => store,
        }
    }

    pub fn player_stats(&self) -> Option<&PlayerStatsRepository> {
        match self {
            StatsBackend::Sqlite { stats, .. } => Some(stats),
            StatsBackend::Memory(_) => None,
        }
    }

    pub async fn close(&self) {
        if let StatsBackend::Sqlite { db, .. } = self {
            db.close().await;
        }
    }
}

// =============================================================================
// Shift
// =============================================================================

/// Loads the baseline, simulates the shift and saves the result once.
///
/// A failed save is logged and reported through `saved`; it does not fail
/// the run.
pub async fn run_shift(
    config: &SimConfig,
    store: &dyn SnapshotStore,
    opened_at: DateTime<Utc>,
) -> SimResult<ShiftReport> {
    let player_id = config.player.id.as_str();
    let seed = config.shift.seed.unwrap_or_else(rand::random);
    info!(player = player_id, seed, "Starting shift");

    let baseline = load_baseline(store, player_id, opened_at).await;
    let baseline_snapshot = baseline.snapshot().clone();

    let (snapshot, tally) = simulate(config, baseline, seed)?;

    let saved = save_shift(store, player_id, &snapshot).await.is_ok();

    Ok(ShiftReport {
        player_id: player_id.to_string(),
        seed,
        tally,
        baseline: baseline_snapshot,
        snapshot,
        saved,
    })
}

/// When a shift of `duration_secs` that opened at `opened_at` closes.
fn closing_time(opened_at: DateTime<Utc>, duration_secs: f64) -> SimResult<DateTime<Utc>> {
    let invalid = || SimError::InvalidConfig(format!("shift.duration_secs out of range: {}", duration_secs));
    if !duration_secs.is_finite() {
        return Err(invalid());
    }
    let millis = (duration_secs * 1000.0).round();
    if millis.abs() >= i64::MAX as f64 {
        return Err(invalid());
    }
    Duration::try_milliseconds(millis as i64)
        .and_then(|d| opened_at.checked_add_signed(d))
        .ok_or_else(invalid)
}

/// Plays out a shift on a virtual clock starting at the baseline's load
/// time. Deterministic for a given seed.
pub fn simulate(
    config: &SimConfig,
    baseline: ShiftBaseline,
    seed: u64,
) -> SimResult<(ShiftSnapshot, ShiftTally)> {
    let mut rng = StdRng::seed_from_u64(seed);
    let opened_at = baseline.loaded_at();
    let duration = config.shift.duration_secs;
    let closing = closing_time(opened_at, duration)?;

    let clock = ManualClock::new(opened_at);
    let tally = Rc::new(RefCell::new(ShiftTally::default()));
    let mut lane = CheckoutLane::new(baseline, clock.clone());
    lane.subscribe(Box::new(TallyObserver(Rc::clone(&tally))));

    let generator = CustomerGenerator::new(default_catalog(), config.generator.clone());
    let cashier = Cashier::new(config.cashier.clone(), &config.shift);
    let mut shift_clock = ShiftClock::new(duration);
    let mut next_arrival = 0.0;
    let mut last_hour = None;

    loop {
        let elapsed = elapsed_secs(opened_at, clock.now());
        let reading = shift_clock.tick(elapsed - shift_clock.elapsed_secs());
        if let ShiftTime::Open { hour } = reading {
            if last_hour != Some(hour) {
                info!(time = %shift_clock.display(), waiting = lane.queue_len(), "Store clock");
                last_hour = Some(hour);
            }
        }
        if shift_clock.is_over() || clock.now() >= closing {
            break;
        }

        while next_arrival <= elapsed {
            let customer = generator.generate(&mut rng, clock.now().date_naive())?;
            lane.enqueue(customer)?;
            next_arrival += config.shift.arrival_interval_secs * rng.gen_range(0.5..1.5);
        }

        if lane.peek_busy() {
            if cashier.serve(&mut lane, &clock, closing, &mut rng)? == Served::Interrupted {
                debug!("Closing time mid-transaction");
                break;
            }
        } else {
            clock.advance_secs((next_arrival - elapsed).max(0.001));
        }
    }

    let waiting = lane.queue_len() as u32;
    info!(time = %shift_clock.display(), "Closing time");
    let snapshot = lane.end_shift()?;

    let mut tally = tally.borrow().clone();
    tally.sent_home = waiting;
    Ok((snapshot, tally))
}
