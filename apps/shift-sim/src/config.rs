//! # Simulator Configuration
//!
//! ## Load Order (later overrides earlier)
//! ```text
//! ┌──────────────┐   ┌──────────────────────┐   ┌─────────────────────┐
//! │   Defaults   │──►│ shift.toml (optional)│──►│ SHIFTLINE_* env vars│──► validate
//! └──────────────┘   └──────────────────────┘   └─────────────────────┘
//! ```
//!
//! ## Example shift.toml
//! ```toml
//! [player]
//! id = "player-1"
//!
//! [shift]
//! duration_secs = 480.0
//! arrival_interval_secs = 25.0
//! seed = 7
//!
//! [generator]
//! fake_id_rate = 0.2
//!
//! [cashier]
//! skip_item_rate = 0.05
//! wrong_change_rate = 0.1
//!
//! [database]
//! path = "/tmp/shiftline.db"
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use shiftline_core::{GeneratorConfig, DEFAULT_SHIFT_SECS};

use crate::error::{SimError, SimResult};

/// Longest shift the simulator will play: one day of virtual time.
pub const MAX_SHIFT_SECS: f64 = 86_400.0;

// =============================================================================
// Sections
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerSettings {
    /// Key the snapshot is stored under.
    pub id: String,
}

impl Default for PlayerSettings {
    fn default() -> Self {
        PlayerSettings {
            id: "player-1".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShiftSettings {
    /// Real seconds from opening to closing.
    pub duration_secs: f64,
    /// Mean gap between customer arrivals.
    pub arrival_interval_secs: f64,
    /// Time the cashier spends on one scan or void.
    pub scan_secs: f64,
    /// Time spent on one cash exchange (offer, top-up, change).
    pub payment_secs: f64,
    /// RNG seed; a random one is drawn when absent.
    pub seed: Option<u64>,
}

impl Default for ShiftSettings {
    fn default() -> Self {
        ShiftSettings {
            duration_secs: DEFAULT_SHIFT_SECS,
            arrival_interval_secs: 25.0,
            scan_secs: 2.5,
            payment_secs: 6.0,
            seed: None,
        }
    }
}

/// How sloppy the automated cashier is. Every rate is a probability.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CashierSettings {
    /// Skips a shopping-list item entirely.
    pub skip_item_rate: f64,
    /// Scans an item twice, then voids the extra one.
    pub double_scan_rate: f64,
    /// Hands back the wrong change.
    pub wrong_change_rate: f64,
    /// Closes the register while the customer still owes money.
    pub accept_underpayment_rate: f64,
    /// Lets a fake ID or an underage buyer through.
    pub missed_id_rate: f64,
    /// Turns away a customer with no reason.
    pub wrong_rejection_rate: f64,
}

impl Default for CashierSettings {
    fn default() -> Self {
        CashierSettings {
            skip_item_rate: 0.05,
            double_scan_rate: 0.05,
            wrong_change_rate: 0.1,
            accept_underpayment_rate: 0.1,
            missed_id_rate: 0.15,
            wrong_rejection_rate: 0.02,
        }
    }
}

impl CashierSettings {
    /// A cashier that never slips.
    pub fn flawless() -> Self {
        CashierSettings {
            skip_item_rate: 0.0,
            double_scan_rate: 0.0,
            wrong_change_rate: 0.0,
            accept_underpayment_rate: 0.0,
            missed_id_rate: 0.0,
            wrong_rejection_rate: 0.0,
        }
    }

    fn rates(&self) -> [(&'static str, f64); 6] {
        [
            ("skip_item_rate", self.skip_item_rate),
            ("double_scan_rate", self.double_scan_rate),
            ("wrong_change_rate", self.wrong_change_rate),
            ("accept_underpayment_rate", self.accept_underpayment_rate),
            ("missed_id_rate", self.missed_id_rate),
            ("wrong_rejection_rate", self.wrong_rejection_rate),
        ]
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseSettings {
    /// SQLite file; defaults to the platform data directory.
    pub path: Option<PathBuf>,
    /// Keep snapshots in process memory instead of SQLite.
    pub in_memory: bool,
}

// =============================================================================
// SimConfig
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SimConfig {
    #[serde(default)]
    pub player: PlayerSettings,

    #[serde(default)]
    pub shift: ShiftSettings,

    #[serde(default)]
    pub generator: GeneratorConfig,

    #[serde(default)]
    pub cashier: CashierSettings,

    #[serde(default)]
    pub database: DatabaseSettings,
}

impl SimConfig {
    /// Loads configuration from file, environment, and defaults.
    pub fn load(config_path: Option<PathBuf>) -> SimResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading shift config from file");
                config = Self::from_file(&path)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Loads config or returns default if load fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load shift config: {}. Using defaults.", e);
            Self::default()
        })
    }

    pub fn from_file(path: &Path) -> SimResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&contents)?)
    }

    /// Writes the config as TOML, creating parent directories.
    pub fn save(&self, path: &Path) -> SimResult<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, toml::to_string_pretty(self)?)?;
        info!(?path, "Shift config saved");
        Ok(())
    }

    pub fn validate(&self) -> SimResult<()> {
        if self.player.id.trim().is_empty() {
            return Err(SimError::InvalidConfig("player.id must not be empty".into()));
        }

        let duration = self.shift.duration_secs;
        if !(duration > 0.0 && duration <= MAX_SHIFT_SECS) {
            return Err(SimError::InvalidConfig(format!(
                "shift.duration_secs must be in (0, {}], got {}",
                MAX_SHIFT_SECS, duration
            )));
        }
        let interval = self.shift.arrival_interval_secs;
        if !(interval > 0.0 && interval.is_finite()) {
            return Err(SimError::InvalidConfig(
                "shift.arrival_interval_secs must be a finite number greater than 0".into(),
            ));
        }
        let (scan, payment) = (self.shift.scan_secs, self.shift.payment_secs);
        if !(scan >= 0.0 && scan.is_finite() && payment >= 0.0 && payment.is_finite()) {
            return Err(SimError::InvalidConfig(
                "shift.scan_secs and shift.payment_secs must be finite and not negative".into(),
            ));
        }

        if self.generator.min_age > self.generator.max_age {
            return Err(SimError::InvalidConfig(format!(
                "generator.min_age ({}) exceeds generator.max_age ({})",
                self.generator.min_age, self.generator.max_age
            )));
        }
        if self.generator.min_items > self.generator.max_items {
            return Err(SimError::InvalidConfig(format!(
                "generator.min_items ({}) exceeds generator.max_items ({})",
                self.generator.min_items, self.generator.max_items
            )));
        }
        if !(0.0..=1.0).contains(&self.generator.fake_id_rate) {
            return Err(SimError::InvalidConfig(
                "generator.fake_id_rate must be between 0 and 1".into(),
            ));
        }

        for (name, rate) in self.cashier.rates() {
            if !(0.0..=1.0).contains(&rate) {
                return Err(SimError::InvalidConfig(format!(
                    "cashier.{} must be between 0 and 1, got {}",
                    name, rate
                )));
            }
        }

        Ok(())
    }

    /// SQLite file to use when no path is configured.
    pub fn database_path(&self) -> PathBuf {
        self.database
            .path
            .clone()
            .or_else(|| {
                directories::ProjectDirs::from("com", "shiftline", "shiftline")
                    .map(|dirs| dirs.data_dir().join("shiftline.db"))
            })
            .unwrap_or_else(|| PathBuf::from("shiftline.db"))
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(id) = std::env::var("SHIFTLINE_PLAYER_ID") {
            debug!(player = %id, "Overriding player ID from environment");
            self.player.id = id;
        }

        if let Ok(path) = std::env::var("SHIFTLINE_DB_PATH") {
            debug!(path = %path, "Overriding database path from environment");
            self.database.path = Some(PathBuf::from(path));
        }

        if let Ok(secs) = std::env::var("SHIFTLINE_SHIFT_SECS") {
            match secs.parse::<f64>() {
                Ok(s) => self.shift.duration_secs = s,
                Err(_) => warn!(value = %secs, "Ignoring unparsable SHIFTLINE_SHIFT_SECS"),
            }
        }

        if let Ok(seed) = std::env::var("SHIFTLINE_SEED") {
            if let Ok(s) = seed.parse::<u64>() {
                debug!(seed = s, "Overriding RNG seed from environment");
                self.shift.seed = Some(s);
            }
        }
    }

    fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "shiftline", "shiftline")
            .map(|dirs| dirs.config_dir().join("shift.toml"))
    }
}
