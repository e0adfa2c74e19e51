//! # Simulator Errors

use thiserror::Error;

use shiftline_core::CoreError;
use shiftline_db::PersistenceError;

#[derive(Debug, Error)]
pub enum SimError {
    /// Configuration is invalid.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Config file could not be read or written.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("Config serialize error: {0}")]
    ConfigSerialize(#[from] toml::ser::Error),

    /// The engine refused an operation. The cashier policy only issues legal
    /// operations, so this is a bug in the driver.
    #[error("Engine error: {0}")]
    Core(#[from] CoreError),

    #[error("Store error: {0}")]
    Persistence(#[from] PersistenceError),

    #[error("Report error: {0}")]
    Report(#[from] serde_json::Error),
}

pub type SimResult<T> = Result<T, SimError>;
