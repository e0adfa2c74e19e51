//! # Repository Module
//!
//! Database repository implementations for Shiftline.
//!
//! ## Available Repositories
//!
//! - [`PlayerStatsRepository`](player_stats::PlayerStatsRepository) - Per-path
//!   player snapshots and the leaderboard

pub mod player_stats;
