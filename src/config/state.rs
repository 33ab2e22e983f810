// Application state module
// Immutable runtime state shared by every connection

use chrono::{DateTime, Utc};
use std::time::{Duration, Instant};

use super::types::Config;

/// Process start time, captured once
#[derive(Debug, Clone, Copy)]
pub struct StartTime {
    instant: Instant,
    wall: DateTime<Utc>,
}

impl StartTime {
    pub fn now() -> Self {
        Self {
            instant: Instant::now(),
            wall: Utc::now(),
        }
    }

    pub fn uptime(&self) -> Duration {
        self.instant.elapsed()
    }

    /// Wall-clock time at startup
    pub const fn started_at(&self) -> DateTime<Utc> {
        self.wall
    }

    /// Nanoseconds since the Unix epoch, advanced by the monotonic clock.
    ///
    /// Never goes backwards within a process even if the system clock is adjusted.
    pub fn monotonic_nanos(&self) -> u128 {
        let base = self
            .wall
            .timestamp_nanos_opt()
            .and_then(|n| u128::try_from(n).ok())
            .unwrap_or_default();
        base + self.instant.elapsed().as_nanos()
    }
}

/// Application state
pub struct AppState {
    pub config: Config,
    pub started: StartTime,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            started: StartTime::now(),
        }
    }

    pub const fn with_start_time(config: Config, started: StartTime) -> Self {
        Self { config, started }
    }
}
