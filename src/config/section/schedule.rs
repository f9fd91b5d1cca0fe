//! `[schedule]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [schedule]
//! interval = 86400    # seconds between scheduled runs (daily)
//! ```

use crate::config::{ConfigDiagnostics, FieldPath};
use serde::{Deserialize, Serialize};

/// Seconds in a day.
pub const DAILY: u64 = 24 * 60 * 60;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScheduleConfig {
    /// Seconds between scheduled runs.
    pub interval: u64,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self { interval: DAILY }
    }
}

impl ScheduleConfig {
    pub const INTERVAL: FieldPath = FieldPath::new("schedule.interval");

    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if self.interval == 0 {
            diag.error(Self::INTERVAL, "interval must be at least one second");
        }
    }
}
