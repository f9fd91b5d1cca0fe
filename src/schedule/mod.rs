//! Recurring refresh registration.
//!
//! `activate` registers the job, `deactivate` clears it, and the daemon
//! asks [`ScheduleState::is_due`] on every tick. State is persisted in
//! `<state dir>/schedule.json` so CLI commands and a running daemon see
//! the same schedule:
//!
//! ```json
//! { "next_run": 1718496000, "interval": 86400, "last_run": 1718409600, "last_error": null }
//! ```

use crate::debug;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Schedule state file name
pub const SCHEDULE_FILE: &str = "schedule.json";

/// Persisted schedule.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleState {
    /// Next due time (unix seconds). `None` when not registered.
    pub next_run: Option<u64>,
    /// Seconds between runs, fixed at registration.
    pub interval: u64,
    /// When the last scheduled run finished.
    pub last_run: Option<u64>,
    /// Error of the last scheduled run, if it failed.
    pub last_error: Option<String>,
}

/// Result of [`activate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Activation {
    Registered { next_run: u64 },
    AlreadyScheduled { next_run: u64 },
}

impl ScheduleState {
    pub fn is_active(&self) -> bool {
        self.next_run.is_some()
    }

    pub fn is_due(&self, now: u64) -> bool {
        self.next_run.is_some_and(|next| next <= now)
    }

    /// Record a finished run and move `next_run` past `now`.
    ///
    /// Missed intervals are skipped, not replayed.
    pub fn complete_run(&mut self, now: u64, error: Option<String>) {
        self.last_run = Some(now);
        self.last_error = error;

        let Some(next) = self.next_run else {
            return;
        };
        let interval = self.interval.max(1);
        let next = if next > now {
            next
        } else {
            let missed = (now - next) / interval + 1;
            next + missed * interval
        };
        self.next_run = Some(next);
    }
}

/// Load and save of [`ScheduleState`].
#[derive(Debug, Clone)]
pub struct ScheduleStore {
    path: PathBuf,
}

impl ScheduleStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at `<state_dir>/schedule.json`.
    pub fn in_dir(state_dir: &Path) -> Self {
        Self::new(state_dir.join(SCHEDULE_FILE))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Restore state from disk (default state when missing).
    pub fn load(&self) -> std::io::Result<ScheduleState> {
        if !self.path.exists() {
            return Ok(ScheduleState::default());
        }

        let json = fs::read_to_string(&self.path)?;
        serde_json::from_str(&json)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))
    }

    /// Persist state to disk.
    pub fn save(&self, state: &ScheduleState) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(state)?;
        fs::write(&self.path, json)?;
        debug!("schedule"; "saved state, next run {:?}", state.next_run);
        Ok(())
    }
}

/// Register the recurring job unless one is already registered.
///
/// The first run is due immediately.
pub fn activate(store: &ScheduleStore, interval: u64, now: u64) -> std::io::Result<Activation> {
    let mut state = store.load()?;
    if let Some(next_run) = state.next_run {
        return Ok(Activation::AlreadyScheduled { next_run });
    }

    state.next_run = Some(now);
    state.interval = interval;
    store.save(&state)?;
    Ok(Activation::Registered { next_run: now })
}

/// Clear the recurring job. Returns whether one was registered.
pub fn deactivate(store: &ScheduleStore) -> std::io::Result<bool> {
    let mut state = store.load()?;
    let was_active = state.next_run.take().is_some();
    store.save(&state)?;
    Ok(was_active)
}
