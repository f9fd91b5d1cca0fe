//! `activate` / `deactivate`: register and clear the recurring refresh.

use anyhow::{Context, Result};

use super::common::{format_time, schedule_store};
use crate::config::SiteConfig;
use crate::log;
use crate::schedule::{self, Activation};
use crate::utils::date::unix_now;

/// Register the recurring job unless one already exists.
pub fn activate(config: &SiteConfig) -> Result<()> {
    let store = schedule_store(config);
    let activation = schedule::activate(&store, config.schedule.interval, unix_now())
        .with_context(|| format!("Failed to update {}", store.path().display()))?;

    match activation {
        Activation::Registered { next_run } => {
            log!("schedule"; "registered, first run at {}", format_time(next_run));
        }
        Activation::AlreadyScheduled { next_run } => {
            log!("schedule"; "already registered, next run at {}", format_time(next_run));
        }
    }
    Ok(())
}

/// Clear the recurring job.
pub fn deactivate(config: &SiteConfig) -> Result<()> {
    let store = schedule_store(config);
    let was_active = schedule::deactivate(&store)
        .with_context(|| format!("Failed to update {}", store.path().display()))?;

    if was_active {
        log!("schedule"; "unregistered");
    } else {
        log!("schedule"; "was not registered");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_parse_config;
    use tempfile::TempDir;

    #[test]
    fn test_activate_then_deactivate() {
        let dir = TempDir::new().unwrap();
        let mut config = test_parse_config("[schedule]\ninterval = 3600");
        config.root = dir.path().to_path_buf();

        activate(&config).unwrap();
        let state = schedule_store(&config).load().unwrap();
        assert!(state.is_active());
        assert_eq!(state.interval, 3600);

        // Second activation keeps the existing registration
        activate(&config).unwrap();
        assert_eq!(schedule_store(&config).load().unwrap().next_run, state.next_run);

        deactivate(&config).unwrap();
        assert!(!schedule_store(&config).load().unwrap().is_active());
    }
}
