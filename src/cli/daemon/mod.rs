//! `daemon`: scheduler loop plus the authenticated admin endpoint.
//!
//! ```text
//! main thread ── admin request loop (tiny_http) ── rayon pool ── routes
//!      │
//!      └─ scheduler thread ── tick every TICK ── run_scheduled() when due
//! ```
//!
//! Ctrl+C unblocks the server and wakes the scheduler through the
//! shutdown channel registered in [`crate::core`].

mod response;
mod routes;

use routes::AdminState;

use std::net::SocketAddr;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use anyhow::{Result, anyhow};
use crossbeam::channel::{self, Receiver, RecvTimeoutError};
use tiny_http::Server;

use super::common::{feed_generator, format_time, schedule_store};
use crate::config::SiteConfig;
use crate::core::{is_shutdown, register_server};
use crate::feed::FeedGenerator;
use crate::schedule::ScheduleStore;
use crate::utils::date::unix_now;
use crate::{debug, log};

/// How often the scheduler checks whether a run is due.
const TICK: Duration = Duration::from_secs(30);

/// Worker threads for admin requests.
const REQUEST_THREADS: usize = 2;

/// Run until Ctrl+C.
pub fn run_daemon(config: &SiteConfig) -> Result<()> {
    let generator = Arc::new(feed_generator(config));
    let schedule = schedule_store(config);

    let token = config.admin.token();
    if token.is_none() {
        log!("warning"; "no admin token configured, admin requests will be refused");
    }

    let state = Arc::new(AdminState {
        generator: Arc::clone(&generator),
        schedule: schedule.clone(),
        token,
        public_url: config.feed.public_url(),
    });

    let addr = SocketAddr::new(config.admin.interface, config.admin.port);
    let server = Server::http(addr).map_err(|e| anyhow!("Failed to bind {}: {}", addr, e))?;
    let server = Arc::new(server);

    let (shutdown_tx, shutdown_rx) = channel::unbounded::<()>();
    register_server(Arc::clone(&server), shutdown_tx);

    log!("admin"; "http://{}/admin", addr);
    match schedule.load() {
        Ok(s) if s.is_active() => {
            if let Some(next) = s.next_run {
                log!("schedule"; "next run at {}", format_time(next));
            }
        }
        Ok(_) => log!("schedule"; "not registered, run `shopfeed activate` to enable"),
        Err(e) => log!("warning"; "cannot read schedule state: {}", e),
    }

    let scheduler = spawn_scheduler(generator, schedule, shutdown_rx);
    run_request_loop(&server, &state)?;

    if scheduler.join().is_err() {
        log!("error"; "scheduler thread panicked");
    }
    Ok(())
}

fn run_request_loop(server: &Server, state: &Arc<AdminState>) -> Result<()> {
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(REQUEST_THREADS)
        .build()?;

    for request in server.incoming_requests() {
        if is_shutdown() {
            let _ = response::respond_unavailable(request);
            continue;
        }

        let state = Arc::clone(state);
        pool.spawn(move || {
            if let Err(e) = response::handle(request, &state) {
                log!("admin"; "request error: {e}");
            }
        });
    }
    Ok(())
}

fn spawn_scheduler(
    generator: Arc<FeedGenerator>,
    store: ScheduleStore,
    shutdown_rx: Receiver<()>,
) -> JoinHandle<()> {
    thread::spawn(move || {
        loop {
            if is_shutdown() {
                break;
            }
            if let Err(e) = tick(&generator, &store, unix_now()) {
                log!("error"; "scheduler: {:#}", e);
            }
            match shutdown_rx.recv_timeout(TICK) {
                Err(RecvTimeoutError::Timeout) => {}
                Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
            }
        }
        debug!("schedule"; "scheduler stopped");
    })
}

/// Run the scheduled feed if due. Returns whether a run happened.
///
/// A failed run is recorded in the schedule state and the schedule still
/// advances; there is no retry before the next interval.
pub fn tick(generator: &FeedGenerator, store: &ScheduleStore, now: u64) -> Result<bool> {
    if !store.load()?.is_due(now) {
        return Ok(false);
    }

    let error = generator.run_scheduled().err().map(|e| {
        log!("error"; "scheduled feed run failed: {:#}", e);
        format!("{e:#}")
    });

    // Reload: `deactivate` may have run meanwhile
    let mut state = store.load()?;
    state.complete_run(now, error);
    store.save(&state)?;

    if let Some(next) = state.next_run {
        debug!("schedule"; "next run at {}", format_time(next));
    }
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{MemoryCatalog, test_product};
    use crate::feed::{EXCLUDE_TAGS_OPTION, FeedTarget};
    use crate::options::MemoryOptionStore;
    use crate::schedule::{activate, deactivate};
    use std::fs;
    use tempfile::TempDir;

    const DAY: u64 = 86_400;

    fn generator(path: std::path::PathBuf) -> FeedGenerator {
        FeedGenerator::new(
            Arc::new(MemoryCatalog::new(vec![test_product(1, "A", &[])])),
            Arc::new(MemoryOptionStore::with(EXCLUDE_TAGS_OPTION, "")),
            FeedTarget { path, minify: false },
        )
    }

    #[test]
    fn test_tick_inactive_does_nothing() {
        let dir = TempDir::new().unwrap();
        let generator = generator(dir.path().join("feed.xml"));
        let store = ScheduleStore::in_dir(dir.path());

        assert!(!tick(&generator, &store, 1_000).unwrap());
        assert!(!dir.path().join("feed.xml").exists());
    }

    #[test]
    fn test_tick_runs_when_due_and_advances() {
        let dir = TempDir::new().unwrap();
        let generator = generator(dir.path().join("feed.xml"));
        let store = ScheduleStore::in_dir(dir.path());
        activate(&store, DAY, 1_000).unwrap();

        assert!(tick(&generator, &store, 1_000).unwrap());
        assert!(dir.path().join("feed.xml").exists());

        let state = store.load().unwrap();
        assert_eq!(state.next_run, Some(1_000 + DAY));
        assert_eq!(state.last_run, Some(1_000));
        assert_eq!(state.last_error, None);

        // Not due again until the next interval
        assert!(!tick(&generator, &store, 2_000).unwrap());
        assert!(tick(&generator, &store, 1_000 + DAY).unwrap());
    }

    #[test]
    fn test_tick_records_failure_and_still_advances() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, "").unwrap();
        let generator = generator(blocker.join("feed.xml"));
        let store = ScheduleStore::in_dir(dir.path());
        activate(&store, DAY, 0).unwrap();

        assert!(tick(&generator, &store, 10).unwrap());

        let state = store.load().unwrap();
        assert!(state.last_error.is_some());
        assert_eq!(state.next_run, Some(DAY));
    }

    #[test]
    fn test_tick_after_deactivate() {
        let dir = TempDir::new().unwrap();
        let generator = generator(dir.path().join("feed.xml"));
        let store = ScheduleStore::in_dir(dir.path());
        activate(&store, DAY, 0).unwrap();
        deactivate(&store).unwrap();

        assert!(!tick(&generator, &store, DAY * 5).unwrap());
    }
}
