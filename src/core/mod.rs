//! Core state shared across commands.

mod state;

pub use state::{RunGuard, is_running, is_shutdown, register_server, setup_shutdown_handler};
