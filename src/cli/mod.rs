//! Command-line interface module.

mod args;
pub mod check;
pub mod common;
pub mod daemon;
pub mod generate;
pub mod schedule;
pub mod settings;

pub use args::{Cli, Commands};
