//! Small helpers shared across commands.

pub mod date;
pub mod plural;

pub use plural::plural_count;
