//! Data structures persisted by the roster.

pub mod personnel;
pub mod roster_config;
