//! PIN-guarded personnel roster.
//!
//! Keeps a small set of named personnel records in local flat files and uses
//! them to authorize privileged operations in a shared space. One reserved
//! record is the administrator; every mutation must present its PIN.
//!
//! ## Modules
//! - `cli` — Command-line flags and prompts
//! - `core` — Store, hashing, file codecs, locking, configuration
//! - `models` — Data structures
//! - `util` — Filesystem helpers

pub mod cli;
pub mod constants;
pub mod core;
pub mod error;
pub mod models;
pub mod util;

pub use crate::core::config::StoreConfig;
pub use crate::core::store::{AdminPin, PersonnelStore, StoreState};
pub use crate::error::{StoreError, StoreResult};
pub use crate::models::personnel::PersonnelRecord;
