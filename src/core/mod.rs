//! Core business logic modules.

pub mod config;
pub mod file_lock;
pub mod hasher;
pub mod listing;
pub mod paths;
pub mod records;
pub mod store;
