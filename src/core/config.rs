//! Store configuration: where the files live and who the administrator is.

use crate::constants;
use crate::core::paths::RosterPaths;
use crate::core::store::validate_name;
use crate::models::roster_config::RosterFile;
use anyhow::{bail, Context, Result};
use std::fs;
use std::path::PathBuf;

/// Everything a [`PersonnelStore`](crate::core::store::PersonnelStore) needs
/// to know about its environment.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    pub records_path: PathBuf,
    pub listing_path: PathBuf,
    pub lock_path: PathBuf,
    pub admin_name: String,
}

impl StoreConfig {
    /// Default layout rooted at `root`.
    pub fn from_root(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        Self {
            records_path: root.join(constants::RECORDS_FILE),
            listing_path: root.join(constants::LISTING_FILE),
            lock_path: root.join(constants::LOCK_FILE),
            admin_name: constants::DEFAULT_ADMIN_NAME.to_string(),
        }
    }

    /// Load `roster.toml` if present and apply it on top of the defaults.
    pub fn load(paths: &RosterPaths) -> Result<Self> {
        let file = load_roster_file(paths)?;
        let section = file.store;

        validate_name(&section.admin_name)
            .with_context(|| format!("admin_name in {}", paths.config_toml.display()))?;
        if section.records_file == section.listing_file {
            bail!(
                "records_file and listing_file must differ in {}",
                paths.config_toml.display()
            );
        }

        Ok(Self {
            records_path: paths.root.join(&section.records_file),
            listing_path: paths.root.join(&section.listing_file),
            lock_path: paths.root.join(constants::LOCK_FILE),
            admin_name: section.admin_name,
        })
    }
}

fn load_roster_file(paths: &RosterPaths) -> Result<RosterFile> {
    if !paths.config_toml.exists() {
        return Ok(RosterFile::default());
    }
    let content = fs::read_to_string(&paths.config_toml)
        .with_context(|| format!("read roster config {}", paths.config_toml.display()))?;
    toml::from_str(&content)
        .with_context(|| format!("parse roster config {}", paths.config_toml.display()))
}
