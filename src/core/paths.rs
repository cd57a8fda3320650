//! Store root resolution.

use crate::constants;
use anyhow::{Context, Result};
use std::env;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct RosterPaths {
    pub root: PathBuf,
    pub config_toml: PathBuf,
}

impl RosterPaths {
    /// Resolve the store root from the CLI arg, or the nearest ancestor of
    /// the working directory that already holds a roster, or the working
    /// directory itself.
    pub fn resolve(root_arg: Option<PathBuf>) -> Result<Self> {
        if let Some(root) = root_arg {
            return Ok(Self::from_root(root));
        }
        let cwd = env::current_dir().context("resolve current directory")?;
        if let Some(found) = find_roster_root(&cwd) {
            return Ok(Self::from_root(found));
        }
        Ok(Self::from_root(cwd))
    }

    pub fn from_root(root: PathBuf) -> Self {
        let config_toml = root.join(constants::CONFIG_FILE);
        Self { root, config_toml }
    }
}

fn find_roster_root(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .find(|dir| looks_like_root(dir))
        .map(Path::to_path_buf)
}

fn looks_like_root(path: &Path) -> bool {
    path.join(constants::CONFIG_FILE).is_file() || path.join(constants::RECORDS_FILE).is_file()
}

impl std::fmt::Display for RosterPaths {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "roster@{}", self.root.display())
    }
}
