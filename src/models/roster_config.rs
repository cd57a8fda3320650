//! Optional `roster.toml` model.

use crate::constants;
use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RosterFile {
    #[serde(default)]
    pub store: StoreSection,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StoreSection {
    /// Name of the administrator record.
    #[serde(default = "default_admin_name")]
    pub admin_name: String,

    /// Durable record file, relative to the store root.
    #[serde(default = "default_records_file")]
    pub records_file: String,

    /// Listing file, relative to the store root.
    #[serde(default = "default_listing_file")]
    pub listing_file: String,
}

impl Default for StoreSection {
    fn default() -> Self {
        Self {
            admin_name: default_admin_name(),
            records_file: default_records_file(),
            listing_file: default_listing_file(),
        }
    }
}

fn default_admin_name() -> String {
    constants::DEFAULT_ADMIN_NAME.to_string()
}

fn default_records_file() -> String {
    constants::RECORDS_FILE.to_string()
}

fn default_listing_file() -> String {
    constants::LISTING_FILE.to_string()
}
