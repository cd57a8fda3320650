//! Admin-gated personnel store.
//!
//! The record file is the source of truth; the listing file mirrors it line
//! for line. Every mutation holds the roster lock for its whole
//! read-validate-write span and validates authorization, names, and
//! uniqueness before touching either file, so a rejected call leaves both
//! files byte-identical. Rewrites (update, remove) are buffered in memory and
//! committed once: record file first, then listing.

use crate::core::config::StoreConfig;
use crate::core::file_lock::FileLock;
use crate::core::{listing, records};
use crate::error::{StoreError, StoreResult};
use crate::models::personnel::PersonnelRecord;
use crate::util::fs as store_fs;
use std::fmt;
use tracing::{debug, info, warn};

/// Authorization presented with a mutating operation.
#[derive(Clone, Copy)]
pub enum AdminPin<'a> {
    /// Skip gating. Honored only while the store holds no records, and only
    /// to create the administrator record.
    Bootstrap,
    Pin(&'a str),
}

impl fmt::Debug for AdminPin<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AdminPin::Bootstrap => f.write_str("Bootstrap"),
            AdminPin::Pin(_) => f.write_str("Pin(..)"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreState {
    /// No records: files absent or both empty. Bootstrap is allowed.
    Empty,
    /// Both files present with at least one record.
    Ready,
    /// Exactly one of the two files exists.
    Partial,
}

#[derive(Debug, Clone)]
pub struct PersonnelStore {
    config: StoreConfig,
}

impl PersonnelStore {
    pub fn new(config: StoreConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    pub fn state(&self) -> StoreResult<StoreState> {
        let has_records = self.config.records_path.exists();
        let has_listing = self.config.listing_path.exists();
        match (has_records, has_listing) {
            (false, false) => Ok(StoreState::Empty),
            (true, true) if self.load()?.is_empty() => Ok(StoreState::Empty),
            (true, true) => Ok(StoreState::Ready),
            _ => Ok(StoreState::Partial),
        }
    }

    /// Create a record. Returns the stored record (digest only).
    pub fn create(
        &self,
        name: &str,
        pin: &str,
        admin_pin: AdminPin<'_>,
    ) -> StoreResult<PersonnelRecord> {
        let _lock = self.lock()?;
        let existing = self.load_for_write()?;
        self.authorize(&existing, admin_pin, "create")?;
        validate_name(name)?;

        if matches!(admin_pin, AdminPin::Bootstrap) && name != self.config.admin_name {
            warn!(name, "bootstrap bypass used for a non-administrator record");
            return Err(StoreError::AdminAuth);
        }
        if existing.iter().any(|r| r.name == name) {
            return Err(StoreError::DuplicateCredential {
                name: name.to_string(),
            });
        }

        let record = PersonnelRecord::new(name, pin);
        records::append(&self.config.records_path, &record)?;
        listing::append(&self.config.listing_path, &record)?;
        info!(name, "personnel created");
        Ok(record)
    }

    /// Whether `name` exists and `pin` is its PIN.
    pub fn authenticate(&self, name: &str, pin: &str) -> StoreResult<bool> {
        let records = self.load()?;
        debug!(name, scanned = records.len(), "authenticate");
        Ok(records.iter().any(|r| r.name == name && r.matches(pin)))
    }

    /// Whether any record uses `pin`, regardless of name.
    pub fn authenticate_pin_only(&self, pin: &str) -> StoreResult<bool> {
        let records = self.load()?;
        debug!(scanned = records.len(), "authenticate by pin");
        Ok(records.iter().any(|r| r.matches(pin)))
    }

    /// The gating check used by every mutation.
    pub fn is_admin(&self, admin_pin: AdminPin<'_>) -> StoreResult<bool> {
        let records = self.load()?;
        Ok(self.admin_verifies(&records, admin_pin))
    }

    pub fn find(&self, name: &str) -> StoreResult<Option<PersonnelRecord>> {
        Ok(self.load()?.into_iter().find(|r| r.name == name))
    }

    /// Replace the PIN of `name`. The admin PIN is checked against the
    /// records as they were before the call, so the administrator changes
    /// their own PIN by presenting the old one.
    pub fn update(
        &self,
        name: &str,
        new_pin: &str,
        admin_pin: AdminPin<'_>,
    ) -> StoreResult<PersonnelRecord> {
        let _lock = self.lock()?;
        let mut current = self.load_for_write()?;
        self.authorize(&current, admin_pin, "update")?;

        let before = current.len();
        current.retain(|r| r.name != name);
        if current.len() == before {
            return Err(StoreError::NotFound {
                name: name.to_string(),
            });
        }

        // Same final order as remove-then-create: the record moves to the end.
        let record = PersonnelRecord::new(name, new_pin);
        current.push(record.clone());
        self.commit(&current)?;
        info!(name, "personnel updated");
        Ok(record)
    }

    pub fn remove(&self, name: &str, admin_pin: AdminPin<'_>) -> StoreResult<()> {
        let _lock = self.lock()?;
        let mut current = self.load_for_write()?;
        self.authorize(&current, admin_pin, "remove")?;

        let before = current.len();
        current.retain(|r| r.name != name);
        if current.len() == before {
            return Err(StoreError::NotFound {
                name: name.to_string(),
            });
        }

        self.commit(&current)?;
        info!(name, remaining = current.len(), "personnel removed");
        Ok(())
    }

    /// Names in creation order, read from the listing file. Fails closed if
    /// the listing disagrees with the record file.
    pub fn list_names(&self) -> StoreResult<Vec<String>> {
        let current = self.load()?;
        let entries = match listing::read(&self.config.listing_path)? {
            Some(entries) => entries,
            None if self.config.records_path.exists() => {
                return Err(StoreError::corrupt(
                    &self.config.listing_path,
                    0,
                    "listing file missing",
                ))
            }
            None => return Ok(Vec::new()),
        };

        if let Some(problem) = listing::diff(&entries, &current).into_iter().next() {
            warn!(%problem, "listing out of sync with record file");
            return Err(StoreError::corrupt(&self.config.listing_path, 0, problem));
        }
        Ok(entries.into_iter().map(|e| e.name).collect())
    }

    /// Delete both files. Ungated; callers restrict access out-of-band.
    pub fn reset(&self) -> StoreResult<()> {
        let _lock = self.lock()?;
        for path in [&self.config.records_path, &self.config.listing_path] {
            store_fs::remove_if_exists(path)
                .map_err(|e| StoreError::io("remove store file", path.as_path(), e))?;
        }
        info!("personnel store reset");
        Ok(())
    }

    /// Compare the listing with the record file. Empty when consistent.
    pub fn verify(&self) -> StoreResult<Vec<String>> {
        let current = records::read(&self.config.records_path)?;
        let entries = listing::read(&self.config.listing_path)?;
        Ok(match (current, entries) {
            (None, None) => Vec::new(),
            (Some(_), None) => vec!["listing file missing".to_string()],
            (None, Some(_)) => vec!["record file missing".to_string()],
            (Some(current), Some(entries)) => listing::diff(&entries, &current),
        })
    }

    /// Regenerate the listing from the record file.
    pub fn rebuild_listing(&self, admin_pin: AdminPin<'_>) -> StoreResult<()> {
        let _lock = self.lock()?;
        let current = self.load()?;
        self.authorize(&current, admin_pin, "rebuild listing")?;
        if !self.config.records_path.exists() {
            return Ok(());
        }
        listing::write_all(&self.config.listing_path, &current)?;
        info!(records = current.len(), "listing rebuilt");
        Ok(())
    }

    fn lock(&self) -> StoreResult<FileLock> {
        FileLock::exclusive(&self.config.lock_path)
    }

    fn load(&self) -> StoreResult<Vec<PersonnelRecord>> {
        match records::read(&self.config.records_path)? {
            Some(current) => Ok(current),
            None if self.config.listing_path.exists() => Err(StoreError::corrupt(
                &self.config.records_path,
                0,
                "record file missing while listing file exists",
            )),
            None => Ok(Vec::new()),
        }
    }

    /// Appends and rewrites need both files present, or neither.
    fn load_for_write(&self) -> StoreResult<Vec<PersonnelRecord>> {
        let current = self.load()?;
        if self.config.records_path.exists() && !self.config.listing_path.exists() {
            return Err(StoreError::corrupt(
                &self.config.listing_path,
                0,
                "listing file missing",
            ));
        }
        Ok(current)
    }

    fn admin_verifies(&self, current: &[PersonnelRecord], admin_pin: AdminPin<'_>) -> bool {
        match admin_pin {
            AdminPin::Bootstrap => current.is_empty(),
            AdminPin::Pin(pin) => current
                .iter()
                .any(|r| r.name == self.config.admin_name && r.matches(pin)),
        }
    }

    fn authorize(
        &self,
        current: &[PersonnelRecord],
        admin_pin: AdminPin<'_>,
        operation: &'static str,
    ) -> StoreResult<()> {
        if self.admin_verifies(current, admin_pin) {
            return Ok(());
        }
        warn!(operation, ?admin_pin, "admin authorization rejected");
        Err(StoreError::AdminAuth)
    }

    fn commit(&self, current: &[PersonnelRecord]) -> StoreResult<()> {
        records::write_all(&self.config.records_path, current)?;
        listing::write_all(&self.config.listing_path, current)
    }
}

/// Names are written one per line into the listing, so they must be
/// non-empty, trimmed, and free of control characters.
pub fn validate_name(name: &str) -> StoreResult<()> {
    let reason = if name.is_empty() {
        "name cannot be empty"
    } else if name.trim() != name {
        "leading or trailing whitespace not allowed"
    } else if name.chars().any(char::is_control) {
        "control characters not allowed"
    } else {
        return Ok(());
    };
    Err(StoreError::InvalidName {
        name: name.to_string(),
        reason,
    })
}
