//! Human-readable listing file: `<name>, <pinHashHex>` per live record.

use crate::constants;
use crate::core::hasher::PinDigest;
use crate::error::{StoreError, StoreResult};
use crate::models::personnel::PersonnelRecord;
use crate::util::fs as store_fs;
use std::fs;
use std::io;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingEntry {
    pub name: String,
    pub pin_hash: PinDigest,
}

impl ListingEntry {
    /// Whether this line describes `record`.
    pub fn describes(&self, record: &PersonnelRecord) -> bool {
        self.name == record.name && self.pin_hash.matches_digest(&record.pin_hash)
    }
}

/// Read all entries in file order. A missing file yields `Ok(None)`.
pub fn read(path: &Path) -> StoreResult<Option<Vec<ListingEntry>>> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(e) if e.kind() == io::ErrorKind::InvalidData => {
            return Err(StoreError::corrupt(path, 0, "listing is not valid UTF-8"))
        }
        Err(e) => return Err(StoreError::io("read listing file", path, e)),
    };

    if !content.is_empty() && !content.ends_with('\n') {
        let line = content.lines().count();
        return Err(StoreError::corrupt(path, line, "truncated line"));
    }

    let mut entries = Vec::new();
    for (idx, line) in content.lines().enumerate() {
        let entry = parse_line(line).map_err(|reason| StoreError::corrupt(path, idx + 1, reason))?;
        entries.push(entry);
    }
    Ok(Some(entries))
}

fn parse_line(line: &str) -> Result<ListingEntry, String> {
    let (name, hash) = line
        .rsplit_once(constants::LISTING_SEPARATOR)
        .ok_or_else(|| "missing separator".to_string())?;
    if name.is_empty() {
        return Err("empty name".to_string());
    }
    Ok(ListingEntry {
        name: name.to_string(),
        pin_hash: PinDigest::from_hex(hash)?,
    })
}

fn render(records: &[PersonnelRecord]) -> String {
    records
        .iter()
        .map(|r| format!("{}\n", r.listing_line()))
        .collect()
}

/// Append the line for one record.
pub fn append(path: &Path, record: &PersonnelRecord) -> StoreResult<()> {
    let line = format!("{}\n", record.listing_line());
    store_fs::append(path, line.as_bytes(), constants::STORE_FILE_MODE)
        .map_err(|e| StoreError::io("append to listing file", path, e))
}

/// Atomically replace the listing with one line per record.
pub fn write_all(path: &Path, records: &[PersonnelRecord]) -> StoreResult<()> {
    store_fs::write_atomic(path, render(records).as_bytes(), constants::STORE_FILE_MODE)
        .map_err(|e| StoreError::io("rewrite listing file", path, e))
}

/// Describe every way the listing disagrees with the record set.
pub fn diff(entries: &[ListingEntry], records: &[PersonnelRecord]) -> Vec<String> {
    let mut problems = Vec::new();
    for (idx, (entry, record)) in entries.iter().zip(records).enumerate() {
        if !entry.describes(record) {
            problems.push(format!(
                "line {}: listing has '{}', record file has '{}'",
                idx + 1,
                entry.name,
                record.name
            ));
        }
    }
    if entries.len() != records.len() {
        problems.push(format!(
            "listing has {} lines, record file has {} records",
            entries.len(),
            records.len()
        ));
    }
    problems
}
