//! Durable record file: one JSON record per `\n`-terminated line.
//!
//! The format is self-delimiting. A file that does not end in a newline was
//! cut short mid-record, and every line must parse into a valid record, so
//! truncation and garbage both surface as [`StoreError::StoreCorrupt`].

use crate::constants;
use crate::core::store::validate_name;
use crate::error::{StoreError, StoreResult};
use crate::models::personnel::PersonnelRecord;
use crate::util::fs as store_fs;
use std::fs;
use std::io;
use std::path::Path;

/// Read every record in write order. A missing file yields `Ok(None)`.
pub fn read(path: &Path) -> StoreResult<Option<Vec<PersonnelRecord>>> {
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(StoreError::io("read record file", path, e)),
    };
    parse(path, &bytes).map(Some)
}

fn parse(path: &Path, bytes: &[u8]) -> StoreResult<Vec<PersonnelRecord>> {
    let mut records = Vec::new();
    let Some(body) = bytes.strip_suffix(b"\n") else {
        if bytes.is_empty() {
            return Ok(records);
        }
        let line = bytes.split(|b| *b == b'\n').count();
        return Err(StoreError::corrupt(path, line, "truncated record"));
    };

    for (idx, raw) in body.split(|b| *b == b'\n').enumerate() {
        let line = idx + 1;
        if raw.is_empty() {
            return Err(StoreError::corrupt(path, line, "blank line"));
        }
        let record: PersonnelRecord = serde_json::from_slice(raw)
            .map_err(|e| StoreError::corrupt(path, line, e.to_string()))?;
        if let Err(e) = validate_name(&record.name) {
            return Err(StoreError::corrupt(path, line, e.to_string()));
        }
        records.push(record);
    }
    Ok(records)
}

fn encode_line(record: &PersonnelRecord, out: &mut Vec<u8>) -> StoreResult<()> {
    serde_json::to_writer(&mut *out, record)?;
    out.push(b'\n');
    Ok(())
}

/// Append one record.
pub fn append(path: &Path, record: &PersonnelRecord) -> StoreResult<()> {
    let mut line = Vec::new();
    encode_line(record, &mut line)?;
    store_fs::append(path, &line, constants::STORE_FILE_MODE)
        .map_err(|e| StoreError::io("append to record file", path, e))
}

/// Atomically replace the file with exactly `records`.
pub fn write_all(path: &Path, records: &[PersonnelRecord]) -> StoreResult<()> {
    let mut content = Vec::new();
    for record in records {
        encode_line(record, &mut content)?;
    }
    store_fs::write_atomic(path, &content, constants::STORE_FILE_MODE)
        .map_err(|e| StoreError::io("rewrite record file", path, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn corrupt_line(result: StoreResult<Option<Vec<PersonnelRecord>>>) -> usize {
        match result {
            Err(StoreError::StoreCorrupt { line, .. }) => line,
            other => panic!("expected StoreCorrupt, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_file_is_none() {
        let dir = TempDir::new().unwrap();
        assert!(read(&dir.path().join("personnel.jsonl")).unwrap().is_none());
    }

    #[test]
    fn test_empty_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("personnel.jsonl");
        fs::write(&path, b"").unwrap();
        assert_eq!(read(&path).unwrap(), Some(Vec::new()));
    }

    #[test]
    fn test_append_preserves_order() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("personnel.jsonl");
        append(&path, &PersonnelRecord::new("Admin", "0000")).unwrap();
        append(&path, &PersonnelRecord::new("alice", "1234")).unwrap();
        append(&path, &PersonnelRecord::new("bob", "9999")).unwrap();
        let names: Vec<_> = read(&path)
            .unwrap()
            .unwrap()
            .into_iter()
            .map(|r| r.name)
            .collect();
        assert_eq!(names, vec!["Admin", "alice", "bob"]);
    }

    #[test]
    fn test_write_all_replaces() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("personnel.jsonl");
        append(&path, &PersonnelRecord::new("alice", "1")).unwrap();
        write_all(&path, &[PersonnelRecord::new("bob", "2")]).unwrap();
        let records = read(&path).unwrap().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name, "bob");
        assert!(records[0].matches("2"));
    }

    #[test]
    fn test_truncated_mid_record() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("personnel.jsonl");
        append(&path, &PersonnelRecord::new("alice", "1")).unwrap();
        append(&path, &PersonnelRecord::new("bob", "2")).unwrap();
        let bytes = fs::read(&path).unwrap();
        fs::write(&path, &bytes[..bytes.len() - 10]).unwrap();
        assert_eq!(corrupt_line(read(&path)), 2);
    }

    #[test]
    fn test_missing_final_newline_only() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("personnel.jsonl");
        append(&path, &PersonnelRecord::new("alice", "1")).unwrap();
        let bytes = fs::read(&path).unwrap();
        fs::write(&path, &bytes[..bytes.len() - 1]).unwrap();
        assert_eq!(corrupt_line(read(&path)), 1);
    }

    #[test]
    fn test_garbage_line() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("personnel.jsonl");
        append(&path, &PersonnelRecord::new("alice", "1")).unwrap();
        store_fs::append(&path, b"not json\n", 0o600).unwrap();
        assert_eq!(corrupt_line(read(&path)), 2);
    }

    #[test]
    fn test_blank_line() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("personnel.jsonl");
        store_fs::append(&path, b"\n", 0o600).unwrap();
        assert_eq!(corrupt_line(read(&path)), 1);
    }

    #[test]
    fn test_invalid_stored_name() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("personnel.jsonl");
        let rec = PersonnelRecord::new("", "1");
        let line = format!(r#"{{"name":"","pin_hash":"{}"}}"#, rec.pin_hash);
        fs::write(&path, format!("{}\n", line)).unwrap();
        assert_eq!(corrupt_line(read(&path)), 1);
    }
}
