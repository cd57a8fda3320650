//! Centralized constants for file names, permissions, and the admin identity.

/// Reserved name of the administrator record.
pub const DEFAULT_ADMIN_NAME: &str = "Admin";

/// Durable record file name (one JSON record per line).
pub const RECORDS_FILE: &str = "personnel.jsonl";

/// Human-readable listing file name (`<name>, <hash>` per line).
pub const LISTING_FILE: &str = "personnel.txt";

/// Optional store configuration file.
pub const CONFIG_FILE: &str = "roster.toml";

/// Advisory lock file guarding mutations.
pub const LOCK_FILE: &str = "roster.lock";

/// Permission mode for the record and listing files.
pub const STORE_FILE_MODE: u32 = 0o600;

/// Permission mode for a store directory created by the CLI.
pub const STORE_DIR_MODE: u32 = 0o700;

/// Length of a rendered PIN digest (SHA-256, lowercase hex).
pub const DIGEST_HEX_LEN: usize = 64;

/// Separator between name and digest in the listing file.
pub const LISTING_SEPARATOR: &str = ", ";
