//! Typed failures of the personnel store.

use std::path::PathBuf;
use thiserror::Error;

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug, Error)]
pub enum StoreError {
    /// Wrong or missing admin PIN on a gated operation.
    #[error("admin PIN incorrect")]
    AdminAuth,

    #[error("personnel '{name}' already exists")]
    DuplicateCredential { name: String },

    #[error("personnel '{name}' not found")]
    NotFound { name: String },

    #[error("invalid personnel name {name:?}: {reason}")]
    InvalidName { name: String, reason: &'static str },

    /// A store file exists but does not parse as a sequence of valid records.
    #[error("store file {} is corrupt at line {line}: {reason}", path.display())]
    StoreCorrupt {
        path: PathBuf,
        line: usize,
        reason: String,
    },

    #[error("encode record: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("{action} {}: {source}", path.display())]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl StoreError {
    pub(crate) fn io(action: &'static str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            action,
            path: path.into(),
            source,
        }
    }

    pub(crate) fn corrupt(path: impl Into<PathBuf>, line: usize, reason: impl Into<String>) -> Self {
        Self::StoreCorrupt {
            path: path.into(),
            line,
            reason: reason.into(),
        }
    }

    /// Whether the failure left the store files untouched by construction.
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            Self::AdminAuth
                | Self::DuplicateCredential { .. }
                | Self::NotFound { .. }
                | Self::InvalidName { .. }
        )
    }
}
