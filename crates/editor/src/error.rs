//! Error types
//!
//! Action and registry errors are logged where they happen and the
//! operation is skipped. Only persistence and catalog failures travel back
//! to the caller.

use std::path::PathBuf;

use shared::{AssetId, ObjectId};
use thiserror::Error;

/// Recoverable problems raised while applying or undoing actions
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EditorError {
    /// An entry id has no resolved template
    #[error("catalog entry {id:?} is missing or has no template")]
    MissingCatalogEntry { id: AssetId },

    /// Create applied while it still owns a live object
    #[error("create action re-applied while holding live object {object}; destroying the stale one")]
    StaleActionReapplication { object: ObjectId },

    /// Undo refers to an object that no longer exists
    #[error("{action} cannot be undone: object {object} was already released")]
    UndoOnAlreadyReleasedObject { action: &'static str, object: ObjectId },

    /// Apply refers to an object that no longer exists
    #[error("{action} cannot be applied: object {object} does not exist")]
    MissingTarget { action: &'static str, object: ObjectId },
}

/// Failures reading or writing scene snapshots
#[derive(Error, Debug)]
pub enum PersistenceError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid snapshot {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to encode snapshot: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("no snapshot stored under {0:?}")]
    NotFound(String),

    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

impl PersistenceError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Failures loading the asset catalog
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CatalogError {
    #[error("catalog source failed ({code}): {message}")]
    Source { code: u16, message: String },

    #[error("catalog manifest {path} could not be read: {message}")]
    Manifest { path: PathBuf, message: String },

    #[error("catalog loader went away before finishing")]
    Abandoned,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_editor_error_messages() {
        let err = EditorError::MissingCatalogEntry { id: "tree".into() };
        assert!(err.to_string().contains("\"tree\""));

        let err = EditorError::UndoOnAlreadyReleasedObject {
            action: "CreateAction",
            object: "abc".into(),
        };
        assert!(err.to_string().starts_with("CreateAction cannot be undone"));
    }

    #[test]
    fn test_persistence_error_from_catalog() {
        let err: PersistenceError = CatalogError::Abandoned.into();
        assert!(matches!(err, PersistenceError::Catalog(CatalogError::Abandoned)));
    }
}
