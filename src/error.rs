//! Error types for catalog and folder access.

use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced by the catalog and browse layers.
#[derive(Error, Debug)]
pub enum CatalogError {
    // ===== Not found (nothing to open) =====
    #[error("Photos library not found in any conventional location")]
    LibraryNotFound,

    #[error("Photos database not found at {path}")]
    DatabaseNotFound { path: PathBuf },

    // ===== Connection (database exists but cannot be opened) =====
    #[error("failed to open Photos database: {0}")]
    Connection(#[source] rusqlite::Error),

    // ===== State (operation out of order) =====
    #[error("catalog is not connected; call connect() first")]
    NotConnected,

    // ===== Validation =====
    #[error("invalid {param}: {value} (must be a non-negative integer)")]
    InvalidPage { param: &'static str, value: i64 },

    // ===== Query (engine rejected a well-formed query) =====
    #[error("photo query failed: {0}")]
    Query(#[source] rusqlite::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl CatalogError {
    /// User-facing message, distinct per kind so a host UI can present
    /// "library not found" differently from "could not open library".
    pub fn user_message(&self) -> String {
        match self {
            CatalogError::LibraryNotFound | CatalogError::DatabaseNotFound { .. } => {
                "Photos library not found".to_string()
            }
            CatalogError::Connection(_) => "could not open Photos library".to_string(),
            _ => self.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, CatalogError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_messages_distinguish_kinds() {
        assert_eq!(
            CatalogError::LibraryNotFound.user_message(),
            "Photos library not found"
        );
        assert_eq!(
            CatalogError::DatabaseNotFound {
                path: PathBuf::from("/x/database/photos.db")
            }
            .user_message(),
            "Photos library not found"
        );
        assert!(CatalogError::NotConnected.user_message().contains("connect()"));
    }
}
