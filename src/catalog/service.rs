//! Host-facing boundary around the catalog.
//!
//! The host application creates one `CatalogService` at startup, drives it
//! from one place, and calls `shutdown` on exit. The handle underneath is
//! opened lazily on the first page request.

use serde::Serialize;
use std::path::PathBuf;
use tracing::info;

use super::locator;
use super::reader::{PhotosCatalog, ResolvedPhoto};
use crate::error::Result;

/// One page of catalog photos plus the pagination envelope.
///
/// `total` is the catalog's row count under the image/not-trashed filter, not
/// the number of photos in this page; pages can come back shorter than
/// `limit` while more rows remain.
#[derive(Debug, Serialize)]
pub struct PhotoPage {
    pub photos: Vec<ResolvedPhoto>,
    pub total: i64,
    pub limit: i64,
    pub offset: i64,
}

/// Owns the single catalog handle for the process.
pub struct CatalogService {
    catalog: PhotosCatalog,
    library_path: Option<PathBuf>,
}

impl CatalogService {
    /// `library_path` overrides bundle discovery when set (from config).
    pub fn new(library_path: Option<PathBuf>) -> Self {
        Self {
            catalog: PhotosCatalog::new(),
            library_path,
        }
    }

    /// Whether a Photos library is present. Existence checks only; never
    /// opens the database.
    pub fn is_available(&self) -> bool {
        match &self.library_path {
            Some(root) => root.exists(),
            None => locator::is_available(),
        }
    }

    /// Fetch a catalog page, connecting on first use.
    pub fn list_photos(&mut self, limit: i64, offset: i64) -> Result<PhotoPage> {
        if !self.catalog.is_open() {
            match &self.library_path {
                Some(root) => self.catalog.connect_to(root.clone())?,
                None => self.catalog.connect()?,
            }
        }

        let photos = self.catalog.photos(limit, offset)?;
        let total = self.catalog.photo_count()?;

        Ok(PhotoPage {
            photos,
            total,
            limit,
            offset,
        })
    }

    /// Release the catalog connection. Called once at process exit; safe to
    /// call again.
    pub fn shutdown(&mut self) {
        if self.catalog.is_open() {
            info!("Shutting down catalog service");
        }
        self.catalog.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CatalogError;
    use rusqlite::Connection;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_list_photos_surfaces_missing_database() {
        let dir = tempdir().unwrap();
        let root = dir.path().join("Test.photoslibrary");
        fs::create_dir_all(&root).unwrap();

        let mut service = CatalogService::new(Some(root));
        assert!(service.is_available());
        assert!(matches!(
            service.list_photos(10, 0).unwrap_err(),
            CatalogError::DatabaseNotFound { .. }
        ));
    }

    #[test]
    fn test_override_root_availability() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("Nowhere.photoslibrary");
        let service = CatalogService::new(Some(missing));
        assert!(!service.is_available());
    }

    #[test]
    fn test_lazy_connect_and_shutdown() {
        let dir = tempdir().unwrap();
        let root = dir.path().join("Test.photoslibrary");
        fs::create_dir_all(root.join("database")).unwrap();
        fs::create_dir_all(root.join("originals")).unwrap();
        let conn = Connection::open(root.join("database/photos.db")).unwrap();
        conn.execute_batch(
            "CREATE TABLE ZASSET (
                Z_PK INTEGER PRIMARY KEY, ZFILENAME TEXT, ZDIRECTORY TEXT,
                ZUUID TEXT, ZADDEDDATE REAL, ZDATECREATED REAL,
                ZMODIFICATIONDATE REAL, ZWIDTH INTEGER, ZHEIGHT INTEGER,
                ZKIND INTEGER NOT NULL, ZTRASHEDSTATE INTEGER NOT NULL
            );",
        )
        .unwrap();

        let mut service = CatalogService::new(Some(root));
        let page = service.list_photos(25, 0).unwrap();
        assert_eq!(page.total, 0);
        assert_eq!(page.limit, 25);
        assert_eq!(page.offset, 0);
        assert!(page.photos.is_empty());

        service.shutdown();
        service.shutdown();
    }
}
