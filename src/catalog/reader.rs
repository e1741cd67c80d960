//! Read-only access to the Photos catalog database.
//!
//! The schema is Apple's, undocumented and versioned by them, so everything
//! that knows a column name or an on-disk layout convention lives here. The
//! connection is read-only and the reader never mutates the catalog.

use rusqlite::{Connection, OpenFlags};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use super::dates::from_apple_epoch;
use super::locator;
use crate::error::{CatalogError, Result};
use chrono::{DateTime, Utc};

/// One catalog row, with timestamps already converted to UTC.
#[derive(Debug, Clone, Serialize)]
pub struct PhotoRecord {
    pub id: i64,
    /// Display name: the filename, or "Unknown" when the catalog has none.
    pub name: String,
    pub uuid: Option<String>,
    pub directory: Option<String>,
    pub filename: Option<String>,
    pub width: Option<i64>,
    pub height: Option<i64>,
    pub added_date: Option<DateTime<Utc>>,
    pub date_created: Option<DateTime<Utc>>,
    pub modification_date: Option<DateTime<Utc>>,
    pub kind: i64,
}

/// A catalog row together with the original file it resolved to.
///
/// `size` is filled in lazily the first time the file is actually read
/// (see [`ResolvedPhoto::read_data_uri`]), not during listing.
#[derive(Debug, Clone, Serialize)]
pub struct ResolvedPhoto {
    #[serde(flatten)]
    pub photo: PhotoRecord,
    pub path: PathBuf,
    pub size: Option<u64>,
}

const PHOTO_QUERY: &str = r#"
    SELECT
        ZASSET.Z_PK as id,
        ZASSET.ZFILENAME as filename,
        ZASSET.ZDIRECTORY as directory,
        ZASSET.ZUUID as uuid,
        ZASSET.ZADDEDDATE as addedDate,
        ZASSET.ZDATECREATED as dateCreated,
        ZASSET.ZMODIFICATIONDATE as modificationDate,
        ZASSET.ZWIDTH as width,
        ZASSET.ZHEIGHT as height,
        ZASSET.ZKIND as kind
    FROM ZASSET
    WHERE ZASSET.ZTRASHEDSTATE = 0
      AND ZASSET.ZKIND = 0
    ORDER BY ZASSET.ZDATECREATED DESC
    LIMIT ? OFFSET ?
"#;

const COUNT_QUERY: &str = r#"
    SELECT COUNT(*)
    FROM ZASSET
    WHERE ZASSET.ZTRASHEDSTATE = 0
      AND ZASSET.ZKIND = 0
"#;

enum State {
    Unopened,
    Open { conn: Connection, root: PathBuf },
    Closed,
}

/// Handle to the Photos catalog. One live connection at most; callers drive
/// one handle from one thread at a time (mutating operations take `&mut self`,
/// so the borrow checker enforces the serialization the design requires).
pub struct PhotosCatalog {
    state: State,
}

impl Default for PhotosCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl PhotosCatalog {
    pub fn new() -> Self {
        Self {
            state: State::Unopened,
        }
    }

    /// Locate the Photos library and open its database read-only.
    ///
    /// On failure the previous state is kept, so a later retry can succeed.
    pub fn connect(&mut self) -> Result<()> {
        let root = locator::find_library().ok_or(CatalogError::LibraryNotFound)?;
        self.connect_to(root)
    }

    /// Open the database inside an explicit bundle root.
    ///
    /// Used when the library location is configured rather than discovered.
    pub fn connect_to(&mut self, root: impl Into<PathBuf>) -> Result<()> {
        let root = root.into();
        let db_path = root.join("database").join("photos.db");

        if !db_path.exists() {
            return Err(CatalogError::DatabaseNotFound { path: db_path });
        }

        let conn = Connection::open_with_flags(
            &db_path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .map_err(CatalogError::Connection)?;

        info!("Opened Photos catalog at {:?}", db_path);
        self.state = State::Open { conn, root };
        Ok(())
    }

    pub fn is_open(&self) -> bool {
        matches!(self.state, State::Open { .. })
    }

    fn open_state(&self) -> Result<(&Connection, &Path)> {
        match &self.state {
            State::Open { conn, root } => Ok((conn, root)),
            _ => Err(CatalogError::NotConnected),
        }
    }

    /// Fetch one page of image assets, most recently created first.
    ///
    /// Rows whose original file cannot be found on disk are dropped, so a
    /// page may be shorter than `limit` even when more catalog rows exist.
    /// Callers paging through the catalog should drive on [`photo_count`],
    /// not on page length.
    ///
    /// [`photo_count`]: PhotosCatalog::photo_count
    pub fn photos(&self, limit: i64, offset: i64) -> Result<Vec<ResolvedPhoto>> {
        let (conn, root) = self.open_state()?;
        validate_page(limit, offset)?;

        let mut stmt = conn.prepare(PHOTO_QUERY).map_err(CatalogError::Query)?;
        let rows = stmt
            .query_map(rusqlite::params![limit, offset], |row| {
                let filename: Option<String> = row.get("filename")?;
                Ok(PhotoRecord {
                    id: row.get("id")?,
                    name: filename.clone().unwrap_or_else(|| "Unknown".to_string()),
                    uuid: row.get("uuid")?,
                    directory: row.get("directory")?,
                    filename,
                    width: row.get("width")?,
                    height: row.get("height")?,
                    added_date: from_apple_epoch(row.get("addedDate")?),
                    date_created: from_apple_epoch(row.get("dateCreated")?),
                    modification_date: from_apple_epoch(row.get("modificationDate")?),
                    kind: row.get("kind")?,
                })
            })
            .map_err(CatalogError::Query)?;

        let mut photos = Vec::new();
        for row in rows {
            let record = row.map_err(CatalogError::Query)?;
            match resolve_original(root, &record) {
                Some(path) => photos.push(ResolvedPhoto {
                    photo: record,
                    path,
                    size: None,
                }),
                None => debug!("No original on disk for asset {} ({})", record.id, record.name),
            }
        }

        debug!(
            "Catalog page limit={} offset={} -> {} photos",
            limit,
            offset,
            photos.len()
        );
        Ok(photos)
    }

    /// Total image assets matching the same filter, ignoring pagination.
    pub fn photo_count(&self) -> Result<i64> {
        let (conn, _) = self.open_state()?;
        conn.query_row(COUNT_QUERY, [], |row| row.get(0))
            .map_err(CatalogError::Query)
    }

    /// Release the connection. Safe to call any number of times; only another
    /// `connect` is valid afterwards.
    pub fn close(&mut self) {
        if self.is_open() {
            self.state = State::Closed;
            info!("Closed Photos catalog");
        }
    }
}

fn validate_page(limit: i64, offset: i64) -> Result<()> {
    if limit < 0 {
        return Err(CatalogError::InvalidPage {
            param: "limit",
            value: limit,
        });
    }
    if offset < 0 {
        return Err(CatalogError::InvalidPage {
            param: "offset",
            value: offset,
        });
    }
    Ok(())
}

/// Find the original file for a catalog row under `<bundle>/originals/`.
///
/// Two layout conventions have shipped: assets bucketed by the ZDIRECTORY
/// column, and assets bucketed by the first dash-delimited segment of the
/// UUID. The catalog does not record which is in effect, so both are probed
/// and an existence check decides. First hit wins; no hit means the row is
/// not served.
fn resolve_original(root: &Path, photo: &PhotoRecord) -> Option<PathBuf> {
    let originals = root.join("originals");

    if let (Some(directory), Some(filename)) = (&photo.directory, &photo.filename) {
        let candidate = originals.join(directory).join(filename);
        if candidate.exists() {
            return Some(candidate);
        }
    }

    if let (Some(uuid), Some(filename)) = (&photo.uuid, &photo.filename) {
        let bucket = uuid.split('-').next().unwrap_or(uuid);
        let candidate = originals.join(bucket).join(filename);
        if candidate.exists() {
            return Some(candidate);
        }
    }

    None
}
