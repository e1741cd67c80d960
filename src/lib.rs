//! shoebox — read-only access to the local Apple Photos library, plus plain
//! folder photo listings.
//!
//! The catalog side locates the `.photoslibrary` bundle, opens the SQLite
//! database inside it read-only, and serves paginated pages of photo records
//! resolved to their original files on disk. The browse side lists image
//! files straight out of any directory. Nothing here writes to the catalog.

pub mod browse;
pub mod catalog;
pub mod config;
pub mod error;
pub mod logging;

pub use catalog::{CatalogService, PhotoPage, PhotoRecord, PhotosCatalog, ResolvedPhoto};
pub use config::Config;
pub use error::{CatalogError, Result};
