//! The Photos catalog: locating the library bundle, reading its database,
//! and serving path-resolved photo pages to the host application.

pub mod dates;
pub mod locator;
pub mod reader;
pub mod service;

pub use reader::{PhotoRecord, PhotosCatalog, ResolvedPhoto};
pub use service::{CatalogService, PhotoPage};
