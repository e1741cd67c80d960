//! Plain-folder photo listing and data-URI reads.
//!
//! This is the non-catalog path: the user points at any directory and gets
//! back the image files directly inside it. No recursion; subfolders are the
//! user's business.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

use crate::catalog::ResolvedPhoto;
use crate::error::Result;

/// Image extensions served by the folder listing, lowercase.
const IMAGE_EXTENSIONS: [&str; 7] = ["jpg", "jpeg", "png", "gif", "bmp", "webp", "heic"];

/// One image file found in a directory listing.
#[derive(Debug, Clone, Serialize)]
pub struct PhotoFile {
    pub name: String,
    pub path: PathBuf,
    pub size: u64,
    pub modified: Option<DateTime<Utc>>,
}

fn has_image_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .map(|e| IMAGE_EXTENSIONS.contains(&e.as_str()))
        .unwrap_or(false)
}

/// List the image files directly inside `directory`, sorted by name.
pub fn list_directory_photos(directory: &Path) -> Result<Vec<PhotoFile>> {
    let mut photos = Vec::new();

    for entry in WalkDir::new(directory).max_depth(1).follow_links(false) {
        let entry = entry.map_err(std::io::Error::from)?;
        let path = entry.path();

        if !path.is_file() || !has_image_extension(path) {
            continue;
        }

        // A file vanishing mid-listing is not worth failing the whole page.
        let metadata = match path.metadata() {
            Ok(m) => m,
            Err(_) => continue,
        };

        photos.push(PhotoFile {
            name: entry.file_name().to_string_lossy().to_string(),
            path: path.to_path_buf(),
            size: metadata.len(),
            modified: metadata.modified().ok().map(DateTime::<Utc>::from),
        });
    }

    photos.sort_by(|a, b| a.name.cmp(&b.name));
    debug!("Listed {} photos in {:?}", photos.len(), directory);
    Ok(photos)
}

/// MIME type from the file extension; unrecognized extensions fall back to
/// JPEG, matching what browsers tolerate best.
fn mime_type_for(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "png" => "image/png",
        "gif" => "image/gif",
        "bmp" => "image/bmp",
        "webp" => "image/webp",
        "heic" => "image/heic",
        _ => "image/jpeg",
    }
}

/// Read a file and encode it as a `data:` URI for direct display.
pub fn read_photo_as_data_uri(path: &Path) -> Result<String> {
    let data = std::fs::read(path)?;
    Ok(format!(
        "data:{};base64,{}",
        mime_type_for(path),
        BASE64.encode(&data)
    ))
}

impl ResolvedPhoto {
    /// Read the resolved original as a data URI, recording the file size on
    /// the way (listing leaves `size` unset until the file is actually read).
    pub fn read_data_uri(&mut self) -> Result<String> {
        let data = std::fs::read(&self.path)?;
        self.size = Some(data.len() as u64);
        Ok(format!(
            "data:{};base64,{}",
            mime_type_for(&self.path),
            BASE64.encode(&data)
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::{self, File};
    use std::io::Write;
    use tempfile::tempdir;

    #[test]
    fn test_lists_only_images_non_recursively() {
        let dir = tempdir().unwrap();
        File::create(dir.path().join("b.jpg")).unwrap();
        File::create(dir.path().join("a.PNG")).unwrap();
        File::create(dir.path().join("notes.txt")).unwrap();
        fs::create_dir(dir.path().join("nested")).unwrap();
        File::create(dir.path().join("nested/c.jpg")).unwrap();

        let photos = list_directory_photos(dir.path()).unwrap();
        let names: Vec<&str> = photos.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["a.PNG", "b.jpg"]);
    }

    #[test]
    fn test_listing_carries_size_and_mtime() {
        let dir = tempdir().unwrap();
        let mut f = File::create(dir.path().join("a.jpg")).unwrap();
        f.write_all(b"12345").unwrap();

        let photos = list_directory_photos(dir.path()).unwrap();
        assert_eq!(photos[0].size, 5);
        assert!(photos[0].modified.is_some());
    }

    #[test]
    fn test_missing_directory_is_an_error() {
        let dir = tempdir().unwrap();
        let gone = dir.path().join("nope");
        assert!(list_directory_photos(&gone).is_err());
    }

    #[test]
    fn test_data_uri_mime_and_payload() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("pic.png");
        fs::write(&path, b"abc").unwrap();

        let uri = read_photo_as_data_uri(&path).unwrap();
        assert_eq!(uri, "data:image/png;base64,YWJj");
    }

    #[test]
    fn test_resolved_photo_read_records_size() {
        use crate::catalog::{PhotoRecord, ResolvedPhoto};

        let dir = tempdir().unwrap();
        let path = dir.path().join("IMG_01.HEIC");
        fs::write(&path, b"abcd").unwrap();

        let mut photo = ResolvedPhoto {
            photo: PhotoRecord {
                id: 1,
                name: "IMG_01.HEIC".to_string(),
                uuid: None,
                directory: None,
                filename: Some("IMG_01.HEIC".to_string()),
                width: None,
                height: None,
                added_date: None,
                date_created: None,
                modification_date: None,
                kind: 0,
            },
            path,
            size: None,
        };

        let uri = photo.read_data_uri().unwrap();
        assert!(uri.starts_with("data:image/heic;base64,"));
        assert_eq!(photo.size, Some(4));
    }

    #[test]
    fn test_unknown_extension_defaults_to_jpeg() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("pic.xyz");
        fs::write(&path, b"abc").unwrap();

        let uri = read_photo_as_data_uri(&path).unwrap();
        assert!(uri.starts_with("data:image/jpeg;base64,"));
    }
}
