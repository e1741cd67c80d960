//! Locates the Apple Photos library bundle on disk.
//!
//! The bundle lives at one of a small set of conventional paths under the
//! user's home directory. Discovery is a plain existence probe: the catalog
//! does not advertise itself, and opening the database just to check for it
//! would be far more expensive than a couple of stat calls.

use std::path::{Path, PathBuf};

/// Bundle names probed under `~/Pictures`, in priority order.
const BUNDLE_NAMES: [&str; 2] = ["Photos Library.photoslibrary", "Photos.photoslibrary"];

/// Find the Photos library bundle, if one exists.
///
/// Returns `None` on non-macOS platforms unconditionally, otherwise the first
/// existing candidate under the current user's home directory. Deterministic
/// for a given filesystem state; performs no caching.
pub fn find_library() -> Option<PathBuf> {
    if !cfg!(target_os = "macos") {
        return None;
    }

    let home = dirs::home_dir()?;
    find_library_in(&home)
}

/// Probe the conventional bundle locations under an explicit home directory.
///
/// Platform-independent; `find_library` adds the OS gate on top.
pub(crate) fn find_library_in(home: &Path) -> Option<PathBuf> {
    let pictures = home.join("Pictures");

    for name in BUNDLE_NAMES {
        let candidate = pictures.join(name);
        if candidate.exists() {
            return Some(candidate);
        }
    }

    None
}

/// Whether a Photos library is present on this machine.
///
/// False on unsupported platforms without touching the filesystem. Cheap to
/// call repeatedly; does not open the database.
pub fn is_available() -> bool {
    find_library().is_some()
}
