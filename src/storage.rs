// SPDX-License-Identifier: GPL-3.0-only

//! Storage utilities for the photo directory

use crate::constants::PHOTO_EXTENSIONS;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Directory photos are saved to: `<pictures>/<folder_name>`
///
/// Falls back to `$HOME/Pictures` when the platform reports no pictures
/// directory, and to the working directory when there is no home either.
pub fn photo_directory(folder_name: &str) -> PathBuf {
    let pictures = dirs::picture_dir()
        .or_else(|| dirs::home_dir().map(|home| home.join("Pictures")))
        .unwrap_or_else(|| PathBuf::from("."));
    pictures.join(folder_name)
}

fn is_photo(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.to_string_lossy())
        .is_some_and(|ext| PHOTO_EXTENSIONS.iter().any(|known| ext.eq_ignore_ascii_case(known)))
}

/// Most recently modified photo in `photos_dir`
pub async fn latest_photo(photos_dir: PathBuf) -> Option<PathBuf> {
    let latest = tokio::task::spawn_blocking(move || {
        let entries = std::fs::read_dir(&photos_dir).ok()?;
        entries
            .flatten()
            .map(|entry| entry.path())
            .filter(|path| is_photo(path))
            .filter_map(|path| {
                let modified = path.metadata().ok()?.modified().ok()?;
                Some((modified, path))
            })
            .max_by_key(|(modified, _)| *modified)
            .map(|(_, path)| path)
    })
    .await
    .ok()??;

    debug!(path = %latest.display(), "Latest photo");
    Some(latest)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_photo_directory_ends_with_folder() {
        assert!(photo_directory("Obscura").ends_with("Obscura"));
    }

    #[test]
    fn test_is_photo() {
        assert!(is_photo(Path::new("IMG_1.JPG")));
        assert!(is_photo(Path::new("a/b.png")));
        assert!(!is_photo(Path::new("notes.txt")));
        assert!(!is_photo(Path::new("README")));
    }

    #[tokio::test]
    async fn test_latest_photo_empty_dir() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(latest_photo(dir.path().to_path_buf()).await, None);
    }

    #[tokio::test]
    async fn test_latest_photo_ignores_other_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("notes.txt"), b"x").unwrap();
        std::fs::write(dir.path().join("IMG_1.jpg"), b"x").unwrap();
        let latest = latest_photo(dir.path().to_path_buf()).await.unwrap();
        assert_eq!(latest.file_name().unwrap(), "IMG_1.jpg");
    }
}
