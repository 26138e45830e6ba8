//! Filesystem storage for uploaded recipe images
//!
//! Uploads must decode as an image before anything touches the disk. Stored
//! files get a random name with the extension of the detected format and live
//! under `MEDIA_ROOT/recipes/`.

use std::path::{Path, PathBuf};
use tracing::{error, warn};
use uuid::Uuid;

use crate::error::{ApiError, ApiResult};

/// Image store rooted at the configured media directory
#[derive(Debug, Clone)]
pub struct ImageStore {
    root: PathBuf,
}

impl ImageStore {
    /// Create a new image store
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn recipes_dir(&self) -> PathBuf {
        self.root.join("recipes")
    }

    /// Validate and persist an uploaded image, returning the stored filename
    ///
    /// Bytes that do not decode as an image are rejected with a field-level
    /// validation error.
    pub async fn save(&self, data: &[u8]) -> ApiResult<String> {
        let format = image::guess_format(data)
            .map_err(|_| ApiError::validation("image", "Upload a valid image"))?;
        image::load_from_memory_with_format(data, format)
            .map_err(|_| ApiError::validation("image", "Upload a valid image"))?;

        let extension = format.extensions_str().first().copied().unwrap_or("img");
        let filename = format!("{}.{}", Uuid::new_v4(), extension);

        let dir = self.recipes_dir();
        tokio::fs::create_dir_all(&dir).await.map_err(|e| {
            error!("Failed to create media directory {:?}: {}", dir, e);
            ApiError::Internal
        })?;

        let path = dir.join(&filename);
        tokio::fs::write(&path, data).await.map_err(|e| {
            error!("Failed to write image {:?}: {}", path, e);
            ApiError::Internal
        })?;

        Ok(filename)
    }

    /// Remove a stored image; missing files are not an error
    pub async fn delete(&self, filename: &str) {
        let path = self.recipes_dir().join(filename);
        if let Err(e) = tokio::fs::remove_file(&path).await {
            if e.kind() != std::io::ErrorKind::NotFound {
                warn!("Failed to remove image {:?}: {}", path, e);
            }
        }
    }

    /// Read a stored image back, together with its content type
    ///
    /// Filenames are opaque identifiers produced by [`save`](Self::save);
    /// anything path-like is rejected outright.
    pub async fn read(&self, filename: &str) -> Option<(Vec<u8>, &'static str)> {
        if filename.contains('/') || filename.contains('\\') || filename.contains("..") {
            return None;
        }

        let path = self.recipes_dir().join(filename);
        let data = tokio::fs::read(&path).await.ok()?;
        Some((data, content_type_for(&path)))
    }
}

fn content_type_for(path: &Path) -> &'static str {
    match path.extension().and_then(|e| e.to_str()) {
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("bmp") => "image/bmp",
        _ => "application/octet-stream",
    }
}
