use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::{AppError, Result};

/// Extensions accepted for product images (compared case-insensitively).
pub const ALLOWED_EXTENSIONS: [&str; 4] = ["jpg", "jpeg", "png", "webp"];

/// Public prefix under which stored images are served.
pub const PUBLIC_PREFIX: &str = "/uploads";

/// A reserved slot in the upload directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredImage {
    pub file_name: String,
    pub path: PathBuf,
    pub url: String,
}

/// Local-disk storage for seller images.
#[derive(Debug, Clone)]
pub struct ImageStore {
    dir: PathBuf,
    public_base_url: String,
    max_bytes: usize,
}

impl ImageStore {
    pub fn new(dir: impl Into<PathBuf>, public_base_url: impl Into<String>, max_bytes: usize) -> Self {
        Self {
            dir: dir.into(),
            public_base_url: public_base_url.into().trim_end_matches('/').to_string(),
            max_bytes,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.uploads.dir.clone(),
            config.public_base_url(),
            config.uploads.max_bytes,
        )
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn max_bytes(&self) -> usize {
        self.max_bytes
    }

    /// Create the upload directory if it does not exist yet.
    pub async fn ensure_dir(&self) -> std::io::Result<()> {
        tokio::fs::create_dir_all(&self.dir).await
    }

    /// Lower-cased extension of `file_name` if it is an accepted image type.
    pub fn image_extension(file_name: &str) -> Result<String> {
        let ext = Path::new(file_name)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase())
            .unwrap_or_default();

        if ALLOWED_EXTENSIONS.contains(&ext.as_str()) {
            Ok(ext)
        } else {
            Err(AppError::BadRequest(
                "Only image files are allowed (jpg, jpeg, png, webp)".to_string(),
            ))
        }
    }

    /// A declared part content type must be `image/*`. `application/octet-stream`
    /// counts as undeclared; the extension decides.
    pub fn check_content_type(content_type: Option<&mime::Mime>) -> Result<()> {
        match content_type {
            Some(mime) if mime.essence_str() == mime::APPLICATION_OCTET_STREAM.essence_str() => {
                Ok(())
            }
            Some(mime) if mime.type_() != mime::IMAGE => Err(AppError::BadRequest(format!(
                "Unsupported content type: {}",
                mime.essence_str()
            ))),
            _ => Ok(()),
        }
    }

    /// Pick a fresh random file name for `ext` and derive its public URL.
    /// Nothing is written yet.
    pub fn allocate(&self, ext: &str) -> StoredImage {
        let token: [u8; 16] = rand::random();
        let file_name = format!("{}.{}", hex::encode(token), ext);

        StoredImage {
            path: self.dir.join(&file_name),
            url: format!("{}{}/{}", self.public_base_url, PUBLIC_PREFIX, file_name),
            file_name,
        }
    }

    /// Write `bytes` into a previously allocated slot.
    pub async fn write(&self, image: &StoredImage, bytes: &[u8]) -> Result<()> {
        if bytes.len() > self.max_bytes {
            return Err(AppError::PayloadTooLarge(format!(
                "Image exceeds the {} byte limit",
                self.max_bytes
            )));
        }

        let mut file = tokio::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&image.path)
            .await?;
        file.write_all(bytes).await?;
        file.flush().await?;

        info!(file = %image.file_name, bytes = bytes.len(), "Stored uploaded image");
        Ok(())
    }

    /// Best-effort removal of a written image whose product was never created.
    pub async fn discard(&self, image: &StoredImage) {
        match tokio::fs::remove_file(&image.path).await {
            Ok(()) => debug!(file = %image.file_name, "Discarded orphaned image"),
            Err(e) => warn!(file = %image.file_name, error = %e, "Failed to discard image"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extensions_are_checked_case_insensitively() {
        assert_eq!(ImageStore::image_extension("bag.JPG").unwrap(), "jpg");
        assert_eq!(ImageStore::image_extension("a.b.webp").unwrap(), "webp");
        assert!(ImageStore::image_extension("notes.txt").is_err());
        assert!(ImageStore::image_extension("no-extension").is_err());
        assert!(ImageStore::image_extension("jpg").is_err());
    }

    #[test]
    fn content_type_must_be_an_image_when_declared() {
        assert!(ImageStore::check_content_type(None).is_ok());
        assert!(ImageStore::check_content_type(Some(&mime::IMAGE_PNG)).is_ok());
        assert!(ImageStore::check_content_type(Some(&mime::TEXT_PLAIN)).is_err());
        assert!(ImageStore::check_content_type(Some(&mime::APPLICATION_PDF)).is_err());
    }

    #[test]
    fn octet_stream_defers_to_the_extension() {
        assert!(ImageStore::check_content_type(Some(&mime::APPLICATION_OCTET_STREAM)).is_ok());
    }

    #[test]
    fn allocated_names_are_random_hex_with_extension() {
        let store = ImageStore::new("/tmp/uploads", "https://cdn.example.com/", 1024);
        let first = store.allocate("png");
        let second = store.allocate("png");

        assert_ne!(first.file_name, second.file_name);
        let (stem, ext) = first.file_name.split_once('.').unwrap();
        assert_eq!(stem.len(), 32);
        assert!(stem.chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(ext, "png");
        assert_eq!(
            first.url,
            format!("https://cdn.example.com/uploads/{}", first.file_name)
        );
    }

    #[tokio::test]
    async fn write_and_discard_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = ImageStore::new(dir.path(), "http://localhost:3001", 8);
        let image = store.allocate("jpg");

        store.write(&image, b"\xFF\xD8\xFF").await.unwrap();
        assert_eq!(tokio::fs::read(&image.path).await.unwrap(), b"\xFF\xD8\xFF");

        store.discard(&image).await;
        assert!(!image.path.exists());
    }

    #[tokio::test]
    async fn oversized_images_are_not_written() {
        let dir = tempfile::tempdir().unwrap();
        let store = ImageStore::new(dir.path(), "http://localhost:3001", 2);
        let image = store.allocate("png");

        let err = store.write(&image, b"abc").await.unwrap_err();
        assert!(matches!(err, AppError::PayloadTooLarge(_)));
        assert!(!image.path.exists());
    }
}
