//! Product images on the local filesystem
//!
//! Files land directly in the upload directory, which the server also exposes
//! as static content.

use async_trait::async_trait;
use chrono::Utc;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{error, info, warn};
use uuid::Uuid;

use market_core::domain::{ImageFormat, ImageUpload};
use market_core::error::DomainError;
use market_core::repositories::ImageStorage;
use market_shared::constants::MAX_IMAGE_NAME_LENGTH;
use market_shared::utils::sanitize_file_name;

#[derive(Debug, Clone)]
pub struct LocalImageStorage {
    root: PathBuf,
}

impl LocalImageStorage {
    /// Creates the directory if it does not exist yet.
    pub async fn new(root: impl Into<PathBuf>) -> Result<Self, DomainError> {
        let root = root.into();
        fs::create_dir_all(&root).await.map_err(|e| {
            error!("Cannot create upload directory {}: {}", root.display(), e);
            DomainError::StorageFailure("upload directory unavailable".to_string())
        })?;

        info!("Storing product images under {}", root.display());
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// `<millis>-<uuid>-<sanitized client stem>.<ext>`. The extension comes
    /// from the verified format, never from the client.
    fn generate_name(client_name: &str, format: ImageFormat) -> String {
        let clean = sanitize_file_name(client_name, MAX_IMAGE_NAME_LENGTH);
        let stem = clean.rsplit_once('.').map_or(clean.as_str(), |(stem, _)| stem);
        format!(
            "{}-{}-{}.{}",
            Utc::now().timestamp_millis(),
            Uuid::new_v4().simple(),
            stem,
            format.extension()
        )
    }
}

fn is_plain_name(name: &str) -> bool {
    !name.is_empty() && !name.contains(['/', '\\']) && name != "." && name != ".."
}

#[async_trait]
impl ImageStorage for LocalImageStorage {
    async fn store(&self, image: &ImageUpload) -> Result<String, DomainError> {
        let format = image.check()?;
        let name = Self::generate_name(&image.file_name, format);
        let path = self.root.join(&name);

        let write_failed = |e: std::io::Error| {
            error!("Failed to write image {}: {}", path.display(), e);
            DomainError::StorageFailure("failed to store image".to_string())
        };

        let mut file = fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await
            .map_err(write_failed)?;
        file.write_all(&image.bytes).await.map_err(write_failed)?;
        file.flush().await.map_err(write_failed)?;

        info!("Stored image {} ({} bytes)", name, image.bytes.len());
        Ok(name)
    }

    async fn remove(&self, file_name: &str) -> Result<(), DomainError> {
        if !is_plain_name(file_name) {
            warn!("Refusing to remove suspicious image name {:?}", file_name);
            return Err(DomainError::BadRequest("invalid image name".to_string()));
        }

        match fs::remove_file(self.root.join(file_name)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => {
                error!("Failed to remove image {}: {}", file_name, e);
                Err(DomainError::StorageFailure("failed to remove image".to_string()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG: &[u8] = b"\x89PNG\r\n\x1a\n\0\0\0\rIHDR";

    fn upload(name: &str) -> ImageUpload {
        ImageUpload {
            file_name: name.to_string(),
            content_type: Some("image/png".to_string()),
            bytes: PNG.to_vec(),
        }
    }

    #[tokio::test]
    async fn test_store_generates_distinct_names() {
        let dir = tempfile::tempdir().unwrap();
        let storage = LocalImageStorage::new(dir.path()).await.unwrap();

        let a = storage.store(&upload("sword.png")).await.unwrap();
        let b = storage.store(&upload("sword.png")).await.unwrap();

        assert_ne!(a, b);
        assert!(a.ends_with("-sword.png"));
        assert_eq!(std::fs::read(dir.path().join(&a)).unwrap(), upload("x").bytes);
    }

    #[tokio::test]
    async fn test_store_strips_client_path() {
        let dir = tempfile::tempdir().unwrap();
        let storage = LocalImageStorage::new(dir.path()).await.unwrap();

        let name = storage.store(&upload("../../etc/sword.png")).await.unwrap();
        assert!(!name.contains('/'));
        assert!(name.ends_with("-sword.png"));
        assert!(dir.path().join(&name).exists());
    }

    #[tokio::test]
    async fn test_store_normalises_extension_and_refuses_non_images() {
        let dir = tempfile::tempdir().unwrap();
        let storage = LocalImageStorage::new(dir.path()).await.unwrap();

        let name = storage.store(&upload("Sword.Final.PNG")).await.unwrap();
        assert!(name.ends_with("-Sword.Final.png"));

        let mut page = upload("evil.html");
        page.bytes = b"<script>alert(1)</script>".to_vec();
        assert!(matches!(storage.store(&page).await, Err(DomainError::BadRequest(_))));
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[tokio::test]
    async fn test_remove_is_idempotent_and_rejects_traversal() {
        let dir = tempfile::tempdir().unwrap();
        let storage = LocalImageStorage::new(dir.path().join("files")).await.unwrap();

        let name = storage.store(&upload("shield.png")).await.unwrap();
        storage.remove(&name).await.unwrap();
        assert!(!storage.root().join(&name).exists());
        assert!(storage.remove(&name).await.is_ok());

        assert!(matches!(
            storage.remove("../secret").await,
            Err(DomainError::BadRequest(_))
        ));
    }
}
