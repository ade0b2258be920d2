//! Image storage trait (port)

use async_trait::async_trait;
use crate::domain::ImageUpload;
use crate::error::DomainError;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ImageStorage: Send + Sync {
    /// Writes the image once and returns the generated file name. Names never
    /// collide with previously stored images.
    async fn store(&self, image: &ImageUpload) -> Result<String, DomainError>;
    async fn remove(&self, file_name: &str) -> Result<(), DomainError>;
}
