// ============================================================================
// Market Core - Product Entity
// File: crates/market-core/src/domain/product.rs
// Description: Game item listed by a seller
// ============================================================================

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::DomainError;

/// Product listing (`game_items` row).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: i64,
    pub game_name: String,
    pub seller_username: String,
    pub seller_email: String,
    pub seller_phonenumber: Option<String>,
    pub item_price: i64,
    pub item_title: String,
    pub item_description: Option<String>,
    /// Generated file name under the upload directory.
    pub item_image: String,
    pub item_stock: i32,
    pub created_at: DateTime<Utc>,
}

/// Fields a seller submits when listing a new product.
#[derive(Debug, Clone, Validate)]
pub struct ProductDraft {
    #[validate(length(min = 1, max = 100, message = "Game name is required"))]
    pub game_name: String,

    #[validate(length(min = 1, max = 32, message = "Seller username is required"))]
    pub seller_username: String,

    #[validate(email(message = "Invalid seller email"))]
    pub seller_email: String,

    #[validate(length(max = 32, message = "Phone number too long"))]
    pub seller_phonenumber: Option<String>,

    #[validate(range(min = 0, message = "Price cannot be negative"))]
    pub item_price: i64,

    #[validate(length(min = 1, max = 200, message = "Title must be between 1 and 200 characters"))]
    pub item_title: String,

    #[validate(length(max = 5000, message = "Description too long"))]
    pub item_description: Option<String>,

    #[validate(range(min = 0, message = "Stock cannot be negative"))]
    pub item_stock: i32,
}

/// Editable fields of an existing listing. Ownership fields are not editable.
#[derive(Debug, Clone, Validate)]
pub struct ProductChanges {
    #[validate(length(min = 1, max = 100, message = "Game name is required"))]
    pub game_name: String,

    #[validate(email(message = "Invalid seller email"))]
    pub seller_email: String,

    #[validate(range(min = 0, message = "Price cannot be negative"))]
    pub item_price: i64,

    #[validate(length(min = 1, max = 200, message = "Title must be between 1 and 200 characters"))]
    pub item_title: String,

    #[validate(length(max = 5000, message = "Description too long"))]
    pub item_description: Option<String>,

    #[validate(range(min = 0, message = "Stock cannot be negative"))]
    pub item_stock: i32,
}

/// Result of a seller-scoped update: the row as stored now and the image
/// name it held immediately before the write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductUpdate {
    pub product: Product,
    pub previous_image: String,
}

/// Raster formats accepted for listing images. Anything a browser could
/// render as a document (HTML, SVG) is refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Png,
    Jpeg,
    Gif,
    Webp,
}

impl ImageFormat {
    /// Extension used for the stored file.
    pub fn extension(&self) -> &'static str {
        match self {
            ImageFormat::Png => "png",
            ImageFormat::Jpeg => "jpg",
            ImageFormat::Gif => "gif",
            ImageFormat::Webp => "webp",
        }
    }

    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "png" => Some(ImageFormat::Png),
            "jpg" | "jpeg" => Some(ImageFormat::Jpeg),
            "gif" => Some(ImageFormat::Gif),
            "webp" => Some(ImageFormat::Webp),
            _ => None,
        }
    }

    /// Identifies the format from the file signature.
    pub fn sniff(bytes: &[u8]) -> Option<Self> {
        if bytes.starts_with(b"\x89PNG\r\n\x1a\n") {
            Some(ImageFormat::Png)
        } else if bytes.starts_with(&[0xff, 0xd8, 0xff]) {
            Some(ImageFormat::Jpeg)
        } else if bytes.starts_with(b"GIF87a") || bytes.starts_with(b"GIF89a") {
            Some(ImageFormat::Gif)
        } else if bytes.len() >= 12 && &bytes[..4] == b"RIFF" && &bytes[8..12] == b"WEBP" {
            Some(ImageFormat::Webp)
        } else {
            None
        }
    }
}

/// Image file received with a listing, fully buffered.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl ImageUpload {
    /// Accepts the upload only when the file name carries an allowed image
    /// extension, any declared content type is an image type, and the bytes
    /// start with the signature of that same format.
    pub fn check(&self) -> Result<ImageFormat, DomainError> {
        if self.bytes.is_empty() {
            return Err(DomainError::BadRequest("Uploaded file is empty".to_string()));
        }

        if let Some(ct) = self.content_type.as_deref() {
            if !ct.starts_with("image/") && ct != "application/octet-stream" {
                return Err(DomainError::BadRequest(format!("Unsupported image type: {}", ct)));
            }
        }

        let declared = self
            .extension()
            .and_then(ImageFormat::from_extension)
            .ok_or_else(|| {
                DomainError::BadRequest(
                    "Image must be a .png, .jpg, .jpeg, .gif or .webp file".to_string(),
                )
            })?;

        match ImageFormat::sniff(&self.bytes) {
            Some(actual) if actual == declared => Ok(actual),
            _ => Err(DomainError::BadRequest(format!(
                "File content is not a valid {} image",
                declared.extension()
            ))),
        }
    }

    fn extension(&self) -> Option<&str> {
        let base = self.file_name.rsplit(['/', '\\']).next().unwrap_or(&self.file_name);
        base.rsplit_once('.').map(|(_, ext)| ext)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft() -> ProductDraft {
        ProductDraft {
            game_name: "Valorant".to_string(),
            seller_username: "bob".to_string(),
            seller_email: "bob@example.com".to_string(),
            seller_phonenumber: None,
            item_price: 150_000,
            item_title: "Radiant account".to_string(),
            item_description: Some("Full agent roster".to_string()),
            item_stock: 1,
        }
    }

    #[test]
    fn test_valid_draft() {
        assert!(draft().validate().is_ok());
    }

    #[test]
    fn test_negative_price_and_stock_rejected() {
        let mut d = draft();
        d.item_price = -1;
        assert!(d.validate().is_err());

        let mut d = draft();
        d.item_stock = -5;
        assert!(d.validate().is_err());
    }

    const PNG: &[u8] = b"\x89PNG\r\n\x1a\n\0\0\0\rIHDR";

    fn image(file_name: &str, bytes: &[u8]) -> ImageUpload {
        ImageUpload {
            file_name: file_name.to_string(),
            content_type: Some("image/png".to_string()),
            bytes: bytes.to_vec(),
        }
    }

    #[test]
    fn test_image_check_accepts_matching_signature() {
        assert_eq!(image("sword.PNG", PNG).check().unwrap(), ImageFormat::Png);

        let jpeg = image("shield.jpeg", &[0xff, 0xd8, 0xff, 0xe0, 0, 0x10]);
        assert_eq!(jpeg.check().unwrap(), ImageFormat::Jpeg);

        let webp = image("bow.webp", b"RIFF\x24\0\0\0WEBPVP8 ");
        assert_eq!(webp.check().unwrap(), ImageFormat::Webp);
    }

    #[test]
    fn test_image_check_rejects_documents_and_mismatches() {
        let html = image("evil.html", b"<script>alert(1)</script>");
        assert!(matches!(html.check(), Err(DomainError::BadRequest(_))));

        // allowed name, script body
        let disguised = image("evil.png", b"<script>alert(1)</script>");
        assert!(matches!(disguised.check(), Err(DomainError::BadRequest(_))));

        let svg = image("logo.svg", b"<svg xmlns=\"http://www.w3.org/2000/svg\"/>");
        assert!(svg.check().is_err());

        assert!(image("noext", PNG).check().is_err());
        assert!(image("sword.gif", PNG).check().is_err());

        let mut typed = image("sword.png", PNG);
        typed.content_type = Some("text/html".to_string());
        assert!(typed.check().is_err());

        let mut empty = image("sword.png", PNG);
        empty.bytes.clear();
        assert!(empty.check().is_err());
    }
}
