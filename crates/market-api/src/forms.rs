//! Multipart product forms (`sellItem`, `editproduct`)

use axum::extract::Multipart;
use market_core::domain::{ImageUpload, ProductChanges, ProductDraft};
use std::collections::HashMap;
use std::str::FromStr;
use tracing::debug;

use crate::error::ApiError;

pub const IMAGE_FIELD: &str = "item_image";

/// Text fields plus the optional image part of a product form.
#[derive(Debug, Default)]
pub struct ProductForm {
    fields: HashMap<String, String>,
    pub image: Option<ImageUpload>,
}

impl ProductForm {
    pub async fn read(mut multipart: Multipart) -> Result<Self, ApiError> {
        let mut form = ProductForm::default();

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| ApiError::BadRequest(format!("Failed to read field: {}", e)))?
        {
            let name = field.name().unwrap_or("").to_string();

            if name == IMAGE_FIELD {
                let file_name = field.file_name().map(|s| s.to_string());
                let content_type = field.content_type().map(|s| s.to_string());
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::BadRequest(format!("Failed to read file: {}", e)))?;

                // browsers send an empty part when no file was chosen
                match file_name {
                    Some(file_name) if !file_name.is_empty() || !bytes.is_empty() => {
                        debug!("Received image {} ({} bytes)", file_name, bytes.len());
                        form.image = Some(ImageUpload {
                            file_name,
                            content_type,
                            bytes: bytes.to_vec(),
                        });
                    }
                    _ => {}
                }
            } else if !name.is_empty() {
                let text = field
                    .text()
                    .await
                    .map_err(|e| ApiError::BadRequest(format!("Invalid field {}: {}", name, e)))?;
                form.fields.insert(name, text);
            }
        }

        Ok(form)
    }

    fn text(&self, name: &str) -> Option<String> {
        self.fields
            .get(name)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    fn required(&self, name: &str) -> Result<String, ApiError> {
        self.text(name)
            .ok_or_else(|| ApiError::BadRequest(format!("{} is required", name)))
    }

    fn number<T: FromStr>(&self, name: &str) -> Result<T, ApiError> {
        self.required(name)?
            .parse()
            .map_err(|_| ApiError::BadRequest(format!("{} must be a whole number", name)))
    }

    pub fn into_draft(self) -> Result<(ProductDraft, ImageUpload), ApiError> {
        let draft = ProductDraft {
            game_name: self.required("game_name")?,
            seller_username: self.required("seller_username")?,
            seller_email: self.required("seller_email")?,
            seller_phonenumber: self.text("seller_phonenumber"),
            item_price: self.number("item_price")?,
            item_title: self.required("item_title")?,
            item_description: self.text("item_description"),
            item_stock: self.number("item_stock")?,
        };
        let image = self
            .image
            .ok_or_else(|| ApiError::BadRequest(format!("{} file is required", IMAGE_FIELD)))?;

        Ok((draft, image))
    }

    pub fn into_changes(self) -> Result<(ProductChanges, Option<ImageUpload>), ApiError> {
        let changes = ProductChanges {
            game_name: self.required("game_name")?,
            seller_email: self.required("seller_email")?,
            item_price: self.number("item_price")?,
            item_title: self.required("item_title")?,
            item_description: self.text("item_description"),
            item_stock: self.number("item_stock")?,
        };

        Ok((changes, self.image))
    }
}
