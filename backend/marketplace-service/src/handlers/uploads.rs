/// Upload handler - seller submission with a multipart image
use actix_multipart::{Field, Multipart};
use actix_web::{web, HttpResponse};
use futures_util::stream::StreamExt;
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::str::FromStr;
use tracing::debug;

use crate::error::{AppError, Result};
use crate::models::{NewProduct, ProductStatus};
use crate::services::{ImageStore, ImageUpload};
use crate::state::AppState;

const IMAGE_FIELD: &str = "image";
const TEXT_FIELDS: [&str; 7] = [
    "title",
    "price",
    "category",
    "description",
    "sellerName",
    "sellerEmail",
    "status",
];
const MAX_TEXT_FIELD_BYTES: usize = 16 * 1024;
/// Shared by every non-image part, including ignored ones.
const MAX_FORM_TEXT_BYTES: usize = 64 * 1024;
const MAX_PARTS: usize = 32;

/// Drain one multipart field into memory, failing once it grows past `limit`.
async fn read_field(field: &mut Field, limit: usize, name: &str) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    while let Some(chunk) = field.next().await {
        let chunk = chunk
            .map_err(|e| AppError::BadRequest(format!("Error reading field {}: {}", name, e)))?;
        if buf.len() + chunk.len() > limit {
            return Err(AppError::PayloadTooLarge(format!(
                "Field {} exceeds the {} byte limit",
                name, limit
            )));
        }
        buf.extend_from_slice(&chunk);
    }
    Ok(buf)
}

/// Read a text part against the form-wide byte budget. Parts with `keep`
/// unset are drained and dropped.
async fn read_text_field(
    field: &mut Field,
    name: &str,
    budget: &mut usize,
    keep: bool,
) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    while let Some(chunk) = field.next().await {
        let chunk = chunk
            .map_err(|e| AppError::BadRequest(format!("Error reading field {}: {}", name, e)))?;
        if chunk.len() > *budget {
            return Err(AppError::PayloadTooLarge(format!(
                "Form fields exceed the {} byte limit",
                MAX_FORM_TEXT_BYTES
            )));
        }
        *budget -= chunk.len();

        if keep {
            if buf.len() + chunk.len() > MAX_TEXT_FIELD_BYTES {
                return Err(AppError::PayloadTooLarge(format!(
                    "Field {} exceeds the {} byte limit",
                    name, MAX_TEXT_FIELD_BYTES
                )));
            }
            buf.extend_from_slice(&chunk);
        }
    }
    Ok(buf)
}

fn required(fields: &mut HashMap<String, String>, name: &str) -> Result<String> {
    fields
        .remove(name)
        .ok_or_else(|| AppError::BadRequest(format!("Missing field: {}", name)))
}

/// Build a creation payload from the text parts of the form.
/// `imageUrl` is left empty; it is derived from the stored file.
fn new_product_from_form(mut fields: HashMap<String, String>) -> Result<NewProduct> {
    let price = required(&mut fields, "price")?;
    let price = Decimal::from_str(price.trim())
        .map_err(|_| AppError::BadRequest("price must be a number".to_string()))?;

    let status = match fields.remove("status").as_deref().map(str::trim) {
        None | Some("") => None,
        Some(raw) => Some(
            raw.parse::<ProductStatus>()
                .map_err(|e| AppError::BadRequest(e.to_string()))?,
        ),
    };

    Ok(NewProduct {
        title: required(&mut fields, "title")?,
        price,
        category: required(&mut fields, "category")?,
        description: required(&mut fields, "description")?,
        image_url: String::new(),
        seller_name: required(&mut fields, "sellerName")?,
        seller_email: required(&mut fields, "sellerEmail")?,
        status,
    })
}

/// Create a product from a multipart form with an `image` file part
pub async fn upload_product(
    state: web::Data<AppState>,
    mut payload: Multipart,
) -> Result<HttpResponse> {
    let max_bytes = state.images.max_bytes();
    let mut image: Option<ImageUpload> = None;
    let mut fields: HashMap<String, String> = HashMap::new();
    let mut text_budget = MAX_FORM_TEXT_BYTES;
    let mut parts = 0;

    while let Some(item) = payload.next().await {
        parts += 1;
        if parts > MAX_PARTS {
            return Err(AppError::PayloadTooLarge(format!(
                "Form has more than {} parts",
                MAX_PARTS
            )));
        }
        let mut field =
            item.map_err(|e| AppError::BadRequest(format!("Malformed multipart body: {}", e)))?;
        let name = field
            .content_disposition()
            .get_name()
            .unwrap_or_default()
            .to_string();

        if name == IMAGE_FIELD {
            if image.is_some() {
                return Err(AppError::BadRequest(
                    "Only one image may be uploaded".to_string(),
                ));
            }

            let file_name = field
                .content_disposition()
                .get_filename()
                .unwrap_or_default()
                .to_string();
            let extension = ImageStore::image_extension(&file_name)?;
            ImageStore::check_content_type(field.content_type())?;

            let bytes = read_field(&mut field, max_bytes, IMAGE_FIELD).await?;
            if bytes.is_empty() {
                return Err(AppError::BadRequest("Image file is empty".to_string()));
            }
            debug!(file_name = %file_name, bytes = bytes.len(), "Received image part");
            image = Some(ImageUpload { extension, bytes });
        } else if TEXT_FIELDS.contains(&name.as_str()) {
            let bytes = read_text_field(&mut field, &name, &mut text_budget, true).await?;
            let value = String::from_utf8(bytes)
                .map_err(|_| AppError::BadRequest(format!("Field {} is not valid UTF-8", name)))?;
            fields.insert(name, value);
        } else {
            debug!(field = %name, "Ignoring unknown form field");
            read_text_field(&mut field, &name, &mut text_budget, false).await?;
        }
    }

    let image =
        image.ok_or_else(|| AppError::BadRequest("An image file is required".to_string()))?;
    let product = new_product_from_form(fields)?;

    let created = state.uploads().submit(product, image).await?;
    Ok(HttpResponse::Created().json(created))
}
