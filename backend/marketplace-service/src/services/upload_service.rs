use std::sync::Arc;
use tracing::info;

use crate::error::Result;
use crate::models::{NewProduct, Product};
use crate::repository::MarketplaceRepository;

use super::{ImageStore, ProductService};

/// An image part already read from the request and checked for type.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    /// Lower-cased extension, one of the accepted image types.
    pub extension: String,
    pub bytes: Vec<u8>,
}

/// Seller submission with an attached image.
pub struct UploadService {
    repo: Arc<dyn MarketplaceRepository>,
    images: Arc<ImageStore>,
}

impl UploadService {
    pub fn new(repo: Arc<dyn MarketplaceRepository>, images: Arc<ImageStore>) -> Self {
        Self { repo, images }
    }

    /// Store the image and create the product that points at it.
    ///
    /// The payload is fully validated before the file is written; if the
    /// insert fails afterwards the file is removed again.
    pub async fn submit(&self, mut product: NewProduct, image: ImageUpload) -> Result<Product> {
        let slot = self.images.allocate(&image.extension);
        product.image_url = slot.url.clone();
        ProductService::prepare(&mut product)?;

        self.images.write(&slot, &image.bytes).await?;

        match self.repo.create_product(&product).await {
            Ok(created) => {
                info!(
                    product_id = created.id,
                    file = %slot.file_name,
                    "Product submitted with image"
                );
                Ok(created)
            }
            Err(e) => {
                self.images.discard(&slot).await;
                Err(e.into())
            }
        }
    }
}
