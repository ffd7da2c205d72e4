use rust_decimal::{Decimal, RoundingStrategy};
use std::sync::Arc;
use tracing::info;
use validator::Validate;

use crate::error::{AppError, Result};
use crate::models::{NewProduct, Pagination, Product, ProductPage, ProductPatch, ProductStatus};
use crate::repository::MarketplaceRepository;

/// Largest value a `NUMERIC(12, 2)` column holds.
const MAX_PRICE: Decimal = Decimal::from_parts(3_567_587_327, 232, 0, false, 2);

pub struct ProductService {
    repo: Arc<dyn MarketplaceRepository>,
}

impl ProductService {
    pub fn new(repo: Arc<dyn MarketplaceRepository>) -> Self {
        Self { repo }
    }

    pub async fn list(
        &self,
        status: Option<ProductStatus>,
        pagination: Pagination,
    ) -> Result<ProductPage> {
        let products = self
            .repo
            .list_products(status, pagination.limit, pagination.offset())
            .await?;
        let total = self.repo.count_products(status).await?;

        Ok(ProductPage {
            products,
            total,
            pages: pagination.pages(total),
        })
    }

    pub async fn get(&self, id: i64) -> Result<Product> {
        self.repo
            .find_product(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Product {} not found", id)))
    }

    pub async fn create(&self, mut product: NewProduct) -> Result<Product> {
        Self::prepare(&mut product)?;

        let created = self.repo.create_product(&product).await?;
        info!(
            product_id = created.id,
            status = %created.status,
            "Product created"
        );
        Ok(created)
    }

    /// Validate a creation payload and normalise its price, without touching storage.
    pub fn prepare(product: &mut NewProduct) -> Result<()> {
        product.validate()?;
        product.price = normalize_price(product.price)?;

        if product.status == Some(ProductStatus::Sold) {
            return Err(AppError::BadRequest(
                "A product can only become sold through an order".to_string(),
            ));
        }
        Ok(())
    }

    pub async fn update(&self, id: i64, mut patch: ProductPatch) -> Result<Product> {
        patch.validate()?;
        if let Some(price) = patch.price {
            patch.price = Some(normalize_price(price)?);
        }
        if patch.status == Some(ProductStatus::Sold) {
            return Err(AppError::Conflict(
                "A product can only become sold through an order".to_string(),
            ));
        }

        let updated = self
            .repo
            .update_product(id, &patch)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Product {} not found", id)))?;

        info!(
            product_id = updated.id,
            status = %updated.status,
            "Product updated"
        );
        Ok(updated)
    }
}

fn normalize_price(price: Decimal) -> Result<Decimal> {
    if price.is_sign_negative() && !price.is_zero() {
        return Err(AppError::BadRequest("price must not be negative".to_string()));
    }

    let rounded = price.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    if rounded > MAX_PRICE {
        return Err(AppError::BadRequest("price is too large".to_string()));
    }
    Ok(rounded)
}
