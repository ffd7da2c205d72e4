use std::sync::Arc;
use tracing::{info, warn};
use validator::Validate;

use crate::error::{AppError, Result};
use crate::models::{NewOrder, Order};
use crate::repository::{MarketplaceRepository, RepositoryError};

pub struct OrderService {
    repo: Arc<dyn MarketplaceRepository>,
}

impl OrderService {
    pub fn new(repo: Arc<dyn MarketplaceRepository>) -> Self {
        Self { repo }
    }

    /// Check out a validated product. The product is marked sold in the same
    /// atomic step that records the order.
    pub async fn place(&self, mut order: NewOrder) -> Result<Order> {
        order.validate()?;
        order.buyer_name = order.buyer_name.trim().to_string();

        match self.repo.place_order(&order).await {
            Ok(created) => {
                info!(
                    order_id = created.id,
                    product_id = created.product_id,
                    payment_method = %created.payment_method,
                    "Order placed, product marked sold"
                );
                Ok(created)
            }
            Err(RepositoryError::Conflict(msg)) => {
                warn!(product_id = order.product_id, "Order rejected: {}", msg);
                Err(AppError::Conflict(msg))
            }
            Err(e) => Err(e.into()),
        }
    }

    pub async fn list(&self, product_id: Option<i64>) -> Result<Vec<Order>> {
        Ok(self.repo.list_orders(product_id).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{NewProduct, PaymentMethod, ProductStatus};
    use crate::repository::MemoryRepository;
    use rust_decimal::Decimal;

    async fn seeded(status: ProductStatus) -> (Arc<MemoryRepository>, i64) {
        let repo = Arc::new(MemoryRepository::new());
        let product = repo
            .create_product(&NewProduct {
                title: "Louis Vuitton Handbag".to_string(),
                price: Decimal::new(89999, 2),
                category: "Accessories".to_string(),
                description: "Monogram canvas".to_string(),
                image_url: "https://example.com/bag.jpg".to_string(),
                seller_name: "Michael".to_string(),
                seller_email: "michael@example.com".to_string(),
                status: Some(status),
            })
            .await
            .unwrap();
        (repo, product.id)
    }

    fn order(product_id: i64, buyer_name: &str) -> NewOrder {
        NewOrder {
            product_id,
            buyer_name: buyer_name.to_string(),
            payment_method: PaymentMethod::Tpe,
        }
    }

    #[tokio::test]
    async fn placing_an_order_sells_the_product() {
        let (repo, product_id) = seeded(ProductStatus::Validated).await;
        let service = OrderService::new(repo.clone());

        let placed = service.place(order(product_id, "  Jane ")).await.unwrap();
        assert_eq!(placed.buyer_name, "Jane");

        let product = repo.find_product(product_id).await.unwrap().unwrap();
        assert_eq!(product.status, ProductStatus::Sold);
        assert_eq!(service.list(Some(product_id)).await.unwrap(), vec![placed]);
    }

    #[tokio::test]
    async fn non_validated_products_are_conflicts() {
        let (repo, product_id) = seeded(ProductStatus::Submitted).await;
        let service = OrderService::new(repo);

        let err = service.place(order(product_id, "Jane")).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
        assert!(service.list(None).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn unknown_products_are_not_found() {
        let (repo, _) = seeded(ProductStatus::Validated).await;
        let service = OrderService::new(repo);

        let err = service.place(order(999, "Jane")).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(ref msg) if msg == "Product 999 not found"));
    }

    #[tokio::test]
    async fn blank_buyer_is_rejected_before_storage() {
        let (repo, product_id) = seeded(ProductStatus::Validated).await;
        let service = OrderService::new(repo.clone());

        let err = service.place(order(product_id, " ")).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));

        let product = repo.find_product(product_id).await.unwrap().unwrap();
        assert_eq!(product.status, ProductStatus::Validated);
    }
}
