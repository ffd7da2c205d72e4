//! Storage double for failure-path tests.

use async_trait::async_trait;

use super::{MarketplaceRepository, MemoryRepository, RepositoryError, RepositoryResult};
use crate::models::{
    Admin, Category, NewOrder, NewProduct, Order, Product, ProductPatch, ProductStatus,
};

/// Memory storage that can refuse product inserts or health checks.
#[derive(Default)]
pub struct FailingRepository {
    inner: MemoryRepository,
    fail_inserts: bool,
    unreachable: bool,
}

impl FailingRepository {
    pub fn failing_inserts() -> Self {
        Self {
            fail_inserts: true,
            ..Self::default()
        }
    }

    pub fn unreachable() -> Self {
        Self {
            unreachable: true,
            ..Self::default()
        }
    }
}

fn outage() -> RepositoryError {
    RepositoryError::Database(sqlx::Error::PoolTimedOut)
}

#[async_trait]
impl MarketplaceRepository for FailingRepository {
    async fn health_check(&self) -> RepositoryResult<()> {
        if self.unreachable {
            return Err(outage());
        }
        self.inner.health_check().await
    }
    async fn list_categories(&self) -> RepositoryResult<Vec<Category>> {
        self.inner.list_categories().await
    }
    async fn upsert_category(&self, name: &str) -> RepositoryResult<Category> {
        self.inner.upsert_category(name).await
    }
    async fn find_admin_by_email(&self, email: &str) -> RepositoryResult<Option<Admin>> {
        self.inner.find_admin_by_email(email).await
    }
    async fn upsert_admin(&self, email: &str, hash: &str) -> RepositoryResult<Admin> {
        self.inner.upsert_admin(email, hash).await
    }
    async fn list_products(
        &self,
        status: Option<ProductStatus>,
        limit: i64,
        offset: i64,
    ) -> RepositoryResult<Vec<Product>> {
        self.inner.list_products(status, limit, offset).await
    }
    async fn count_products(&self, status: Option<ProductStatus>) -> RepositoryResult<i64> {
        self.inner.count_products(status).await
    }
    async fn find_product(&self, id: i64) -> RepositoryResult<Option<Product>> {
        self.inner.find_product(id).await
    }
    async fn create_product(&self, product: &NewProduct) -> RepositoryResult<Product> {
        if self.fail_inserts {
            return Err(outage());
        }
        self.inner.create_product(product).await
    }
    async fn update_product(
        &self,
        id: i64,
        patch: &ProductPatch,
    ) -> RepositoryResult<Option<Product>> {
        self.inner.update_product(id, patch).await
    }
    async fn place_order(&self, order: &NewOrder) -> RepositoryResult<Order> {
        self.inner.place_order(order).await
    }
    async fn list_orders(&self, product_id: Option<i64>) -> RepositoryResult<Vec<Order>> {
        self.inner.list_orders(product_id).await
    }
    async fn clear_catalog(&self) -> RepositoryResult<()> {
        self.inner.clear_catalog().await
    }
}
