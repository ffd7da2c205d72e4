use crate::models::{
    Admin, Category, NewOrder, NewProduct, Order, Product, ProductPatch, ProductStatus,
};

use super::RepositoryResult;

/// Storage interface for the marketplace.
/// `PostgresMarketplaceRepository` is the production backend; `MemoryRepository`
/// backs tests and local demos.
#[async_trait::async_trait]
pub trait MarketplaceRepository: Send + Sync {
    /// Verify the backing store answers.
    async fn health_check(&self) -> RepositoryResult<()>;

    /// All categories, ordered by id.
    async fn list_categories(&self) -> RepositoryResult<Vec<Category>>;

    /// Insert a category if no category has that name yet.
    async fn upsert_category(&self, name: &str) -> RepositoryResult<Category>;

    async fn find_admin_by_email(&self, email: &str) -> RepositoryResult<Option<Admin>>;

    /// Insert an admin or replace the password hash of an existing one.
    async fn upsert_admin(&self, email: &str, password_hash: &str) -> RepositoryResult<Admin>;

    /// One window of products ordered by ascending id, optionally filtered by status.
    async fn list_products(
        &self,
        status: Option<ProductStatus>,
        limit: i64,
        offset: i64,
    ) -> RepositoryResult<Vec<Product>>;

    /// Number of products matching the same filter as `list_products`.
    async fn count_products(&self, status: Option<ProductStatus>) -> RepositoryResult<i64>;

    async fn find_product(&self, id: i64) -> RepositoryResult<Option<Product>>;

    /// Persist a new listing. A missing status defaults to `submitted`.
    async fn create_product(&self, product: &NewProduct) -> RepositoryResult<Product>;

    /// Apply a partial update. Returns `None` when the product does not exist.
    /// Fails with `Conflict` when the stored product is already sold.
    async fn update_product(
        &self,
        id: i64,
        patch: &ProductPatch,
    ) -> RepositoryResult<Option<Product>>;

    /// Record an order and mark the product sold, atomically.
    ///
    /// Only a `validated` product can be ordered. An unknown product is
    /// `NotFound`; any other status (including an earlier sale) is `Conflict`.
    async fn place_order(&self, order: &NewOrder) -> RepositoryResult<Order>;

    /// Orders, newest id last, optionally restricted to one product.
    async fn list_orders(&self, product_id: Option<i64>) -> RepositoryResult<Vec<Order>>;

    /// Remove every product and order. Used by the seed loader.
    async fn clear_catalog(&self) -> RepositoryResult<()>;
}
