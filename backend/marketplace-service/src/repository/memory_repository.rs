use chrono::Utc;
use parking_lot::RwLock;
use std::collections::BTreeMap;

use crate::models::{
    Admin, Category, NewOrder, NewProduct, Order, Product, ProductPatch, ProductStatus,
};

use super::{MarketplaceRepository, RepositoryError, RepositoryResult};

#[derive(Default)]
struct State {
    categories: Vec<Category>,
    admins: Vec<Admin>,
    products: BTreeMap<i64, Product>,
    orders: Vec<Order>,
    next_category_id: i64,
    next_admin_id: i64,
    next_product_id: i64,
    next_order_id: i64,
}

fn next_id(counter: &mut i64) -> i64 {
    *counter += 1;
    *counter
}

/// In-process repository. Every operation holds the lock for its whole
/// duration, so writes are atomic with respect to each other.
#[derive(Default)]
pub struct MemoryRepository {
    state: RwLock<State>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl MarketplaceRepository for MemoryRepository {
    async fn health_check(&self) -> RepositoryResult<()> {
        Ok(())
    }

    async fn list_categories(&self) -> RepositoryResult<Vec<Category>> {
        Ok(self.state.read().categories.clone())
    }

    async fn upsert_category(&self, name: &str) -> RepositoryResult<Category> {
        let mut state = self.state.write();
        if let Some(existing) = state.categories.iter().find(|c| c.name == name) {
            return Ok(existing.clone());
        }

        let category = Category {
            id: next_id(&mut state.next_category_id),
            name: name.to_string(),
        };
        state.categories.push(category.clone());
        Ok(category)
    }

    async fn find_admin_by_email(&self, email: &str) -> RepositoryResult<Option<Admin>> {
        Ok(self
            .state
            .read()
            .admins
            .iter()
            .find(|a| a.email == email)
            .cloned())
    }

    async fn upsert_admin(&self, email: &str, password_hash: &str) -> RepositoryResult<Admin> {
        let mut state = self.state.write();
        let now = Utc::now();

        if let Some(admin) = state.admins.iter_mut().find(|a| a.email == email) {
            admin.password_hash = password_hash.to_string();
            admin.updated_at = now;
            return Ok(admin.clone());
        }

        let admin = Admin {
            id: next_id(&mut state.next_admin_id),
            email: email.to_string(),
            password_hash: password_hash.to_string(),
            created_at: now,
            updated_at: now,
        };
        state.admins.push(admin.clone());
        Ok(admin)
    }

    async fn list_products(
        &self,
        status: Option<ProductStatus>,
        limit: i64,
        offset: i64,
    ) -> RepositoryResult<Vec<Product>> {
        let limit = usize::try_from(limit).unwrap_or(usize::MAX);
        let offset = usize::try_from(offset).unwrap_or(usize::MAX);

        Ok(self
            .state
            .read()
            .products
            .values()
            .filter(|p| status.map_or(true, |s| p.status == s))
            .skip(offset)
            .take(limit)
            .cloned()
            .collect())
    }

    async fn count_products(&self, status: Option<ProductStatus>) -> RepositoryResult<i64> {
        let count = self
            .state
            .read()
            .products
            .values()
            .filter(|p| status.map_or(true, |s| p.status == s))
            .count();
        Ok(count as i64)
    }

    async fn find_product(&self, id: i64) -> RepositoryResult<Option<Product>> {
        Ok(self.state.read().products.get(&id).cloned())
    }

    async fn create_product(&self, product: &NewProduct) -> RepositoryResult<Product> {
        let mut state = self.state.write();
        let now = Utc::now();
        let created = Product {
            id: next_id(&mut state.next_product_id),
            title: product.title.clone(),
            price: product.price,
            category: product.category.clone(),
            description: product.description.clone(),
            image_url: product.image_url.clone(),
            seller_name: product.seller_name.clone(),
            seller_email: product.seller_email.clone(),
            status: product.status.unwrap_or_default(),
            created_at: now,
            updated_at: now,
        };
        state.products.insert(created.id, created.clone());
        Ok(created)
    }

    async fn update_product(
        &self,
        id: i64,
        patch: &ProductPatch,
    ) -> RepositoryResult<Option<Product>> {
        let mut state = self.state.write();
        let Some(product) = state.products.get_mut(&id) else {
            return Ok(None);
        };

        if product.status.is_terminal() {
            return Err(RepositoryError::product_sold());
        }

        patch.apply_to(product);
        product.updated_at = Utc::now();
        Ok(Some(product.clone()))
    }

    async fn place_order(&self, order: &NewOrder) -> RepositoryResult<Order> {
        let mut state = self.state.write();

        let product = state
            .products
            .get_mut(&order.product_id)
            .ok_or_else(|| RepositoryError::product_not_found(order.product_id))?;
        if !product.status.is_orderable() {
            return Err(RepositoryError::product_not_orderable());
        }

        let now = Utc::now();
        product.status = ProductStatus::Sold;
        product.updated_at = now;

        let created = Order {
            id: next_id(&mut state.next_order_id),
            product_id: order.product_id,
            buyer_name: order.buyer_name.clone(),
            payment_method: order.payment_method,
            created_at: now,
        };
        state.orders.push(created.clone());
        Ok(created)
    }

    async fn list_orders(&self, product_id: Option<i64>) -> RepositoryResult<Vec<Order>> {
        Ok(self
            .state
            .read()
            .orders
            .iter()
            .filter(|o| product_id.map_or(true, |id| o.product_id == id))
            .cloned()
            .collect())
    }

    async fn clear_catalog(&self) -> RepositoryResult<()> {
        let mut state = self.state.write();
        state.products.clear();
        state.orders.clear();
        state.next_product_id = 0;
        state.next_order_id = 0;
        Ok(())
    }
}
