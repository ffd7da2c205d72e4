use sqlx::PgPool;
use tracing::debug;

use crate::models::{
    Admin, Category, NewOrder, NewProduct, Order, Product, ProductPatch, ProductStatus,
};

use super::{MarketplaceRepository, RepositoryError, RepositoryResult};

const PRODUCT_COLUMNS: &str = "id, title, price, category, description, image_url, \
     seller_name, seller_email, status, created_at, updated_at";

/// PostgreSQL repository for the marketplace (source of truth)
#[derive(Clone)]
pub struct PostgresMarketplaceRepository {
    pool: PgPool,
}

impl PostgresMarketplaceRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .map(|db| db.is_unique_violation())
        .unwrap_or(false)
}

#[async_trait::async_trait]
impl MarketplaceRepository for PostgresMarketplaceRepository {
    async fn health_check(&self) -> RepositoryResult<()> {
        db_pool::ping(&self.pool).await?;
        Ok(())
    }

    async fn list_categories(&self) -> RepositoryResult<Vec<Category>> {
        let categories = sqlx::query_as::<_, Category>("SELECT id, name FROM categories ORDER BY id")
            .fetch_all(&self.pool)
            .await?;
        Ok(categories)
    }

    async fn upsert_category(&self, name: &str) -> RepositoryResult<Category> {
        let category = sqlx::query_as::<_, Category>(
            r#"
            INSERT INTO categories (name)
            VALUES ($1)
            ON CONFLICT (name) DO UPDATE SET name = EXCLUDED.name
            RETURNING id, name
            "#,
        )
        .bind(name)
        .fetch_one(&self.pool)
        .await?;

        debug!("Upserted category {} ({})", category.name, category.id);
        Ok(category)
    }

    async fn find_admin_by_email(&self, email: &str) -> RepositoryResult<Option<Admin>> {
        let admin = sqlx::query_as::<_, Admin>(
            r#"
            SELECT id, email, password_hash, created_at, updated_at
            FROM admins
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        Ok(admin)
    }

    async fn upsert_admin(&self, email: &str, password_hash: &str) -> RepositoryResult<Admin> {
        let admin = sqlx::query_as::<_, Admin>(
            r#"
            INSERT INTO admins (email, password_hash, created_at, updated_at)
            VALUES ($1, $2, NOW(), NOW())
            ON CONFLICT (email) DO UPDATE SET
                password_hash = EXCLUDED.password_hash,
                updated_at = NOW()
            RETURNING id, email, password_hash, created_at, updated_at
            "#,
        )
        .bind(email)
        .bind(password_hash)
        .fetch_one(&self.pool)
        .await?;

        debug!("Upserted admin {}", admin.email);
        Ok(admin)
    }

    async fn list_products(
        &self,
        status: Option<ProductStatus>,
        limit: i64,
        offset: i64,
    ) -> RepositoryResult<Vec<Product>> {
        let sql = format!(
            r#"
            SELECT {PRODUCT_COLUMNS}
            FROM products
            WHERE ($1::text IS NULL OR status = $1)
            ORDER BY id ASC
            LIMIT $2 OFFSET $3
            "#
        );
        let products = sqlx::query_as::<_, Product>(&sql)
            .bind(status.map(|s| s.as_str()))
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?;
        Ok(products)
    }

    async fn count_products(&self, status: Option<ProductStatus>) -> RepositoryResult<i64> {
        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM products WHERE ($1::text IS NULL OR status = $1)",
        )
        .bind(status.map(|s| s.as_str()))
        .fetch_one(&self.pool)
        .await?;
        Ok(total)
    }

    async fn find_product(&self, id: i64) -> RepositoryResult<Option<Product>> {
        let sql = format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE id = $1");
        let product = sqlx::query_as::<_, Product>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(product)
    }

    async fn create_product(&self, product: &NewProduct) -> RepositoryResult<Product> {
        let sql = format!(
            r#"
            INSERT INTO products (
                title, price, category, description, image_url,
                seller_name, seller_email, status, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, NOW(), NOW())
            RETURNING {PRODUCT_COLUMNS}
            "#
        );
        let created = sqlx::query_as::<_, Product>(&sql)
            .bind(&product.title)
            .bind(product.price)
            .bind(&product.category)
            .bind(&product.description)
            .bind(&product.image_url)
            .bind(&product.seller_name)
            .bind(&product.seller_email)
            .bind(product.status.unwrap_or_default().as_str())
            .fetch_one(&self.pool)
            .await?;

        debug!("Created product {} ({})", created.id, created.status);
        Ok(created)
    }

    async fn update_product(
        &self,
        id: i64,
        patch: &ProductPatch,
    ) -> RepositoryResult<Option<Product>> {
        let mut tx = self.pool.begin().await?;

        let select = format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE id = $1 FOR UPDATE");
        let Some(mut product) = sqlx::query_as::<_, Product>(&select)
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
        else {
            return Ok(None);
        };

        if product.status.is_terminal() {
            return Err(RepositoryError::product_sold());
        }

        patch.apply_to(&mut product);

        let update = format!(
            r#"
            UPDATE products SET
                title = $2,
                price = $3,
                category = $4,
                description = $5,
                image_url = $6,
                seller_name = $7,
                seller_email = $8,
                status = $9,
                updated_at = NOW()
            WHERE id = $1
            RETURNING {PRODUCT_COLUMNS}
            "#
        );
        let updated = sqlx::query_as::<_, Product>(&update)
            .bind(id)
            .bind(&product.title)
            .bind(product.price)
            .bind(&product.category)
            .bind(&product.description)
            .bind(&product.image_url)
            .bind(&product.seller_name)
            .bind(&product.seller_email)
            .bind(product.status.as_str())
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;

        debug!("Updated product {} ({})", updated.id, updated.status);
        Ok(Some(updated))
    }

    async fn place_order(&self, order: &NewOrder) -> RepositoryResult<Order> {
        let mut tx = self.pool.begin().await?;

        // Conditional claim: only one concurrent checkout can flip validated -> sold.
        let claimed: Option<i64> = sqlx::query_scalar(
            r#"
            UPDATE products
            SET status = 'sold', updated_at = NOW()
            WHERE id = $1 AND status = 'validated'
            RETURNING id
            "#,
        )
        .bind(order.product_id)
        .fetch_optional(&mut *tx)
        .await?;

        if claimed.is_none() {
            let exists: bool =
                sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM products WHERE id = $1)")
                    .bind(order.product_id)
                    .fetch_one(&mut *tx)
                    .await?;
            tx.rollback().await?;

            return Err(if exists {
                RepositoryError::product_not_orderable()
            } else {
                RepositoryError::product_not_found(order.product_id)
            });
        }

        let created = sqlx::query_as::<_, Order>(
            r#"
            INSERT INTO orders (product_id, buyer_name, payment_method, created_at)
            VALUES ($1, $2, $3, NOW())
            RETURNING id, product_id, buyer_name, payment_method, created_at
            "#,
        )
        .bind(order.product_id)
        .bind(&order.buyer_name)
        .bind(order.payment_method.as_str())
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                RepositoryError::product_not_orderable()
            } else {
                RepositoryError::Database(e)
            }
        })?;

        tx.commit().await?;

        debug!(
            "Placed order {} for product {} ({})",
            created.id, created.product_id, created.payment_method
        );
        Ok(created)
    }

    async fn list_orders(&self, product_id: Option<i64>) -> RepositoryResult<Vec<Order>> {
        let orders = sqlx::query_as::<_, Order>(
            r#"
            SELECT id, product_id, buyer_name, payment_method, created_at
            FROM orders
            WHERE ($1::bigint IS NULL OR product_id = $1)
            ORDER BY id ASC
            "#,
        )
        .bind(product_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(orders)
    }

    async fn clear_catalog(&self) -> RepositoryResult<()> {
        sqlx::query("TRUNCATE orders, products RESTART IDENTITY")
            .execute(&self.pool)
            .await?;
        debug!("Cleared products and orders");
        Ok(())
    }
}
