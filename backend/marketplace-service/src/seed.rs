/// Fixture data for local development and demos.
///
/// Seeding wipes all products and orders, then upserts the category list and
/// the admin accounts and inserts the sample catalog.
use rust_decimal::Decimal;
use tracing::info;

use crate::error::Result;
use crate::models::{NewProduct, ProductStatus};
use crate::repository::MarketplaceRepository;
use crate::services::hash_password;

pub const CATEGORIES: [&str; 5] = ["Shirts", "Pants", "Dresses", "Accessories", "Shoes"];

pub const ADMIN_EMAILS: [&str; 3] = [
    "admin@example.com",
    "curator@example.com",
    "support@example.com",
];

/// Used when `SEED_ADMIN_PASSWORD` is not set.
pub const DEFAULT_ADMIN_PASSWORD: &str = "marketplace-admin";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedSummary {
    pub categories: usize,
    pub admins: usize,
    pub products: usize,
}

struct Fixture {
    title: &'static str,
    price_cents: i64,
    category: &'static str,
    description: &'static str,
    image_url: &'static str,
    seller_name: &'static str,
    seller_email: &'static str,
    status: ProductStatus,
}

const PRODUCTS: [Fixture; 5] = [
    Fixture {
        title: "Vintage Gucci Shirt",
        price_cents: 25999,
        category: "Shirts",
        description: "Authentic vintage Gucci shirt in excellent condition. Size M.",
        image_url: "https://images.unsplash.com/photo-1594201638839-e36ddd34822d?q=80&w=500",
        seller_name: "Jane Smith",
        seller_email: "jane@example.com",
        status: ProductStatus::Validated,
    },
    Fixture {
        title: "Louis Vuitton Handbag",
        price_cents: 89999,
        category: "Accessories",
        description: "Authentic Louis Vuitton handbag, lightly used. Includes dust bag.",
        image_url: "https://images.unsplash.com/photo-1584917865442-de89df76afd3?q=80&w=500",
        seller_name: "Michael Brown",
        seller_email: "michael@example.com",
        status: ProductStatus::Validated,
    },
    Fixture {
        title: "Prada Leather Boots",
        price_cents: 44999,
        category: "Shoes",
        description: "Prada leather boots, size 39. Only worn a few times.",
        image_url: "https://images.unsplash.com/photo-1605812860427-4024433a70fd?q=80&w=500",
        seller_name: "Emily Jones",
        seller_email: "emily@example.com",
        status: ProductStatus::Submitted,
    },
    Fixture {
        title: "Burberry Trench Coat",
        price_cents: 59999,
        category: "Accessories",
        description: "Classic Burberry trench coat, size S. Perfect condition.",
        image_url: "https://images.unsplash.com/photo-1520975661595-6453be3f7070?q=80&w=500",
        seller_name: "David Wilson",
        seller_email: "david@example.com",
        status: ProductStatus::UnderReview,
    },
    Fixture {
        title: "Chanel Dress",
        price_cents: 78999,
        category: "Dresses",
        description: "Vintage Chanel dress, size 36. Excellent condition.",
        image_url: "https://images.unsplash.com/photo-1539008835657-9e8e9680c956?q=80&w=500",
        seller_name: "Olivia Green",
        seller_email: "olivia@example.com",
        status: ProductStatus::Validated,
    },
];

impl Fixture {
    fn to_new_product(&self) -> NewProduct {
        NewProduct {
            title: self.title.to_string(),
            price: Decimal::new(self.price_cents, 2),
            category: self.category.to_string(),
            description: self.description.to_string(),
            image_url: self.image_url.to_string(),
            seller_name: self.seller_name.to_string(),
            seller_email: self.seller_email.to_string(),
            status: Some(self.status),
        }
    }
}

pub async fn run(repo: &dyn MarketplaceRepository, admin_password: &str) -> Result<SeedSummary> {
    repo.clear_catalog().await?;
    info!("Deleted existing products and orders");

    for name in CATEGORIES {
        repo.upsert_category(name).await?;
    }

    let password_hash = hash_password(admin_password)?;
    for email in ADMIN_EMAILS {
        repo.upsert_admin(email, &password_hash).await?;
    }

    for fixture in &PRODUCTS {
        repo.create_product(&fixture.to_new_product()).await?;
    }

    let summary = SeedSummary {
        categories: CATEGORIES.len(),
        admins: ADMIN_EMAILS.len(),
        products: PRODUCTS.len(),
    };
    info!(
        categories = summary.categories,
        admins = summary.admins,
        products = summary.products,
        "Seed data created"
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::MemoryRepository;
    use crate::services::verify_password;

    #[tokio::test]
    async fn seeding_twice_yields_the_same_catalog() {
        let repo = MemoryRepository::new();
        run(&repo, "pw").await.unwrap();
        let summary = run(&repo, "pw2").await.unwrap();

        assert_eq!(
            summary,
            SeedSummary {
                categories: 5,
                admins: 3,
                products: 5
            }
        );
        assert_eq!(repo.list_categories().await.unwrap().len(), 5);
        assert_eq!(repo.count_products(None).await.unwrap(), 5);
        assert_eq!(
            repo.count_products(Some(ProductStatus::Validated))
                .await
                .unwrap(),
            3
        );

        let admin = repo
            .find_admin_by_email("admin@example.com")
            .await
            .unwrap()
            .unwrap();
        assert!(verify_password("pw2", &admin.password_hash));
    }

    #[tokio::test]
    async fn fixture_statuses_match_the_catalog_mix() {
        let repo = MemoryRepository::new();
        run(&repo, "pw").await.unwrap();

        for (status, expected) in [
            (ProductStatus::Validated, 3),
            (ProductStatus::Submitted, 1),
            (ProductStatus::UnderReview, 1),
            (ProductStatus::Sold, 0),
        ] {
            assert_eq!(repo.count_products(Some(status)).await.unwrap(), expected);
        }
    }
}
