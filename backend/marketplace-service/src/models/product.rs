use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;
use validator::Validate;

use super::UnknownVariant;

/// Lifecycle stage of a listing.
///
/// `submitted → under review → validated → sold`, with `rejected` reachable
/// from any state before `sold`. Only `validated` listings are orderable.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProductStatus {
    #[default]
    #[serde(rename = "submitted")]
    Submitted,
    #[serde(rename = "under review")]
    UnderReview,
    #[serde(rename = "validated")]
    Validated,
    #[serde(rename = "rejected")]
    Rejected,
    #[serde(rename = "sold")]
    Sold,
}

impl ProductStatus {
    pub const ALL: [ProductStatus; 5] = [
        ProductStatus::Submitted,
        ProductStatus::UnderReview,
        ProductStatus::Validated,
        ProductStatus::Rejected,
        ProductStatus::Sold,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ProductStatus::Submitted => "submitted",
            ProductStatus::UnderReview => "under review",
            ProductStatus::Validated => "validated",
            ProductStatus::Rejected => "rejected",
            ProductStatus::Sold => "sold",
        }
    }

    pub fn is_orderable(&self) -> bool {
        matches!(self, ProductStatus::Validated)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, ProductStatus::Sold)
    }
}

impl fmt::Display for ProductStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProductStatus {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ProductStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| UnknownVariant {
                kind: "product status",
                value: s.to_string(),
            })
    }
}

impl TryFrom<String> for ProductStatus {
    type Error = UnknownVariant;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: i64,
    pub title: String,
    pub price: Decimal,
    pub category: String,
    pub description: String,
    pub image_url: String,
    pub seller_name: String,
    pub seller_email: String,
    #[sqlx(try_from = "String")]
    pub status: ProductStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Full product payload for creation. `status` defaults to `submitted`.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewProduct {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    pub price: Decimal,
    #[validate(length(min = 1, max = 100))]
    pub category: String,
    #[validate(length(min = 1, max = 5000))]
    pub description: String,
    #[validate(length(min = 1, max = 2048))]
    pub image_url: String,
    #[validate(length(min = 1, max = 200))]
    pub seller_name: String,
    #[validate(email)]
    pub seller_email: String,
    #[serde(default)]
    pub status: Option<ProductStatus>,
}

/// Partial update; absent fields keep their stored value.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ProductPatch {
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,
    pub price: Option<Decimal>,
    #[validate(length(min = 1, max = 100))]
    pub category: Option<String>,
    #[validate(length(min = 1, max = 5000))]
    pub description: Option<String>,
    #[validate(length(min = 1, max = 2048))]
    pub image_url: Option<String>,
    #[validate(length(min = 1, max = 200))]
    pub seller_name: Option<String>,
    #[validate(email)]
    pub seller_email: Option<String>,
    pub status: Option<ProductStatus>,
}

impl ProductPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.price.is_none()
            && self.category.is_none()
            && self.description.is_none()
            && self.image_url.is_none()
            && self.seller_name.is_none()
            && self.seller_email.is_none()
            && self.status.is_none()
    }

    /// Merge into an existing record in place. Timestamps are left to the caller.
    pub fn apply_to(&self, product: &mut Product) {
        if let Some(title) = &self.title {
            product.title = title.clone();
        }
        if let Some(price) = self.price {
            product.price = price;
        }
        if let Some(category) = &self.category {
            product.category = category.clone();
        }
        if let Some(description) = &self.description {
            product.description = description.clone();
        }
        if let Some(image_url) = &self.image_url {
            product.image_url = image_url.clone();
        }
        if let Some(seller_name) = &self.seller_name {
            product.seller_name = seller_name.clone();
        }
        if let Some(seller_email) = &self.seller_email {
            product.seller_email = seller_email.clone();
        }
        if let Some(status) = self.status {
            product.status = status;
        }
    }
}

/// One page of the catalog listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductPage {
    pub products: Vec<Product>,
    pub total: i64,
    pub pages: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_round_trips_through_wire_names() {
        for status in ProductStatus::ALL {
            let json = serde_json::to_string(&status).unwrap();
            assert_eq!(json, format!("\"{}\"", status.as_str()));
            assert_eq!(status.as_str().parse::<ProductStatus>().unwrap(), status);
        }
        assert_eq!(
            serde_json::to_string(&ProductStatus::UnderReview).unwrap(),
            "\"under review\""
        );
    }

    #[test]
    fn unknown_status_is_rejected() {
        let err = "archived".parse::<ProductStatus>().unwrap_err();
        assert_eq!(err.value, "archived");
        assert!(serde_json::from_str::<ProductStatus>("\"Validated\"").is_err());
    }

    #[test]
    fn only_validated_is_orderable() {
        let orderable: Vec<_> = ProductStatus::ALL
            .into_iter()
            .filter(ProductStatus::is_orderable)
            .collect();
        assert_eq!(orderable, vec![ProductStatus::Validated]);
        assert!(ProductStatus::Sold.is_terminal());
    }

    #[test]
    fn new_product_defaults_status_and_validates_email() {
        let payload = serde_json::json!({
            "title": "Vintage Gucci Shirt",
            "price": 259.99,
            "category": "Shirts",
            "description": "Size M",
            "imageUrl": "https://example.com/a.jpg",
            "sellerName": "Jane",
            "sellerEmail": "not-an-email",
        });
        let product: NewProduct = serde_json::from_value(payload).unwrap();
        assert_eq!(product.status, None);
        assert_eq!(product.price, Decimal::new(25999, 2));

        let errors = product.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("seller_email"));
    }

    #[test]
    fn patch_merges_only_present_fields() {
        let now = Utc::now();
        let mut product = Product {
            id: 1,
            title: "Old".into(),
            price: Decimal::new(100, 0),
            category: "Shoes".into(),
            description: "d".into(),
            image_url: "u".into(),
            seller_name: "s".into(),
            seller_email: "s@example.com".into(),
            status: ProductStatus::Submitted,
            created_at: now,
            updated_at: now,
        };
        let patch: ProductPatch =
            serde_json::from_value(serde_json::json!({"title": "New", "status": "under review"}))
                .unwrap();

        patch.apply_to(&mut product);
        assert_eq!(product.title, "New");
        assert_eq!(product.status, ProductStatus::UnderReview);
        assert_eq!(product.category, "Shoes");
        assert!(!patch.is_empty());
        assert!(ProductPatch::default().is_empty());
    }
}
