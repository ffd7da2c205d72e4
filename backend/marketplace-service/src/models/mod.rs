mod admin;
mod category;
mod order;
mod pagination;
mod product;

pub use admin::Admin;
pub use category::Category;
pub use order::{NewOrder, Order, PaymentMethod};
pub use pagination::Pagination;
pub use product::{NewProduct, Product, ProductPage, ProductPatch, ProductStatus};

/// Raised when a stored or submitted enum value is not one of the known variants.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind}: {value:?}")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}
