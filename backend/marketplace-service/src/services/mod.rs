/// Business logic layer
///
/// Services own the marketplace rules (pagination, status transitions,
/// credential checks, image storage) and talk to storage only through
/// `MarketplaceRepository`.
pub mod admin_service;
pub mod category_service;
pub mod image_store;
pub mod order_service;
pub mod product_service;
pub mod upload_service;

pub use admin_service::{decode_token, hash_password, verify_password, AdminClaims, AdminService};
pub use category_service::CategoryService;
pub use image_store::{ImageStore, StoredImage};
pub use order_service::OrderService;
pub use product_service::ProductService;
pub use upload_service::{ImageUpload, UploadService};
