#[cfg(test)]
mod failing_repository;
mod memory_repository;
mod postgres_repository;
mod r#trait;

#[cfg(test)]
pub(crate) use failing_repository::FailingRepository;
pub use memory_repository::MemoryRepository;
pub use postgres_repository::PostgresMarketplaceRepository;
pub use r#trait::MarketplaceRepository;

use sqlx::migrate::Migrator;

/// Embedded schema migrations for the PostgreSQL backend.
pub static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

pub type RepositoryResult<T> = std::result::Result<T, RepositoryError>;

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    /// The named entity (e.g. `"Product 7"`) does not exist.
    #[error("{0} not found")]
    NotFound(String),

    /// The write would break a uniqueness or state-machine rule.
    #[error("{0}")]
    Conflict(String),

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

impl RepositoryError {
    pub(crate) fn product_not_found(id: i64) -> Self {
        RepositoryError::NotFound(format!("Product {}", id))
    }

    pub(crate) fn product_not_orderable() -> Self {
        RepositoryError::Conflict("Product is not available for ordering".to_string())
    }

    pub(crate) fn product_sold() -> Self {
        RepositoryError::Conflict("Product has been sold and can no longer be edited".to_string())
    }
}
