use std::sync::Arc;

use crate::error::Result;
use crate::models::Category;
use crate::repository::MarketplaceRepository;

pub struct CategoryService {
    repo: Arc<dyn MarketplaceRepository>,
}

impl CategoryService {
    pub fn new(repo: Arc<dyn MarketplaceRepository>) -> Self {
        Self { repo }
    }

    pub async fn list(&self) -> Result<Vec<Category>> {
        Ok(self.repo.list_categories().await?)
    }
}
