use std::sync::Arc;

use crate::config::Config;
use crate::repository::MarketplaceRepository;
use crate::services::{
    AdminService, CategoryService, ImageStore, OrderService, ProductService, UploadService,
};

/// Shared application state handed to every worker.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub repo: Arc<dyn MarketplaceRepository>,
    pub images: Arc<ImageStore>,
}

impl AppState {
    /// Build the state and make sure the upload directory exists.
    pub async fn new(config: Config, repo: Arc<dyn MarketplaceRepository>) -> std::io::Result<Self> {
        let images = ImageStore::from_config(&config);
        images.ensure_dir().await?;

        Ok(Self {
            config: Arc::new(config),
            repo,
            images: Arc::new(images),
        })
    }

    pub fn products(&self) -> ProductService {
        ProductService::new(self.repo.clone())
    }

    pub fn orders(&self) -> OrderService {
        OrderService::new(self.repo.clone())
    }

    pub fn categories(&self) -> CategoryService {
        CategoryService::new(self.repo.clone())
    }

    pub fn admins(&self) -> AdminService {
        AdminService::new(self.repo.clone(), self.config.auth.clone())
    }

    pub fn uploads(&self) -> UploadService {
        UploadService::new(self.repo.clone(), self.images.clone())
    }
}
