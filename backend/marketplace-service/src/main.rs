use actix_cors::Cors;
use actix_web::{web, App, HttpServer};
use std::sync::Arc;
use tracing::{info, warn};

use marketplace_service::config::StorageBackend;
use marketplace_service::handlers;
use marketplace_service::repository::{
    MarketplaceRepository, MemoryRepository, PostgresMarketplaceRepository, MIGRATOR,
};
use marketplace_service::services::image_store::PUBLIC_PREFIX;
use marketplace_service::{seed, AppState, Config};

async fn build_repository(config: &Config) -> anyhow::Result<Arc<dyn MarketplaceRepository>> {
    match config.storage.backend {
        StorageBackend::Postgres => {
            let db_config = db_pool::DbConfig::new("marketplace-service", &config.database.url)
                .with_max_connections(config.database.max_connections)
                .with_acquire_timeout_secs(config.database.acquire_timeout_secs);
            db_config.log_config();

            let pool = db_pool::create_pool(db_config).await?;
            db_pool::migrate(&pool, &MIGRATOR).await?;
            info!("Database migrations applied");

            Ok(Arc::new(PostgresMarketplaceRepository::new(pool)))
        }
        StorageBackend::Memory => {
            info!("Using in-memory storage");
            Ok(Arc::new(MemoryRepository::new()))
        }
    }
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    marketplace_service::telemetry::init_tracing();

    let config = Config::load()?;
    info!(
        bind = %config.bind_address(),
        storage = ?config.storage.backend,
        "Starting marketplace-service"
    );

    let repo = build_repository(&config).await?;

    if config.storage.seed_on_start && !config.seeds_on_start() {
        warn!("storage.seed_on_start is ignored for PostgreSQL; run the seed binary instead");
    }
    if config.seeds_on_start() {
        let password = std::env::var("SEED_ADMIN_PASSWORD")
            .unwrap_or_else(|_| seed::DEFAULT_ADMIN_PASSWORD.to_string());
        seed::run(repo.as_ref(), &password).await?;
    }

    let bind_address = config.bind_address();
    let state = AppState::new(config, repo).await?;
    info!(dir = %state.images.dir().display(), "Serving uploads");

    let upload_dir = state.images.dir().to_path_buf();
    let state = web::Data::new(state);

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(Cors::permissive())
            .wrap(tracing_actix_web::TracingLogger::default())
            .configure(handlers::configure)
            .service(actix_files::Files::new(PUBLIC_PREFIX, upload_dir.clone()))
    })
    .bind(&bind_address)?
    .run()
    .await?;

    info!("marketplace-service shut down");
    Ok(())
}
