//! Load the fixture catalog into the configured database
//! Run with: cargo run --bin seed

use std::sync::Arc;

use marketplace_service::repository::{
    MarketplaceRepository, PostgresMarketplaceRepository, MIGRATOR,
};
use marketplace_service::{seed, Config};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    marketplace_service::telemetry::init_tracing();

    let config = Config::load()?;

    let db_config =
        db_pool::DbConfig::new("marketplace-seed", &config.database.url).with_max_connections(1);
    let pool = db_pool::create_pool(db_config).await?;
    db_pool::migrate(&pool, &MIGRATOR).await?;

    let password = std::env::var("SEED_ADMIN_PASSWORD")
        .unwrap_or_else(|_| seed::DEFAULT_ADMIN_PASSWORD.to_string());

    let repo: Arc<dyn MarketplaceRepository> = Arc::new(PostgresMarketplaceRepository::new(pool));
    let summary = seed::run(repo.as_ref(), &password).await?;

    println!("\n========================================");
    println!("Seed data created");
    println!("========================================");
    println!("Categories: {}", summary.categories);
    println!("Products:   {}", summary.products);
    println!("Admins:     {}", seed::ADMIN_EMAILS.join(", "));
    println!("========================================\n");

    Ok(())
}
