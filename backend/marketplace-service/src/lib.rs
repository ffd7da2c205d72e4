/// Marketplace Service Library
///
/// Backend for a luxury-goods resale marketplace: catalog browsing, seller
/// submissions with image upload, admin moderation and checkout.
///
/// # Modules
///
/// - `handlers`: HTTP request handlers and route table
/// - `models`: Products, categories, orders, admins and request payloads
/// - `services`: Business rules (pagination, status transitions, auth, uploads)
/// - `repository`: Storage abstraction with PostgreSQL and in-memory backends
/// - `middleware`: Request extractors (admin sessions)
/// - `seed`: Fixture data loader
/// - `error`: Error types and HTTP mapping
/// - `config`: Configuration management
/// - `telemetry`: Tracing subscriber setup
pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod repository;
pub mod seed;
pub mod services;
pub mod state;
pub mod telemetry;

pub use config::Config;
pub use error::{AppError, Result};
pub use state::AppState;
