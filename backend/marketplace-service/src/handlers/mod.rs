/// HTTP handlers for the marketplace API
///
/// - Products: paginated listing, detail, create, admin edit
/// - Uploads: seller submission with a multipart image
/// - Orders: checkout and order listing
/// - Categories, admin login and health probes
pub mod admin;
pub mod categories;
pub mod health;
pub mod orders;
pub mod products;
pub mod uploads;

use actix_web::{error::JsonPayloadError, web, HttpRequest};

use crate::error::AppError;

pub use admin::login;
pub use categories::list_categories;
pub use health::{liveness, readiness};
pub use orders::{create_order, list_orders};
pub use products::{create_product, get_product, list_products, update_product};
pub use uploads::upload_product;

fn json_error(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    let app_err = match err {
        JsonPayloadError::Overflow { .. } | JsonPayloadError::OverflowKnownLength { .. } => {
            AppError::PayloadTooLarge("Request body is too large".to_string())
        }
        JsonPayloadError::ContentType => {
            AppError::BadRequest("Content-Type must be application/json".to_string())
        }
        other => AppError::BadRequest(format!("Invalid request body: {}", other)),
    };
    app_err.into()
}

fn query_error(err: actix_web::error::QueryPayloadError, _req: &HttpRequest) -> actix_web::Error {
    AppError::BadRequest(format!("Invalid query string: {}", err)).into()
}

/// Parse a numeric path id; anything else is a bad request.
pub(crate) fn parse_id(raw: &str) -> Result<i64, AppError> {
    raw.trim()
        .parse::<i64>()
        .map_err(|_| AppError::BadRequest(format!("Invalid id: {}", raw)))
}

/// Register the full route table.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(json_error))
        .app_data(web::QueryConfig::default().error_handler(query_error))
        .route("/health", web::get().to(liveness))
        .route("/health/ready", web::get().to(readiness))
        .service(
            web::scope("/api")
                .service(
                    web::scope("/products")
                        .service(
                            web::resource("")
                                .route(web::get().to(list_products))
                                .route(web::post().to(create_product)),
                        )
                        .service(
                            web::resource("/upload").route(web::post().to(upload_product)),
                        )
                        .service(
                            web::resource("/{id}")
                                .route(web::get().to(get_product))
                                .route(web::put().to(update_product)),
                        ),
                )
                .route("/categories", web::get().to(list_categories))
                .service(
                    web::resource("/orders")
                        .route(web::get().to(list_orders))
                        .route(web::post().to(create_order)),
                )
                .route("/admin/login", web::post().to(login)),
        );
}
