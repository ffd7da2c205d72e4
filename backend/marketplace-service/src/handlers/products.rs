/// Product handlers - catalog listing, detail, creation and admin edits
use actix_web::{web, HttpResponse};
use serde::Deserialize;

use crate::error::{AppError, Result};
use crate::middleware::AdminSession;
use crate::models::{NewProduct, Pagination, ProductPatch, ProductStatus};
use crate::state::AppState;

use super::parse_id;

/// Raw query parameters; parsed by hand so malformed values become 400s with a clear message.
#[derive(Debug, Default, Deserialize)]
pub struct ListProductsQuery {
    pub page: Option<String>,
    pub limit: Option<String>,
    pub status: Option<String>,
}

fn parse_status(raw: Option<&str>) -> Result<Option<ProductStatus>> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(raw) => raw
            .parse::<ProductStatus>()
            .map(Some)
            .map_err(|e| AppError::BadRequest(e.to_string())),
    }
}

/// List products, paginated and optionally filtered by status
pub async fn list_products(
    state: web::Data<AppState>,
    query: web::Query<ListProductsQuery>,
) -> Result<HttpResponse> {
    let pagination = Pagination::parse(query.page.as_deref(), query.limit.as_deref())
        .map_err(AppError::BadRequest)?;
    let status = parse_status(query.status.as_deref())?;

    let page = state.products().list(status, pagination).await?;
    Ok(HttpResponse::Ok().json(page))
}

/// Get a product by ID
pub async fn get_product(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    let id = parse_id(&path)?;
    let product = state.products().get(id).await?;
    Ok(HttpResponse::Ok().json(product))
}

/// Create a product from a full JSON payload
pub async fn create_product(
    state: web::Data<AppState>,
    body: web::Json<NewProduct>,
) -> Result<HttpResponse> {
    let product = state.products().create(body.into_inner()).await?;
    Ok(HttpResponse::Created().json(product))
}

/// Partially update a product (admin edit)
pub async fn update_product(
    state: web::Data<AppState>,
    session: AdminSession,
    path: web::Path<String>,
    body: web::Json<ProductPatch>,
) -> Result<HttpResponse> {
    let id = parse_id(&path)?;
    if let Some(claims) = session.claims() {
        tracing::debug!(admin = %claims.email, product_id = id, "Admin editing product");
    }

    let product = state.products().update(id, body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(product))
}
