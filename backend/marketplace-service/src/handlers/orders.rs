/// Order handlers - checkout and order listing
use actix_web::{web, HttpResponse};
use serde::Deserialize;

use crate::error::Result;
use crate::middleware::AdminSession;
use crate::models::NewOrder;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListOrdersQuery {
    pub product_id: Option<i64>,
}

/// Place an order; the product becomes sold
pub async fn create_order(
    state: web::Data<AppState>,
    body: web::Json<NewOrder>,
) -> Result<HttpResponse> {
    let order = state.orders().place(body.into_inner()).await?;
    Ok(HttpResponse::Created().json(order))
}

/// List orders, optionally for a single product
pub async fn list_orders(
    state: web::Data<AppState>,
    _session: AdminSession,
    query: web::Query<ListOrdersQuery>,
) -> Result<HttpResponse> {
    let orders = state.orders().list(query.product_id).await?;
    Ok(HttpResponse::Ok().json(orders))
}
