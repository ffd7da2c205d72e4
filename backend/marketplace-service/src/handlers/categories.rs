use actix_web::{web, HttpResponse};

use crate::error::Result;
use crate::state::AppState;

/// List all categories
pub async fn list_categories(state: web::Data<AppState>) -> Result<HttpResponse> {
    let categories = state.categories().list().await?;
    Ok(HttpResponse::Ok().json(categories))
}
