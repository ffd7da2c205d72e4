use actix_web::{web, HttpResponse};
use serde_json::json;

use crate::error::{AppError, Result};
use crate::state::AppState;

/// Liveness probe; answers as long as the process serves requests.
pub async fn liveness() -> HttpResponse {
    HttpResponse::Ok().json(json!({ "status": "ok" }))
}

/// Readiness probe; fails with 503 when storage does not answer.
pub async fn readiness(state: web::Data<AppState>) -> Result<HttpResponse> {
    state.repo.health_check().await.map_err(|e| {
        tracing::warn!(error = %e, "Readiness check failed");
        AppError::Unavailable("Storage is not reachable".to_string())
    })?;

    Ok(HttpResponse::Ok().json(json!({ "status": "ready" })))
}
