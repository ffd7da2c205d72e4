/// Admin handlers - back-office login
use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub success: bool,
    pub email: String,
    pub token: String,
}

/// Verify admin credentials and issue a session token
pub async fn login(
    state: web::Data<AppState>,
    body: web::Json<LoginRequest>,
) -> Result<HttpResponse> {
    let LoginRequest { email, password } = body.into_inner();
    let (admin, token) = state.admins().login(&email, &password).await?;

    Ok(HttpResponse::Ok().json(LoginResponse {
        success: true,
        email: admin.email,
        token,
    }))
}
