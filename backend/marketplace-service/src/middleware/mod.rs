/// Request extractors for marketplace-service
use actix_web::{dev::Payload, http::header, web, FromRequest, HttpRequest};
use futures_util::future::{ready, Ready};

use crate::error::AppError;
use crate::services::{decode_token, AdminClaims};
use crate::state::AppState;

/// Admin session taken from `Authorization: Bearer <token>`.
///
/// A token that is present but invalid is always rejected. A missing token is
/// rejected only when `auth.require_admin_token` is set; otherwise the
/// extractor yields `AdminSession(None)`.
#[derive(Debug, Clone)]
pub struct AdminSession(pub Option<AdminClaims>);

impl AdminSession {
    pub fn claims(&self) -> Option<&AdminClaims> {
        self.0.as_ref()
    }
}

fn extract(req: &HttpRequest) -> Result<AdminSession, AppError> {
    let state = req
        .app_data::<web::Data<AppState>>()
        .ok_or_else(|| AppError::Internal(anyhow::anyhow!("AppState is not registered")))?;
    let auth = &state.config.auth;

    let header = match req.headers().get(header::AUTHORIZATION) {
        Some(value) => value,
        None if auth.require_admin_token => {
            return Err(AppError::Unauthorized(
                "Missing Authorization header".to_string(),
            ))
        }
        None => return Ok(AdminSession(None)),
    };

    let token = header
        .to_str()
        .ok()
        .and_then(|value| value.strip_prefix("Bearer "))
        .ok_or_else(|| AppError::Unauthorized("Invalid Authorization scheme".to_string()))?;

    let claims = decode_token(token.trim(), &auth.jwt_secret)?;
    Ok(AdminSession(Some(claims)))
}

impl FromRequest for AdminSession {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(extract(req))
    }
}
