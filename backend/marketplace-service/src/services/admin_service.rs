use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, warn};

use crate::config::AuthConfig;
use crate::error::{AppError, Result};
use crate::models::Admin;
use crate::repository::MarketplaceRepository;

/// Verified against when the email is unknown, so both failure paths cost one Argon2 run.
static DUMMY_HASH: Lazy<String> = Lazy::new(|| {
    hash_password("marketplace-dummy-password").expect("argon2 hashes a constant password")
});

/// Claims carried by an admin session token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminClaims {
    pub sub: String, // Admin ID
    pub email: String,
    pub iat: usize,
    pub exp: usize,
}

pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);

    Ok(Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Password hashing failed: {}", e)))?
        .to_string())
}

/// Constant-time check of `password` against a PHC-format Argon2 hash.
/// A malformed hash never verifies.
pub fn verify_password(password: &str, hash: &str) -> bool {
    let parsed = match PasswordHash::new(hash) {
        Ok(parsed) => parsed,
        Err(e) => {
            warn!("Stored password hash is malformed: {}", e);
            return false;
        }
    };

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

pub struct AdminService {
    repo: Arc<dyn MarketplaceRepository>,
    auth: AuthConfig,
}

impl AdminService {
    pub fn new(repo: Arc<dyn MarketplaceRepository>, auth: AuthConfig) -> Self {
        Self { repo, auth }
    }

    /// Check credentials and open a session.
    ///
    /// Unknown email and wrong password fail with the same error.
    pub async fn login(&self, email: &str, password: &str) -> Result<(Admin, String)> {
        let email = email.trim();
        let admin = self.repo.find_admin_by_email(email).await?;

        let admin = match admin {
            Some(admin) if verify_password(password, &admin.password_hash) => admin,
            Some(_) => {
                warn!(email = %email, "Admin login failed: wrong password");
                return Err(AppError::invalid_credentials());
            }
            None => {
                verify_password(password, &DUMMY_HASH);
                warn!(email = %email, "Admin login failed: unknown email");
                return Err(AppError::invalid_credentials());
            }
        };

        let token = self.generate_token(&admin)?;
        info!(admin_id = admin.id, "Admin logged in");
        Ok((admin, token))
    }

    pub fn generate_token(&self, admin: &Admin) -> Result<String> {
        let now = Utc::now();
        let hours = i64::try_from(self.auth.token_expiry_hours).unwrap_or(i64::MAX);
        let exp = Duration::try_hours(hours)
            .and_then(|ttl| now.checked_add_signed(ttl))
            .unwrap_or_else(|| now + Duration::hours(24));

        let claims = AdminClaims {
            sub: admin.id.to_string(),
            email: admin.email.clone(),
            iat: now.timestamp() as usize,
            exp: exp.timestamp() as usize,
        };

        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.auth.jwt_secret.as_bytes()),
        )
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Token generation failed: {}", e)))
    }

    pub fn verify_token(&self, token: &str) -> Result<AdminClaims> {
        decode_token(token, &self.auth.jwt_secret)
    }
}

/// Decode and validate an HS256 session token (signature and expiry).
pub fn decode_token(token: &str, secret: &str) -> Result<AdminClaims> {
    decode::<AdminClaims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::new(Algorithm::HS256),
    )
    .map(|data| data.claims)
    .map_err(|_| AppError::Unauthorized("Invalid or expired token".to_string()))
}
