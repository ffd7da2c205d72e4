use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Back-office account. Intentionally not `Serialize`: the hash never leaves the service.
#[derive(Debug, Clone, FromRow)]
pub struct Admin {
    pub id: i64,
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
