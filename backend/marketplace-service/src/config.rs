/// Configuration management for marketplace-service
///
/// Values come from the environment (nested keys use `__`, e.g.
/// `SERVER__HOST`, `AUTH__JWT_SECRET`) with defaults for local development.
/// `PORT`, `DATABASE_URL` and `PUBLIC_BASE_URL` are accepted as shorthands.
use serde::Deserialize;
use std::path::PathBuf;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub database: DatabaseConfig,
    pub uploads: UploadConfig,
    pub auth: AuthConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Origin used to build public image URLs. Defaults to `http://localhost:{port}`.
    #[serde(default)]
    pub public_base_url: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    Postgres,
    Memory,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    pub seed_on_start: bool,
}

#[derive(Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub acquire_timeout_secs: u64,
}

impl std::fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("url", &"[REDACTED]")
            .field("max_connections", &self.max_connections)
            .field("acquire_timeout_secs", &self.acquire_timeout_secs)
            .finish()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct UploadConfig {
    pub dir: PathBuf,
    pub max_bytes: usize,
}

#[derive(Clone, Deserialize)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub token_expiry_hours: u64,
    /// When set, admin-only endpoints reject requests without a bearer token.
    pub require_admin_token: bool,
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("jwt_secret", &"[REDACTED]")
            .field("token_expiry_hours", &self.token_expiry_hours)
            .field("require_admin_token", &self.require_admin_token)
            .finish()
    }
}

pub const DEFAULT_PORT: u16 = 3001;
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(config::Environment::default().separator("__"))
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", i64::from(DEFAULT_PORT))?
            .set_default("storage.backend", "postgres")?
            .set_default("storage.seed_on_start", false)?
            .set_default("database.url", "postgres://localhost/marketplace")?
            .set_default("database.max_connections", 10)?
            .set_default("database.acquire_timeout_secs", 10)?
            .set_default("uploads.dir", "uploads")?
            .set_default("uploads.max_bytes", DEFAULT_MAX_UPLOAD_BYTES as i64)?
            .set_default("auth.jwt_secret", "development-secret-change-in-production")?
            .set_default("auth.token_expiry_hours", 24)?
            .set_default("auth.require_admin_token", false)?
            .set_override_option("server.port", std::env::var("PORT").ok())?
            .set_override_option("database.url", std::env::var("DATABASE_URL").ok())?
            .set_override_option("server.public_base_url", std::env::var("PUBLIC_BASE_URL").ok())?
            .build()?;

        Ok(config.try_deserialize()?)
    }

    /// Configuration for tests and local runs: in-memory storage, uploads in `upload_dir`.
    pub fn for_memory(upload_dir: impl Into<PathBuf>) -> Self {
        Self {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: DEFAULT_PORT,
                public_base_url: None,
            },
            storage: StorageConfig {
                backend: StorageBackend::Memory,
                seed_on_start: false,
            },
            database: DatabaseConfig {
                url: String::new(),
                max_connections: 1,
                acquire_timeout_secs: 1,
            },
            uploads: UploadConfig {
                dir: upload_dir.into(),
                max_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            },
            auth: AuthConfig {
                jwt_secret: "test-secret".to_string(),
                token_expiry_hours: 1,
                require_admin_token: false,
            },
        }
    }

    /// Seeding on start wipes the catalog, so it only applies to the memory backend.
    pub fn seeds_on_start(&self) -> bool {
        self.storage.seed_on_start && self.storage.backend == StorageBackend::Memory
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    pub fn public_base_url(&self) -> String {
        match &self.server.public_base_url {
            Some(url) if !url.trim().is_empty() => url.trim().trim_end_matches('/').to_string(),
            _ => format!("http://localhost:{}", self.server.port),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    const VARS: [&str; 7] = [
        "PORT",
        "DATABASE_URL",
        "PUBLIC_BASE_URL",
        "SERVER__PORT",
        "STORAGE__BACKEND",
        "UPLOADS__MAX_BYTES",
        "AUTH__REQUIRE_ADMIN_TOKEN",
    ];

    fn clear_env() {
        for var in VARS {
            std::env::remove_var(var);
        }
    }

    #[test]
    #[serial]
    fn defaults_match_documented_values() {
        clear_env();
        let config = Config::load().unwrap();

        assert_eq!(config.server.port, 3001);
        assert_eq!(config.storage.backend, StorageBackend::Postgres);
        assert_eq!(config.uploads.max_bytes, 5 * 1024 * 1024);
        assert!(!config.auth.require_admin_token);
        assert_eq!(config.public_base_url(), "http://localhost:3001");
    }

    #[test]
    #[serial]
    fn port_shorthand_overrides_nested_key() {
        clear_env();
        std::env::set_var("SERVER__PORT", "4000");
        std::env::set_var("PORT", "4100");

        let config = Config::load().unwrap();
        assert_eq!(config.server.port, 4100);

        clear_env();
    }

    #[test]
    #[serial]
    fn nested_keys_are_read_from_environment() {
        clear_env();
        std::env::set_var("STORAGE__BACKEND", "memory");
        std::env::set_var("UPLOADS__MAX_BYTES", "1024");
        std::env::set_var("AUTH__REQUIRE_ADMIN_TOKEN", "true");
        std::env::set_var("PUBLIC_BASE_URL", "https://cdn.example.com/");

        let config = Config::load().unwrap();
        assert_eq!(config.storage.backend, StorageBackend::Memory);
        assert_eq!(config.uploads.max_bytes, 1024);
        assert!(config.auth.require_admin_token);
        assert_eq!(config.public_base_url(), "https://cdn.example.com");

        clear_env();
    }

    #[test]
    fn seed_on_start_only_applies_to_memory_storage() {
        let mut config = Config::for_memory("uploads");
        assert!(!config.seeds_on_start());

        config.storage.seed_on_start = true;
        assert!(config.seeds_on_start());

        config.storage.backend = StorageBackend::Postgres;
        assert!(!config.seeds_on_start());
    }

    #[test]
    fn debug_output_redacts_secrets() {
        let mut config = Config::for_memory("uploads");
        config.database.url = "postgres://user:hunter2@db/marketplace".into();
        let rendered = format!("{:?}", config);
        assert!(!rendered.contains("hunter2"));
        assert!(!rendered.contains("test-secret"));
    }
}
