//! Configuration management

use config::{Config, ConfigBuilder, ConfigError, Environment, File, FileFormat};
use config::builder::DefaultState;
use serde::Deserialize;
use uuid::Uuid;

use crate::error::AppError;

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub app: AppSettings,
    pub database: DatabaseSettings,
    pub auth: AuthSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppSettings {
    pub env: String,
    pub host: String,
    pub port: u16,
    pub name: String,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum StorageBackend {
    Postgres,
    Memory,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseSettings {
    pub backend: StorageBackend,
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AuthSettings {
    /// The single master secret. Empty disables master authentication.
    pub master_api_key: String,
    /// Tenant the master acts as when no `X-Tenant-Id` is sent; also the bootstrap tenant.
    pub master_tenant_id: Option<Uuid>,
    /// Bootstrap admin account; seeding is skipped when absent.
    pub admin_email: Option<String>,
}

impl AuthSettings {
    pub fn master_enabled(&self) -> bool {
        !self.master_api_key.is_empty()
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, AppError> {
        let env = std::env::var("APP_ENV").unwrap_or_else(|_| "development".into());
        let config = Self::defaults()?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env)).required(false))
            .add_source(Environment::default().separator("__").try_parsing(true))
            .build()?;
        Self::finish(config)
    }

    /// Builds the configuration from an inline TOML document layered over the defaults.
    pub fn from_toml(document: &str) -> Result<Self, AppError> {
        let config = Self::defaults()?
            .add_source(File::from_str(document, FileFormat::Toml))
            .build()?;
        Self::finish(config)
    }

    fn defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        Config::builder()
            .set_default("app.env", "development")?
            .set_default("app.host", "127.0.0.1")?
            .set_default("app.port", 8080)?
            .set_default("app.name", "tenancy-server")?
            .set_default("database.backend", "memory")?
            .set_default("database.url", "")?
            .set_default("database.max_connections", 10)?
            .set_default("database.min_connections", 1)?
            .set_default("auth.master_api_key", "")
    }

    fn finish(config: Config) -> Result<Self, AppError> {
        let parsed: AppConfig = config.try_deserialize()?;
        if parsed.database.backend == StorageBackend::Postgres && parsed.database.url.is_empty() {
            return Err(AppError::InvalidConfig(
                "database.url is required for the postgres backend".into(),
            ));
        }
        Ok(parsed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_select_memory_backend_and_disable_master() {
        let config = AppConfig::from_toml("").unwrap();
        assert_eq!(config.database.backend, StorageBackend::Memory);
        assert!(!config.auth.master_enabled());
        assert!(config.auth.master_tenant_id.is_none());
        assert_eq!(config.app.port, 8080);
    }

    #[test]
    fn reads_auth_section() {
        let config = AppConfig::from_toml(
            r#"
            [auth]
            master_api_key = "super-secret"
            master_tenant_id = "6f1c2a8e-3d4b-4c5a-9e7f-0a1b2c3d4e5f"
            admin_email = "admin@example.com"
            "#,
        )
        .unwrap();

        assert!(config.auth.master_enabled());
        assert_eq!(
            config.auth.master_tenant_id,
            Some(Uuid::parse_str("6f1c2a8e-3d4b-4c5a-9e7f-0a1b2c3d4e5f").unwrap())
        );
        assert_eq!(config.auth.admin_email.as_deref(), Some("admin@example.com"));
    }

    #[test]
    fn postgres_backend_requires_url() {
        let result = AppConfig::from_toml(
            r#"
            [database]
            backend = "postgres"
            "#,
        );
        assert!(matches!(result, Err(AppError::InvalidConfig(_))));
    }
}
