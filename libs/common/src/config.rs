//! Application configuration
//!
//! Values are layered: built-in defaults, then an optional
//! `config/default.toml` (directory overridable through `CONFIG_PATH`), then
//! environment variables prefixed with `ERP__`, e.g. `ERP__SERVER__PORT=9000`.

use std::path::{Path, PathBuf};

use anyhow::Result;
use config::{Config, Environment, File};
use serde::Deserialize;

/// Complete application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub auth: AuthConfig,
    pub bootstrap: BootstrapConfig,
    pub logging: LoggingConfig,
}

/// HTTP listener settings
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Body of `GET /api/ping`
    pub ping_message: String,
}

/// Where the collection files live
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    pub data_dir: PathBuf,
}

/// Token signing and login throttling
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    pub jwt_secret: String,
    /// Lifetime of an issued token in seconds
    pub token_expiry_secs: u64,
    /// Require a bearer token on the entity endpoints
    pub protect_entities: bool,
    pub max_login_attempts: u32,
    pub login_window_secs: u64,
    pub lockout_secs: u64,
}

/// Default administrator written into an empty user collection
#[derive(Debug, Clone, Deserialize)]
pub struct BootstrapConfig {
    pub admin_username: String,
    pub admin_email: String,
    pub admin_password: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
}

impl AppConfig {
    /// Load configuration from defaults, the optional config file and the
    /// environment
    pub fn load() -> Result<Self> {
        let config_dir = std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config".to_string());
        Self::load_from(Path::new(&config_dir))
    }

    /// Same as [`AppConfig::load`] with an explicit config directory
    pub fn load_from(config_dir: &Path) -> Result<Self> {
        let config = Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8080)?
            .set_default("server.ping_message", "ping")?
            .set_default("storage.data_dir", ".")?
            .set_default("auth.jwt_secret", "change-me-in-production")?
            .set_default("auth.token_expiry_secs", 86_400)?
            .set_default("auth.protect_entities", true)?
            .set_default("auth.max_login_attempts", 5)?
            .set_default("auth.login_window_secs", 300)?
            .set_default("auth.lockout_secs", 900)?
            .set_default("bootstrap.admin_username", "admin")?
            .set_default("bootstrap.admin_email", "admin@ammar.com")?
            .set_default("bootstrap.admin_password", "123")?
            .set_default("logging.level", "info")?
            .add_source(File::from(config_dir.join("default")).required(false))
            .add_source(
                Environment::with_prefix("ERP")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        Ok(config.try_deserialize()?)
    }
}
