//! Application configuration module
//!
//! Type-safe configuration loading from environment variables using the
//! `config` and `dotenvy` crates. Configuration is loaded with the
//! `PLAN_PRESS` prefix and nested values use double underscores as
//! separators.

mod database;
mod error;
mod server;
mod storage;

pub use database::DatabaseConfig;
pub use error::{ConfigError, ValidationError};
pub use server::{Environment, ServerConfig};
pub use storage::StorageConfig;

use serde::Deserialize;

/// Root application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server configuration (host, port, environment)
    #[serde(default)]
    pub server: ServerConfig,

    /// Database configuration (PostgreSQL connection)
    pub database: DatabaseConfig,

    /// Artifact storage configuration (evidence files)
    #[serde(default)]
    pub storage: StorageConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with the `PLAN_PRESS` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    ///
    /// # Environment Variable Format
    ///
    /// - `PLAN_PRESS__SERVER__PORT=8080` -> `server.port = 8080`
    /// - `PLAN_PRESS__DATABASE__URL=...` -> `database.url = ...`
    /// - `PLAN_PRESS__STORAGE__ARTIFACT_ROOT=...` -> `storage.artifact_root = ...`
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("PLAN_PRESS")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.database.validate()?;
        self.storage.validate()?;
        Ok(())
    }

    /// Check if running in production environment
    pub fn is_production(&self) -> bool {
        self.server.is_production()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::Mutex;

    // Env vars are process-global; serialize these tests.
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    fn set_minimal_env() {
        env::set_var(
            "PLAN_PRESS__DATABASE__URL",
            "postgresql://test@localhost/plan_press",
        );
    }

    fn clear_env() {
        env::remove_var("PLAN_PRESS__DATABASE__URL");
        env::remove_var("PLAN_PRESS__SERVER__PORT");
        env::remove_var("PLAN_PRESS__SERVER__ENVIRONMENT");
        env::remove_var("PLAN_PRESS__STORAGE__ARTIFACT_ROOT");
    }

    #[test]
    fn loads_from_environment_with_defaults() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.database.url, "postgresql://test@localhost/plan_press");
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.storage.artifact_root, "./data/artifacts");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn nested_overrides_apply() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        env::set_var("PLAN_PRESS__SERVER__PORT", "3000");
        env::set_var("PLAN_PRESS__STORAGE__ARTIFACT_ROOT", "/srv/artifacts");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.storage.artifact_root, "/srv/artifacts");
    }

    #[test]
    fn production_flag_reflects_environment() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        env::set_var("PLAN_PRESS__SERVER__ENVIRONMENT", "production");
        let result = AppConfig::load();
        clear_env();

        assert!(result.unwrap().is_production());
    }
}
