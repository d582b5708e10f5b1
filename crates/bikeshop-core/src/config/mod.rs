//! Application configuration schemas.
//!
//! All configuration structs are deserialized via the `config` crate from
//! TOML files and environment variables. Each sub-module represents a
//! logical configuration section.

pub mod app;
pub mod auth;
pub mod business;
pub mod database;
pub mod logging;

use std::path::{Component, Path};

use config::builder::DefaultState;
use config::ConfigBuilder;
use serde::{Deserialize, Serialize};

use self::app::ServerConfig;
use self::auth::{AuthConfig, PLACEHOLDER_JWT_SECRET};
use self::business::{BusinessConfig, FeaturesConfig};
use self::database::DatabaseConfig;
use self::logging::LoggingConfig;

use crate::error::AppError;

/// Root application configuration.
///
/// Built once at startup and handed to every component that needs it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Debug mode: relaxes secret validation and cookie `Secure` flag.
    #[serde(default)]
    pub debug: bool,
    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,
    /// Database settings.
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Shop branding.
    #[serde(default)]
    pub business: BusinessConfig,
    /// Feature flags.
    #[serde(default)]
    pub features: FeaturesConfig,
    /// Session token settings.
    #[serde(default)]
    pub auth: AuthConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Flat environment variables accepted for container deployments,
/// mapped onto their nested configuration keys.
const FLAT_OVERRIDES: &[(&str, &str)] = &[
    ("PORT", "server.port"),
    ("HOST", "server.host"),
    ("DATABASE_PATH", "database.path"),
    ("JWT_SECRET", "auth.jwt_secret"),
];

impl AppConfig {
    /// Load configuration from TOML files and the environment.
    ///
    /// Merges `config/default.toml`, the `config/{run_mode}.toml` overlay,
    /// variables prefixed with `BIKESHOP__` and finally the flat `DEBUG`,
    /// `PORT`, `HOST`, `DATABASE_PATH`, `JWT_SECRET` and `SEED_DATA`
    /// variables. The result is validated before it is returned.
    pub fn load(run_mode: &str) -> Result<Self, AppError> {
        let builder = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(
                config::Environment::with_prefix("BIKESHOP")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            );

        let builder = apply_flat_overrides(builder, |key| std::env::var(key).ok())?;

        let config = builder
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        let mut app_config: AppConfig = config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))?;

        app_config.validate()?;
        Ok(app_config)
    }

    /// Check the merged configuration and normalise defaults that cannot be
    /// expressed through serde.
    pub fn validate(&mut self) -> Result<(), AppError> {
        if self.server.port == 0 || self.server.port > 65535 {
            return Err(AppError::configuration(format!(
                "invalid server port: {}",
                self.server.port
            )));
        }

        let db_path = self.database.path.trim();
        if db_path.is_empty() {
            return Err(AppError::configuration("database path is required"));
        }
        if !self.database.is_in_memory()
            && Path::new(db_path)
                .components()
                .any(|c| matches!(c, Component::ParentDir))
        {
            return Err(AppError::configuration(format!(
                "database path must not traverse parent directories: {db_path}"
            )));
        }

        if !self.debug {
            let secret = self.auth.jwt_secret.trim();
            if secret.is_empty() || secret == PLACEHOLDER_JWT_SECRET {
                return Err(AppError::configuration(
                    "auth.jwt_secret must be set to a private value outside debug mode",
                ));
            }
        }

        if self.auth.jwt_expiration_hours <= 0 {
            self.auth.jwt_expiration_hours = auth::default_expiration_hours();
        }

        Ok(())
    }
}

fn apply_flat_overrides(
    mut builder: ConfigBuilder<DefaultState>,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<ConfigBuilder<DefaultState>, AppError> {
    if let Some(debug) = lookup("DEBUG") {
        builder = builder.set_override("debug", parse_flag(&debug))?;
    }
    if let Some(seed) = lookup("SEED_DATA") {
        builder = builder.set_override("database.seed_data", parse_flag(&seed))?;
    }
    for (var, key) in FLAT_OVERRIDES {
        builder = builder.set_override_option(*key, lookup(var).filter(|v| !v.is_empty()))?;
    }
    Ok(builder)
}

fn parse_flag(value: &str) -> bool {
    matches!(value.trim(), "true" | "1")
}
