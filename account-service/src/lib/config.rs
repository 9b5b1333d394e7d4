use std::env;

use config::Config as ConfigBuilder;
use config::ConfigError;
use config::Environment;
use config::File;
use serde::Deserialize;

/// Upper bound for any configured lifetime: ten years.
const MAX_TTL_DAYS: i64 = 3650;
const MAX_TTL_MINUTES: i64 = MAX_TTL_DAYS * 24 * 60;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub database: DatabaseConfig,
    pub server: ServerConfig,
    pub jwt: JwtConfig,
    pub temporary_token: TemporaryTokenConfig,
    pub email: EmailConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub http_port: u16,
    /// Externally reachable base URL, used to build links in emails.
    pub public_url: String,
}

/// Session token settings. Secrets have no file default and must come from
/// the environment (`JWT__ACCESS_TOKEN_SECRET`, `JWT__REFRESH_TOKEN_SECRET`).
#[derive(Deserialize, Clone)]
pub struct JwtConfig {
    pub access_token_secret: String,
    pub access_token_ttl_minutes: i64,
    pub refresh_token_secret: String,
    pub refresh_token_ttl_days: i64,
}

impl std::fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtConfig")
            .field("access_token_secret", &"***")
            .field("access_token_ttl_minutes", &self.access_token_ttl_minutes)
            .field("refresh_token_secret", &"***")
            .field("refresh_token_ttl_days", &self.refresh_token_ttl_days)
            .finish()
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct TemporaryTokenConfig {
    pub ttl_minutes: i64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct EmailConfig {
    pub from: String,
}

impl Config {
    /// Load configuration from files with environment variable overrides
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables (DATABASE__URL, JWT__ACCESS_TOKEN_SECRET, etc.)
    /// 2. Environment-specific config file (config/{environment}.toml)
    /// 3. Default config file (config/default.toml)
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let configuration = ConfigBuilder::builder()
            // Start with default configuration
            .add_source(File::with_name("config/default").required(false))
            // Layer on environment-specific configuration
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Layer on environment variables (with __ as separator)
            // Example: DATABASE__URL=postgres://... overrides database.url
            .add_source(
                Environment::default()
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let config: Config = configuration.try_deserialize()?;
        config.validate()?;

        Ok(config)
    }

    /// Reject TTLs that are not positive or would overflow a `chrono::Duration`.
    fn validate(&self) -> Result<(), ConfigError> {
        check_ttl(
            "jwt.access_token_ttl_minutes",
            self.jwt.access_token_ttl_minutes,
            MAX_TTL_MINUTES,
        )?;
        check_ttl(
            "jwt.refresh_token_ttl_days",
            self.jwt.refresh_token_ttl_days,
            MAX_TTL_DAYS,
        )?;
        check_ttl(
            "temporary_token.ttl_minutes",
            self.temporary_token.ttl_minutes,
            MAX_TTL_MINUTES,
        )
    }

    pub fn access_token_ttl(&self) -> chrono::Duration {
        chrono::Duration::minutes(self.jwt.access_token_ttl_minutes)
    }

    pub fn refresh_token_ttl(&self) -> chrono::Duration {
        chrono::Duration::days(self.jwt.refresh_token_ttl_days)
    }

    pub fn temporary_token_ttl(&self) -> chrono::Duration {
        chrono::Duration::minutes(self.temporary_token.ttl_minutes)
    }
}

fn check_ttl(key: &str, value: i64, max: i64) -> Result<(), ConfigError> {
    if (1..=max).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::Message(format!(
            "{} must be between 1 and {}, got {}",
            key, max, value
        )))
    }
}
