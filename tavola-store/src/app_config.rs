use serde::Deserialize;
use std::env;
use tavola_core::BusinessRules;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub environment: String,
    pub database: DatabaseConfig,
    #[serde(default)]
    pub redis: RedisConfig,
    pub rate_limit: RateLimitConfig,
    #[serde(default)]
    pub business_rules: BusinessRules,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: Option<String>,
    pub max_connections: u32,
    pub run_migrations: bool,
}

impl DatabaseConfig {
    /// The connection string, if one was actually provided.
    pub fn connection_string(&self) -> Option<&str> {
        self.url.as_deref().map(str::trim).filter(|url| !url.is_empty())
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct RedisConfig {
    pub url: Option<String>,
}

impl RedisConfig {
    pub fn connection_string(&self) -> Option<&str> {
        self.url.as_deref().map(str::trim).filter(|url| !url.is_empty())
    }
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitConfig {
    pub max_requests: i64,
    pub window_seconds: i64,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self { max_requests: 100, window_seconds: 900 }
    }
}

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = config::Config::builder()
            .set_default("server.port", 3000)?
            .set_default("environment", run_mode.as_str())?
            .set_default("database.max_connections", 5)?
            .set_default("database.run_migrations", false)?
            .set_default("rate_limit.max_requests", 100)?
            .set_default("rate_limit.window_seconds", 900)?
            .add_source(config::File::with_name("config/default").required(false))
            // Per-environment overrides, e.g. config/production.toml
            .add_source(config::File::with_name(&format!("config/{}", run_mode)).required(false))
            // Not checked in
            .add_source(config::File::with_name("config/local").required(false))
            // Eg. `TAVOLA__DATABASE__URL=postgres://...`
            .add_source(config::Environment::with_prefix("TAVOLA").prefix_separator("__").separator("__"))
            .build()?;

        s.try_deserialize()
    }
}
