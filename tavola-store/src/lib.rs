pub mod app_config;
pub mod content_repo;
pub mod database;
pub mod pg_store;
pub mod redis_repo;
pub mod reservation_repo;
pub mod subscriber_repo;

use std::sync::Arc;
use tavola_core::{Store, UnconfiguredStore};
use tracing::{error, info, warn};

pub use app_config::Config;
pub use database::DbClient;
pub use pg_store::PgStore;
pub use redis_repo::RedisClient;

/// Build the collaborator once for the lifetime of the process.
/// Without a usable database URL every service runs in fallback mode.
pub async fn build_store(config: &Config) -> Arc<dyn Store> {
    let Some(url) = config.database.connection_string() else {
        warn!("No database configured, running with fallback data");
        return Arc::new(UnconfiguredStore);
    };

    let client = match DbClient::new(url, config.database.max_connections) {
        Ok(client) => client,
        Err(e) => {
            error!(error = %e, "Invalid database configuration, running with fallback data");
            return Arc::new(UnconfiguredStore);
        }
    };

    if config.database.run_migrations {
        if let Err(e) = client.migrate().await {
            error!(error = %e, "Database migrations failed");
        }
    }

    info!("PostgreSQL store configured");
    Arc::new(PgStore::from(client))
}

pub fn build_redis(config: &Config) -> Option<RedisClient> {
    let url = config.redis.connection_string()?;
    match RedisClient::new(url) {
        Ok(client) => {
            info!("Redis rate limiting enabled");
            Some(client)
        }
        Err(e) => {
            error!(error = %e, "Invalid Redis URL, rate limiting disabled");
            None
        }
    }
}
