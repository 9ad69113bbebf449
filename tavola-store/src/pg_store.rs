use async_trait::async_trait;
use sqlx::PgPool;
use tavola_core::{Store, StoreResult};

use crate::database::{backend, DbClient};

/// PostgreSQL-backed collaborator. The repository traits are implemented
/// in `reservation_repo`, `subscriber_repo` and `content_repo`.
#[derive(Clone)]
pub struct PgStore {
    pub(crate) pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl From<DbClient> for PgStore {
    fn from(client: DbClient) -> Self {
        Self::new(client.pool)
    }
}

#[async_trait]
impl Store for PgStore {
    async fn ping(&self) -> StoreResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await.map_err(backend)?;
        Ok(())
    }
}
