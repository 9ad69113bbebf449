use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tavola_core::repository::SubscriberRepository;
use tavola_core::StoreResult;
use tavola_shared::{NewSubscriber, Subscriber};
use uuid::Uuid;

use crate::database::backend;
use crate::pg_store::PgStore;

#[derive(sqlx::FromRow)]
struct SubscriberRow {
    id: Uuid,
    email: String,
    name: Option<String>,
    active: bool,
    created_at: DateTime<Utc>,
}

impl From<SubscriberRow> for Subscriber {
    fn from(row: SubscriberRow) -> Self {
        Subscriber {
            id: row.id,
            email: row.email,
            name: row.name,
            active: row.active,
            created_at: row.created_at,
        }
    }
}

#[async_trait]
impl SubscriberRepository for PgStore {
    async fn upsert_subscriber(&self, subscriber: &NewSubscriber) -> StoreResult<Subscriber> {
        // The unique index on email makes concurrent upserts converge on one row.
        let row = sqlx::query_as::<_, SubscriberRow>(
            r#"
            INSERT INTO subscribers (email, name, active)
            VALUES ($1, $2, TRUE)
            ON CONFLICT (email) DO UPDATE
                SET name = EXCLUDED.name,
                    active = TRUE
            RETURNING id, email, name, active, created_at
            "#,
        )
        .bind(&subscriber.email)
        .bind(&subscriber.name)
        .fetch_one(&self.pool)
        .await
        .map_err(backend)?;

        Ok(row.into())
    }
}
