use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use tavola_core::repository::ReservationRepository;
use tavola_core::{StoreError, StoreResult};
use tavola_shared::{NewReservation, Reservation, ReservationFilter, ReservationStatus};
use uuid::Uuid;

use crate::database::backend;
use crate::pg_store::PgStore;

const RESERVATION_COLUMNS: &str =
    "id, full_name, phone, email, party_size, date, country_context, occasion, status, created_at";

#[derive(sqlx::FromRow)]
struct ReservationRow {
    id: Uuid,
    full_name: String,
    phone: String,
    email: String,
    party_size: i32,
    date: NaiveDate,
    country_context: Option<String>,
    occasion: Option<String>,
    status: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<ReservationRow> for Reservation {
    type Error = StoreError;

    fn try_from(row: ReservationRow) -> Result<Self, Self::Error> {
        let status = row.status.parse::<ReservationStatus>().map_err(StoreError::Backend)?;
        Ok(Reservation {
            id: row.id,
            full_name: row.full_name,
            phone: row.phone,
            email: row.email,
            party_size: row.party_size,
            date: row.date,
            country_context: row.country_context,
            occasion: row.occasion,
            status,
            created_at: row.created_at,
        })
    }
}

#[async_trait]
impl ReservationRepository for PgStore {
    async fn insert_reservation(&self, reservation: &NewReservation) -> StoreResult<Reservation> {
        let sql = format!(
            r#"
            INSERT INTO reservations (full_name, phone, email, party_size, date, country_context, occasion, status)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {}
            "#,
            RESERVATION_COLUMNS
        );

        let row = sqlx::query_as::<_, ReservationRow>(&sql)
            .bind(&reservation.full_name)
            .bind(&reservation.phone)
            .bind(&reservation.email)
            .bind(reservation.party_size)
            .bind(reservation.date)
            .bind(&reservation.country_context)
            .bind(&reservation.occasion)
            .bind(reservation.status().as_str())
            .fetch_one(&self.pool)
            .await
            .map_err(backend)?;

        row.try_into()
    }

    async fn party_sizes_on(
        &self,
        date: NaiveDate,
        statuses: &[ReservationStatus],
    ) -> StoreResult<Vec<i32>> {
        let statuses: Vec<String> = statuses.iter().map(|s| s.as_str().to_string()).collect();

        sqlx::query_scalar::<_, i32>(
            "SELECT party_size FROM reservations WHERE date = $1 AND status = ANY($2)",
        )
        .bind(date)
        .bind(statuses)
        .fetch_all(&self.pool)
        .await
        .map_err(backend)
    }

    async fn list_reservations(&self, filter: &ReservationFilter) -> StoreResult<Vec<Reservation>> {
        let sql = format!(
            r#"
            SELECT {}
            FROM reservations
            WHERE ($1::TEXT IS NULL OR status = $1)
              AND ($2::DATE IS NULL OR date >= $2)
              AND ($3::DATE IS NULL OR date <= $3)
            ORDER BY created_at DESC
            "#,
            RESERVATION_COLUMNS
        );

        let rows = sqlx::query_as::<_, ReservationRow>(&sql)
            .bind(filter.status.map(|s| s.as_str()))
            .bind(filter.from)
            .bind(filter.to)
            .fetch_all(&self.pool)
            .await
            .map_err(backend)?;

        rows.into_iter().map(Reservation::try_from).collect()
    }
}
