use async_trait::async_trait;
use chrono::NaiveDate;
use tavola_shared::{
    Category, ContentItem, Country, NewReservation, NewSubscriber, Page, Paginated, Reservation,
    ReservationFilter, ReservationStatus, Subscriber,
};
use uuid::Uuid;

use crate::repository::{
    ContentRepository, ReservationRepository, Store, StoreError, StoreResult, SubscriberRepository,
};

/// Stand-in used when no database is configured. Every call reports
/// `NotConfigured` so services can fall back instead of failing.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnconfiguredStore;

#[async_trait]
impl ReservationRepository for UnconfiguredStore {
    async fn insert_reservation(&self, _reservation: &NewReservation) -> StoreResult<Reservation> {
        Err(StoreError::NotConfigured)
    }

    async fn party_sizes_on(
        &self,
        _date: NaiveDate,
        _statuses: &[ReservationStatus],
    ) -> StoreResult<Vec<i32>> {
        Err(StoreError::NotConfigured)
    }

    async fn list_reservations(&self, _filter: &ReservationFilter) -> StoreResult<Vec<Reservation>> {
        Err(StoreError::NotConfigured)
    }
}

#[async_trait]
impl SubscriberRepository for UnconfiguredStore {
    async fn upsert_subscriber(&self, _subscriber: &NewSubscriber) -> StoreResult<Subscriber> {
        Err(StoreError::NotConfigured)
    }
}

#[async_trait]
impl ContentRepository for UnconfiguredStore {
    async fn active_countries(&self) -> StoreResult<Vec<Country>> {
        Err(StoreError::NotConfigured)
    }

    async fn active_categories(&self) -> StoreResult<Vec<Category>> {
        Err(StoreError::NotConfigured)
    }

    async fn featured_content(&self, _limit: u32) -> StoreResult<Vec<ContentItem>> {
        Err(StoreError::NotConfigured)
    }

    async fn content_by_type(
        &self,
        _content_type: &str,
        _country_id: Option<Uuid>,
        _page: Page,
    ) -> StoreResult<Paginated<ContentItem>> {
        Err(StoreError::NotConfigured)
    }

    async fn search_content(&self, _term: &str, _page: Page) -> StoreResult<Paginated<ContentItem>> {
        Err(StoreError::NotConfigured)
    }

    async fn published_by_slug(&self, _slug: &str) -> StoreResult<Option<ContentItem>> {
        Err(StoreError::NotConfigured)
    }

    async fn increment_views(&self, _id: Uuid) -> StoreResult<i64> {
        Err(StoreError::NotConfigured)
    }
}

#[async_trait]
impl Store for UnconfiguredStore {
    fn is_configured(&self) -> bool {
        false
    }

    async fn ping(&self) -> StoreResult<()> {
        Err(StoreError::NotConfigured)
    }
}
