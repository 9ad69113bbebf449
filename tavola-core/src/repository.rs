use async_trait::async_trait;
use chrono::NaiveDate;
use tavola_shared::{
    Category, ContentItem, Country, NewReservation, NewSubscriber, Page, Paginated, Reservation,
    ReservationFilter, ReservationStatus, Subscriber,
};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// No backend configured. Callers degrade to fallback data instead of failing.
    #[error("store is not configured")]
    NotConfigured,
    #[error("{0}")]
    Backend(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Reservation table access
#[async_trait]
pub trait ReservationRepository: Send + Sync {
    /// Insert and return the created row, including generated `id` and `created_at`.
    async fn insert_reservation(&self, reservation: &NewReservation) -> StoreResult<Reservation>;

    /// Party sizes of every reservation on `date` whose status is in `statuses`.
    async fn party_sizes_on(
        &self,
        date: NaiveDate,
        statuses: &[ReservationStatus],
    ) -> StoreResult<Vec<i32>>;

    /// Newest first.
    async fn list_reservations(&self, filter: &ReservationFilter) -> StoreResult<Vec<Reservation>>;
}

/// Newsletter subscriber access
#[async_trait]
pub trait SubscriberRepository: Send + Sync {
    /// Insert or overwrite the subscriber keyed on email; returns the post-write row.
    async fn upsert_subscriber(&self, subscriber: &NewSubscriber) -> StoreResult<Subscriber>;
}

/// Read access to countries, categories and published content
#[async_trait]
pub trait ContentRepository: Send + Sync {
    async fn active_countries(&self) -> StoreResult<Vec<Country>>;

    async fn active_categories(&self) -> StoreResult<Vec<Category>>;

    async fn featured_content(&self, limit: u32) -> StoreResult<Vec<ContentItem>>;

    async fn content_by_type(
        &self,
        content_type: &str,
        country_id: Option<Uuid>,
        page: Page,
    ) -> StoreResult<Paginated<ContentItem>>;

    async fn search_content(&self, term: &str, page: Page) -> StoreResult<Paginated<ContentItem>>;

    async fn published_by_slug(&self, slug: &str) -> StoreResult<Option<ContentItem>>;

    /// Atomically bump the view counter, returning the new value.
    async fn increment_views(&self, id: Uuid) -> StoreResult<i64>;
}

/// The relational backend as a whole. Built once at start-up and shared by every service.
#[async_trait]
pub trait Store: ReservationRepository + SubscriberRepository + ContentRepository {
    fn is_configured(&self) -> bool {
        true
    }

    async fn ping(&self) -> StoreResult<()>;
}
