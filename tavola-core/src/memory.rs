use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use std::collections::HashMap;
use tavola_shared::{
    Category, ContentItem, Country, NewReservation, NewSubscriber, Page, Paginated, Reservation,
    ReservationFilter, ReservationStatus, Subscriber,
};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::repository::{
    ContentRepository, ReservationRepository, Store, StoreError, StoreResult, SubscriberRepository,
};

#[derive(Debug, Clone)]
struct StoredContent {
    item: ContentItem,
    published: bool,
}

/// In-process store with the same filtering, ordering and upsert semantics as the
/// PostgreSQL tables. Used for tests and local runs without a database.
#[derive(Default)]
pub struct InMemoryStore {
    reservations: RwLock<Vec<Reservation>>,
    subscribers: RwLock<HashMap<String, Subscriber>>,
    countries: RwLock<Vec<Country>>,
    categories: RwLock<Vec<Category>>,
    content: RwLock<Vec<StoredContent>>,
    failure: RwLock<Option<String>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent call fail with a backend error.
    pub async fn fail_with(&self, message: &str) {
        *self.failure.write().await = Some(message.to_string());
    }

    pub async fn recover(&self) {
        *self.failure.write().await = None;
    }

    pub async fn seed_reservation(&self, reservation: Reservation) {
        self.reservations.write().await.push(reservation);
    }

    pub async fn set_reservation_status(&self, id: Uuid, status: ReservationStatus) -> bool {
        let mut reservations = self.reservations.write().await;
        match reservations.iter_mut().find(|r| r.id == id) {
            Some(reservation) => {
                reservation.status = status;
                true
            }
            None => false,
        }
    }

    pub async fn reservation_count(&self) -> usize {
        self.reservations.read().await.len()
    }

    pub async fn subscriber(&self, email: &str) -> Option<Subscriber> {
        self.subscribers.read().await.get(email).cloned()
    }

    pub async fn subscriber_count(&self) -> usize {
        self.subscribers.read().await.len()
    }

    pub async fn add_country(&self, country: Country) {
        self.countries.write().await.push(country);
    }

    pub async fn add_category(&self, category: Category) {
        self.categories.write().await.push(category);
    }

    pub async fn add_content(&self, item: ContentItem, published: bool) {
        self.content.write().await.push(StoredContent { item, published });
    }

    async fn check(&self) -> StoreResult<()> {
        match self.failure.read().await.as_ref() {
            Some(msg) => Err(StoreError::Backend(msg.clone())),
            None => Ok(()),
        }
    }

    /// Published items matching `predicate`, newest first.
    async fn published_where<F>(&self, predicate: F) -> Vec<ContentItem>
    where
        F: Fn(&ContentItem) -> bool,
    {
        let mut items: Vec<ContentItem> = self
            .content
            .read()
            .await
            .iter()
            .filter(|c| c.published && predicate(&c.item))
            .map(|c| c.item.clone())
            .collect();
        // None sorts lowest, so reversing puts undated items last.
        items.sort_by(|a, b| b.published_at.cmp(&a.published_at));
        items
    }
}

fn paginate(items: Vec<ContentItem>, page: Page) -> Paginated<ContentItem> {
    let total = items.len() as u64;
    let data = items
        .into_iter()
        .skip(usize::try_from(page.offset()).unwrap_or(usize::MAX))
        .take(page.limit as usize)
        .collect();
    Paginated::new(data, page, total)
}

#[async_trait]
impl ReservationRepository for InMemoryStore {
    async fn insert_reservation(&self, reservation: &NewReservation) -> StoreResult<Reservation> {
        self.check().await?;
        let created = reservation.clone().into_reservation(Uuid::new_v4(), Utc::now());
        self.reservations.write().await.push(created.clone());
        Ok(created)
    }

    async fn party_sizes_on(
        &self,
        date: NaiveDate,
        statuses: &[ReservationStatus],
    ) -> StoreResult<Vec<i32>> {
        self.check().await?;
        Ok(self
            .reservations
            .read()
            .await
            .iter()
            .filter(|r| r.date == date && statuses.contains(&r.status))
            .map(|r| r.party_size)
            .collect())
    }

    async fn list_reservations(&self, filter: &ReservationFilter) -> StoreResult<Vec<Reservation>> {
        self.check().await?;
        let mut reservations: Vec<Reservation> = self
            .reservations
            .read()
            .await
            .iter()
            .filter(|r| filter.matches(r))
            .cloned()
            .collect();
        reservations.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(reservations)
    }
}

#[async_trait]
impl SubscriberRepository for InMemoryStore {
    async fn upsert_subscriber(&self, subscriber: &NewSubscriber) -> StoreResult<Subscriber> {
        self.check().await?;
        let mut subscribers = self.subscribers.write().await;
        let record = subscribers
            .entry(subscriber.email.clone())
            .and_modify(|existing| {
                existing.name = subscriber.name.clone();
                existing.active = true;
            })
            .or_insert_with(|| Subscriber {
                id: Uuid::new_v4(),
                email: subscriber.email.clone(),
                name: subscriber.name.clone(),
                active: true,
                created_at: Utc::now(),
            });
        Ok(record.clone())
    }
}

#[async_trait]
impl ContentRepository for InMemoryStore {
    async fn active_countries(&self) -> StoreResult<Vec<Country>> {
        self.check().await?;
        let mut countries: Vec<Country> =
            self.countries.read().await.iter().filter(|c| c.active).cloned().collect();
        countries.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(countries)
    }

    async fn active_categories(&self) -> StoreResult<Vec<Category>> {
        self.check().await?;
        let mut categories: Vec<Category> =
            self.categories.read().await.iter().filter(|c| c.active).cloned().collect();
        categories.sort_by(|a, b| (&a.content_type, &a.name).cmp(&(&b.content_type, &b.name)));
        Ok(categories)
    }

    async fn featured_content(&self, limit: u32) -> StoreResult<Vec<ContentItem>> {
        self.check().await?;
        let mut items = self.published_where(|item| item.featured).await;
        items.truncate(limit as usize);
        Ok(items)
    }

    async fn content_by_type(
        &self,
        content_type: &str,
        country_id: Option<Uuid>,
        page: Page,
    ) -> StoreResult<Paginated<ContentItem>> {
        self.check().await?;
        let items = self
            .published_where(|item| {
                item.content_type == content_type
                    && country_id.map_or(true, |id| item.country_id == Some(id))
            })
            .await;
        Ok(paginate(items, page))
    }

    async fn search_content(&self, term: &str, page: Page) -> StoreResult<Paginated<ContentItem>> {
        self.check().await?;
        let needle = term.to_lowercase();
        let items = self
            .published_where(|item| {
                item.title.to_lowercase().contains(&needle)
                    || item
                        .description
                        .as_deref()
                        .is_some_and(|d| d.to_lowercase().contains(&needle))
            })
            .await;
        Ok(paginate(items, page))
    }

    async fn published_by_slug(&self, slug: &str) -> StoreResult<Option<ContentItem>> {
        self.check().await?;
        Ok(self.published_where(|item| item.slug == slug).await.into_iter().next())
    }

    async fn increment_views(&self, id: Uuid) -> StoreResult<i64> {
        self.check().await?;
        let mut content = self.content.write().await;
        let stored = content
            .iter_mut()
            .find(|c| c.item.id == id)
            .ok_or_else(|| StoreError::Backend(format!("content {} does not exist", id)))?;
        stored.item.views += 1;
        Ok(stored.item.views)
    }
}

#[async_trait]
impl Store for InMemoryStore {
    async fn ping(&self) -> StoreResult<()> {
        self.check().await
    }
}
