use std::sync::Arc;
use tavola_shared::{Category, ContentItem, Country, Page, Paginated};
use tracing::{debug, error, warn};
use uuid::Uuid;

use crate::fallback;
use crate::repository::{Store, StoreError};
use crate::{CoreError, CoreResult};

pub const FEATURED_LIMIT: u32 = 6;

/// Read side of the marketing site: countries, categories and published content.
pub struct ContentService {
    store: Arc<dyn Store>,
}

impl ContentService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Falls back to the static list on any store failure.
    pub async fn countries(&self) -> Vec<Country> {
        match self.store.active_countries().await {
            Ok(countries) => countries,
            Err(StoreError::NotConfigured) => {
                debug!("Store not configured, serving fallback countries");
                fallback::countries()
            }
            Err(StoreError::Backend(msg)) => {
                warn!(error = %msg, "Country lookup failed, serving fallback countries");
                fallback::countries()
            }
        }
    }

    pub async fn categories(&self) -> CoreResult<Vec<Category>> {
        or_fallback(self.store.active_categories().await, Vec::new, "categories")
    }

    pub async fn featured(&self) -> CoreResult<Vec<ContentItem>> {
        or_fallback(self.store.featured_content(FEATURED_LIMIT).await, Vec::new, "featured content")
    }

    pub async fn by_type(
        &self,
        content_type: &str,
        country_id: Option<Uuid>,
        page: Page,
    ) -> CoreResult<Paginated<ContentItem>> {
        or_fallback(
            self.store.content_by_type(content_type, country_id, page).await,
            || Paginated::empty(page),
            "content by type",
        )
    }

    pub async fn search(&self, term: &str, page: Page) -> CoreResult<Paginated<ContentItem>> {
        let term = term.trim();
        if term.is_empty() {
            return Ok(Paginated::empty(page));
        }
        or_fallback(
            self.store.search_content(term, page).await,
            || Paginated::empty(page),
            "content search",
        )
    }

    /// Returns the item with its view counter already bumped.
    pub async fn by_slug(&self, slug: &str) -> CoreResult<ContentItem> {
        let found = match self.store.published_by_slug(slug).await {
            Ok(found) => found,
            Err(StoreError::NotConfigured) => None,
            Err(StoreError::Backend(msg)) => {
                error!(%slug, error = %msg, "Content lookup failed");
                return Err(CoreError::Persistence(msg));
            }
        };
        let mut item = found.ok_or_else(|| CoreError::NotFound(format!("Content '{}'", slug)))?;

        match self.store.increment_views(item.id).await {
            Ok(views) => item.views = views,
            Err(e) => warn!(content_id = %item.id, error = %e, "Failed to increment view counter"),
        }
        Ok(item)
    }
}

fn or_fallback<T>(
    result: Result<T, StoreError>,
    fallback: impl FnOnce() -> T,
    what: &str,
) -> CoreResult<T> {
    match result {
        Ok(value) => Ok(value),
        Err(StoreError::NotConfigured) => {
            debug!("Store not configured, serving empty {}", what);
            Ok(fallback())
        }
        Err(StoreError::Backend(msg)) => {
            error!(error = %msg, "Failed to load {}", what);
            Err(CoreError::Persistence(msg))
        }
    }
}
