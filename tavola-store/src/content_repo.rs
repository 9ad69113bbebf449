use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tavola_core::repository::ContentRepository;
use tavola_core::StoreResult;
use tavola_shared::{
    Category, CategorySummary, ContentItem, Country, CountrySummary, Page, Paginated,
};
use uuid::Uuid;

use crate::database::backend;
use crate::pg_store::PgStore;

const CONTENT_SELECT: &str = r#"
    SELECT c.id, c.title, c.slug, c.description, c.body, c.content_type, c.media_url,
           c.featured, c.views, c.published_at, c.country_id, c.category_id,
           co.name AS country_name, co.code AS country_code, co.flag_emoji AS country_flag_emoji,
           cat.name AS category_name, cat.icon AS category_icon
    FROM content c
    LEFT JOIN countries co ON co.id = c.country_id
    LEFT JOIN content_categories cat ON cat.id = c.category_id
"#;

const NEWEST_FIRST: &str = "ORDER BY c.published_at DESC NULLS LAST, c.id";

#[derive(sqlx::FromRow)]
struct CountryRow {
    id: Uuid,
    name: String,
    code: String,
    flag_emoji: Option<String>,
    active: bool,
}

#[derive(sqlx::FromRow)]
struct CategoryRow {
    id: Uuid,
    name: String,
    icon: Option<String>,
    content_type: String,
    active: bool,
}

#[derive(sqlx::FromRow)]
struct ContentRow {
    id: Uuid,
    title: String,
    slug: String,
    description: Option<String>,
    body: Option<String>,
    content_type: String,
    media_url: Option<String>,
    featured: bool,
    views: i64,
    published_at: Option<DateTime<Utc>>,
    country_id: Option<Uuid>,
    category_id: Option<Uuid>,
    country_name: Option<String>,
    country_code: Option<String>,
    country_flag_emoji: Option<String>,
    category_name: Option<String>,
    category_icon: Option<String>,
}

impl From<ContentRow> for ContentItem {
    fn from(row: ContentRow) -> Self {
        // A LEFT JOIN miss leaves every joined column NULL.
        let country = match (row.country_name, row.country_code) {
            (Some(name), Some(code)) => {
                Some(CountrySummary { name, code, flag_emoji: row.country_flag_emoji })
            }
            _ => None,
        };
        let category = row
            .category_name
            .map(|name| CategorySummary { name, icon: row.category_icon });

        ContentItem {
            id: row.id,
            title: row.title,
            slug: row.slug,
            description: row.description,
            body: row.body,
            content_type: row.content_type,
            media_url: row.media_url,
            featured: row.featured,
            views: row.views,
            published_at: row.published_at,
            country_id: row.country_id,
            category_id: row.category_id,
            country,
            category,
        }
    }
}

/// Escape LIKE wildcards so a search term matches literally.
fn like_pattern(term: &str) -> String {
    let escaped = term.replace('\\', "\\\\").replace('%', "\\%").replace('_', "\\_");
    format!("%{}%", escaped)
}

fn limit_offset(page: Page) -> (i64, i64) {
    (i64::from(page.limit), i64::try_from(page.offset()).unwrap_or(i64::MAX))
}

fn total(count: i64) -> u64 {
    u64::try_from(count).unwrap_or(0)
}

#[async_trait]
impl ContentRepository for PgStore {
    async fn active_countries(&self) -> StoreResult<Vec<Country>> {
        let rows = sqlx::query_as::<_, CountryRow>(
            "SELECT id, name, code, flag_emoji, active FROM countries WHERE active = TRUE ORDER BY name",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(backend)?;

        Ok(rows
            .into_iter()
            .map(|r| Country { id: r.id, name: r.name, code: r.code, flag_emoji: r.flag_emoji, active: r.active })
            .collect())
    }

    async fn active_categories(&self) -> StoreResult<Vec<Category>> {
        let rows = sqlx::query_as::<_, CategoryRow>(
            r#"
            SELECT id, name, icon, content_type, active
            FROM content_categories
            WHERE active = TRUE
            ORDER BY content_type, name
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(backend)?;

        Ok(rows
            .into_iter()
            .map(|r| Category {
                id: r.id,
                name: r.name,
                icon: r.icon,
                content_type: r.content_type,
                active: r.active,
            })
            .collect())
    }

    async fn featured_content(&self, limit: u32) -> StoreResult<Vec<ContentItem>> {
        let sql = format!(
            "{} WHERE c.status = 'published' AND c.featured = TRUE {} LIMIT $1",
            CONTENT_SELECT, NEWEST_FIRST
        );

        let rows = sqlx::query_as::<_, ContentRow>(&sql)
            .bind(i64::from(limit))
            .fetch_all(&self.pool)
            .await
            .map_err(backend)?;

        Ok(rows.into_iter().map(ContentItem::from).collect())
    }

    async fn content_by_type(
        &self,
        content_type: &str,
        country_id: Option<Uuid>,
        page: Page,
    ) -> StoreResult<Paginated<ContentItem>> {
        let filter = "WHERE c.status = 'published' AND c.content_type = $1 \
                      AND ($2::UUID IS NULL OR c.country_id = $2)";
        let (limit, offset) = limit_offset(page);

        let sql = format!("{} {} {} LIMIT $3 OFFSET $4", CONTENT_SELECT, filter, NEWEST_FIRST);
        let rows = sqlx::query_as::<_, ContentRow>(&sql)
            .bind(content_type)
            .bind(country_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await
            .map_err(backend)?;

        let count_sql = format!("SELECT COUNT(*) FROM content c {}", filter);
        let count = sqlx::query_scalar::<_, i64>(&count_sql)
            .bind(content_type)
            .bind(country_id)
            .fetch_one(&self.pool)
            .await
            .map_err(backend)?;

        Ok(Paginated::new(rows.into_iter().map(ContentItem::from).collect(), page, total(count)))
    }

    async fn search_content(&self, term: &str, page: Page) -> StoreResult<Paginated<ContentItem>> {
        let filter = "WHERE c.status = 'published' \
                      AND (c.title ILIKE $1 ESCAPE '\\' OR c.description ILIKE $1 ESCAPE '\\')";
        let pattern = like_pattern(term);
        let (limit, offset) = limit_offset(page);

        let sql = format!("{} {} {} LIMIT $2 OFFSET $3", CONTENT_SELECT, filter, NEWEST_FIRST);
        let rows = sqlx::query_as::<_, ContentRow>(&sql)
            .bind(&pattern)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await
            .map_err(backend)?;

        let count_sql = format!("SELECT COUNT(*) FROM content c {}", filter);
        let count = sqlx::query_scalar::<_, i64>(&count_sql)
            .bind(&pattern)
            .fetch_one(&self.pool)
            .await
            .map_err(backend)?;

        Ok(Paginated::new(rows.into_iter().map(ContentItem::from).collect(), page, total(count)))
    }

    async fn published_by_slug(&self, slug: &str) -> StoreResult<Option<ContentItem>> {
        let sql = format!("{} WHERE c.status = 'published' AND c.slug = $1", CONTENT_SELECT);

        let row = sqlx::query_as::<_, ContentRow>(&sql)
            .bind(slug)
            .fetch_optional(&self.pool)
            .await
            .map_err(backend)?;

        Ok(row.map(ContentItem::from))
    }

    async fn increment_views(&self, id: Uuid) -> StoreResult<i64> {
        sqlx::query_scalar::<_, i64>("UPDATE content SET views = views + 1 WHERE id = $1 RETURNING views")
            .bind(id)
            .fetch_one(&self.pool)
            .await
            .map_err(backend)
    }
}
