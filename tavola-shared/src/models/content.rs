use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Country {
    pub id: Uuid,
    pub name: String,
    pub code: String,
    pub flag_emoji: Option<String>,
    pub active: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    pub icon: Option<String>,
    pub content_type: String,
    pub active: bool,
}

/// Country display fields joined onto a content item.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CountrySummary {
    pub name: String,
    pub code: String,
    pub flag_emoji: Option<String>,
}

/// Category display fields joined onto a content item.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CategorySummary {
    pub name: String,
    pub icon: Option<String>,
}

/// A published piece of editorial content (recipe, story, video...).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ContentItem {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub description: Option<String>,
    pub body: Option<String>,
    pub content_type: String,
    pub media_url: Option<String>,
    pub featured: bool,
    pub views: i64,
    pub published_at: Option<DateTime<Utc>>,
    pub country_id: Option<Uuid>,
    pub category_id: Option<Uuid>,
    pub country: Option<CountrySummary>,
    pub category: Option<CategorySummary>,
}
