use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use axum_extra::extract::WithRejection;
use serde::Deserialize;
use tavola_shared::{Category, ContentItem, Country, Page, Paginated};
use uuid::Uuid;

use crate::error::AppError;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct ContentQuery {
    page: Option<u32>,
    limit: Option<u32>,
    country: Option<Uuid>,
}

impl ContentQuery {
    fn page(&self) -> Page {
        Page::new(self.page, self.limit)
    }
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/countries", get(list_countries))
        .route("/content/categories", get(list_categories))
        .route("/content/featured", get(list_featured))
        .route("/content/type/{content_type}", get(list_by_type))
        .route("/content/search/{term}", get(search_content))
        .route("/content/{slug}", get(get_by_slug))
}

async fn list_countries(State(state): State<AppState>) -> Json<Vec<Country>> {
    Json(state.content.countries().await)
}

async fn list_categories(State(state): State<AppState>) -> Result<Json<Vec<Category>>, AppError> {
    Ok(Json(state.content.categories().await?))
}

async fn list_featured(State(state): State<AppState>) -> Result<Json<Vec<ContentItem>>, AppError> {
    Ok(Json(state.content.featured().await?))
}

async fn list_by_type(
    State(state): State<AppState>,
    WithRejection(Path(content_type), _): WithRejection<Path<String>, AppError>,
    WithRejection(Query(query), _): WithRejection<Query<ContentQuery>, AppError>,
) -> Result<Json<Paginated<ContentItem>>, AppError> {
    let items = state.content.by_type(&content_type, query.country, query.page()).await?;
    Ok(Json(items))
}

async fn search_content(
    State(state): State<AppState>,
    WithRejection(Path(term), _): WithRejection<Path<String>, AppError>,
    WithRejection(Query(query), _): WithRejection<Query<ContentQuery>, AppError>,
) -> Result<Json<Paginated<ContentItem>>, AppError> {
    Ok(Json(state.content.search(&term, query.page()).await?))
}

async fn get_by_slug(
    State(state): State<AppState>,
    WithRejection(Path(slug), _): WithRejection<Path<String>, AppError>,
) -> Result<Json<ContentItem>, AppError> {
    Ok(Json(state.content.by_slug(&slug).await?))
}
