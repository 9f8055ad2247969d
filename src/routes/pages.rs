//! Stored page highlight API routes

use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::Deserialize;

use crate::db::PageHighlightRepository;
use crate::error::{AppError, Result};
use crate::highlight::AnnotationSpan;
use crate::pages::PageHighlightRecord;
use crate::state::AppState;

/// Create the pages router
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_page).put(save_page).delete(delete_page))
        .route("/all", get(list_pages))
}

#[derive(Debug, Deserialize)]
pub struct PageQuery {
    pub url: String,
}

#[derive(Debug, Deserialize)]
pub struct SavePageRequest {
    pub highlights: Vec<AnnotationSpan>,
}

/// GET /api/v1/pages?url=
async fn get_page(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Result<Json<PageHighlightRecord>> {
    let repo = PageHighlightRepository::new(state.db());
    let record = repo
        .load(&query.url)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("No highlights for page: {}", query.url)))?;
    Ok(Json(record))
}

/// PUT /api/v1/pages?url=
async fn save_page(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
    Json(request): Json<SavePageRequest>,
) -> Result<Json<PageHighlightRecord>> {
    let repo = PageHighlightRepository::new(state.db());
    let record = repo.save(&query.url, &request.highlights).await?;
    Ok(Json(record))
}

/// DELETE /api/v1/pages?url=
async fn delete_page(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Result<StatusCode> {
    let repo = PageHighlightRepository::new(state.db());
    if repo.delete(&query.url).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound(format!("No highlights for page: {}", query.url)))
    }
}

/// GET /api/v1/pages/all
async fn list_pages(State(state): State<AppState>) -> Result<Json<Vec<PageHighlightRecord>>> {
    let repo = PageHighlightRepository::new(state.db());
    let records = repo.list().await?;
    Ok(Json(records))
}
