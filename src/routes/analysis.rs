//! Analysis API routes

use axum::{extract::State, routing::post, Json, Router};
use serde::{Deserialize, Serialize};
use tracing::info;

use super::load_page;
use crate::db::PageHighlightRepository;
use crate::error::{AppError, Result};
use crate::highlight::{render_with, strip, AnnotationSpan, OffsetIndex};
use crate::html::serialize_document;
use crate::state::AppState;

/// Create the analysis router
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/v1/analyze", post(analyze_page))
        .route("/api/v1/fact-check", post(fact_check_page))
}

#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    pub url: String,
    pub html: String,
    #[serde(default)]
    pub selector: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AnalyzeResponse {
    pub html: String,
    /// Highlights found by this pass
    pub highlights: Vec<AnnotationSpan>,
    pub rendered: usize,
}

#[derive(Debug, Deserialize)]
pub struct FactCheckRequest {
    pub url: String,
    #[serde(default)]
    pub html: Option<String>,
    #[serde(default)]
    pub selector: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FactCheckResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub html: Option<String>,
    pub highlights: Vec<AnnotationSpan>,
    pub verified_count: usize,
}

/// Classify a page, highlight it and remember the highlights
///
/// POST /api/v1/analyze
async fn analyze_page(
    State(state): State<AppState>,
    Json(request): Json<AnalyzeRequest>,
) -> Result<Json<AnalyzeResponse>> {
    let mut page = load_page(&state, &request.html, request.selector.as_deref())?;
    let text = OffsetIndex::build(&page.doc, page.root).text().to_string();

    let spans = state.analysis().analyze(&text).await?;
    let report = render_with(&mut page.doc, page.root, &spans, &state.render_options());

    let repo = PageHighlightRepository::new(state.db());
    let record = repo.append(&request.url, &spans).await?;

    info!(
        "Analyzed {}: {} highlight(s), {} rendered, {} stored",
        record.normalized_url,
        spans.len(),
        report.rendered,
        record.highlights.len()
    );

    Ok(Json(AnalyzeResponse {
        html: serialize_document(&page.doc, state.markup()),
        highlights: spans,
        rendered: report.rendered,
    }))
}

/// Fact-check the stored highlights of a page
///
/// When `html` is supplied, its highlights are replaced with the verified
/// ones.
///
/// POST /api/v1/fact-check
async fn fact_check_page(
    State(state): State<AppState>,
    Json(request): Json<FactCheckRequest>,
) -> Result<Json<FactCheckResponse>> {
    let repo = PageHighlightRepository::new(state.db());
    let stored = repo
        .load(&request.url)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("No highlights for page: {}", request.url)))?;

    let outcome = state.analysis().fact_check(stored.highlights).await?;
    repo.save(&request.url, &outcome.highlights).await?;

    let html = match request.html.as_deref() {
        Some(html) => {
            let mut page = load_page(&state, html, request.selector.as_deref())?;
            strip(&mut page.doc, page.root);
            render_with(
                &mut page.doc,
                page.root,
                &outcome.highlights,
                &state.render_options(),
            );
            Some(serialize_document(&page.doc, state.markup()))
        }
        None => None,
    };

    Ok(Json(FactCheckResponse {
        html,
        highlights: outcome.highlights,
        verified_count: outcome.verified_count,
    }))
}
