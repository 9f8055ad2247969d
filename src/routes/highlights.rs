//! Highlight rendering API routes
//!
//! Stateless operations on HTML supplied by the client.

use axum::{extract::State, routing::post, Json, Router};
use serde::{Deserialize, Serialize};

use super::load_page;
use crate::error::Result;
use crate::highlight::{render_with, strip, AnnotationSpan, OffsetIndex, RenderReport};
use crate::html::serialize_document;
use crate::state::AppState;

/// Create the highlights router
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/index", post(index_page))
        .route("/render", post(render_page))
        .route("/strip", post(strip_page))
}

#[derive(Debug, Deserialize)]
pub struct PageRequest {
    pub html: String,
    #[serde(default)]
    pub selector: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RenderRequest {
    pub html: String,
    pub highlights: Vec<AnnotationSpan>,
    #[serde(default)]
    pub selector: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SegmentInfo {
    pub start: usize,
    pub end: usize,
    pub annotated: bool,
}

#[derive(Debug, Serialize)]
pub struct IndexResponse {
    /// Virtual text of the selected subtree
    pub text: String,
    pub segments: Vec<SegmentInfo>,
}

#[derive(Debug, Serialize)]
pub struct RenderResponse {
    pub html: String,
    #[serde(flatten)]
    pub report: RenderReport,
}

#[derive(Debug, Serialize)]
pub struct StripResponse {
    pub html: String,
    pub removed: usize,
}

/// Offset table of a page
///
/// POST /api/v1/highlights/index
async fn index_page(
    State(state): State<AppState>,
    Json(request): Json<PageRequest>,
) -> Result<Json<IndexResponse>> {
    let page = load_page(&state, &request.html, request.selector.as_deref())?;
    let index = OffsetIndex::build(&page.doc, page.root);

    let segments = index
        .segments()
        .iter()
        .map(|segment| SegmentInfo {
            start: segment.range.start,
            end: segment.range.end,
            annotated: segment.annotated,
        })
        .collect();

    Ok(Json(IndexResponse {
        text: index.text().to_string(),
        segments,
    }))
}

/// Render highlights into a page
///
/// POST /api/v1/highlights/render
async fn render_page(
    State(state): State<AppState>,
    Json(request): Json<RenderRequest>,
) -> Result<Json<RenderResponse>> {
    let mut page = load_page(&state, &request.html, request.selector.as_deref())?;
    let report = render_with(
        &mut page.doc,
        page.root,
        &request.highlights,
        &state.render_options(),
    );

    Ok(Json(RenderResponse {
        html: serialize_document(&page.doc, state.markup()),
        report,
    }))
}

/// Remove every highlight from a page
///
/// POST /api/v1/highlights/strip
async fn strip_page(
    State(state): State<AppState>,
    Json(request): Json<PageRequest>,
) -> Result<Json<StripResponse>> {
    let mut page = load_page(&state, &request.html, request.selector.as_deref())?;
    let removed = strip(&mut page.doc, page.root);

    Ok(Json(StripResponse {
        html: serialize_document(&page.doc, state.markup()),
        removed,
    }))
}
