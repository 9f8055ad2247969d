//! Route modules for the Abovesaid server

pub mod analysis;
pub mod health;
pub mod highlights;
pub mod pages;

use axum::{extract::DefaultBodyLimit, routing::get, Router};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::error::Result;
use crate::html::{parse_page, sanitize_html, ParsedPage, RootSelector};
use crate::state::AppState;

/// Page bodies can be large; the axum default of 2 MB is too small
const MAX_BODY_BYTES: usize = 16 * 1024 * 1024;

/// Build the full application router
pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health::health_check))
        .route("/api/v1/health", get(health::health_check))
        .nest("/api/v1/highlights", highlights::router())
        .nest("/api/v1/pages", pages::router())
        .merge(analysis::router())
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Resolve the optional `selector` request field
///
/// Absent means the main-content heuristic.
pub(crate) fn root_selector(selector: Option<&str>) -> RootSelector {
    match selector {
        None => RootSelector::MainContent,
        Some(value) => RootSelector::from_option(Some(value)),
    }
}

/// Sanitize (when enabled) and parse request HTML
pub(crate) fn load_page(state: &AppState, html: &str, selector: Option<&str>) -> Result<ParsedPage> {
    let selector = root_selector(selector);
    let page = if state.config().highlight.sanitize {
        let clean = sanitize_html(html)?;
        parse_page(&clean, &selector, state.markup())?
    } else {
        parse_page(html, &selector, state.markup())?
    };
    Ok(page)
}
