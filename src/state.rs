//! Application state management

use std::sync::Arc;

use sqlx::SqlitePool;

use crate::analysis::AnalysisService;
use crate::config::Config;
use crate::highlight::RenderOptions;
use crate::html::MarkupConfig;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: Config,
    db: SqlitePool,
    analysis: AnalysisService,
    markup: MarkupConfig,
}

impl AppState {
    /// Create the state with providers built from `config`
    pub fn new(config: Config, db: SqlitePool) -> Self {
        let analysis = AnalysisService::from_config(&config.analysis);
        Self::with_analysis(config, db, analysis)
    }

    /// Create the state around an existing analysis service
    pub fn with_analysis(config: Config, db: SqlitePool, analysis: AnalysisService) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config,
                db,
                analysis,
                markup: MarkupConfig::default(),
            }),
        }
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.inner.config
    }

    /// Get the database pool
    pub fn db(&self) -> &SqlitePool {
        &self.inner.db
    }

    pub fn analysis(&self) -> &AnalysisService {
        &self.inner.analysis
    }

    pub fn markup(&self) -> &MarkupConfig {
        &self.inner.markup
    }

    pub fn render_options(&self) -> RenderOptions {
        RenderOptions {
            max_sources: self.inner.config.highlight.max_sources,
        }
    }
}
