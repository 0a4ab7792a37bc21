use std::sync::Arc;

use crate::analysis::scoring_client::ScoringService;
use crate::config::Config;
use crate::extraction::ExtractorRegistry;

/// Shared application state injected into all route handlers via Axum extractors.
/// Nothing here is mutated per request; uploads only share the staging directory.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub registry: Arc<ExtractorRegistry>,
    /// Pluggable scoring backend. Default: `HttpScoringService`.
    pub scoring: Arc<dyn ScoringService>,
}

impl AppState {
    pub fn new(
        config: Config,
        registry: ExtractorRegistry,
        scoring: Arc<dyn ScoringService>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            registry: Arc::new(registry),
            scoring,
        }
    }
}
