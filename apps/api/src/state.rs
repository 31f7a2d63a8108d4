use std::sync::Arc;

use crate::config::Config;
use crate::extractor::TextExtractor;
use crate::llm_client::ModelClient;
use crate::pipeline::store::ResumeStore;

/// Shared application state injected into all route handlers via Axum extractors.
/// Built once in `main`; tests build it from stubs.
#[derive(Clone)]
pub struct AppState {
    pub llm: Arc<dyn ModelClient>,
    pub store: Arc<dyn ResumeStore>,
    pub extractor: Arc<dyn TextExtractor>,
    pub config: Config,
}
