use std::sync::Arc;

use crate::auth::AuthVerifier;
use crate::extraction::TextExtractor;
use crate::llm_client::GenerativeModel;
use crate::timeline::TimelineAnalyzer;

/// Shared application state injected into all route handlers via Axum extractors.
/// Built once in `main`; collaborators sit behind traits so tests can swap them.
#[derive(Clone)]
pub struct AppState {
    pub llm: Arc<dyn GenerativeModel>,
    pub auth: Arc<dyn AuthVerifier>,
    pub extractor: Arc<dyn TextExtractor>,
    pub timeline: TimelineAnalyzer,
}
