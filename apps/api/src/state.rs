use std::sync::Arc;

use crate::config::Config;
use crate::llm_client::ChatModel;
use crate::screening::store::ScreeningStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Record store for jobs, applicants, and criteria. Trait object so
    /// handlers and evaluators can run against an in-memory fake in tests.
    pub store: Arc<dyn ScreeningStore>,
    /// Chat-completion provider behind the evaluation flow.
    pub model: Arc<dyn ChatModel>,
    /// Loaded configuration. Handlers do not read it yet; main keeps it here
    /// so per-request settings have somewhere to live.
    #[allow(dead_code)]
    pub config: Config,
}
