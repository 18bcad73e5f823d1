use std::sync::Arc;

use crate::config::Config;
use crate::llm_client::CompletionProvider;

/// Shared application state injected into all route handlers via Axum extractors.
/// Built once at startup and never mutated.
#[derive(Clone)]
pub struct AppState {
    /// Completion backend. `LlmClient` in production.
    pub llm: Arc<dyn CompletionProvider>,
    pub config: Config,
}
