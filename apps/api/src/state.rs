use std::sync::Arc;

use crate::layout::LayoutConfig;
use crate::llm_client::TextGenerator;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Text generator used by customization. Production: `LlmClient`.
    pub generator: Arc<dyn TextGenerator>,
    /// Page geometry and typography for rendering.
    pub layout: LayoutConfig,
}
