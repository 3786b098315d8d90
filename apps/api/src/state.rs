use std::sync::Arc;

use crate::config::Config;
use crate::ml::ModelRegistry;
use crate::parsing::SectionRules;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Section heading rules, built-in or loaded from SECTION_RULES_PATH.
    pub rules: Arc<SectionRules>,
    /// Loaded once at startup, read-only afterwards.
    pub models: Arc<ModelRegistry>,
}
