use std::sync::Arc;

use crate::agents::context::ContextAssembler;
use crate::agents::orchestrator::AgentOrchestrator;
use crate::config::Config;
use crate::signals::pipeline::SignalPipeline;
use crate::store::Store;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub pipeline: Arc<SignalPipeline>,
    pub orchestrator: Arc<AgentOrchestrator>,
    pub context: ContextAssembler,
    pub config: Config,
}
