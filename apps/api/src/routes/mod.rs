pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::agents::handlers as agents;
use crate::matching::handlers as matching;
use crate::signals::handlers as signals;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // User context
        .route("/api/v1/context", get(agents::handle_get_context))
        // Agent conversations
        .route("/api/v1/agent/chat", post(agents::handle_chat))
        .route("/api/v1/agent/personas", get(agents::handle_list_personas))
        .route(
            "/api/v1/agent/conversations",
            get(agents::handle_list_conversations),
        )
        .route(
            "/api/v1/agent/conversations/:id",
            get(agents::handle_get_conversation).delete(agents::handle_delete_conversation),
        )
        // Signal pipeline
        .route("/api/v1/signals/ingest", post(signals::handle_ingest))
        .route("/api/v1/signals/score", post(signals::handle_score))
        .route("/api/v1/signals/run", post(signals::handle_run_full))
        .route("/api/v1/companies/top", get(signals::handle_top_companies))
        // Job matching
        .route("/api/v1/jobs/:id/match", get(matching::handle_job_match))
        .route("/api/v1/matches/refresh", post(matching::handle_refresh_matches))
        .with_state(state)
}
