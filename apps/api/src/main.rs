mod agents;
mod config;
mod db;
mod errors;
mod llm_client;
mod matching;
mod models;
mod routes;
mod signals;
mod state;
mod store;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::agents::context::ContextAssembler;
use crate::agents::orchestrator::AgentOrchestrator;
use crate::config::Config;
use crate::db::create_pool;
use crate::llm_client::{ChatModel, DisabledModel, LlmClient};
use crate::routes::build_router;
use crate::signals::classifier::EventClassifier;
use crate::signals::news::RssNewsSource;
use crate::signals::pipeline::SignalPipeline;
use crate::state::AppState;
use crate::store::{PgStore, Store};

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={}",
                env!("CARGO_PKG_NAME").replace('-', "_"),
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Scout API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize PostgreSQL (migrations run inside create_pool)
    let pool = create_pool(&config.database_url).await?;
    let store: Arc<dyn Store> = Arc::new(PgStore::new(pool));

    // Initialize LLM client, or run degraded without one
    let (agent_llm, classifier): (Arc<dyn ChatModel>, EventClassifier) =
        match &config.anthropic_api_key {
            Some(key) => {
                let client: Arc<dyn ChatModel> = Arc::new(LlmClient::new(key.clone()));
                info!(
                    "LLM client initialized (agent: {}, classifier: {})",
                    llm_client::AGENT_MODEL,
                    llm_client::CLASSIFIER_MODEL
                );
                (client.clone(), EventClassifier::new(client))
            }
            None => {
                warn!("ANTHROPIC_API_KEY not set: rule-based classification only, agent disabled");
                let disabled: Arc<dyn ChatModel> = Arc::new(DisabledModel);
                (disabled, EventClassifier::rules_only())
            }
        };

    // Signal pipeline
    let news = Arc::new(RssNewsSource::new(config.news_feed_urls.clone())?);
    info!("News source: {} feed(s)", config.news_feed_urls.len());
    let pipeline = Arc::new(SignalPipeline::new(
        store.clone(),
        Arc::new(classifier),
        news,
    ));

    // Agent orchestrator
    let orchestrator = Arc::new(AgentOrchestrator::new(
        store.clone(),
        agent_llm,
        config.max_tool_rounds,
    ));
    info!("Agent tool round limit: {}", config.max_tool_rounds);

    // Build app state
    let state = AppState {
        context: ContextAssembler::new(store.clone()),
        store,
        pipeline,
        orchestrator,
        config: config.clone(),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins once the frontend domain is fixed

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
