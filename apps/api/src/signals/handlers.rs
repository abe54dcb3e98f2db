//! Axum route handlers for the signal pipeline and company rankings.

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::company::ScoredCompany;
use crate::signals::pipeline::{FullRunSummary, IngestSummary, ScoringSummary};
use crate::state::AppState;

const DEFAULT_TOP_LIMIT: i64 = 20;
const MAX_TOP_LIMIT: i64 = 100;

#[derive(Debug, Default, Deserialize)]
pub struct IngestRequest {
    pub days_back: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct ScoreRequest {
    pub user_id: Uuid,
    pub days_back: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct TopCompaniesQuery {
    pub user_id: Uuid,
    pub limit: Option<i64>,
}

fn positive_days(days: Option<i64>, default: i64) -> Result<i64, AppError> {
    match days {
        None => Ok(default),
        Some(d) if d > 0 => Ok(d),
        Some(d) => Err(AppError::Validation(format!(
            "days_back must be positive, got {d}"
        ))),
    }
}

/// POST /api/v1/signals/ingest
pub async fn handle_ingest(
    State(state): State<AppState>,
    body: Option<Json<IngestRequest>>,
) -> Result<Json<IngestSummary>, AppError> {
    let request = body.map(|Json(r)| r).unwrap_or_default();
    let days = positive_days(request.days_back, state.config.news_days_back)?;
    Ok(Json(state.pipeline.ingest_news(days).await))
}

/// POST /api/v1/signals/score
pub async fn handle_score(
    State(state): State<AppState>,
    Json(request): Json<ScoreRequest>,
) -> Result<Json<ScoringSummary>, AppError> {
    let days = positive_days(request.days_back, state.config.score_days_back)?;
    Ok(Json(
        state.pipeline.score_companies(request.user_id, days).await,
    ))
}

/// POST /api/v1/signals/run
///
/// Ingest followed by scoring, using the configured look-back windows.
pub async fn handle_run_full(
    State(state): State<AppState>,
    Json(request): Json<ScoreRequest>,
) -> Result<Json<FullRunSummary>, AppError> {
    let score_days = positive_days(request.days_back, state.config.score_days_back)?;
    let summary = state
        .pipeline
        .run_full(request.user_id, state.config.news_days_back, score_days)
        .await;
    Ok(Json(summary))
}

/// GET /api/v1/companies/top?user_id=&limit=
pub async fn handle_top_companies(
    State(state): State<AppState>,
    Query(query): Query<TopCompaniesQuery>,
) -> Result<Json<Vec<ScoredCompany>>, AppError> {
    let limit = query.limit.unwrap_or(DEFAULT_TOP_LIMIT).clamp(1, MAX_TOP_LIMIT);
    let companies = state
        .store
        .get_top_company_scores(query.user_id, limit)
        .await?;
    Ok(Json(companies))
}
