//! Axum route handlers for job matching.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;
use crate::matching::job_matcher::{match_job, MatchScore};
use crate::matching::refresh::{refresh_matches, MatchRefreshSummary};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct UserQuery {
    pub user_id: Uuid,
}

#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub user_id: Uuid,
}

#[derive(Debug, Serialize)]
pub struct JobMatchResponse {
    pub job_id: Uuid,
    pub job_title: String,
    pub company: String,
    pub score: MatchScore,
}

/// GET /api/v1/jobs/:id/match?user_id=
///
/// Live score of one job against the user's profile. Nothing is stored.
pub async fn handle_job_match(
    State(state): State<AppState>,
    Path(job_id): Path<Uuid>,
    Query(query): Query<UserQuery>,
) -> Result<Json<JobMatchResponse>, AppError> {
    let profile = state
        .store
        .get_profile_by_user_id(query.user_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("No profile for user {}", query.user_id)))?;
    let job = state
        .store
        .get_job_by_id(job_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Job {job_id} not found")))?;

    let score = match_job(&profile, &job);
    Ok(Json(JobMatchResponse {
        job_id: job.id,
        job_title: job.title,
        company: job.company,
        score,
    }))
}

/// POST /api/v1/matches/refresh
pub async fn handle_refresh_matches(
    State(state): State<AppState>,
    Json(request): Json<RefreshRequest>,
) -> Result<Json<MatchRefreshSummary>, AppError> {
    let summary = refresh_matches(state.store.as_ref(), request.user_id).await?;
    Ok(Json(summary))
}
