//! Batch recomputation of a user's stored (user, job) matches.

use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::matching::job_matcher::{match_job, STORE_THRESHOLD};
use crate::store::Store;

/// Upper bound on jobs scored in one refresh.
const MAX_JOBS_PER_REFRESH: i64 = 500;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MatchRefreshSummary {
    pub jobs_processed: u32,
    pub matches_upserted: u32,
    pub failed: u32,
}

/// Scores recent jobs against the user's profile and upserts every match at or
/// above `STORE_THRESHOLD`. A failing upsert is counted and skipped.
pub async fn refresh_matches(
    store: &dyn Store,
    user_id: Uuid,
) -> Result<MatchRefreshSummary, AppError> {
    let profile = store
        .get_profile_by_user_id(user_id)
        .await?
        .ok_or_else(|| AppError::Validation("Create a profile before matching jobs".into()))?;

    let jobs = store.list_jobs(MAX_JOBS_PER_REFRESH, 0).await?;
    let mut summary = MatchRefreshSummary::default();

    for job in &jobs {
        summary.jobs_processed += 1;
        let score = match_job(&profile, job);
        if score.total_score < STORE_THRESHOLD {
            continue;
        }
        match store.upsert_job_match(user_id, job.id, &score).await {
            Ok(()) => summary.matches_upserted += 1,
            Err(e) => {
                warn!("Failed to store match for job {}: {e}", job.id);
                summary.failed += 1;
            }
        }
    }

    info!(
        "Match refresh for user {user_id}: {} jobs, {} matches, {} failed",
        summary.jobs_processed, summary.matches_upserted, summary.failed
    );
    Ok(summary)
}
