use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::profile::WorkMode;

/// A job posting as read from the datastore. List fields are already decoded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Job {
    pub id: Uuid,
    pub company_id: Option<Uuid>,
    pub title: String,
    pub company: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub salary_min: Option<i32>,
    pub salary_max: Option<i32>,
    pub employment_type: Option<String>,
    pub remote_type: Option<WorkMode>,
    pub industry: Option<String>,
    /// `None` when the posting carries no skill data at all.
    pub required_skills: Option<Vec<String>>,
    pub experience_required: Option<i32>,
    pub function_type: Option<String>,
    pub seniority_level: Option<String>,
    /// Precomputed employer rating, 0 – 100.
    pub company_rating: Option<i32>,
    pub posted_at: Option<DateTime<Utc>>,
    pub expires_at: Option<DateTime<Utc>>,
    pub url: Option<String>,
}

/// A stored (user, job) match joined with the job's headline fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobMatchSummary {
    pub job_id: Uuid,
    pub job_title: String,
    pub company: String,
    pub total_score: u32,
    pub skill_score: u32,
    pub experience_score: u32,
    pub location_score: u32,
    pub match_category: String,
}
