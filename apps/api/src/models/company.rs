use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Company {
    pub id: Uuid,
    pub name: String,
    pub industry: Option<String>,
    pub website: Option<String>,
    pub description: Option<String>,
    pub employee_count: Option<i32>,
    pub headquarters: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Result of one scoring pass for a (company, user) pair. Upserted, never duplicated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompanyScore {
    pub company_id: Uuid,
    pub user_id: Uuid,
    pub talent_need_score: u32,
    pub profile_match_score: u32,
    pub combined_score: f64,
    /// Talent-need reasons first, then profile-match reasons.
    pub reasons: Vec<String>,
}

/// A stored company score joined with its company, ordered by combined score.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredCompany {
    pub company: Company,
    pub score: CompanyScore,
    pub calculated_at: DateTime<Utc>,
}
