//! Job Matcher: weighted compatibility between one candidate profile and one job.
//!
//! Pure and total. Every sub-score degrades to a fixed neutral value when the
//! data it needs is missing, so `match_job` never fails.
//!
//! | Sub-score  | Weight | Missing data |
//! |------------|--------|--------------|
//! | skill      | 0.30   | 50           |
//! | experience | 0.20   | 70           |
//! | location   | 0.15   | 50           |
//! | salary     | 0.15   | 70           |
//! | industry   | 0.10   | 60           |
//! | company    | 0.10   | 70           |

use serde::{Deserialize, Serialize};

use crate::models::job::Job;
use crate::models::profile::{Profile, WorkMode};

const SKILL_WEIGHT: f64 = 0.30;
const EXPERIENCE_WEIGHT: f64 = 0.20;
const LOCATION_WEIGHT: f64 = 0.15;
const SALARY_WEIGHT: f64 = 0.15;
const INDUSTRY_WEIGHT: f64 = 0.10;
const COMPANY_WEIGHT: f64 = 0.10;

/// Minimum total for a match row to be stored by the refresh pass.
pub const STORE_THRESHOLD: u32 = 30;

// ────────────────────────────────────────────────────────────────────────────
// Output
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchCategory {
    Perfect,
    Good,
    Fair,
    Possible,
    Weak,
}

impl MatchCategory {
    /// Inclusive lower bounds, evaluated top-down.
    pub fn from_score(total: u32) -> Self {
        match total {
            90.. => MatchCategory::Perfect,
            70..=89 => MatchCategory::Good,
            50..=69 => MatchCategory::Fair,
            30..=49 => MatchCategory::Possible,
            _ => MatchCategory::Weak,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MatchCategory::Perfect => "perfect",
            MatchCategory::Good => "good",
            MatchCategory::Fair => "fair",
            MatchCategory::Possible => "possible",
            MatchCategory::Weak => "weak",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchScore {
    pub total_score: u32,
    pub skill_score: u32,
    pub experience_score: u32,
    pub location_score: u32,
    pub salary_score: u32,
    pub industry_score: u32,
    pub company_score: u32,
    pub match_category: MatchCategory,
}

// ────────────────────────────────────────────────────────────────────────────
// Entry point
// ────────────────────────────────────────────────────────────────────────────

pub fn match_job(profile: &Profile, job: &Job) -> MatchScore {
    let skill_score = skill_match(profile, job);
    let experience_score = experience_match(profile, job);
    let location_score = location_match(profile, job);
    let salary_score = salary_match(profile, job);
    let industry_score = industry_match(profile, job);
    let company_score = company_match(job);

    let weighted = skill_score as f64 * SKILL_WEIGHT
        + experience_score as f64 * EXPERIENCE_WEIGHT
        + location_score as f64 * LOCATION_WEIGHT
        + salary_score as f64 * SALARY_WEIGHT
        + industry_score as f64 * INDUSTRY_WEIGHT
        + company_score as f64 * COMPANY_WEIGHT;
    let total_score = (weighted.round() as u32).min(100);

    MatchScore {
        total_score,
        skill_score,
        experience_score,
        location_score,
        salary_score,
        industry_score,
        company_score,
        match_category: MatchCategory::from_score(total_score),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Sub-scores
// ────────────────────────────────────────────────────────────────────────────

fn normalize(values: &[String]) -> Vec<String> {
    values
        .iter()
        .map(|v| v.trim().to_lowercase())
        .filter(|v| !v.is_empty())
        .collect()
}

/// Substring containment in either direction.
fn overlaps(a: &str, b: &str) -> bool {
    a.contains(b) || b.contains(a)
}

/// Only a list that was never stored is neutral. A stored empty list is real
/// data and scores as "nothing matches".
fn skill_match(profile: &Profile, job: &Job) -> u32 {
    let (Some(user_skills), Some(required)) =
        (profile.skills.as_deref(), job.required_skills.as_deref())
    else {
        return 50;
    };
    let required = normalize(required);
    if required.is_empty() {
        return 70;
    }
    let user_skills = normalize(user_skills);

    let matched = required
        .iter()
        .filter(|skill| user_skills.iter().any(|user| overlaps(user, skill)))
        .count();
    let pct = matched as f64 / required.len() as f64 * 100.0;
    (pct.round() as u32).min(100)
}

fn experience_match(profile: &Profile, job: &Job) -> u32 {
    // Zero years counts as "not provided" on either side.
    let (Some(user), Some(required)) = (
        profile.years_of_experience.filter(|y| *y > 0),
        job.experience_required.filter(|y| *y > 0),
    ) else {
        return 70;
    };

    if user >= required {
        match user - required {
            0..=2 => 100,
            3..=5 => 90,
            _ => 80,
        }
    } else {
        match required - user {
            1 => 80,
            2 => 60,
            _ => 40,
        }
    }
}

fn location_match(profile: &Profile, job: &Job) -> u32 {
    match (profile.remote_preference, job.remote_type) {
        (Some(WorkMode::Remote), Some(WorkMode::Remote)) => return 100,
        (Some(WorkMode::Hybrid), Some(WorkMode::Hybrid | WorkMode::Remote)) => return 90,
        (Some(WorkMode::OnSite), Some(WorkMode::OnSite)) => return 100,
        _ => {}
    }

    let preferred = profile.preferred_locations.as_deref().map(normalize);
    let job_location = job
        .location
        .as_deref()
        .map(|l| l.trim().to_lowercase())
        .filter(|l| !l.is_empty());
    match (job_location, preferred) {
        (Some(location), Some(preferred)) => {
            if preferred.iter().any(|p| overlaps(&location, p)) {
                90
            } else {
                30
            }
        }
        _ => 50,
    }
}

fn salary_match(profile: &Profile, job: &Job) -> u32 {
    let (Some(user_min), Some(job_min)) = (
        profile.salary_min.filter(|s| *s > 0),
        job.salary_min.filter(|s| *s > 0),
    ) else {
        return 70;
    };

    let user_min = user_min as f64;
    let user_max = profile
        .salary_max
        .filter(|s| *s > 0)
        .map(|s| s as f64)
        .unwrap_or(user_min * 1.5);
    let job_min = job_min as f64;
    let job_max = job
        .salary_max
        .filter(|s| *s > 0)
        .map(|s| s as f64)
        .unwrap_or(job_min * 1.2);

    if job_max >= user_min && job_min <= user_max {
        let user_range = user_max - user_min;
        if user_range <= 0.0 {
            return 100;
        }
        let overlap = job_max.min(user_max) - job_min.max(user_min);
        let pct = overlap / user_range * 100.0;
        (pct.round().max(0.0) as u32).min(100)
    } else if job_min > user_max {
        100
    } else {
        let deficit = user_min - job_max;
        let pct = deficit / user_min * 100.0;
        (100.0 - pct).round().max(0.0) as u32
    }
}

fn industry_match(profile: &Profile, job: &Job) -> u32 {
    let preferred = profile.preferred_industries.as_deref().map(normalize);
    let industry = job
        .industry
        .as_deref()
        .map(|i| i.trim().to_lowercase())
        .filter(|i| !i.is_empty());
    match (industry, preferred) {
        (Some(industry), Some(preferred)) => {
            if preferred.iter().any(|p| overlaps(&industry, p)) {
                100
            } else {
                40
            }
        }
        _ => 60,
    }
}

fn company_match(job: &Job) -> u32 {
    match job.company_rating.filter(|r| *r > 0) {
        Some(rating) => rating.clamp(0, 100) as u32,
        None => 70,
    }
}
