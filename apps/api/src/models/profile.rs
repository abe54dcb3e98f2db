use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Work arrangement, used both as a candidate preference and a job attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WorkMode {
    #[serde(rename = "remote")]
    Remote,
    #[serde(rename = "hybrid")]
    Hybrid,
    #[serde(rename = "on-site")]
    OnSite,
}

impl WorkMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            WorkMode::Remote => "remote",
            WorkMode::Hybrid => "hybrid",
            WorkMode::OnSite => "on-site",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "remote" => Some(WorkMode::Remote),
            "hybrid" => Some(WorkMode::Hybrid),
            "on-site" | "onsite" | "on_site" => Some(WorkMode::OnSite),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorkHistoryEntry {
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub duration: String,
    #[serde(default)]
    pub description: String,
}

/// Candidate profile. Every list is typed; the store decodes the serialized
/// columns and substitutes an empty list for anything unreadable.
///
/// `skills`, `preferred_locations` and `preferred_industries` keep "never
/// stored" (`None`) apart from a stored empty list, which the job matcher
/// scores differently.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Profile {
    pub user_id: Uuid,
    pub current_title: Option<String>,
    pub years_of_experience: Option<i32>,
    pub skills: Option<Vec<String>>,
    pub languages: Vec<String>,
    pub certifications: Vec<String>,
    pub degree: Option<String>,
    pub field: Option<String>,
    pub university: Option<String>,
    pub preferred_job_titles: Vec<String>,
    pub preferred_industries: Option<Vec<String>>,
    pub preferred_locations: Option<Vec<String>>,
    pub employment_types: Vec<String>,
    pub salary_min: Option<i32>,
    pub salary_max: Option<i32>,
    pub remote_preference: Option<WorkMode>,
    pub work_history: Vec<WorkHistoryEntry>,
    pub target_functions: Vec<String>,
}
