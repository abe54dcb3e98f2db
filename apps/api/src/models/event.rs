use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A news item as delivered by a `NewsSource`, consumed once by the classifier.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawNewsItem {
    pub headline: String,
    pub summary: String,
    pub url: String,
    pub source: String,
    pub published_at: DateTime<Utc>,
}

/// Closed set of company signal types. Wire names match the classification prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    /// Layoff negotiations (YT-neuvottelut) expected to end in redundancies.
    YtLayoff,
    /// Restructuring negotiations without significant redundancies.
    YtRestructure,
    Funding,
    NewUnit,
    Expansion,
    Acquisition,
    StrategyChange,
    LeadershipChange,
    Other,
}

impl EventType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventType::YtLayoff => "yt_layoff",
            EventType::YtRestructure => "yt_restructure",
            EventType::Funding => "funding",
            EventType::NewUnit => "new_unit",
            EventType::Expansion => "expansion",
            EventType::Acquisition => "acquisition",
            EventType::StrategyChange => "strategy_change",
            EventType::LeadershipChange => "leadership_change",
            EventType::Other => "other",
        }
    }

    /// Lenient parse: anything outside the closed set collapses to `Other`.
    pub fn parse_lenient(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "yt_layoff" => EventType::YtLayoff,
            "yt_restructure" => EventType::YtRestructure,
            "funding" => EventType::Funding,
            "new_unit" => EventType::NewUnit,
            "expansion" => EventType::Expansion,
            "acquisition" => EventType::Acquisition,
            "strategy_change" => EventType::StrategyChange,
            "leadership_change" => EventType::LeadershipChange,
            _ => EventType::Other,
        }
    }
}

/// Fixed business-function vocabulary used in `function_focus`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BusinessFunction {
    Marketing,
    Sales,
    It,
    Hr,
    Finance,
    Operations,
    Production,
    Rd,
    Management,
    Other,
}

impl BusinessFunction {
    pub fn as_str(&self) -> &'static str {
        match self {
            BusinessFunction::Marketing => "marketing",
            BusinessFunction::Sales => "sales",
            BusinessFunction::It => "it",
            BusinessFunction::Hr => "hr",
            BusinessFunction::Finance => "finance",
            BusinessFunction::Operations => "operations",
            BusinessFunction::Production => "production",
            BusinessFunction::Rd => "rd",
            BusinessFunction::Management => "management",
            BusinessFunction::Other => "other",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "marketing" => Some(BusinessFunction::Marketing),
            "sales" => Some(BusinessFunction::Sales),
            "it" => Some(BusinessFunction::It),
            "hr" => Some(BusinessFunction::Hr),
            "finance" => Some(BusinessFunction::Finance),
            "operations" => Some(BusinessFunction::Operations),
            "production" => Some(BusinessFunction::Production),
            "rd" | "r&d" => Some(BusinessFunction::Rd),
            "management" => Some(BusinessFunction::Management),
            "other" => Some(BusinessFunction::Other),
            _ => None,
        }
    }
}

/// Output of the classifier. Immutable once persisted.
///
/// Invariants: `impact_strength` in 1..=5, `confidence` in 0.0..=1.0,
/// `summary` at most 500 chars, `function_focus` non-empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifiedEvent {
    pub company_name: String,
    pub event_type: EventType,
    pub impact_strength: u8,
    pub function_focus: Vec<BusinessFunction>,
    pub affected_count: Option<i32>,
    pub confidence: f64,
    pub summary: String,
    pub headline: String,
    pub source_url: String,
    pub published_at: DateTime<Utc>,
}

/// A persisted event attributed to a company.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompanyEvent {
    pub id: Uuid,
    pub company_id: Uuid,
    pub event_type: EventType,
    pub headline: String,
    pub summary: String,
    pub source_url: String,
    pub impact_strength: u8,
    pub function_focus: Vec<BusinessFunction>,
    pub affected_count: Option<i32>,
    pub confidence: f64,
    pub published_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}
