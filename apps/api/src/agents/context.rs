//! Context assembler: a fresh, prompt-ready snapshot of one user's data.
//!
//! Every fetch is independent: a failing source is logged and left empty, and
//! a company whose events cannot be read is dropped from the list. `build`
//! therefore always returns a context.

use std::sync::Arc;

use serde::Serialize;
use tracing::warn;
use uuid::Uuid;

use crate::models::company::{Company, CompanyScore};
use crate::models::event::CompanyEvent;
use crate::models::job::{Job, JobMatchSummary};
use crate::models::profile::Profile;
use crate::store::Store;

const MATCH_LIMIT: i64 = 20;
const COMPANY_LIMIT: i64 = 10;
const EVENTS_PER_COMPANY: i64 = 5;

const NOT_PROVIDED: &str = "not yet provided";

#[derive(Debug, Clone, Serialize)]
pub struct CompanyContext {
    pub company: Company,
    pub score: CompanyScore,
    pub recent_events: Vec<CompanyEvent>,
}

#[derive(Debug, Clone, Serialize)]
pub struct UserContext {
    pub user_id: Uuid,
    pub profile: Option<Profile>,
    pub saved_jobs: Vec<Job>,
    pub top_matches: Vec<JobMatchSummary>,
    pub companies: Vec<CompanyContext>,
}

impl UserContext {
    #[cfg(test)]
    pub fn empty(user_id: Uuid) -> Self {
        Self {
            user_id,
            profile: None,
            saved_jobs: vec![],
            top_matches: vec![],
            companies: vec![],
        }
    }
}

#[derive(Clone)]
pub struct ContextAssembler {
    store: Arc<dyn Store>,
}

impl ContextAssembler {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    pub async fn build(&self, user_id: Uuid) -> UserContext {
        let profile = self
            .store
            .get_profile_by_user_id(user_id)
            .await
            .unwrap_or_else(|e| {
                warn!("Context: profile fetch failed for {user_id}: {e}");
                None
            });

        let saved_jobs = self
            .store
            .get_saved_jobs_by_user_id(user_id)
            .await
            .unwrap_or_else(|e| {
                warn!("Context: saved jobs fetch failed for {user_id}: {e}");
                vec![]
            });

        let top_matches = self
            .store
            .get_matches_by_user_id(user_id, MATCH_LIMIT)
            .await
            .unwrap_or_else(|e| {
                warn!("Context: matches fetch failed for {user_id}: {e}");
                vec![]
            });

        let scored = self
            .store
            .get_top_company_scores(user_id, COMPANY_LIMIT)
            .await
            .unwrap_or_else(|e| {
                warn!("Context: company scores fetch failed for {user_id}: {e}");
                vec![]
            });

        let mut companies = Vec::with_capacity(scored.len());
        for entry in scored {
            match self
                .store
                .get_events_by_company_id(entry.company.id, EVENTS_PER_COMPANY)
                .await
            {
                Ok(recent_events) => companies.push(CompanyContext {
                    company: entry.company,
                    score: entry.score,
                    recent_events,
                }),
                Err(e) => warn!("Context: dropping '{}', events unavailable: {e}", entry.company.name),
            }
        }

        UserContext {
            user_id,
            profile,
            saved_jobs,
            top_matches,
            companies,
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Rendering
// ────────────────────────────────────────────────────────────────────────────

fn list_or_placeholder(values: &[String]) -> String {
    if values.is_empty() {
        NOT_PROVIDED.to_string()
    } else {
        values.join(", ")
    }
}

fn or_placeholder<T: ToString>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_else(|| NOT_PROVIDED.to_string())
}

fn salary_range(min: Option<i32>, max: Option<i32>) -> String {
    match (min, max) {
        (Some(min), Some(max)) => format!("{min}-{max} €"),
        (Some(min), None) => format!("from {min} €"),
        (None, Some(max)) => format!("up to {max} €"),
        (None, None) => "salary unknown".to_string(),
    }
}

/// Renders the context as the grounding block of the system prompt. Every
/// section is always present.
pub fn format_context(context: &UserContext) -> String {
    let mut out = String::new();

    out.push_str("## User profile\n");
    match &context.profile {
        Some(p) => {
            let experience = p
                .years_of_experience
                .map(|y| format!("{y} years"))
                .unwrap_or_else(|| NOT_PROVIDED.to_string());
            let salary = if p.salary_min.is_none() && p.salary_max.is_none() {
                NOT_PROVIDED.to_string()
            } else {
                salary_range(p.salary_min, p.salary_max)
            };
            let skills = p.skills.as_deref().unwrap_or_default();
            let locations = p.preferred_locations.as_deref().unwrap_or_default();

            out.push_str(&format!("- Current title: {}\n", or_placeholder(p.current_title.as_deref())));
            out.push_str(&format!("- Experience: {experience}\n"));
            out.push_str(&format!("- Skills: {}\n", list_or_placeholder(skills)));
            out.push_str(&format!("- Languages: {}\n", list_or_placeholder(&p.languages)));
            out.push_str(&format!(
                "- Education: {} - {}\n",
                or_placeholder(p.degree.as_deref()),
                or_placeholder(p.field.as_deref())
            ));
            out.push_str(&format!("- Target titles: {}\n", list_or_placeholder(&p.preferred_job_titles)));
            out.push_str(&format!("- Preferred locations: {}\n", list_or_placeholder(locations)));
            out.push_str(&format!("- Salary expectation: {salary}\n"));
            out.push_str(&format!(
                "- Remote preference: {}\n",
                or_placeholder(p.remote_preference.map(|m| m.as_str()))
            ));
            if !p.work_history.is_empty() {
                out.push_str("\n### Work history\n");
                for entry in p.work_history.iter().take(3) {
                    out.push_str(&format!("- {} @ {} ({})\n", entry.title, entry.company, entry.duration));
                }
            }
        }
        None => out.push_str(&format!("Profile {NOT_PROVIDED}.\n")),
    }

    out.push_str("\n## Top job matches\n");
    if context.top_matches.is_empty() {
        out.push_str(&format!("Job matches {NOT_PROVIDED}.\n"));
    }
    for m in context.top_matches.iter().take(5) {
        out.push_str(&format!(
            "- {} @ {} - score {}% ({})\n",
            m.job_title, m.company, m.total_score, m.match_category
        ));
    }

    out.push_str(&format!("\n## Saved jobs ({})\n", context.saved_jobs.len()));
    if context.saved_jobs.is_empty() {
        out.push_str(&format!("Saved jobs {NOT_PROVIDED}.\n"));
    }
    for job in context.saved_jobs.iter().take(5) {
        out.push_str(&format!(
            "- {} @ {} ({}) - {}\n",
            job.title,
            job.company,
            job.location.as_deref().unwrap_or("?"),
            salary_range(job.salary_min, job.salary_max)
        ));
    }

    out.push_str("\n## Companies with hiring signals\n");
    if context.companies.is_empty() {
        out.push_str(&format!("Company signals {NOT_PROVIDED}.\n"));
    }
    for c in context.companies.iter().take(5) {
        out.push_str(&format!(
            "- {} ({}) - score {:.0}%\n",
            c.company.name,
            c.company.industry.as_deref().unwrap_or("?"),
            c.score.combined_score
        ));
        if !c.recent_events.is_empty() {
            out.push_str("  Latest signals:\n");
            for event in c.recent_events.iter().take(2) {
                out.push_str(&format!("  - [{}] {}\n", event.event_type.as_str(), event.headline));
            }
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matching::job_matcher::match_job;
    use crate::models::event::{BusinessFunction, EventType};
    use crate::store::memory::{self, MemoryStore};
    use chrono::Utc;

    fn seeded_store(user_id: Uuid) -> (Arc<MemoryStore>, Company) {
        let store = Arc::new(MemoryStore::new());
        let profile = Profile {
            user_id,
            current_title: Some("Backend Developer".into()),
            skills: Some(vec!["Rust".into(), "SQL".into()]),
            ..Default::default()
        };
        store.put_profile(profile.clone());

        let mut job = memory::job("Rust Engineer", "Oura");
        job.required_skills = Some(vec!["rust".into()]);
        store.put_job(job.clone());
        store.save_job(user_id, job.id);

        let company = memory::company("Oura");
        store.put_company(company.clone());
        store.put_event(CompanyEvent {
            id: Uuid::new_v4(),
            company_id: company.id,
            event_type: EventType::Funding,
            headline: "Oura keräsi rahoitusta".into(),
            summary: String::new(),
            source_url: String::new(),
            impact_strength: 4,
            function_focus: vec![BusinessFunction::Finance],
            affected_count: None,
            confidence: 0.9,
            published_at: Utc::now(),
            created_at: Utc::now(),
        });
        (store, company)
    }

    async fn seed_scores(store: &MemoryStore, user_id: Uuid, company: &Company) {
        let profile = store.get_profile_by_user_id(user_id).await.unwrap().unwrap();
        let job = store.list_jobs(1, 0).await.unwrap().remove(0);
        store
            .upsert_job_match(user_id, job.id, &match_job(&profile, &job))
            .await
            .unwrap();
        store
            .upsert_company_score(&CompanyScore {
                company_id: company.id,
                user_id,
                talent_need_score: 40,
                profile_match_score: 20,
                combined_score: 30.0,
                reasons: vec!["Funding round (impact 4/5)".into()],
            })
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_build_collects_all_sources() {
        let user_id = Uuid::new_v4();
        let (store, company) = seeded_store(user_id);
        seed_scores(&store, user_id, &company).await;

        let context = ContextAssembler::new(store).build(user_id).await;
        assert!(context.profile.is_some());
        assert_eq!(context.saved_jobs.len(), 1);
        assert_eq!(context.top_matches.len(), 1);
        assert_eq!(context.companies.len(), 1);
        assert_eq!(context.companies[0].recent_events.len(), 1);

        let text = format_context(&context);
        assert!(text.contains("Backend Developer"));
        assert!(text.contains("Rust Engineer @ Oura"));
        assert!(text.contains("[funding] Oura keräsi rahoitusta"));
    }

    #[tokio::test]
    async fn test_each_source_fails_independently() {
        let user_id = Uuid::new_v4();
        let (store, company) = seeded_store(user_id);
        seed_scores(&store, user_id, &company).await;
        store.fail_on("get_profile_by_user_id");
        store.fail_on("get_matches_by_user_id");

        let context = ContextAssembler::new(store).build(user_id).await;
        assert!(context.profile.is_none());
        assert!(context.top_matches.is_empty());
        assert_eq!(context.saved_jobs.len(), 1);
        assert_eq!(context.companies.len(), 1);
    }

    #[tokio::test]
    async fn test_event_failure_drops_company_only() {
        let user_id = Uuid::new_v4();
        let (store, company) = seeded_store(user_id);
        seed_scores(&store, user_id, &company).await;
        store.fail_on("get_events_by_company_id");

        let context = ContextAssembler::new(store).build(user_id).await;
        assert!(context.companies.is_empty());
        assert_eq!(context.saved_jobs.len(), 1);
    }

    #[test]
    fn test_empty_context_renders_placeholders() {
        let text = format_context(&UserContext::empty(Uuid::new_v4()));
        assert!(text.contains("## User profile"));
        assert!(text.contains("Profile not yet provided."));
        assert!(text.contains("Job matches not yet provided."));
        assert!(text.contains("Saved jobs not yet provided."));
        assert!(text.contains("Company signals not yet provided."));
    }

    #[test]
    fn test_partial_profile_renders_field_placeholders() {
        let mut context = UserContext::empty(Uuid::new_v4());
        context.profile = Some(Profile {
            skills: Some(vec!["Python".into()]),
            salary_min: Some(4500),
            ..Default::default()
        });
        let text = format_context(&context);
        assert!(text.contains("- Skills: Python"));
        assert!(text.contains("- Current title: not yet provided"));
        assert!(text.contains("- Salary expectation: from 4500 €"));
    }
}
