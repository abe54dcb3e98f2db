use async_trait::async_trait;
use serde_json::{json, Value};

use super::{str_arg, uuid_arg, AgentTool, ToolContext, ToolError};
use crate::signals::company_scoring::{format_company_report, score_company};

const EVENT_LIMIT: i64 = 10;
const JOB_LIMIT: i64 = 20;

pub struct AnalyzeCompany;

#[async_trait]
impl AgentTool for AnalyzeCompany {
    fn name(&self) -> &'static str {
        "analyze_company"
    }

    fn description(&self) -> &'static str {
        "Company profile with recent news signals, open positions and a fresh \
         hiring score for this user. Look up by id or by exact name."
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "company_name": { "type": "string", "description": "Company name" },
                "company_id": { "type": "string", "description": "Company id, if known" }
            },
            "required": []
        })
    }

    async fn execute(&self, args: &Value, ctx: &ToolContext<'_>) -> Result<Value, ToolError> {
        let company = match (uuid_arg(args, "company_id")?, str_arg(args, "company_name")) {
            (Some(id), _) => ctx.store.get_company_by_id(id).await?,
            (None, Some(name)) => ctx.store.get_company_by_name(name).await?,
            (None, None) => {
                return Err(ToolError::InvalidArguments(
                    "provide 'company_id' or 'company_name'".into(),
                ))
            }
        };
        let company = company.ok_or_else(|| {
            ToolError::NotFound(
                "Company not found. Try searching for jobs from this company instead.".into(),
            )
        })?;

        let events = ctx.store.get_events_by_company_id(company.id, EVENT_LIMIT).await?;
        let jobs = ctx.store.get_jobs_by_company_id(company.id, JOB_LIMIT).await?;

        let score = score_company(
            &company,
            &events,
            &jobs,
            ctx.user.profile.as_ref(),
            ctx.user.user_id,
        );
        let report = format_company_report(&company, &score, &events, &jobs);

        Ok(json!({
            "company": company,
            "signals": {
                "total_events": events.len(),
                "events": events.iter().map(|e| json!({
                    "type": e.event_type,
                    "headline": e.headline,
                    "impact": e.impact_strength,
                    "date": e.published_at,
                })).collect::<Vec<_>>(),
            },
            "hiring": {
                "open_positions": jobs.len(),
                "positions": jobs.iter().take(5).map(|j| json!({
                    "title": j.title,
                    "location": j.location,
                    "remote_type": j.remote_type,
                })).collect::<Vec<_>>(),
            },
            "score": {
                "talent_need": score.talent_need_score,
                "profile_match": score.profile_match_score,
                "combined": score.combined_score,
                "reasons": score.reasons,
            },
            "report": report,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agents::context::UserContext;
    use crate::models::event::{BusinessFunction, CompanyEvent, EventType};
    use crate::store::memory::{self, MemoryStore};
    use chrono::Utc;
    use uuid::Uuid;

    fn seeded() -> (MemoryStore, uuid::Uuid) {
        let store = MemoryStore::new();
        let company = memory::company("Supercell");
        store.put_event(CompanyEvent {
            id: Uuid::new_v4(),
            company_id: company.id,
            event_type: EventType::Funding,
            headline: "Supercell investoi uuteen studioon".into(),
            summary: String::new(),
            source_url: String::new(),
            impact_strength: 5,
            function_focus: vec![BusinessFunction::Rd],
            affected_count: None,
            confidence: 0.9,
            published_at: Utc::now(),
            created_at: Utc::now(),
        });
        let mut job = memory::job("Game Programmer", "Supercell");
        job.company_id = Some(company.id);
        store.put_job(job);
        let id = company.id;
        store.put_company(company);
        (store, id)
    }

    #[tokio::test]
    async fn test_lookup_by_name_scores_live() {
        let (store, _) = seeded();
        let user = UserContext::empty(Uuid::new_v4());
        let ctx = ToolContext { user: &user, store: &store };

        let result = AnalyzeCompany
            .execute(&json!({"company_name": "supercell"}), &ctx)
            .await
            .unwrap();
        assert_eq!(result["signals"]["total_events"], 1);
        assert_eq!(result["hiring"]["open_positions"], 1);
        // Funding impact 5 → 45, plus one open position → 5.
        assert_eq!(result["score"]["talent_need"], 50);
        assert_eq!(result["score"]["combined"], 50.0);
        assert!(result["report"].as_str().unwrap().contains("Supercell"));
    }

    #[tokio::test]
    async fn test_lookup_by_id() {
        let (store, id) = seeded();
        let user = UserContext::empty(Uuid::new_v4());
        let ctx = ToolContext { user: &user, store: &store };
        let result = AnalyzeCompany
            .execute(&json!({"company_id": id.to_string()}), &ctx)
            .await
            .unwrap();
        assert_eq!(result["company"]["name"], "Supercell");
    }

    #[tokio::test]
    async fn test_missing_identifiers_and_unknown_company() {
        let (store, _) = seeded();
        let user = UserContext::empty(Uuid::new_v4());
        let ctx = ToolContext { user: &user, store: &store };

        let err = AnalyzeCompany.execute(&json!({}), &ctx).await.unwrap_err();
        assert!(matches!(err, ToolError::InvalidArguments(_)));

        let err = AnalyzeCompany
            .execute(&json!({"company_name": "Nokia"}), &ctx)
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::NotFound(_)));
    }
}
