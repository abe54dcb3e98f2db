use std::collections::BTreeSet;

use async_trait::async_trait;
use serde_json::{json, Value};

use super::{required_uuid, str_arg, AgentTool, ToolContext, ToolError};
use crate::matching::job_matcher::match_job;
use crate::models::job::Job;
use crate::models::profile::WorkMode;

/// How many recent postings `search_jobs` filters over.
const SEARCH_WINDOW: i64 = 200;
const DEFAULT_LIMIT: usize = 10;
const MAX_LIMIT: usize = 25;
const MAX_COMPARE: usize = 10;

/// A non-negative integer, including floats with no fractional part (`3.0`).
fn whole_number(value: &Value) -> Option<u64> {
    value.as_u64().or_else(|| {
        value
            .as_f64()
            .filter(|f| *f >= 0.0 && f.fract() == 0.0)
            .map(|f| f as u64)
    })
}

fn job_summary(job: &Job) -> Value {
    json!({
        "id": job.id,
        "title": job.title,
        "company": job.company,
        "location": job.location,
        "remote_type": job.remote_type,
        "salary_min": job.salary_min,
        "salary_max": job.salary_max,
    })
}

fn contains_ci(haystack: Option<&str>, needle: &str) -> bool {
    haystack.is_some_and(|h| h.to_lowercase().contains(needle))
}

// ────────────────────────────────────────────────────────────────────────────
// search_jobs
// ────────────────────────────────────────────────────────────────────────────

pub struct SearchJobs;

#[async_trait]
impl AgentTool for SearchJobs {
    fn name(&self) -> &'static str {
        "search_jobs"
    }

    fn description(&self) -> &'static str {
        "Search open jobs by title, company or description keywords. \
         Results include a match score against the user's profile when one exists."
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "query": { "type": "string", "description": "Keywords matched against title, company and description" },
                "location": { "type": "string", "description": "Location filter" },
                "remote_only": { "type": "boolean", "description": "Only remote or hybrid jobs" },
                "limit": { "type": "integer", "description": "Max results (default 10, max 25)" }
            },
            "required": ["query"]
        })
    }

    async fn execute(&self, args: &Value, ctx: &ToolContext<'_>) -> Result<Value, ToolError> {
        let query = str_arg(args, "query")
            .ok_or_else(|| ToolError::InvalidArguments("'query' must not be blank".into()))?
            .to_lowercase();
        let location = str_arg(args, "location").map(str::to_lowercase);
        let remote_only = args.get("remote_only").and_then(Value::as_bool).unwrap_or(false);
        let limit = args
            .get("limit")
            .and_then(whole_number)
            .map(|n| (n as usize).clamp(1, MAX_LIMIT))
            .unwrap_or(DEFAULT_LIMIT);

        let jobs = ctx.store.list_jobs(SEARCH_WINDOW, 0).await?;
        let matching: Vec<&Job> = jobs
            .iter()
            .filter(|j| {
                j.title.to_lowercase().contains(&query)
                    || j.company.to_lowercase().contains(&query)
                    || contains_ci(j.description.as_deref(), &query)
            })
            .filter(|j| {
                location
                    .as_deref()
                    .map_or(true, |loc| contains_ci(j.location.as_deref(), loc))
            })
            .filter(|j| {
                !remote_only || matches!(j.remote_type, Some(WorkMode::Remote | WorkMode::Hybrid))
            })
            .collect();

        let results: Vec<Value> = matching
            .iter()
            .take(limit)
            .map(|job| {
                let mut summary = job_summary(job);
                if let Some(profile) = &ctx.user.profile {
                    let score = match_job(profile, job);
                    summary["match_score"] = json!(score.total_score);
                    summary["match_category"] = json!(score.match_category);
                }
                summary
            })
            .collect();

        Ok(json!({ "count": matching.len(), "jobs": results }))
    }
}

// ────────────────────────────────────────────────────────────────────────────
// analyze_job
// ────────────────────────────────────────────────────────────────────────────

pub struct AnalyzeJob;

#[async_trait]
impl AgentTool for AnalyzeJob {
    fn name(&self) -> &'static str {
        "analyze_job"
    }

    fn description(&self) -> &'static str {
        "Full details of one job and how well it matches the user's profile."
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "job_id": { "type": "string", "description": "Job id to analyze" }
            },
            "required": ["job_id"]
        })
    }

    async fn execute(&self, args: &Value, ctx: &ToolContext<'_>) -> Result<Value, ToolError> {
        let job_id = required_uuid(args, "job_id")?;
        let job = ctx
            .store
            .get_job_by_id(job_id)
            .await?
            .ok_or_else(|| ToolError::NotFound("Job not found".into()))?;

        let match_analysis = ctx.user.profile.as_ref().map(|p| match_job(p, &job));

        Ok(json!({
            "job": {
                "id": job.id,
                "title": job.title,
                "company": job.company,
                "description": job.description,
                "location": job.location,
                "remote_type": job.remote_type,
                "employment_type": job.employment_type,
                "salary_min": job.salary_min,
                "salary_max": job.salary_max,
                "industry": job.industry,
                "required_skills": job.required_skills,
                "experience_required": job.experience_required,
                "url": job.url,
            },
            "match_analysis": match_analysis,
        }))
    }
}

// ────────────────────────────────────────────────────────────────────────────
// compare_jobs
// ────────────────────────────────────────────────────────────────────────────

pub struct CompareJobs;

#[async_trait]
impl AgentTool for CompareJobs {
    fn name(&self) -> &'static str {
        "compare_jobs"
    }

    fn description(&self) -> &'static str {
        "Compare several jobs side by side: salary, location, remote options and industry."
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "job_ids": {
                    "type": "array",
                    "items": { "type": "string" },
                    "description": "Job ids to compare (max 10)"
                }
            },
            "required": ["job_ids"]
        })
    }

    async fn execute(&self, args: &Value, ctx: &ToolContext<'_>) -> Result<Value, ToolError> {
        let ids = args
            .get("job_ids")
            .and_then(Value::as_array)
            .ok_or_else(|| ToolError::InvalidArguments("'job_ids' must be an array".into()))?;
        if ids.len() > MAX_COMPARE {
            return Err(ToolError::InvalidArguments(format!(
                "at most {MAX_COMPARE} jobs can be compared"
            )));
        }

        let mut jobs = Vec::with_capacity(ids.len());
        for raw in ids.iter().filter_map(Value::as_str) {
            let Ok(id) = uuid::Uuid::parse_str(raw.trim()) else {
                continue;
            };
            if let Some(job) = ctx.store.get_job_by_id(id).await? {
                jobs.push(job);
            }
        }

        let comparison: Vec<Value> = jobs
            .iter()
            .map(|j| {
                let mut summary = job_summary(j);
                summary["employment_type"] = json!(j.employment_type);
                summary["industry"] = json!(j.industry);
                summary
            })
            .collect();

        let salary_min = jobs.iter().filter_map(|j| j.salary_min).min();
        let salary_max = jobs.iter().filter_map(|j| j.salary_max).max();
        let locations: BTreeSet<&str> = jobs.iter().filter_map(|j| j.location.as_deref()).collect();
        let remote_options: BTreeSet<&str> = jobs
            .iter()
            .filter_map(|j| j.remote_type.map(|m| m.as_str()))
            .collect();

        Ok(json!({
            "comparison": comparison,
            "summary": {
                "total_jobs": jobs.len(),
                "salary_range": { "min": salary_min, "max": salary_max },
                "locations": locations,
                "remote_options": remote_options,
            }
        }))
    }
}
