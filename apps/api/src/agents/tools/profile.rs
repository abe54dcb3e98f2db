use std::collections::BTreeMap;

use async_trait::async_trait;
use serde_json::{json, Value};

use super::{str_arg, uuid_arg, AgentTool, ToolContext, ToolError};
use crate::models::job::Job;
use crate::models::profile::Profile;

const SCAN_WINDOW: i64 = 200;
const INDUSTRY_SKILL_LIMIT: usize = 10;

fn has_skill(profile: &Profile, skill: &str) -> bool {
    let skill = skill.trim().to_lowercase();
    profile.skills.iter().flatten().any(|s| {
        let s = s.trim().to_lowercase();
        !s.is_empty() && (s.contains(&skill) || skill.contains(&s))
    })
}

fn missing_skills(profile: &Profile, job: &Job) -> Vec<String> {
    job.required_skills
        .as_deref()
        .unwrap_or_default()
        .iter()
        .filter(|s| !s.trim().is_empty() && !has_skill(profile, s))
        .cloned()
        .collect()
}

// ────────────────────────────────────────────────────────────────────────────
// profile_gaps
// ────────────────────────────────────────────────────────────────────────────

pub struct ProfileGaps;

#[async_trait]
impl AgentTool for ProfileGaps {
    fn name(&self) -> &'static str {
        "profile_gaps"
    }

    fn description(&self) -> &'static str {
        "Find the gaps between the user's profile and a target job or industry: \
         missing skills, missing experience and what to do about them."
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "target_job_id": { "type": "string", "description": "Job to compare against" },
                "target_industry": { "type": "string", "description": "Industry to compare against" }
            },
            "required": []
        })
    }

    async fn execute(&self, args: &Value, ctx: &ToolContext<'_>) -> Result<Value, ToolError> {
        let profile = ctx.user.profile.as_ref().ok_or_else(|| {
            ToolError::NotFound(
                "No profile found. Complete the profile first to get a personalised gap analysis."
                    .into(),
            )
        })?;

        let mut skills: Vec<String> = Vec::new();
        let mut experience = Value::Null;
        let mut recommendations: Vec<String> = Vec::new();

        if let Some(job_id) = uuid_arg(args, "target_job_id")? {
            let job = ctx
                .store
                .get_job_by_id(job_id)
                .await?
                .ok_or_else(|| ToolError::NotFound("Job not found".into()))?;
            skills = missing_skills(profile, &job);

            let required = job.experience_required.filter(|&y| y > 0);
            let current = profile.years_of_experience.filter(|&y| y > 0);
            if let (Some(required), Some(current)) = (required, current) {
                if current < required {
                    experience = json!({
                        "required": required,
                        "current": current,
                        "gap": required - current,
                    });
                    recommendations.push(format!(
                        "You need {} more years of experience. Consider project work or freelance assignments.",
                        required - current
                    ));
                }
            }
        }

        let mut industry = Value::Null;
        if let Some(target) = str_arg(args, "target_industry") {
            let target_lower = target.to_lowercase();
            let jobs = ctx.store.list_jobs(SCAN_WINDOW, 0).await?;
            let in_industry: Vec<&Job> = jobs
                .iter()
                .filter(|j| {
                    j.industry
                        .as_deref()
                        .is_some_and(|i| i.to_lowercase().contains(&target_lower))
                })
                .collect();

            let mut demand: BTreeMap<String, usize> = BTreeMap::new();
            for job in &in_industry {
                for skill in missing_skills(profile, job) {
                    *demand.entry(skill.trim().to_lowercase()).or_default() += 1;
                }
            }
            let mut ranked: Vec<(String, usize)> = demand.into_iter().collect();
            ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
            let industry_gaps: Vec<String> = ranked
                .into_iter()
                .take(INDUSTRY_SKILL_LIMIT)
                .map(|(skill, _)| skill)
                .collect();

            if !profile
                .preferred_industries
                .iter()
                .flatten()
                .any(|p| p.trim().to_lowercase() == target_lower)
            {
                recommendations.push(format!(
                    "{target} is not among your preferred industries yet. Add it to get matching jobs."
                ));
            }
            industry = json!({
                "name": target,
                "jobs_sampled": in_industry.len(),
                "missing_skills": industry_gaps,
            });
        }

        if !skills.is_empty() {
            let top: Vec<&str> = skills.iter().take(5).map(String::as_str).collect();
            recommendations.insert(0, format!("Develop these skills: {}", top.join(", ")));
        }

        Ok(json!({
            "current_profile": {
                "skills": profile.skills,
                "experience": profile.years_of_experience,
                "certifications": profile.certifications,
            },
            "gaps": {
                "skills": skills,
                "experience": experience,
                "industry": industry,
                "recommendations": recommendations,
            }
        }))
    }
}

// ────────────────────────────────────────────────────────────────────────────
// salary_insights
// ────────────────────────────────────────────────────────────────────────────

pub struct SalaryInsights;

#[async_trait]
impl AgentTool for SalaryInsights {
    fn name(&self) -> &'static str {
        "salary_insights"
    }

    fn description(&self) -> &'static str {
        "Salary ranges from current job postings for a role, optionally narrowed by location."
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "title": { "type": "string", "description": "Job title to research" },
                "location": { "type": "string", "description": "Location filter" },
                "experience_years": { "type": "integer", "description": "Years of experience" }
            },
            "required": ["title"]
        })
    }

    async fn execute(&self, args: &Value, ctx: &ToolContext<'_>) -> Result<Value, ToolError> {
        let title = str_arg(args, "title")
            .ok_or_else(|| ToolError::InvalidArguments("'title' must not be blank".into()))?;
        let title_lower = title.to_lowercase();
        let location = str_arg(args, "location");
        let location_lower = location.map(str::to_lowercase);

        let jobs = ctx.store.list_jobs(SCAN_WINDOW, 0).await?;
        let ranges: Vec<(i32, i32)> = jobs
            .iter()
            .filter(|j| j.title.to_lowercase().contains(&title_lower))
            .filter(|j| {
                location_lower.as_deref().map_or(true, |loc| {
                    j.location
                        .as_deref()
                        .is_some_and(|l| l.to_lowercase().contains(loc))
                })
            })
            .filter_map(|j| match (j.salary_min, j.salary_max) {
                (Some(min), Some(max)) if min > 0 && max > 0 => Some((min, max)),
                _ => None,
            })
            .collect();

        if ranges.is_empty() {
            return Ok(json!({
                "message": "Not enough salary data for this role.",
                "suggestion": "Try a broader job title or a different location.",
            }));
        }

        let mut averages: Vec<f64> = ranges
            .iter()
            .map(|&(min, max)| (min as f64 + max as f64) / 2.0)
            .collect();
        let average = (averages.iter().sum::<f64>() / averages.len() as f64).round();
        averages.sort_by(f64::total_cmp);
        let median = averages[averages.len() / 2];

        let years = args
            .get("experience_years")
            .and_then(Value::as_i64)
            .or_else(|| {
                ctx.user
                    .profile
                    .as_ref()
                    .and_then(|p| p.years_of_experience)
                    .map(i64::from)
            })
            .filter(|&y| y > 0);
        let recommendation = years.map(|y| {
            if y > 5 {
                format!("With {y} years of experience you can aim above the average.")
            } else {
                format!("With {y} years of experience the average is a realistic target.")
            }
        });

        Ok(json!({
            "title": title,
            "location": location.unwrap_or("All locations"),
            "sample_size": ranges.len(),
            "salary": {
                "min": ranges.iter().map(|r| r.0).min(),
                "max": ranges.iter().map(|r| r.1).max(),
                "average": average as i64,
                "median": median,
            },
            "recommendation": recommendation,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agents::context::UserContext;
    use crate::store::memory::{self, MemoryStore};
    use uuid::Uuid;

    fn salaried(title: &str, location: &str, min: i32, max: i32) -> Job {
        let mut job = memory::job(title, "Acme");
        job.location = Some(location.into());
        job.salary_min = Some(min);
        job.salary_max = Some(max);
        job
    }

    fn user_with(profile: Profile) -> UserContext {
        let mut user = UserContext::empty(Uuid::new_v4());
        user.profile = Some(profile);
        user
    }

    #[tokio::test]
    async fn test_gaps_require_profile() {
        let store = MemoryStore::new();
        let user = UserContext::empty(Uuid::new_v4());
        let ctx = ToolContext { user: &user, store: &store };
        let err = ProfileGaps.execute(&json!({}), &ctx).await.unwrap_err();
        assert!(matches!(err, ToolError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_gaps_against_job() {
        let store = MemoryStore::new();
        let mut job = memory::job("Platform Engineer", "Wolt");
        job.required_skills = Some(vec!["Rust".into(), "Kubernetes".into(), "go".into()]);
        job.experience_required = Some(5);
        store.put_job(job.clone());

        let user = user_with(Profile {
            skills: Some(vec!["rust".into(), "Golang".into()]),
            years_of_experience: Some(3),
            ..Default::default()
        });
        let ctx = ToolContext { user: &user, store: &store };
        let result = ProfileGaps
            .execute(&json!({"target_job_id": job.id.to_string()}), &ctx)
            .await
            .unwrap();

        assert_eq!(result["gaps"]["skills"], json!(["Kubernetes"]));
        assert_eq!(result["gaps"]["experience"]["gap"], 2);
        let recs = result["gaps"]["recommendations"].as_array().unwrap();
        assert_eq!(recs[0], "Develop these skills: Kubernetes");
        assert_eq!(recs.len(), 2);
    }

    #[tokio::test]
    async fn test_gaps_against_industry() {
        let store = MemoryStore::new();
        for skills in [vec!["SQL", "dbt"], vec!["SQL"], vec!["Python"]] {
            let mut job = memory::job("Analyst", "Nordea");
            job.industry = Some("Finance".into());
            job.required_skills = Some(skills.into_iter().map(String::from).collect());
            store.put_job(job);
        }
        let user = user_with(Profile {
            skills: Some(vec!["Python".into()]),
            ..Default::default()
        });
        let ctx = ToolContext { user: &user, store: &store };
        let result = ProfileGaps
            .execute(&json!({"target_industry": "finance"}), &ctx)
            .await
            .unwrap();
        assert_eq!(result["gaps"]["industry"]["jobs_sampled"], 3);
        assert_eq!(result["gaps"]["industry"]["missing_skills"], json!(["sql", "dbt"]));
    }

    #[tokio::test]
    async fn test_salary_statistics() {
        let store = MemoryStore::new();
        store.put_job(salaried("Senior Developer", "Helsinki", 5000, 7000));
        store.put_job(salaried("Developer", "Tampere", 3000, 4000));
        store.put_job(salaried("Developer", "Helsinki", 4000, 5000));
        store.put_job(memory::job("Developer", "NoSalary"));

        let user = UserContext::empty(Uuid::new_v4());
        let ctx = ToolContext { user: &user, store: &store };
        let result = SalaryInsights
            .execute(&json!({"title": "developer", "experience_years": 7}), &ctx)
            .await
            .unwrap();
        assert_eq!(result["sample_size"], 3);
        assert_eq!(result["salary"]["min"], 3000);
        assert_eq!(result["salary"]["max"], 7000);
        assert_eq!(result["salary"]["average"], 4667);
        assert_eq!(result["salary"]["median"], 4500.0);
        assert_eq!(result["location"], "All locations");
        assert!(result["recommendation"].as_str().unwrap().contains("above the average"));

        let helsinki = SalaryInsights
            .execute(&json!({"title": "developer", "location": "Helsinki"}), &ctx)
            .await
            .unwrap();
        assert_eq!(helsinki["sample_size"], 2);
        assert!(helsinki["recommendation"].is_null());
    }

    #[tokio::test]
    async fn test_salary_without_data() {
        let store = MemoryStore::new();
        let user = UserContext::empty(Uuid::new_v4());
        let ctx = ToolContext { user: &user, store: &store };
        let result = SalaryInsights
            .execute(&json!({"title": "astronaut"}), &ctx)
            .await
            .unwrap();
        assert_eq!(result["message"], "Not enough salary data for this role.");
    }
}
