use async_trait::async_trait;
use serde_json::{json, Value};

use super::{str_arg, uuid_arg, AgentTool, ToolContext, ToolError};

/// Gathers the material for interview questions. The model writes the
/// questions itself from what this returns.
pub struct InterviewQuestions;

#[async_trait]
impl AgentTool for InterviewQuestions {
    fn name(&self) -> &'static str {
        "generate_interview_questions"
    }

    fn description(&self) -> &'static str {
        "Collect role, company and candidate context for likely interview questions."
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "job_id": { "type": "string", "description": "Job to prepare for" },
                "company_name": { "type": "string", "description": "Company name" },
                "question_type": {
                    "type": "string",
                    "enum": ["behavioral", "technical", "situational", "all"],
                    "description": "Kind of questions"
                }
            },
            "required": []
        })
    }

    async fn execute(&self, args: &Value, ctx: &ToolContext<'_>) -> Result<Value, ToolError> {
        let mut job_context = String::new();
        if let Some(job_id) = uuid_arg(args, "job_id")? {
            if let Some(job) = ctx.store.get_job_by_id(job_id).await? {
                job_context = format!(
                    "Role: {} at {}. {}",
                    job.title,
                    job.company,
                    job.description.as_deref().unwrap_or_default()
                )
                .trim_end()
                .to_string();
            }
        }

        let company_context = str_arg(args, "company_name")
            .map(|name| format!("Company: {name}"))
            .unwrap_or_default();

        let user_profile = ctx.user.profile.as_ref().map(|p| {
            json!({
                "title": p.current_title,
                "skills": p.skills,
                "experience": p.years_of_experience,
            })
        });

        Ok(json!({
            "context": {
                "job": job_context,
                "company": company_context,
                "user_profile": user_profile,
            },
            "question_types": str_arg(args, "question_type").unwrap_or("all"),
            "note": "Write personalised questions from this context.",
        }))
    }
}
