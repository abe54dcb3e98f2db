//! Agent tool registry.
//!
//! Tools are read-only: they look things up and compute scores, but never
//! write domain state. Dispatch never fails the turn. Unknown names, schema
//! violations and executor errors all come back as `{"error": ...}` results
//! flagged `is_error`.

use async_trait::async_trait;
use serde_json::{json, Value};
use thiserror::Error;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::agents::context::UserContext;
use crate::agents::personas::persona;
use crate::llm_client::ToolSpec;
use crate::models::conversation::AgentType;
use crate::store::Store;

pub mod company;
pub mod interview;
pub mod jobs;
pub mod profile;

#[derive(Debug, Error)]
pub enum ToolError {
    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),

    #[error("{0}")]
    NotFound(String),

    #[error("Tool execution failed: {0}")]
    Execution(#[from] anyhow::Error),
}

/// What an executor sees besides its arguments.
pub struct ToolContext<'a> {
    pub user: &'a UserContext,
    pub store: &'a dyn Store,
}

#[async_trait]
pub trait AgentTool: Send + Sync {
    fn name(&self) -> &'static str;
    fn description(&self) -> &'static str;
    /// JSON schema of the argument object.
    fn parameters(&self) -> Value;
    async fn execute(&self, args: &Value, ctx: &ToolContext<'_>) -> Result<Value, ToolError>;
}

#[derive(Debug, Clone, PartialEq)]
pub struct ToolOutcome {
    pub result: Value,
    pub is_error: bool,
}

impl ToolOutcome {
    fn failure(message: impl Into<String>) -> Self {
        Self {
            result: json!({ "error": message.into() }),
            is_error: true,
        }
    }
}

pub struct ToolRegistry {
    tools: Vec<Box<dyn AgentTool>>,
}

impl ToolRegistry {
    pub fn new(tools: Vec<Box<dyn AgentTool>>) -> Self {
        Self { tools }
    }

    /// Every built-in tool.
    pub fn standard() -> Self {
        Self::new(vec![
            Box::new(jobs::SearchJobs),
            Box::new(jobs::AnalyzeJob),
            Box::new(jobs::CompareJobs),
            Box::new(company::AnalyzeCompany),
            Box::new(profile::ProfileGaps),
            Box::new(profile::SalaryInsights),
            Box::new(interview::InterviewQuestions),
        ])
    }

    fn get(&self, name: &str) -> Option<&dyn AgentTool> {
        self.tools.iter().find(|t| t.name() == name).map(|t| t.as_ref())
    }

    /// The persona's tools, in the persona's declared order.
    pub fn tools_for(&self, agent: AgentType) -> Vec<&dyn AgentTool> {
        persona(agent)
            .tools
            .iter()
            .filter_map(|name| self.get(name))
            .collect()
    }

    pub fn specs_for(&self, agent: AgentType) -> Vec<ToolSpec> {
        self.tools_for(agent)
            .into_iter()
            .map(|tool| ToolSpec {
                name: tool.name().to_string(),
                description: tool.description().to_string(),
                input_schema: tool.parameters(),
            })
            .collect()
    }

    /// Runs one model-requested call. Tools outside the persona's subset are
    /// treated as unknown.
    pub async fn dispatch(
        &self,
        agent: AgentType,
        name: &str,
        args: &Value,
        ctx: &ToolContext<'_>,
    ) -> ToolOutcome {
        let Some(tool) = self.tools_for(agent).into_iter().find(|t| t.name() == name) else {
            warn!("Model requested unknown tool '{name}' for {}", agent.as_str());
            return ToolOutcome::failure(format!("Tool '{name}' not found"));
        };

        let args = normalize_args(args);
        if let Err(e) = validate_args(&tool.parameters(), &args) {
            warn!("Tool '{name}' rejected arguments: {e}");
            return ToolOutcome::failure(e.to_string());
        }

        match tool.execute(&args, ctx).await {
            Ok(result) => {
                debug!("Tool '{name}' succeeded");
                ToolOutcome {
                    result,
                    is_error: false,
                }
            }
            Err(e) => {
                warn!("Tool '{name}' failed: {e}");
                ToolOutcome::failure(e.to_string())
            }
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Argument helpers
// ────────────────────────────────────────────────────────────────────────────

/// Missing arguments become an empty object and null-valued keys are dropped,
/// so an explicit `null` reads the same as an omitted argument.
fn normalize_args(args: &Value) -> Value {
    match args {
        Value::Null => json!({}),
        Value::Object(map) => Value::Object(
            map.iter()
                .filter(|(_, v)| !v.is_null())
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
        ),
        other => other.clone(),
    }
}

/// Checks arguments against the tool's declared JSON schema (draft 2020-12).
fn validate_args(schema: &Value, args: &Value) -> Result<(), ToolError> {
    let validator = jsonschema::draft202012::new(schema)
        .map_err(|e| ToolError::InvalidArguments(format!("tool schema does not compile: {e}")))?;

    let errors: Vec<String> = validator.iter_errors(args).map(|e| e.to_string()).collect();
    if errors.is_empty() {
        Ok(())
    } else {
        Err(ToolError::InvalidArguments(errors.join("; ")))
    }
}

/// A non-blank string argument, trimmed.
pub(crate) fn str_arg<'a>(args: &'a Value, key: &str) -> Option<&'a str> {
    args.get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

pub(crate) fn uuid_arg(args: &Value, key: &str) -> Result<Option<Uuid>, ToolError> {
    str_arg(args, key)
        .map(|raw| {
            Uuid::parse_str(raw)
                .map_err(|_| ToolError::InvalidArguments(format!("'{key}' is not a valid id")))
        })
        .transpose()
}

pub(crate) fn required_uuid(args: &Value, key: &str) -> Result<Uuid, ToolError> {
    uuid_arg(args, key)?
        .ok_or_else(|| ToolError::InvalidArguments(format!("missing required argument '{key}'")))
}
