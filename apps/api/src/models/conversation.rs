use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// The five fixed personas. Each has its own prompt and tool subset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentType {
    CareerCoach,
    JobAnalyzer,
    CompanyIntel,
    InterviewPrep,
    Negotiator,
}

impl AgentType {
    pub const ALL: [AgentType; 5] = [
        AgentType::CareerCoach,
        AgentType::JobAnalyzer,
        AgentType::CompanyIntel,
        AgentType::InterviewPrep,
        AgentType::Negotiator,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AgentType::CareerCoach => "career_coach",
            AgentType::JobAnalyzer => "job_analyzer",
            AgentType::CompanyIntel => "company_intel",
            AgentType::InterviewPrep => "interview_prep",
            AgentType::Negotiator => "negotiator",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        AgentType::ALL.into_iter().find(|a| a.as_str() == value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    Assistant,
}

impl MessageRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageRole::User => "user",
            MessageRole::Assistant => "assistant",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Conversation {
    pub id: Uuid,
    pub user_id: Uuid,
    pub agent_type: AgentType,
    pub title: String,
    pub created_at: DateTime<Utc>,
}

/// A tool invocation requested by the model, kept on the assistant message for audit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCallRecord {
    pub id: String,
    pub name: String,
    pub arguments: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolResultRecord {
    pub tool_call_id: String,
    pub result: Value,
    pub is_error: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub id: Uuid,
    pub conversation_id: Uuid,
    pub role: MessageRole,
    pub content: String,
    pub tool_calls: Option<Vec<ToolCallRecord>>,
    pub tool_results: Option<Vec<ToolResultRecord>>,
    pub created_at: DateTime<Utc>,
}

/// Insert payload for `Store::create_message`.
#[derive(Debug, Clone)]
pub struct NewMessage {
    pub conversation_id: Uuid,
    pub role: MessageRole,
    pub content: String,
    pub tool_calls: Vec<ToolCallRecord>,
    pub tool_results: Vec<ToolResultRecord>,
}

impl NewMessage {
    pub fn user(conversation_id: Uuid, content: impl Into<String>) -> Self {
        Self {
            conversation_id,
            role: MessageRole::User,
            content: content.into(),
            tool_calls: vec![],
            tool_results: vec![],
        }
    }
}
