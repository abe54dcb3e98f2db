//! Agent Orchestrator: one conversation turn, start to finish.
//!
//! A turn resolves the conversation, persists the user message, grounds the
//! persona prompt in a fresh UserContext, then alternates model calls and tool
//! executions until the model stops asking for tools. Tool failures become
//! error results the model can read; an unavailable model becomes a fixed
//! reply. Only conversation ownership and storage errors fail the turn.

use std::sync::Arc;

use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::agents::context::{format_context, ContextAssembler};
use crate::agents::documents::{augment_message, Attachment, BasicDocumentExtractor, DocumentExtractor};
use crate::agents::personas::{follow_ups, persona};
use crate::agents::tools::{ToolContext, ToolRegistry};
use crate::errors::AppError;
use crate::llm_client::prompts::AGENT_GROUNDING_INSTRUCTION;
use crate::llm_client::{
    ChatMessage, ChatModel, CompletionRequest, CompletionResponse, ContentBlock, Role, AGENT_MODEL,
    DEFAULT_MAX_TOKENS,
};
use crate::models::conversation::{
    AgentType, Conversation, Message, MessageRole, NewMessage, ToolCallRecord, ToolResultRecord,
};
use crate::store::Store;

pub const MAX_MESSAGE_CHARS: usize = 10_000;
const HISTORY_TURNS: usize = 10;
const TITLE_CHARS: usize = 50;
const CONVERSATION_LIST_LIMIT: i64 = 20;
const CONVERSATION_MESSAGE_LIMIT: i64 = 100;

pub const UNAVAILABLE_REPLY: &str =
    "The assistant is unavailable right now. Please try again in a moment.";
pub const ROUND_LIMIT_REPLY: &str =
    "I was unable to complete this request: it needed more lookups than I can make in one answer. \
     Please narrow the question and try again.";
pub const EMPTY_REPLY: &str =
    "I could not put together an answer this time. Could you rephrase the question?";

#[derive(Debug, Clone)]
pub struct ChatRequest {
    pub conversation_id: Option<Uuid>,
    pub agent_type: AgentType,
    pub message: String,
    pub attachment: Option<Attachment>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChatResponse {
    pub conversation_id: Uuid,
    pub message: Message,
    pub suggested_follow_ups: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ConversationDetail {
    pub conversation: Conversation,
    pub messages: Vec<Message>,
}

enum TurnState {
    AwaitingModel,
    ExecutingTools(CompletionResponse),
    Done(String),
}

pub struct AgentOrchestrator {
    store: Arc<dyn Store>,
    llm: Arc<dyn ChatModel>,
    context: ContextAssembler,
    tools: ToolRegistry,
    documents: Arc<dyn DocumentExtractor>,
    max_tool_rounds: u32,
}

impl AgentOrchestrator {
    pub fn new(store: Arc<dyn Store>, llm: Arc<dyn ChatModel>, max_tool_rounds: u32) -> Self {
        Self {
            context: ContextAssembler::new(store.clone()),
            store,
            llm,
            tools: ToolRegistry::standard(),
            documents: Arc::new(BasicDocumentExtractor),
            max_tool_rounds: max_tool_rounds.max(1),
        }
    }

    pub async fn chat(&self, user_id: Uuid, request: ChatRequest) -> Result<ChatResponse, AppError> {
        let message = request.message.trim();
        if message.is_empty() {
            return Err(AppError::Validation("message must not be empty".into()));
        }
        if message.chars().count() > MAX_MESSAGE_CHARS {
            return Err(AppError::Validation(format!(
                "message must be at most {MAX_MESSAGE_CHARS} characters"
            )));
        }

        let conversation = self
            .resolve_conversation(user_id, request.conversation_id, request.agent_type, message)
            .await?;
        let agent = conversation.agent_type;

        let persisted = self
            .store
            .create_message(NewMessage::user(conversation.id, message))
            .await?;

        let user = self.context.build(user_id).await;
        let system = format!(
            "{}\n\n---\n\nUSER CONTEXT:\n{}\n---\n\n{}",
            persona(agent).prompt,
            format_context(&user),
            AGENT_GROUNDING_INSTRUCTION
        );

        let mut messages = self.history(conversation.id, persisted.id).await;
        let current = match &request.attachment {
            Some(attachment) => {
                match augment_message(message, attachment, self.documents.as_ref()) {
                    Ok(text) => text,
                    Err((text, e)) => {
                        warn!("Attachment '{}' unreadable: {e}", attachment.file_name);
                        text
                    }
                }
            }
            None => message.to_string(),
        };
        messages.push(ChatMessage::user_text(current));

        let tool_specs = self.tools.specs_for(agent);
        let tool_ctx = ToolContext {
            user: &user,
            store: self.store.as_ref(),
        };
        let mut tool_calls: Vec<ToolCallRecord> = Vec::new();
        let mut tool_results: Vec<ToolResultRecord> = Vec::new();
        let mut rounds = 0;
        let mut state = TurnState::AwaitingModel;

        let reply = loop {
            state = match state {
                TurnState::AwaitingModel => {
                    let request = CompletionRequest {
                        model: AGENT_MODEL,
                        system: system.clone(),
                        messages: messages.clone(),
                        tools: tool_specs.clone(),
                        max_tokens: DEFAULT_MAX_TOKENS,
                        temperature: None,
                    };
                    match self.llm.complete(request).await {
                        Ok(response) if response.wants_tools() && !response.tool_uses().is_empty() => {
                            TurnState::ExecutingTools(response)
                        }
                        Ok(response) => TurnState::Done(response.text()),
                        Err(e) => {
                            warn!("Agent model call failed for conversation {}: {e}", conversation.id);
                            TurnState::Done(UNAVAILABLE_REPLY.to_string())
                        }
                    }
                }
                TurnState::ExecutingTools(_) if rounds >= self.max_tool_rounds => {
                    warn!(
                        "Conversation {} hit the tool round limit ({})",
                        conversation.id, self.max_tool_rounds
                    );
                    TurnState::Done(ROUND_LIMIT_REPLY.to_string())
                }
                TurnState::ExecutingTools(response) => {
                    rounds += 1;
                    messages.push(response.to_assistant_message());

                    let mut blocks = Vec::new();
                    for (id, name, input) in response.tool_uses() {
                        let outcome = self.tools.dispatch(agent, name, input, &tool_ctx).await;
                        blocks.push(ContentBlock::ToolResult {
                            tool_use_id: id.to_string(),
                            content: outcome.result.to_string(),
                            is_error: outcome.is_error,
                        });
                        tool_calls.push(ToolCallRecord {
                            id: id.to_string(),
                            name: name.to_string(),
                            arguments: input.clone(),
                        });
                        tool_results.push(ToolResultRecord {
                            tool_call_id: id.to_string(),
                            result: outcome.result,
                            is_error: outcome.is_error,
                        });
                    }
                    messages.push(ChatMessage {
                        role: Role::User,
                        content: blocks,
                    });
                    TurnState::AwaitingModel
                }
                TurnState::Done(text) => break text,
            };
        };

        let reply = if reply.trim().is_empty() {
            EMPTY_REPLY.to_string()
        } else {
            reply
        };

        let saved = self
            .store
            .create_message(NewMessage {
                conversation_id: conversation.id,
                role: MessageRole::Assistant,
                content: reply,
                tool_calls,
                tool_results,
            })
            .await?;

        info!(
            "Agent turn done: conversation={}, agent={}, tool_rounds={rounds}",
            conversation.id,
            agent.as_str()
        );

        Ok(ChatResponse {
            conversation_id: conversation.id,
            message: saved,
            suggested_follow_ups: follow_ups(agent),
        })
    }

    /// An existing conversation must belong to the user. A conversation keeps
    /// the persona it was created with.
    async fn resolve_conversation(
        &self,
        user_id: Uuid,
        conversation_id: Option<Uuid>,
        agent_type: AgentType,
        message: &str,
    ) -> Result<Conversation, AppError> {
        match conversation_id {
            Some(id) => self.owned_conversation(user_id, id).await,
            None => {
                let mut title: String = message.chars().take(TITLE_CHARS).collect();
                if message.chars().count() > TITLE_CHARS {
                    title.push_str("...");
                }
                Ok(self
                    .store
                    .create_conversation(user_id, agent_type, &title)
                    .await?)
            }
        }
    }

    async fn owned_conversation(&self, user_id: Uuid, id: Uuid) -> Result<Conversation, AppError> {
        match self.store.get_conversation(id).await? {
            Some(conversation) if conversation.user_id == user_id => Ok(conversation),
            _ => Err(AppError::NotFound("Conversation not found".into())),
        }
    }

    /// The last prior turns as model history, excluding the message just
    /// persisted. History starts on a user turn. An unreadable history
    /// degrades to none.
    async fn history(&self, conversation_id: Uuid, current_id: Uuid) -> Vec<ChatMessage> {
        let stored = match self
            .store
            .get_messages_by_conversation_id(conversation_id, HISTORY_TURNS as i64 + 1)
            .await
        {
            Ok(stored) => stored,
            Err(e) => {
                warn!("History unavailable for conversation {conversation_id}: {e}");
                return vec![];
            }
        };

        let prior: Vec<&Message> = stored
            .iter()
            .filter(|m| m.id != current_id && !m.content.trim().is_empty())
            .collect();
        let skip = prior.len().saturating_sub(HISTORY_TURNS);

        prior
            .into_iter()
            .skip(skip)
            .skip_while(|m| m.role == MessageRole::Assistant)
            .map(|m| match m.role {
                MessageRole::User => ChatMessage::user_text(m.content.clone()),
                MessageRole::Assistant => ChatMessage::assistant_text(m.content.clone()),
            })
            .collect()
    }

    pub async fn list_conversations(&self, user_id: Uuid) -> Result<Vec<Conversation>, AppError> {
        Ok(self
            .store
            .get_conversations_by_user_id(user_id, CONVERSATION_LIST_LIMIT)
            .await?)
    }

    pub async fn get_conversation(
        &self,
        user_id: Uuid,
        conversation_id: Uuid,
    ) -> Result<ConversationDetail, AppError> {
        let conversation = self.owned_conversation(user_id, conversation_id).await?;
        let messages = self
            .store
            .get_messages_by_conversation_id(conversation.id, CONVERSATION_MESSAGE_LIMIT)
            .await?;
        Ok(ConversationDetail {
            conversation,
            messages,
        })
    }

    pub async fn delete_conversation(&self, user_id: Uuid, conversation_id: Uuid) -> Result<(), AppError> {
        let conversation = self.owned_conversation(user_id, conversation_id).await?;
        self.store.delete_conversation(conversation.id).await?;
        info!("Deleted conversation {}", conversation.id);
        Ok(())
    }
}
