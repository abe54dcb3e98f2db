//! Axum route handlers for agent conversations and the user context.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::agents::context::{format_context, UserContext};
use crate::agents::documents::Attachment;
use crate::agents::orchestrator::{ChatRequest, ChatResponse, ConversationDetail};
use crate::agents::personas::{Persona, PERSONAS};
use crate::errors::AppError;
use crate::models::conversation::{AgentType, Conversation};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct UserQuery {
    pub user_id: Uuid,
}

#[derive(Debug, Deserialize)]
pub struct ChatBody {
    pub user_id: Uuid,
    pub conversation_id: Option<Uuid>,
    pub agent_type: AgentType,
    pub message: String,
    pub attachment: Option<Attachment>,
}

#[derive(Debug, Serialize)]
pub struct ContextResponse {
    pub context: UserContext,
    pub rendered: String,
}

/// GET /api/v1/context?user_id=
pub async fn handle_get_context(
    State(state): State<AppState>,
    Query(query): Query<UserQuery>,
) -> Result<Json<ContextResponse>, AppError> {
    let context = state.context.build(query.user_id).await;
    let rendered = format_context(&context);
    Ok(Json(ContextResponse { context, rendered }))
}

/// POST /api/v1/agent/chat
pub async fn handle_chat(
    State(state): State<AppState>,
    Json(body): Json<ChatBody>,
) -> Result<Json<ChatResponse>, AppError> {
    let request = ChatRequest {
        conversation_id: body.conversation_id,
        agent_type: body.agent_type,
        message: body.message,
        attachment: body.attachment,
    };
    let response = state.orchestrator.chat(body.user_id, request).await?;
    Ok(Json(response))
}

/// GET /api/v1/agent/personas
pub async fn handle_list_personas() -> Json<&'static [Persona]> {
    Json(&PERSONAS)
}

/// GET /api/v1/agent/conversations?user_id=
pub async fn handle_list_conversations(
    State(state): State<AppState>,
    Query(query): Query<UserQuery>,
) -> Result<Json<Vec<Conversation>>, AppError> {
    Ok(Json(state.orchestrator.list_conversations(query.user_id).await?))
}

/// GET /api/v1/agent/conversations/:id?user_id=
pub async fn handle_get_conversation(
    State(state): State<AppState>,
    Path(conversation_id): Path<Uuid>,
    Query(query): Query<UserQuery>,
) -> Result<Json<ConversationDetail>, AppError> {
    let detail = state
        .orchestrator
        .get_conversation(query.user_id, conversation_id)
        .await?;
    Ok(Json(detail))
}

/// DELETE /api/v1/agent/conversations/:id?user_id=
pub async fn handle_delete_conversation(
    State(state): State<AppState>,
    Path(conversation_id): Path<Uuid>,
    Query(query): Query<UserQuery>,
) -> Result<StatusCode, AppError> {
    state
        .orchestrator
        .delete_conversation(query.user_id, conversation_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
