use axum::{Extension, Json, extract::State, http::StatusCode, response::IntoResponse};
use tracing::debug;

use roomswap_db::models::NewMessage;
use roomswap_types::api::{MessageQuery, SendMessageRequest};
use roomswap_types::models::Message;

use crate::auth::AppState;
use crate::error::ApiError;
use crate::extract::{ValidJson, ValidPath, ValidQuery};
use crate::middleware::AuthSession;

/// `GET /api/messages`: the conversation with `otherStudentId` when given,
/// otherwise everything the caller sent or received. Oldest first.
pub async fn list_messages(
    State(state): State<AppState>,
    Extension(session): Extension<AuthSession>,
    ValidQuery(query): ValidQuery<MessageQuery>,
) -> Result<Json<Vec<Message>>, ApiError> {
    let messages = match query.other_student_id {
        Some(other) => state.store.messages_between(session.student_id, other)?,
        None => state.store.messages_for_student(session.student_id)?,
    };
    Ok(Json(messages))
}

pub async fn send_message(
    State(state): State<AppState>,
    Extension(session): Extension<AuthSession>,
    ValidJson(req): ValidJson<SendMessageRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if req.content.trim().is_empty() {
        return Err(ApiError::invalid_data());
    }
    if let Some(claimed) = req.sender_id.filter(|&claimed| claimed != session.student_id) {
        debug!(
            "Ignoring senderId {} supplied by student {}",
            claimed, session.student_id
        );
    }

    state
        .store
        .get_student(req.receiver_id)?
        .ok_or(ApiError::NotFound("Receiver not found"))?;

    let message = state.store.create_message(NewMessage {
        sender_id: session.student_id,
        receiver_id: req.receiver_id,
        content: req.content,
    })?;

    Ok((StatusCode::CREATED, Json(message)))
}

/// Only the receiver may mark a message read; to anyone else it does not exist.
pub async fn mark_read(
    State(state): State<AppState>,
    Extension(session): Extension<AuthSession>,
    ValidPath(id): ValidPath<i64>,
) -> Result<Json<Message>, ApiError> {
    state
        .store
        .get_message(id)?
        .filter(|m| m.receiver_id == session.student_id)
        .ok_or(ApiError::NotFound("Message not found"))?;

    let message = state
        .store
        .mark_message_read(id)?
        .ok_or(ApiError::NotFound("Message not found"))?;
    Ok(Json(message))
}
