//! Message services - Invio e lettura dei messaggi

use crate::core::{AppError, AppState, ChatAction, ChatGrant};
use crate::dtos::{MessageDTO, MessageFilter, MessagesQuery, SendMessageDTO};
use crate::entities::User;
use axum::{
    Extension,
    extract::rejection::{JsonRejection, QueryRejection},
    extract::{Json, Query, State},
};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};
use validator::Validate;

#[instrument(skip(state, current_user, body), fields(user_id = %current_user.id))]
pub async fn send_message(
    State(state): State<Arc<AppState>>,
    Extension(current_user): Extension<User>,
    body: Result<Json<SendMessageDTO>, JsonRejection>,
) -> Result<Json<MessageDTO>, AppError> {
    let Json(body) = body?;
    body.validate()?;

    let grant = state
        .gateway
        .authorize(&current_user, ChatAction::SendMessage, body.chat_id)
        .await?;

    let message = state.msg.create(&grant, &body.text).await?;

    info!("Message {} sent to chat {}", message.id, message.chat_id);
    Ok(Json(MessageDTO::from(message)))
}

/// GET /messages/messages con filtri opzionali sender_id, receiver_id, time_delivered
#[instrument(skip(state, current_user, params), fields(user_id = %current_user.id))]
pub async fn list_messages(
    State(state): State<Arc<AppState>>,
    Extension(current_user): Extension<User>,
    params: Result<Query<MessagesQuery>, QueryRejection>,
) -> Result<Json<Vec<MessageDTO>>, AppError> {
    let Query(params) = params?;
    let filter = MessageFilter::try_from(params).map_err(|e| {
        warn!("Invalid message filter: {}", e);
        AppError::validation("Invalid filter").with_details(e)
    })?;

    let scope = state.gateway.message_scope(&current_user);
    let messages = state.msg.find_filtered(&scope, &filter).await?;

    debug!("Returning {} messages", messages.len());
    Ok(Json(messages.into_iter().map(MessageDTO::from).collect()))
}

/// Messaggi di una chat; il grant arriva da `chat_access_middleware`
#[instrument(skip(state, grant), fields(chat_id = grant.chat_id()))]
pub async fn get_chat_messages(
    State(state): State<Arc<AppState>>,
    Extension(grant): Extension<ChatGrant>,
) -> Result<Json<Vec<MessageDTO>>, AppError> {
    let messages = state.msg.find_many_by_chat(&grant).await?;

    info!("Retrieved {} messages", messages.len());
    Ok(Json(messages.into_iter().map(MessageDTO::from).collect()))
}
