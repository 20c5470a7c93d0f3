//! Chat services - Gestione operazioni sulle chat

use crate::core::{AppError, AppState};
use crate::dtos::{ChatDTO, ChatPartnerSummaryDTO, CreateChatDTO};
use crate::entities::User;
use crate::repositories::CreateChatOutcome;
use axum::{
    Extension,
    extract::rejection::{JsonRejection, PathRejection},
    extract::{Json, Path, State},
};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};
use validator::Validate;

#[instrument(skip(state, current_user, body), fields(user_id = %current_user.id))]
pub async fn create_chat(
    State(state): State<Arc<AppState>>,
    Extension(current_user): Extension<User>, // ottenuto dall'autenticazione tramite token jwt
    body: Result<Json<CreateChatDTO>, JsonRejection>,
) -> Result<Json<ChatDTO>, AppError> {
    let Json(body) = body?;
    body.validate()?;
    debug!("Creating chat {:?} with {} members", body.name, body.users.len());

    match state.chat.create_with_members(&body).await? {
        CreateChatOutcome::Created(chat) => {
            info!("Chat {} created", chat.chat.id);
            Ok(Json(ChatDTO::from(chat)))
        }
        CreateChatOutcome::UnknownMembers(ids) => {
            warn!("Chat creation aborted, unknown members: {:?}", ids);
            Err(AppError::validation("Unknown users").with_details(ids.join(", ")))
        }
        CreateChatOutcome::NoMembers => Err(AppError::validation("A chat needs at least one member")),
    }
}

/// Chats of `user_id`, visible to that user and to administrators
#[instrument(skip(state, current_user, user_id), fields(user_id = %current_user.id))]
pub async fn list_user_chats(
    State(state): State<Arc<AppState>>,
    Extension(current_user): Extension<User>,
    user_id: Result<Path<String>, PathRejection>,
) -> Result<Json<Vec<ChatDTO>>, AppError> {
    let Path(user_id) = user_id?;
    state.gateway.authorize_user_scope(&current_user, &user_id)?;

    let chats = state.chat.find_many_by_user(&user_id).await?;
    info!("Retrieved {} chats for user {}", chats.len(), user_id);
    Ok(Json(chats.into_iter().map(ChatDTO::from).collect()))
}

/// Every chat of the caller, each with the other members.
/// Il segmento `{status}` resta nel path per compatibilità con i client ma non filtra.
#[instrument(skip(state, current_user), fields(user_id = %current_user.id))]
pub async fn list_my_chats(
    State(state): State<Arc<AppState>>,
    Extension(current_user): Extension<User>,
    Path(status): Path<String>,
) -> Result<Json<Vec<ChatPartnerSummaryDTO>>, AppError> {
    let chats = state.chat.find_many_by_user(&current_user.id).await?;

    debug!("User is member of {} chats", chats.len());
    Ok(Json(
        chats
            .into_iter()
            .map(|chat| ChatPartnerSummaryDTO::for_viewer(chat, &current_user.id))
            .collect(),
    ))
}

/// Every chat in the system; come per `my_chats`, `{status}` non filtra
#[instrument(skip(state, current_user), fields(user_id = %current_user.id))]
pub async fn list_all_chats(
    State(state): State<Arc<AppState>>,
    Extension(current_user): Extension<User>,
    Path(status): Path<String>,
) -> Result<Json<Vec<ChatDTO>>, AppError> {
    let grant = state.gateway.authorize_admin(&current_user)?;

    let chats = state.chat.find_all(&grant).await?;
    info!("Administrator listed {} chats", chats.len());
    Ok(Json(chats.into_iter().map(ChatDTO::from).collect()))
}
