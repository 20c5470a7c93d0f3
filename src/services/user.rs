//! User services - Gestione utenti

use crate::core::{AppError, AppState};
use crate::dtos::{DeletedUserDTO, UpdateUserDTO, UserDTO, UserIdentifierQuery};
use crate::entities::User;
use axum::{
    Extension,
    extract::rejection::{JsonRejection, QueryRejection},
    extract::{Json, Query, State},
};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

fn required_identifier(query: UserIdentifierQuery) -> Result<String, AppError> {
    match query.identifier {
        Some(identifier) if !identifier.trim().is_empty() => Ok(identifier),
        _ => {
            warn!("Missing identifier query parameter");
            Err(AppError::validation("Query parameter 'identifier' is required"))
        }
    }
}

#[instrument(skip(state))]
pub async fn list_users(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<UserDTO>>, AppError> {
    let users = state.credentials.list().await?;
    debug!("Listing {} users", users.len());
    Ok(Json(users.into_iter().map(UserDTO::from).collect()))
}

#[instrument(skip(state, params))]
pub async fn get_user(
    State(state): State<Arc<AppState>>,
    params: Result<Query<UserIdentifierQuery>, QueryRejection>, // /auth/user/?identifier=
) -> Result<Json<UserDTO>, AppError> {
    let Query(params) = params?;
    let identifier = required_identifier(params)?;

    let user = state.credentials.lookup(&identifier).await?;
    info!("User found");
    Ok(Json(UserDTO::from(user)))
}

#[instrument(skip(state, current_user, params), fields(user_id = %current_user.id))]
pub async fn delete_user(
    State(state): State<Arc<AppState>>,
    Extension(current_user): Extension<User>, // ottenuto dall'autenticazione tramite token jwt
    params: Result<Query<UserIdentifierQuery>, QueryRejection>,
) -> Result<Json<DeletedUserDTO>, AppError> {
    let Query(params) = params?;
    let identifier = required_identifier(params)?;

    let deleted = state
        .credentials
        .delete(&current_user, &identifier, &state.gateway)
        .await?;

    Ok(Json(DeletedUserDTO {
        message: format!("User {} deleted", deleted.username),
    }))
}

#[instrument(skip(state, current_user, body), fields(user_id = %current_user.id))]
pub async fn update_profile(
    State(state): State<Arc<AppState>>,
    Extension(current_user): Extension<User>,
    body: Result<Json<UpdateUserDTO>, JsonRejection>,
) -> Result<Json<UserDTO>, AppError> {
    let Json(body) = body?;

    let user = state.credentials.update_profile(&current_user, body).await?;

    info!("Profile updated");
    Ok(Json(UserDTO::from(user)))
}
