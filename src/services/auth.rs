//! Auth services - Registrazione e login

use crate::core::{AppError, AppState};
use crate::dtos::{CreateUserDTO, LoginForm, TokenDTO, UserDTO};
use axum::extract::rejection::{FormRejection, JsonRejection};
use axum::extract::{Form, Json, State};
use std::sync::Arc;
use tracing::{debug, info, instrument};

#[instrument(skip(state, body))]
pub async fn register_user(
    State(state): State<Arc<AppState>>,
    body: Result<Json<CreateUserDTO>, JsonRejection>, // JSON body
) -> Result<Json<UserDTO>, AppError> {
    let Json(body) = body?;
    debug!("Registering user {}", body.username);

    let user = state.credentials.register(body).await?;

    info!("User {} registered", user.id);
    Ok(Json(UserDTO::from(user)))
}

/// POST /auth/jwt/login, form urlencoded `username` + `password`
#[instrument(skip(state, form))]
pub async fn login_user(
    State(state): State<Arc<AppState>>,
    form: Result<Form<LoginForm>, FormRejection>,
) -> Result<Json<TokenDTO>, AppError> {
    let Form(form) = form?;
    debug!("Login attempt for {}", form.username);

    let token = state
        .credentials
        .authenticate(&form.username, &form.password)
        .await?;

    Ok(Json(token))
}
