use crate::core::AppState;
use crate::core::AppError;
use crate::core::gateway::ChatAction;
use crate::dtos::ChatMessagesQuery;
use crate::entities::User;
use axum::extract::{Query, State};
use axum::{body::Body, extract::Request, http, http::Response, middleware::Next};
use chrono::Utc;
use jsonwebtoken::errors::Error as JwtError;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, TokenData, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

// struct che codifica il contenuto del token jwt
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // user id
    pub username: String,
    pub iat: usize, // Issued at time of the token
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<usize>, // presente solo se è configurata una durata
}

#[instrument(skip(user, secret), fields(user_id = %user.id))]
pub fn encode_jwt(user: &User, secret: &str, ttl_secs: Option<u64>) -> Result<String, JwtError> {
    debug!("Encoding JWT token for user");
    let now = Utc::now().timestamp() as usize;
    let claim = Claims {
        sub: user.id.clone(),
        username: user.username.clone(),
        iat: now,
        exp: ttl_secs.map(|ttl| now + ttl as usize),
    };

    let token = encode(
        &Header::default(),
        &claim,
        &EncodingKey::from_secret(secret.as_bytes()),
    )?;
    info!("JWT token encoded successfully");
    Ok(token)
}

/// Checks signature and, when the claim is present, expiry. `exp` is not required.
#[instrument(skip(jwt_token, secret))]
pub fn decode_jwt(jwt_token: &str, secret: &str) -> Result<TokenData<Claims>, JwtError> {
    let mut validation = Validation::default();
    validation.required_spec_claims.clear();

    let data = decode::<Claims>(
        jwt_token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )?;
    debug!("JWT token decoded for user: {}", data.claims.username);
    Ok(data)
}

/// Estrae il token da `Authorization: Bearer <token>`
fn bearer_token(req: &Request) -> Result<&str, AppError> {
    let header = req
        .headers()
        .get(http::header::AUTHORIZATION)
        .ok_or_else(|| {
            warn!("Missing authorization header");
            AppError::unauthorized("Not authenticated")
        })?
        .to_str()
        .map_err(|_| {
            warn!("Invalid authorization header format");
            AppError::unauthorized("Not authenticated")
        })?;

    let mut parts = header.split_whitespace();
    match (parts.next(), parts.next(), parts.next()) {
        (Some(scheme), Some(token), None) if scheme.eq_ignore_ascii_case("bearer") => Ok(token),
        _ => {
            warn!("Authorization header is not a bearer token");
            Err(AppError::unauthorized("Not authenticated"))
        }
    }
}

#[instrument(skip(state, req, next))]
pub async fn authentication_middleware(
    State(state): State<Arc<AppState>>,
    mut req: Request,
    next: Next,
) -> Result<Response<Body>, AppError> {
    debug!("Running authentication middleware");
    // owned: la Request non è Sync e non va tenuta in prestito attraverso l'await
    let token = bearer_token(&req)?.to_string();
    let current_user = state.credentials.verify(&token).await?;

    info!("User authenticated: {}", current_user.username);
    req.extensions_mut().insert(current_user);
    // gli handler recuperano lo user da Extension
    Ok(next.run(req).await)
}

/// Middleware per le rotte che leggono i messaggi di una chat.
/// Legge `chat_id` dalla query string, chiede il permesso al gateway e inserisce il
/// `ChatGrant` nell'Extension. Va montato dopo `authentication_middleware`.
#[instrument(skip(state, req, next))]
pub async fn chat_access_middleware(
    State(state): State<Arc<AppState>>,
    mut req: Request,
    next: Next,
) -> Result<Response<Body>, AppError> {
    debug!("Running chat access middleware");
    let current_user = req
        .extensions()
        .get::<User>()
        .ok_or_else(|| {
            warn!("User not found in request extensions");
            AppError::unauthorized("Not authenticated")
        })?
        .clone();

    let Query(query) = Query::<ChatMessagesQuery>::try_from_uri(req.uri())?;

    let grant = state
        .gateway
        .authorize(&current_user, ChatAction::ReadMessages, query.chat_id)
        .await?;

    req.extensions_mut().insert(grant);

    Ok(next.run(req).await)
}
