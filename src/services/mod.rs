//! Services module - Coordinatore per tutti i service handler HTTP
//!
//! Ogni modulo gestisce gli endpoint HTTP per una specifica funzionalità.
//! Gli handler sono sottili: le decisioni di accesso passano tutte dall'AccessGateway.

pub mod auth;
pub mod chat;
pub mod message;
pub mod user;

// Re-exports per facilitare l'import
pub use auth::{login_user, register_user};
pub use chat::{create_chat, list_all_chats, list_my_chats, list_user_chats};
pub use message::{get_chat_messages, list_messages, send_message};
pub use user::{delete_user, get_user, list_users, update_profile};

use crate::AppState;
use axum::{extract::State, http::StatusCode, response::IntoResponse};
use std::sync::Arc;

/// Root endpoint - health check
pub async fn root(State(_state): State<Arc<AppState>>) -> impl IntoResponse {
    (StatusCode::OK, "Server is running!")
}
