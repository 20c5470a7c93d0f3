//! Server library - espone i moduli principali per i test

pub mod core;
pub mod dtos;
pub mod entities;
pub mod repositories;
pub mod services;

// Re-export dei tipi principali per facilitare l'import
pub use crate::core::{AppError, AppState, auth, config};
pub use services::root;

use axum::{
    Router, middleware,
    routing::{delete, get, post},
};
use std::sync::Arc;

/// Crea il router principale dell'applicazione
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(root))
        .nest("/auth", configure_auth_routes(state.clone()))
        .nest("/chat", configure_chat_routes(state.clone()))
        .nest("/messages", configure_message_routes(state.clone()))
        .with_state(state)
}

/// Configura le routes di autenticazione e gestione utenti
fn configure_auth_routes(state: Arc<AppState>) -> Router<Arc<AppState>> {
    use crate::core::authentication_middleware;
    use services::*;

    // GET è pubblico, DELETE e PATCH richiedono il token
    let protected_user_methods = delete(delete_user)
        .patch(update_profile)
        .route_layer(middleware::from_fn_with_state(
            state,
            authentication_middleware,
        ));

    Router::new()
        .route("/register", post(register_user))
        .route("/jwt/login", post(login_user))
        .route("/users/", get(list_users))
        .route("/user/", get(get_user).merge(protected_user_methods))
}

/// Configura le routes per la gestione delle chat
fn configure_chat_routes(state: Arc<AppState>) -> Router<Arc<AppState>> {
    use crate::core::authentication_middleware;
    use services::*;

    Router::new()
        .route("/create_chat", post(create_chat))
        .route("/user_chats/{user_id}", get(list_user_chats))
        .route("/my_chats/{status}", get(list_my_chats))
        .route("/all_chats/{status}", get(list_all_chats))
        .layer(middleware::from_fn_with_state(
            state,
            authentication_middleware,
        ))
}

/// Configura le routes dei messaggi
fn configure_message_routes(state: Arc<AppState>) -> Router<Arc<AppState>> {
    use crate::core::{authentication_middleware, chat_access_middleware};
    use services::*;

    // Rotte che richiedono solo autenticazione
    let authenticated_routes = Router::new()
        .route("/send_message", post(send_message))
        .route("/messages", get(list_messages));

    // Rotte che richiedono anche l'accesso alla chat (chat_id in query string)
    let chat_routes = Router::new()
        .route("/get_chat_messages", post(get_chat_messages))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            chat_access_middleware,
        ));

    // l'ultimo layer aggiunto è il primo a girare: autenticazione prima dell'accesso alla chat
    authenticated_routes
        .merge(chat_routes)
        .layer(middleware::from_fn_with_state(
            state,
            authentication_middleware,
        ))
}
