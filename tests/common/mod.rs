#![allow(dead_code)]

use axum_test::TestServer;
use chat_server::core::AppState;
use sqlx::SqlitePool;
use std::sync::Arc;

pub const JWT_SECRET: &str = "ilmiobellissimosegretochevaassolutamentecambiato";

// utenti di fixtures/users.sql
pub const ALICE_ID: &str = "11111111-1111-4111-8111-111111111111";
pub const BOB_ID: &str = "22222222-2222-4222-8222-222222222222";
pub const CHARLIE_ID: &str = "33333333-3333-4333-8333-333333333333";

/// Crea un AppState per i test, senza amministratori
///
/// # Arguments
/// * `pool` - Connection pool SQLite
///
/// # Returns
/// Arc<AppState> configurato con il JWT secret di test
pub fn create_test_state(pool: SqlitePool) -> Arc<AppState> {
    Arc::new(AppState::new(pool, JWT_SECRET.to_string()))
}

/// Come `create_test_state`, con `alice` amministratore
pub fn create_test_admin_state(pool: SqlitePool) -> Arc<AppState> {
    Arc::new(AppState::with_options(
        pool,
        JWT_SECRET.to_string(),
        None,
        vec!["alice".to_string()],
    ))
}

/// Crea un TestServer per i test
///
/// # Arguments
/// * `state` - AppState da utilizzare per il server
///
/// # Returns
/// TestServer configurato e pronto per eseguire richieste
pub fn create_test_server(state: Arc<AppState>) -> TestServer {
    let app = chat_server::create_router(state);
    TestServer::new(app).expect("Failed to create test server")
}

/// Genera un JWT token per testing, senza scadenza come quelli emessi dal login
///
/// # Arguments
/// * `user_id` - ID dell'utente per cui generare il token
/// * `username` - Username dell'utente
/// * `jwt_secret` - Secret key per firmare il token
pub fn create_test_jwt(user_id: &str, username: &str, jwt_secret: &str) -> String {
    use chat_server::core::Claims;
    use chrono::Utc;
    use jsonwebtoken::{EncodingKey, Header, encode};

    let claims = Claims {
        sub: user_id.to_string(),
        username: username.to_string(),
        iat: Utc::now().timestamp() as usize,
        exp: None,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(jwt_secret.as_bytes()),
    )
    .expect("Failed to create JWT token")
}

/// Valore dell'header Authorization per il token
pub fn bearer(token: &str) -> String {
    format!("Bearer {}", token)
}
