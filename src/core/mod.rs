//! Core Module - Componenti infrastrutturali dell'applicazione
//!
//! Questo modulo contiene tutti i componenti "core" dell'applicazione:
//! - Autenticazione, JWT e Credential Store
//! - Access Gateway (autorizzazione)
//! - Configurazione
//! - Gestione errori
//! - Stato applicazione

pub mod auth;
pub mod config;
pub mod credentials;
pub mod error;
pub mod gateway;
pub mod state;

// Re-exports per facilitare l'import
pub use auth::{Claims, authentication_middleware, chat_access_middleware, decode_jwt, encode_jwt};
pub use config::Config;
pub use credentials::CredentialStore;
pub use error::AppError;
pub use gateway::{AccessGateway, AdminGrant, ChatAction, ChatGrant, Decision, MessageScope};
pub use state::AppState;
