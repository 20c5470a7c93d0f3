//! Entities module - Entità del dominio applicativo
//!
//! Questo modulo contiene tutte le entità (models) che rappresentano i dati persistiti nel database.
//! Le entity corrispondono alle tabelle principali del database.

pub mod chat;
pub mod message;
pub mod user;

// Re-exports per facilitare l'import
pub use chat::{Chat, ChatWithMembers};
pub use message::Message;
pub use user::User;
