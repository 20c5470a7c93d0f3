//! Application State - Stato globale dell'applicazione
//!
//! Contiene i repository e i due componenti trasversali (credenziali e gateway)
//! condivisi da route e middleware.

use crate::core::config::Config;
use crate::core::credentials::CredentialStore;
use crate::core::gateway::AccessGateway;
use crate::repositories::{ChatRepository, MessageRepository, PoolType};

/// Stato globale dell'applicazione condiviso tra tutte le route e middleware
pub struct AppState {
    /// Repository per la gestione delle chat e dei loro membri
    pub chat: ChatRepository,

    /// Repository per la gestione dei messaggi
    pub msg: MessageRepository,

    /// Registrazione, login e verifica dei token
    pub credentials: CredentialStore,

    /// Unico punto in cui si decide chi può fare cosa
    pub gateway: AccessGateway,
}

impl AppState {
    /// Crea una nuova istanza di AppState senza amministratori e con token senza scadenza.
    ///
    /// # Arguments
    /// * `pool` - Pool di connessioni SQLite condiviso
    /// * `jwt_secret` - Chiave segreta per la firma dei token JWT
    pub fn new(pool: PoolType, jwt_secret: String) -> Self {
        Self::with_options(pool, jwt_secret, None, Vec::new())
    }

    pub fn from_config(pool: PoolType, config: &Config) -> Self {
        Self::with_options(
            pool,
            config.jwt_secret.clone(),
            config.jwt_ttl_secs,
            config.admin_usernames.clone(),
        )
    }

    pub fn with_options(
        pool: PoolType,
        jwt_secret: String,
        token_ttl: Option<u64>,
        admin_usernames: Vec<String>,
    ) -> Self {
        Self {
            chat: ChatRepository::new(pool.clone()),
            msg: MessageRepository::new(pool.clone()),
            credentials: CredentialStore::new(pool.clone(), jwt_secret, token_ttl),
            gateway: AccessGateway::new(pool, admin_usernames),
        }
    }
}
