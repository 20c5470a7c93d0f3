//! Credential Store - registrazione, login e verifica dei token
//!
//! Gli hash bcrypt e i token non finiscono mai nei log.

use crate::core::auth::{decode_jwt, encode_jwt};
use crate::core::gateway::AccessGateway;
use crate::core::AppError;
use crate::dtos::{CreateUserDTO, TokenDTO, UpdateUserDTO};
use crate::entities::User;
use crate::repositories::{Create, Delete, PoolType, Read, Update, UserRepository};
use tracing::{debug, error, info, instrument, warn};
use validator::Validate;

// hash bcrypt valido usato quando lo username non esiste, così il login
// costa lo stesso tempo in entrambi i casi
const DUMMY_HASH: &str = "$2b$12$C6UzMDM.H6dfI/f/IKxGhuJtvtL6bYwqzDrIr6VhJXRfU1nVbLSVK";

fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db_err) if db_err.is_unique_violation())
}

#[derive(Clone)]
pub struct CredentialStore {
    users: UserRepository,
    jwt_secret: String,
    token_ttl: Option<u64>,
}

impl CredentialStore {
    /// # Arguments
    /// * `pool` - Pool condiviso con i repository
    /// * `jwt_secret` - Chiave HS256 per firmare e verificare i token
    /// * `token_ttl` - Durata dei token in secondi, `None` per token senza scadenza
    pub fn new(pool: PoolType, jwt_secret: String, token_ttl: Option<u64>) -> Self {
        Self {
            users: UserRepository::new(pool),
            jwt_secret,
            token_ttl,
        }
    }

    #[instrument(skip(self, data), fields(username = %data.username))]
    pub async fn register(&self, data: CreateUserDTO) -> Result<User, AppError> {
        data.validate()?;

        if self.users.find_by_username(&data.username).await?.is_some() {
            warn!("Username already taken");
            return Err(AppError::conflict("Username already in use"));
        }

        let new_user = CreateUserDTO {
            password: User::hash_password(&data.password)?,
            ..data
        };

        let user = self.insert_user(&new_user).await?;
        info!("User registered");
        Ok(user)
    }

    /// Inserts an already hashed user. Due register concorrenti passano entrambi il
    /// controllo preliminare: l'indice UNIQUE decide.
    async fn insert_user(&self, new_user: &CreateUserDTO) -> Result<User, AppError> {
        match self.users.create(new_user).await {
            Ok(user) => Ok(user),
            Err(err) if is_unique_violation(&err) => {
                warn!("Username taken by a concurrent registration");
                Err(AppError::conflict("Username already in use"))
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Unknown username and wrong password are indistinguishable to the caller.
    #[instrument(skip(self, password))]
    pub async fn authenticate(&self, username: &str, password: &str) -> Result<TokenDTO, AppError> {
        let user = match self.users.find_by_username(username).await? {
            Some(user) => user,
            None => {
                let _ = bcrypt::verify(password, DUMMY_HASH);
                warn!("Login attempt for unknown user");
                return Err(AppError::invalid_credentials());
            }
        };

        if !user.verify_password(password) {
            warn!("Wrong password for user {}", user.id);
            return Err(AppError::invalid_credentials());
        }

        let token = encode_jwt(&user, &self.jwt_secret, self.token_ttl)?;
        info!("User {} logged in", user.id);
        Ok(TokenDTO::bearer(token))
    }

    /// Resolves a bearer token to a live user.
    ///
    /// # Errors
    /// Every failure (bad signature, expired, malformed, deleted user, storage
    /// error during the lookup) is the same `UnauthorizedError`.
    #[instrument(skip(self, token))]
    pub async fn verify(&self, token: &str) -> Result<User, AppError> {
        let invalid = || AppError::unauthorized("Could not validate credentials");

        let claims = match decode_jwt(token, &self.jwt_secret) {
            Ok(data) => data.claims,
            Err(e) => {
                warn!("Token rejected: {:?}", e.kind());
                return Err(invalid());
            }
        };

        match self.users.read(&claims.sub).await {
            Ok(Some(user)) => {
                debug!("Token resolved to user {}", user.id);
                Ok(user)
            }
            Ok(None) => {
                warn!("Token subject {} no longer exists", claims.sub);
                Err(invalid())
            }
            Err(e) => {
                error!("User lookup failed while verifying token: {}", e);
                Err(invalid())
            }
        }
    }

    /// By id first, then by username
    #[instrument(skip(self))]
    pub async fn lookup(&self, identifier: &str) -> Result<User, AppError> {
        self.users
            .find_by_identifier(identifier)
            .await?
            .ok_or_else(|| AppError::not_found("User not found"))
    }

    pub async fn list(&self) -> Result<Vec<User>, AppError> {
        Ok(self.users.find_all().await?)
    }

    /// Deletes the user named by `identifier`, returning it.
    /// Users may delete themselves; administrators may delete anyone.
    #[instrument(skip(self, actor, gateway), fields(actor_id = %actor.id))]
    pub async fn delete(
        &self,
        actor: &User,
        identifier: &str,
        gateway: &AccessGateway,
    ) -> Result<User, AppError> {
        let target = self.lookup(identifier).await?;
        gateway.authorize_user_scope(actor, &target.id)?;

        if !self.users.delete(&target.id).await? {
            // cancellato da una richiesta concorrente
            return Err(AppError::not_found("User not found"));
        }

        info!("User {} deleted by {}", target.id, actor.id);
        Ok(target)
    }

    /// Partial update of the caller's own profile.
    #[instrument(skip(self, actor, data), fields(user_id = %actor.id))]
    pub async fn update_profile(&self, actor: &User, data: UpdateUserDTO) -> Result<User, AppError> {
        data.validate()?;

        if let Some(ref username) = data.username {
            if let Some(existing) = self.users.find_by_username(username).await? {
                if existing.id != actor.id {
                    warn!("Username already taken");
                    return Err(AppError::conflict("Username already in use"));
                }
            }
        }

        let password = match data.password {
            Some(ref password) => Some(User::hash_password(password)?),
            None => None,
        };
        let changes = UpdateUserDTO { password, ..data };

        match self.users.update(&actor.id, &changes).await {
            Ok(user) => Ok(user),
            Err(err) if is_unique_violation(&err) => {
                Err(AppError::conflict("Username already in use"))
            }
            Err(err) => Err(err.into()),
        }
    }
}
