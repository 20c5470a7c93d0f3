//! Access Gateway - unico punto di autorizzazione per chat e messaggi
//!
//! Ogni decisione rilegge la membership dal database, niente cache.
//! Le operazioni protette dei repository richiedono un grant (`ChatGrant`,
//! `AdminGrant`, `MessageScope`) che solo il gateway può costruire.

use crate::core::AppError;
use crate::entities::User;
use crate::repositories::{ChatRepository, MembershipRepository, PoolType, Read};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatAction {
    ReadChat,
    SendMessage,
    ReadMessages,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allowed,
    Denied,
}

/// Proof that `user_id` may perform `action` on `chat_id`.
#[derive(Debug, Clone)]
pub struct ChatGrant {
    chat_id: i64,
    user_id: String,
    action: ChatAction,
}

impl ChatGrant {
    pub fn chat_id(&self) -> i64 {
        self.chat_id
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn action(&self) -> ChatAction {
        self.action
    }
}

/// Proof that the actor holds the administrator capability.
#[derive(Debug)]
pub struct AdminGrant {
    _private: (),
}

/// Which messages an actor may list.
#[derive(Debug)]
pub struct MessageScope(Scope);

#[derive(Debug)]
enum Scope {
    All(AdminGrant),
    MemberOf(String),
}

impl MessageScope {
    /// `Some(user_id)` when listing is restricted to the chats of that user,
    /// `None` for administrators.
    pub fn member_of(&self) -> Option<&str> {
        match &self.0 {
            Scope::All(_) => None,
            Scope::MemberOf(user_id) => Some(user_id),
        }
    }
}

#[derive(Clone)]
pub struct AccessGateway {
    chats: ChatRepository,
    members: MembershipRepository,
    admins: Arc<HashSet<String>>,
}

impl AccessGateway {
    /// # Arguments
    /// * `pool` - Pool condiviso con i repository
    /// * `admin_usernames` - Username con capacità di amministratore
    pub fn new(pool: PoolType, admin_usernames: Vec<String>) -> Self {
        Self {
            chats: ChatRepository::new(pool.clone()),
            members: MembershipRepository::new(pool),
            admins: Arc::new(admin_usernames.into_iter().collect()),
        }
    }

    pub fn is_admin(&self, actor: &User) -> bool {
        self.admins.contains(&actor.username)
    }

    /// Decides whether `actor` may perform `action` on `chat_id`.
    ///
    /// Every chat action currently requires membership.
    ///
    /// # Errors
    /// * `NotFoundError` if the chat does not exist
    #[instrument(skip(self, actor), fields(user_id = %actor.id))]
    pub async fn decide(
        &self,
        actor: &User,
        action: ChatAction,
        chat_id: i64,
    ) -> Result<Decision, AppError> {
        if self.chats.read(&chat_id).await?.is_none() {
            warn!("Chat {} does not exist", chat_id);
            return Err(AppError::not_found("Chat not found"));
        }

        let decision = if self.members.is_member(chat_id, &actor.id).await? {
            Decision::Allowed
        } else {
            Decision::Denied
        };

        debug!("Decision for {:?} on chat {}: {:?}", action, chat_id, decision);
        Ok(decision)
    }

    /// Like [`decide`](Self::decide), turning `Allowed` into a grant and `Denied`
    /// into `ForbiddenError`.
    pub async fn authorize(
        &self,
        actor: &User,
        action: ChatAction,
        chat_id: i64,
    ) -> Result<ChatGrant, AppError> {
        match self.decide(actor, action, chat_id).await? {
            Decision::Allowed => {
                info!("User {} verified as member of chat {}", actor.id, chat_id);
                Ok(ChatGrant {
                    chat_id,
                    user_id: actor.id.clone(),
                    action,
                })
            }
            Decision::Denied => {
                warn!("User {} is not a member of chat {}", actor.id, chat_id);
                Err(AppError::forbidden("You are not a member of this chat"))
            }
        }
    }

    pub fn authorize_admin(&self, actor: &User) -> Result<AdminGrant, AppError> {
        if self.is_admin(actor) {
            Ok(AdminGrant { _private: () })
        } else {
            warn!("User {} attempted an administrative operation", actor.id);
            Err(AppError::forbidden("Administrator privileges required"))
        }
    }

    /// Operations on a user's own data: allowed to that user and to administrators.
    pub fn authorize_user_scope(&self, actor: &User, target_user_id: &str) -> Result<(), AppError> {
        if actor.id == target_user_id || self.is_admin(actor) {
            Ok(())
        } else {
            warn!("User {} attempted to act on user {}", actor.id, target_user_id);
            Err(AppError::forbidden("You can only access your own data"))
        }
    }

    pub fn message_scope(&self, actor: &User) -> MessageScope {
        match self.authorize_admin(actor) {
            Ok(grant) => MessageScope(Scope::All(grant)),
            Err(_) => MessageScope(Scope::MemberOf(actor.id.clone())),
        }
    }
}
