//! ChatRepository - Repository per la gestione delle chat

use super::{MembershipRepository, PoolType, Read};
use crate::core::gateway::AdminGrant;
use crate::dtos::CreateChatDTO;
use crate::entities::{Chat, ChatWithMembers, User};
use chrono::{DateTime, Utc};
use sqlx::{Error, QueryBuilder, Sqlite, SqliteConnection};
use tracing::{debug, info, instrument, warn};

/// Esito della creazione di una chat
#[derive(Debug)]
pub enum CreateChatOutcome {
    Created(ChatWithMembers),
    /// Some requested member ids do not belong to any user. Nothing was written.
    UnknownMembers(Vec<String>),
    /// The member list was empty. Nothing was written.
    NoMembers,
}

// CHAT REPOSITORY
#[derive(Clone)]
pub struct ChatRepository {
    connection_pool: PoolType,
    members: MembershipRepository,
}

impl ChatRepository {
    pub fn new(connection_pool: PoolType) -> Self {
        Self {
            members: MembershipRepository::new(connection_pool.clone()),
            connection_pool,
        }
    }

    /// Creates the chat and one membership row per member in a single transaction.
    ///
    /// Duplicated ids in `data.users` are collapsed. Every id must resolve to an
    /// existing user, otherwise the transaction is rolled back and the unknown ids
    /// are reported.
    #[instrument(skip(self, data), fields(name = %data.name, status = data.status))]
    pub async fn create_with_members(&self, data: &CreateChatDTO) -> Result<CreateChatOutcome, Error> {
        let mut requested: Vec<&str> = Vec::with_capacity(data.users.len());
        for id in &data.users {
            if !requested.contains(&id.as_str()) {
                requested.push(id.as_str());
            }
        }
        if requested.is_empty() {
            return Ok(CreateChatOutcome::NoMembers);
        }

        let mut tx = self.connection_pool.begin().await?;

        let mut query_builder = QueryBuilder::<Sqlite>::new(
            "SELECT id, username, password, photo_url FROM users WHERE id IN (",
        );
        let mut separated = query_builder.separated(", ");
        for id in &requested {
            separated.push_bind(*id);
        }
        separated.push_unseparated(")");
        let found: Vec<User> = query_builder
            .build_query_as::<User>()
            .fetch_all(&mut *tx)
            .await?;

        let missing: Vec<String> = requested
            .iter()
            .filter(|id| !found.iter().any(|u| u.id == **id))
            .map(|id| id.to_string())
            .collect();
        if !missing.is_empty() {
            warn!("Chat creation aborted, unknown members: {:?}", missing);
            tx.rollback().await?;
            return Ok(CreateChatOutcome::UnknownMembers(missing));
        }

        let updated_at = Utc::now();
        let result = sqlx::query("INSERT INTO chats (name, status, updated_at) VALUES (?, ?, ?)")
            .bind(&data.name)
            .bind(data.status)
            .bind(updated_at)
            .execute(&mut *tx)
            .await?;
        let chat_id = result.last_insert_rowid();

        for id in &requested {
            MembershipRepository::insert_member(&mut tx, chat_id, id).await?;
        }

        tx.commit().await?;

        info!("Chat created with id {} and {} members", chat_id, requested.len());

        // membri nell'ordine della richiesta
        let members = requested
            .iter()
            .filter_map(|id| found.iter().find(|u| u.id == *id).cloned())
            .collect();

        Ok(CreateChatOutcome::Created(ChatWithMembers {
            chat: Chat {
                id: chat_id,
                name: data.name.clone(),
                status: data.status,
                updated_at,
            },
            members,
        }))
    }

    /// Every chat where `user_id` has a membership row, most recently active first
    #[instrument(skip(self))]
    pub async fn find_many_by_user(&self, user_id: &str) -> Result<Vec<ChatWithMembers>, Error> {
        let chats = sqlx::query_as::<_, Chat>(
            r#"
            SELECT c.id, c.name, c.status, c.updated_at
            FROM chats c
            INNER JOIN userchats uc ON uc.chat_id = c.id
            WHERE uc.user_id = ?
            ORDER BY c.updated_at DESC, c.id ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.connection_pool)
        .await?;

        debug!("User is member of {} chats", chats.len());
        self.attach_members(chats).await
    }

    /// Every chat in the system. Administrative listing, hence the grant.
    #[instrument(skip(self, _grant))]
    pub async fn find_all(&self, _grant: &AdminGrant) -> Result<Vec<ChatWithMembers>, Error> {
        let chats = sqlx::query_as::<_, Chat>(
            "SELECT id, name, status, updated_at FROM chats ORDER BY id ASC",
        )
        .fetch_all(&self.connection_pool)
        .await?;

        self.attach_members(chats).await
    }

    /// Sets `updated_at` on a caller-owned connection (used inside the message transaction)
    pub async fn touch(
        conn: &mut SqliteConnection,
        chat_id: i64,
        at: DateTime<Utc>,
    ) -> Result<(), Error> {
        sqlx::query("UPDATE chats SET updated_at = ? WHERE id = ?")
            .bind(at)
            .bind(chat_id)
            .execute(conn)
            .await?;
        Ok(())
    }

    async fn attach_members(&self, chats: Vec<Chat>) -> Result<Vec<ChatWithMembers>, Error> {
        let chat_ids: Vec<i64> = chats.iter().map(|c| c.id).collect();
        let mut members = self.members.find_members_by_chat_ids(&chat_ids).await?;

        Ok(chats
            .into_iter()
            .map(|chat| {
                let members = members.remove(&chat.id).unwrap_or_default();
                ChatWithMembers { chat, members }
            })
            .collect())
    }
}

impl Read<Chat, i64> for ChatRepository {
    #[instrument(skip(self), fields(chat_id = %id))]
    async fn read(&self, id: &i64) -> Result<Option<Chat>, Error> {
        debug!("Reading chat by id");
        let chat = sqlx::query_as::<_, Chat>(
            "SELECT id, name, status, updated_at FROM chats WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.connection_pool)
        .await?;

        if chat.is_some() {
            debug!("Chat found");
        } else {
            debug!("Chat not found");
        }

        Ok(chat)
    }
}
