//! MessageRepository - Repository per la gestione dei messaggi

use super::{ChatRepository, PoolType};
use crate::core::gateway::{ChatAction, ChatGrant, MessageScope};
use crate::dtos::{MessageFilter, TimeFilter};
use crate::entities::Message;
use chrono::Utc;
use sqlx::{Error, QueryBuilder, Sqlite};
use tracing::{debug, info, instrument};

const MESSAGE_COLUMNS: &str =
    "m.id, m.text, m.is_delivered, m.time_delivered, m.chat_id, m.sender_id, m.receiver_id";

// MESSAGE REPO
#[derive(Clone)]
pub struct MessageRepository {
    connection_pool: PoolType,
}

impl MessageRepository {
    pub fn new(connection_pool: PoolType) -> Self {
        Self { connection_pool }
    }

    /// Appends a message to the chat of `grant`, sent by the grant's user.
    ///
    /// `time_delivered` is the insertion instant and `is_delivered` is always true.
    /// The chat's `updated_at` is bumped in the same transaction.
    #[instrument(skip(self, grant, text), fields(chat_id = grant.chat_id(), sender_id = %grant.user_id()))]
    pub async fn create(&self, grant: &ChatGrant, text: &str) -> Result<Message, Error> {
        debug_assert_eq!(grant.action(), ChatAction::SendMessage);

        let now = Utc::now();
        let mut tx = self.connection_pool.begin().await?;

        let result = sqlx::query(
            r#"
            INSERT INTO messages (text, is_delivered, time_delivered, chat_id, sender_id, receiver_id)
            VALUES (?, ?, ?, ?, ?, NULL)
            "#,
        )
        .bind(text)
        .bind(true)
        .bind(now)
        .bind(grant.chat_id())
        .bind(grant.user_id())
        .execute(&mut *tx)
        .await?;
        let new_id = result.last_insert_rowid();

        ChatRepository::touch(&mut tx, grant.chat_id(), now).await?;

        tx.commit().await?;

        info!("Message {} stored", new_id);

        Ok(Message {
            id: new_id,
            text: text.to_string(),
            is_delivered: true,
            time_delivered: now,
            chat_id: grant.chat_id(),
            sender_id: grant.user_id().to_string(),
            receiver_id: None,
        })
    }

    /// Get all messages of the grant's chat, in insertion order
    #[instrument(skip(self, grant), fields(chat_id = grant.chat_id()))]
    pub async fn find_many_by_chat(&self, grant: &ChatGrant) -> Result<Vec<Message>, Error> {
        let messages = sqlx::query_as::<_, Message>(&format!(
            "SELECT {} FROM messages m WHERE m.chat_id = ? ORDER BY m.id ASC",
            MESSAGE_COLUMNS
        ))
        .bind(grant.chat_id())
        .fetch_all(&self.connection_pool)
        .await?;

        debug!("Retrieved {} messages", messages.len());
        Ok(messages)
    }

    /// Filter-based scan. Absent filters impose no constraint; non-admin scopes only
    /// see messages of chats they belong to.
    #[instrument(skip(self, scope))]
    pub async fn find_filtered(
        &self,
        scope: &MessageScope,
        filter: &MessageFilter,
    ) -> Result<Vec<Message>, Error> {
        let mut query_builder = QueryBuilder::<Sqlite>::new(format!(
            "SELECT {} FROM messages m WHERE 1 = 1",
            MESSAGE_COLUMNS
        ));

        if let Some(user_id) = scope.member_of() {
            query_builder.push(" AND m.chat_id IN (SELECT chat_id FROM userchats WHERE user_id = ");
            query_builder.push_bind(user_id);
            query_builder.push(")");
        }
        if let Some(ref sender_id) = filter.sender_id {
            query_builder.push(" AND m.sender_id = ");
            query_builder.push_bind(sender_id);
        }
        if let Some(ref receiver_id) = filter.receiver_id {
            query_builder.push(" AND m.receiver_id = ");
            query_builder.push_bind(receiver_id);
        }
        match &filter.time_delivered {
            Some(TimeFilter::At(instant)) => {
                query_builder.push(" AND m.time_delivered = ");
                query_builder.push_bind(*instant);
            }
            Some(day @ TimeFilter::Day(_)) => {
                if let Some((start, end)) = day.day_bounds() {
                    query_builder.push(" AND m.time_delivered >= ");
                    query_builder.push_bind(start);
                    query_builder.push(" AND m.time_delivered < ");
                    query_builder.push_bind(end);
                }
            }
            None => {}
        }
        query_builder.push(" ORDER BY m.id ASC");

        let messages = query_builder
            .build_query_as::<Message>()
            .fetch_all(&self.connection_pool)
            .await?;

        debug!("Filter matched {} messages", messages.len());
        Ok(messages)
    }
}
