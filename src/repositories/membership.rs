//! MembershipRepository - relazione molti-a-molti utente <-> chat (tabella userchats)

use super::PoolType;
use crate::entities::User;
use sqlx::{Error, QueryBuilder, Sqlite, SqliteConnection};
use std::collections::HashMap;
use tracing::{debug, instrument};

// MEMBERSHIP REPO
#[derive(Clone)]
pub struct MembershipRepository {
    connection_pool: PoolType,
}

impl MembershipRepository {
    pub fn new(connection_pool: PoolType) -> Self {
        Self { connection_pool }
    }

    /// Check if user is member of chat. Always hits the database, nothing is cached.
    #[instrument(skip(self))]
    pub async fn is_member(&self, chat_id: i64, user_id: &str) -> Result<bool, Error> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM userchats WHERE chat_id = ? AND user_id = ?",
        )
        .bind(chat_id)
        .bind(user_id)
        .fetch_one(&self.connection_pool)
        .await?;

        Ok(count > 0)
    }

    /// Idempotent: adding an existing member is a no-op.
    ///
    /// # Returns
    /// `true` if a new membership row was inserted
    #[instrument(skip(self))]
    pub async fn ensure_member(&self, chat_id: i64, user_id: &str) -> Result<bool, Error> {
        let mut conn = self.connection_pool.acquire().await?;
        Self::insert_member(&mut conn, chat_id, user_id).await
    }

    /// Same as [`ensure_member`](Self::ensure_member) but on a caller-owned connection,
    /// so it can run inside a transaction.
    pub async fn insert_member(
        conn: &mut SqliteConnection,
        chat_id: i64,
        user_id: &str,
    ) -> Result<bool, Error> {
        let result = sqlx::query(
            r#"
            INSERT INTO userchats (chat_id, user_id)
            VALUES (?, ?)
            ON CONFLICT (user_id, chat_id) DO NOTHING
            "#,
        )
        .bind(chat_id)
        .bind(user_id)
        .execute(conn)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Members of each of the given chats, keyed by chat id, each list ordered by join order
    #[instrument(skip(self, chat_ids), fields(chats = chat_ids.len()))]
    pub async fn find_members_by_chat_ids(
        &self,
        chat_ids: &[i64],
    ) -> Result<HashMap<i64, Vec<User>>, Error> {
        let mut members: HashMap<i64, Vec<User>> = HashMap::new();
        if chat_ids.is_empty() {
            return Ok(members);
        }

        let mut query_builder = QueryBuilder::<Sqlite>::new(
            r#"
            SELECT uc.chat_id, u.id, u.username, u.password, u.photo_url
            FROM userchats uc
            INNER JOIN users u ON u.id = uc.user_id
            WHERE uc.chat_id IN (
            "#,
        );
        let mut separated = query_builder.separated(", ");
        for chat_id in chat_ids {
            separated.push_bind(*chat_id);
        }
        separated.push_unseparated(") ORDER BY uc.chat_id ASC, uc.id ASC");

        let rows = query_builder
            .build_query_as::<MemberRow>()
            .fetch_all(&self.connection_pool)
            .await?;

        debug!("Loaded {} membership rows", rows.len());

        for row in rows {
            members.entry(row.chat_id).or_default().push(row.user);
        }
        Ok(members)
    }
}

#[derive(sqlx::FromRow)]
struct MemberRow {
    chat_id: i64,
    #[sqlx(flatten)]
    user: User,
}
