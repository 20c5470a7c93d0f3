//! UserRepository - Repository per la gestione degli utenti

use super::{Create, Delete, PoolType, Read, Update};
use crate::dtos::{CreateUserDTO, UpdateUserDTO};
use crate::entities::User;
use sqlx::{Error, QueryBuilder, Sqlite};
use tracing::{debug, info, instrument};
use uuid::Uuid;

// USER REPO
#[derive(Clone)]
pub struct UserRepository {
    connection_pool: PoolType,
}

impl UserRepository {
    pub fn new(connection_pool: PoolType) -> UserRepository {
        Self { connection_pool }
    }

    /// Find user by exact username match (usernames are unique and case-sensitive)
    #[instrument(skip(self))]
    pub async fn find_by_username(&self, username: &str) -> Result<Option<User>, Error> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, username, password, photo_url FROM users WHERE username = ?",
        )
        .bind(username)
        .fetch_optional(&self.connection_pool)
        .await?;

        Ok(user)
    }

    /// Lookup by id first, then by username
    #[instrument(skip(self))]
    pub async fn find_by_identifier(&self, identifier: &str) -> Result<Option<User>, Error> {
        if let Some(user) = self.read(&identifier.to_string()).await? {
            return Ok(Some(user));
        }
        self.find_by_username(identifier).await
    }

    #[instrument(skip(self))]
    pub async fn find_all(&self) -> Result<Vec<User>, Error> {
        let users = sqlx::query_as::<_, User>(
            "SELECT id, username, password, photo_url FROM users ORDER BY username ASC",
        )
        .fetch_all(&self.connection_pool)
        .await?;

        debug!("Loaded {} users", users.len());
        Ok(users)
    }
}

impl Create<User, CreateUserDTO> for UserRepository {
    /// `data.password` must already be a bcrypt hash.
    #[instrument(skip(self, data), fields(username = %data.username))]
    async fn create(&self, data: &CreateUserDTO) -> Result<User, Error> {
        // id generato a ogni chiamata, mai un default condiviso
        let id = Uuid::new_v4().to_string();

        sqlx::query("INSERT INTO users (id, username, password, photo_url) VALUES (?, ?, ?, ?)")
            .bind(&id)
            .bind(&data.username)
            .bind(&data.password)
            .bind(&data.photo_url)
            .execute(&self.connection_pool)
            .await?;

        info!("User created with id {}", id);

        Ok(User {
            id,
            username: data.username.clone(),
            password: data.password.clone(),
            photo_url: data.photo_url.clone(),
        })
    }
}

impl Read<User, String> for UserRepository {
    async fn read(&self, id: &String) -> Result<Option<User>, Error> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, username, password, photo_url FROM users WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.connection_pool)
        .await?;

        Ok(user)
    }
}

impl Update<User, UpdateUserDTO, String> for UserRepository {
    /// `data.password`, when present, must already be a bcrypt hash.
    #[instrument(skip(self, data), fields(user_id = %id))]
    async fn update(&self, id: &String, data: &UpdateUserDTO) -> Result<User, Error> {
        let current_user = self.read(id).await?.ok_or(Error::RowNotFound)?;

        if data.username.is_none() && data.password.is_none() && data.photo_url.is_none() {
            debug!("No fields to update, returning current user");
            return Ok(current_user);
        }

        let mut query_builder = QueryBuilder::<Sqlite>::new("UPDATE users SET ");

        let mut separated = query_builder.separated(", ");
        if let Some(ref username) = data.username {
            separated.push("username = ");
            separated.push_bind_unseparated(username);
        }
        if let Some(ref password) = data.password {
            separated.push("password = ");
            separated.push_bind_unseparated(password);
        }
        if let Some(ref photo_url) = data.photo_url {
            separated.push("photo_url = ");
            separated.push_bind_unseparated(photo_url);
        }

        query_builder.push(" WHERE id = ");
        query_builder.push_bind(id);

        query_builder.build().execute(&self.connection_pool).await?;

        info!("User updated successfully");

        self.read(id).await?.ok_or(Error::RowNotFound)
    }
}

impl Delete<String> for UserRepository {
    /// Hard delete. Memberships and sent messages go with the user (ON DELETE CASCADE),
    /// received messages keep living with `receiver_id = NULL`.
    #[instrument(skip(self), fields(user_id = %id))]
    async fn delete(&self, id: &String) -> Result<bool, Error> {
        let result = sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(id)
            .execute(&self.connection_pool)
            .await?;

        let deleted = result.rows_affected() > 0;
        if deleted {
            info!("User deleted");
        } else {
            debug!("No user to delete");
        }
        Ok(deleted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::SqlitePool;

    const ALICE: &str = "11111111-1111-4111-8111-111111111111";

    #[sqlx::test(fixtures(path = "../../fixtures", scripts("users")))]
    async fn test_find_by_username_is_case_sensitive(pool: SqlitePool) -> sqlx::Result<()> {
        let repo = UserRepository::new(pool);

        let alice = repo.find_by_username("alice").await?;
        assert_eq!(alice.map(|u| u.id), Some(ALICE.to_string()));

        assert!(repo.find_by_username("Alice").await?.is_none());
        Ok(())
    }

    #[sqlx::test(fixtures(path = "../../fixtures", scripts("users")))]
    async fn test_find_by_identifier_accepts_id_or_username(pool: SqlitePool) -> sqlx::Result<()> {
        let repo = UserRepository::new(pool);

        let by_id = repo.find_by_identifier(ALICE).await?.unwrap();
        let by_name = repo.find_by_identifier("alice").await?.unwrap();
        assert_eq!(by_id, by_name);

        assert!(repo.find_by_identifier("nobody").await?.is_none());
        Ok(())
    }

    #[sqlx::test(fixtures(path = "../../fixtures", scripts("users")))]
    async fn test_create_generates_distinct_ids(pool: SqlitePool) -> sqlx::Result<()> {
        let repo = UserRepository::new(pool);

        let first = repo
            .create(&CreateUserDTO {
                username: "dave".to_string(),
                password: "hash".to_string(),
                photo_url: None,
            })
            .await?;
        let second = repo
            .create(&CreateUserDTO {
                username: "erin".to_string(),
                password: "hash".to_string(),
                photo_url: None,
            })
            .await?;

        assert_ne!(first.id, second.id);
        assert_eq!(repo.find_all().await?.len(), 5);
        Ok(())
    }

    #[sqlx::test(fixtures(path = "../../fixtures", scripts("users")))]
    async fn test_create_duplicate_username_is_unique_violation(pool: SqlitePool) -> sqlx::Result<()> {
        let repo = UserRepository::new(pool);

        let result = repo
            .create(&CreateUserDTO {
                username: "alice".to_string(),
                password: "hash".to_string(),
                photo_url: None,
            })
            .await;

        match result {
            Err(Error::Database(db_err)) => assert!(db_err.is_unique_violation()),
            other => panic!("expected unique violation, got {:?}", other.map(|u| u.id)),
        }
        Ok(())
    }

    #[sqlx::test(fixtures(path = "../../fixtures", scripts("users")))]
    async fn test_update_only_touches_given_fields(pool: SqlitePool) -> sqlx::Result<()> {
        let repo = UserRepository::new(pool);

        let updated = repo
            .update(
                &ALICE.to_string(),
                &UpdateUserDTO {
                    photo_url: Some("https://example.com/new.png".to_string()),
                    ..Default::default()
                },
            )
            .await?;

        assert_eq!(updated.username, "alice");
        assert_eq!(updated.photo_url.as_deref(), Some("https://example.com/new.png"));
        Ok(())
    }

    #[sqlx::test(fixtures(path = "../../fixtures", scripts("users", "chats", "messages")))]
    async fn test_delete_cascades_memberships_and_sent_messages(pool: SqlitePool) -> sqlx::Result<()> {
        let repo = UserRepository::new(pool.clone());

        assert!(repo.delete(&ALICE.to_string()).await?);
        assert!(!repo.delete(&ALICE.to_string()).await?);

        let memberships: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM userchats WHERE user_id = ?")
            .bind(ALICE)
            .fetch_one(&pool)
            .await?;
        assert_eq!(memberships, 0);

        let sent: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM messages WHERE sender_id = ?")
            .bind(ALICE)
            .fetch_one(&pool)
            .await?;
        assert_eq!(sent, 0);

        // i messaggi degli altri restano
        let remaining: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM messages")
            .fetch_one(&pool)
            .await?;
        assert_eq!(remaining, 2);
        Ok(())
    }
}
