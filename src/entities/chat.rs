//! Chat entity - Entità chat

use super::User;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Serialize, Deserialize, Debug, Clone, FromRow)]
pub struct Chat {
    pub id: i64,
    pub name: String,
    // codice di stato opaco, il significato è deciso dal client
    pub status: i16,
    pub updated_at: DateTime<Utc>,
}

/// Chat insieme alla lista dei suoi membri correnti
#[derive(Debug, Clone)]
pub struct ChatWithMembers {
    pub chat: Chat,
    pub members: Vec<User>,
}
