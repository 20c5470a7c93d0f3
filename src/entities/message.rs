//! Message entity - Entità messaggio

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Serialize, Deserialize, Debug, Clone, FromRow)]
pub struct Message {
    pub id: i64,
    pub text: String,
    // non esiste un vero ack di consegna, è sempre true
    pub is_delivered: bool,
    pub time_delivered: DateTime<Utc>,
    pub chat_id: i64,
    pub sender_id: String,
    pub receiver_id: Option<String>,
}
