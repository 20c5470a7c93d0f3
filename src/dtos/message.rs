//! Message DTOs - Data Transfer Objects per messaggi

use crate::entities::Message;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct MessageDTO {
    pub id: i64,
    pub text: String,
    pub is_delivered: bool,
    pub time_delivered: DateTime<Utc>,
    pub chat_id: i64,
    pub sender_id: String,
    pub receiver_id: Option<String>,
}

impl From<Message> for MessageDTO {
    fn from(value: Message) -> Self {
        Self {
            id: value.id,
            text: value.text,
            is_delivered: value.is_delivered,
            time_delivered: value.time_delivered,
            chat_id: value.chat_id,
            sender_id: value.sender_id,
            receiver_id: value.receiver_id,
        }
    }
}

/// Body di POST /messages/send_message, il mittente è sempre l'utente autenticato
#[derive(Serialize, Deserialize, Debug, Clone, Validate)]
pub struct SendMessageDTO {
    #[validate(length(min = 1, max = 5000, message = "Message text must be between 1 and 5000 characters"))]
    pub text: String,

    pub chat_id: i64,
}
