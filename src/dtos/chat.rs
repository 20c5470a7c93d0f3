//! Chat DTOs - Data Transfer Objects per chat

use super::UserDTO;
use crate::entities::ChatWithMembers;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Chat restituita al client, con la lista dei membri
#[derive(Serialize, Deserialize, Debug)]
pub struct ChatDTO {
    pub id: i64,
    pub name: String,
    pub status: i16,
    pub updated_at: DateTime<Utc>,
    pub users: Vec<UserDTO>,
}

impl From<ChatWithMembers> for ChatDTO {
    fn from(value: ChatWithMembers) -> Self {
        Self {
            id: value.chat.id,
            name: value.chat.name,
            status: value.chat.status,
            updated_at: value.chat.updated_at,
            users: value.members.into_iter().map(UserDTO::from).collect(),
        }
    }
}

/// Body di POST /chat/create_chat
#[derive(Serialize, Deserialize, Debug, Clone, Validate)]
pub struct CreateChatDTO {
    #[validate(length(min = 1, max = 100, message = "Chat name must be between 1 and 100 characters"))]
    pub name: String,

    pub status: i16,

    #[validate(length(min = 1, max = 500, message = "A chat needs between 1 and 500 members"))]
    pub users: Vec<String>,
}

/// Un altro membro di una chat dal punto di vista di chi chiede
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ChatPartnerDTO {
    pub user_id: String,
    pub username: String,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct ChatPartnerSummaryDTO {
    pub chat_id: i64,
    pub chat_name: String,
    pub status: i16,
    pub partners: Vec<ChatPartnerDTO>,
}

impl ChatPartnerSummaryDTO {
    /// Builds the summary of `chat` as seen by `viewer_id`, who is left out of `partners`.
    pub fn for_viewer(chat: ChatWithMembers, viewer_id: &str) -> Self {
        Self {
            chat_id: chat.chat.id,
            chat_name: chat.chat.name,
            status: chat.chat.status,
            partners: chat
                .members
                .into_iter()
                .filter(|member| member.id != viewer_id)
                .map(|member| ChatPartnerDTO {
                    user_id: member.id,
                    username: member.username,
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{Chat, User};

    fn user(id: &str, username: &str) -> User {
        User {
            id: id.to_string(),
            username: username.to_string(),
            password: String::new(),
            photo_url: None,
        }
    }

    #[test]
    fn test_partner_summary_excludes_viewer() {
        let chat = ChatWithMembers {
            chat: Chat {
                id: 7,
                name: "room".to_string(),
                status: 1,
                updated_at: Utc::now(),
            },
            members: vec![user("a", "alice"), user("b", "bob"), user("c", "charlie")],
        };

        let summary = ChatPartnerSummaryDTO::for_viewer(chat, "a");

        assert_eq!(summary.chat_id, 7);
        assert_eq!(summary.chat_name, "room");
        assert_eq!(summary.partners.len(), 2);
        assert!(summary.partners.iter().all(|p| p.user_id != "a"));
    }

    #[test]
    fn test_create_chat_dto_requires_members() {
        let dto = CreateChatDTO {
            name: "room".to_string(),
            status: 1,
            users: vec![],
        };
        assert!(dto.validate().is_err());
    }
}
