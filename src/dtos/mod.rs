//! DTOs module - Data Transfer Objects
//!
//! Questo modulo contiene tutti i DTOs usati per la comunicazione client-server.
//! I DTOs separano la rappresentazione esterna (API) dalla rappresentazione interna (entities).

pub mod chat;
pub mod message;
pub mod query;
pub mod user;

pub use chat::{ChatDTO, ChatPartnerDTO, ChatPartnerSummaryDTO, CreateChatDTO};
pub use message::{MessageDTO, SendMessageDTO};
pub use query::{ChatMessagesQuery, MessageFilter, MessagesQuery, TimeFilter, UserIdentifierQuery};
pub use user::{
    CreateUserDTO, DeletedUserDTO, LoginForm, TokenDTO, UpdateUserDTO, UserDTO,
};
