//! User DTOs - Data Transfer Objects per utenti

use crate::entities::User;
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use validator::Validate;

lazy_static! {
    static ref USERNAME_RE: Regex = Regex::new(r"^[A-Za-z0-9_.@-]+$").unwrap();
}

/// Rappresentazione pubblica di un utente, la password non esce mai dal server
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct UserDTO {
    pub id: String,
    pub username: String,
    pub photo_url: Option<String>,
}

impl From<User> for UserDTO {
    fn from(value: User) -> Self {
        Self {
            id: value.id,
            username: value.username,
            photo_url: value.photo_url,
        }
    }
}

/// Body di POST /auth/register. Nel repository `password` contiene già l'hash.
#[derive(Serialize, Deserialize, Debug, Clone, Validate)]
pub struct CreateUserDTO {
    #[validate(
        length(min = 1, max = 64, message = "Username must be between 1 and 64 characters"),
        regex(path = *USERNAME_RE, message = "Username may contain only letters, digits and _ . @ -")
    )]
    pub username: String,

    #[validate(length(min = 4, max = 128, message = "Password must be between 4 and 128 characters"))]
    pub password: String,

    #[validate(length(max = 2048, message = "Photo URL is too long"))]
    #[serde(default)]
    pub photo_url: Option<String>,
}

/// Aggiornamento parziale del profilo, solo i campi `Some(_)` vengono modificati
#[derive(Serialize, Deserialize, Debug, Clone, Default, Validate)]
pub struct UpdateUserDTO {
    #[validate(
        length(min = 1, max = 64, message = "Username must be between 1 and 64 characters"),
        regex(path = *USERNAME_RE, message = "Username may contain only letters, digits and _ . @ -")
    )]
    pub username: Option<String>,

    #[validate(length(min = 4, max = 128, message = "Password must be between 4 and 128 characters"))]
    pub password: Option<String>,

    #[validate(length(max = 2048, message = "Photo URL is too long"))]
    pub photo_url: Option<String>,
}

/// Form urlencoded di POST /auth/jwt/login
#[derive(Deserialize, Serialize, Debug)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct TokenDTO {
    pub access_token: String,
    pub token_type: String,
}

impl TokenDTO {
    pub fn bearer(access_token: String) -> Self {
        Self {
            access_token,
            token_type: "bearer".to_string(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug)]
pub struct DeletedUserDTO {
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_user_dto_rejects_bad_username() {
        let dto = CreateUserDTO {
            username: "bad name!".to_string(),
            password: "secret".to_string(),
            photo_url: None,
        };
        assert!(dto.validate().is_err());
    }

    #[test]
    fn test_create_user_dto_rejects_short_password() {
        let dto = CreateUserDTO {
            username: "testuser".to_string(),
            password: "abc".to_string(),
            photo_url: None,
        };
        assert!(dto.validate().is_err());
    }

    #[test]
    fn test_create_user_dto_accepts_valid_input() {
        let dto = CreateUserDTO {
            username: "test.user@home".to_string(),
            password: "testpassword".to_string(),
            photo_url: Some("https://example.com/me.png".to_string()),
        };
        assert!(dto.validate().is_ok());
    }

    #[test]
    fn test_user_dto_hides_password() {
        let user = User {
            id: "id-1".to_string(),
            username: "alice".to_string(),
            password: "$2b$12$hash".to_string(),
            photo_url: None,
        };
        let json = serde_json::to_value(UserDTO::from(user)).unwrap();
        assert!(json.get("password").is_none());
        assert_eq!(json["username"], "alice");
    }
}
