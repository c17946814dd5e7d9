use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::authorization::{Identity, Principal, Target, UserId};

pub const USERNAME_MAX_LENGTH: usize = 150;
pub const NAME_MAX_LENGTH: usize = 150;

/// Accounts are never removed, only deactivated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountState {
    Active,
    Deactivated,
}

/// Stored form of a password
#[derive(Clone, PartialEq, Eq)]
pub enum Credential {
    Hashed(String),
    /// Never matches any password
    Unusable,
}

impl Credential {
    pub fn is_usable(&self) -> bool {
        matches!(self, Credential::Hashed(_))
    }
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Credential::Hashed(_) => f.write_str("Credential::Hashed(****)"),
            Credential::Unusable => f.write_str("Credential::Unusable"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub credential: Credential,
    pub is_staff: bool,
    pub state: AccountState,
    pub last_login: Option<DateTime<Utc>>,
    pub date_joined: DateTime<Utc>,
}

impl User {
    pub fn is_active(&self) -> bool {
        self.state == AccountState::Active
    }

    /// Staff accounts are not offered for deletion
    pub fn deletable(&self) -> bool {
        !self.is_staff
    }

    pub fn target(&self) -> Target {
        Target::Account(self.id)
    }

    pub fn principal(&self) -> Principal {
        Principal::User(Identity {
            id: self.id,
            username: self.username.clone(),
            is_staff: self.is_staff,
        })
    }
}

/// Body of `POST /users/` and `PUT|PATCH /users/{id}/`
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[cfg_attr(feature = "utoipa", derive(utoipa::ToSchema))]
pub struct UserWriteRequest {
    #[validate(
        length(max = 150, message = "Ensure this field has no more than 150 characters."),
        custom(function = "validate_username")
    )]
    pub username: Option<String>,
    #[validate(length(max = 150, message = "Ensure this field has no more than 150 characters."))]
    pub first_name: Option<String>,
    #[validate(length(max = 150, message = "Ensure this field has no more than 150 characters."))]
    pub last_name: Option<String>,
    #[validate(email(message = "Enter a valid email address."))]
    pub email: Option<String>,
    #[validate(length(max = 128, message = "Ensure this field has no more than 128 characters."))]
    pub password: Option<String>,
}

/// Letters, digits and `@.+-_` only
fn validate_username(username: &str) -> Result<(), validator::ValidationError> {
    let valid = username
        .chars()
        .all(|c| c.is_alphanumeric() || matches!(c, '@' | '.' | '+' | '-' | '_'));
    if valid {
        Ok(())
    } else {
        let mut error = validator::ValidationError::new("invalid_username");
        error.message = Some(
            concat!(
                "Enter a valid username. This value may contain only letters, ",
                "numbers, and @/./+/-/_ characters."
            )
            .into(),
        );
        Err(error)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[cfg_attr(feature = "utoipa", derive(utoipa::ToSchema))]
pub struct LoginRequest {
    pub username: Option<String>,
    pub password: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(username: &str, email: &str) -> UserWriteRequest {
        UserWriteRequest {
            username: Some(username.to_string()),
            email: Some(email.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_username_characters() {
        assert!(request("alice.b+test@x_y-z", "a@example.com").validate().is_ok());
        let errors = request("alice smith", "a@example.com").validate().unwrap_err();
        assert!(errors.field_errors().contains_key("username"));
    }

    #[test]
    fn test_email_format() {
        let errors = request("alice", "not-an-email").validate().unwrap_err();
        assert!(errors.field_errors().contains_key("email"));
    }

    #[test]
    fn test_credential_debug_is_masked() {
        let credential = Credential::Hashed("$2b$04$secret".to_string());
        assert_eq!(format!("{credential:?}"), "Credential::Hashed(****)");
        assert!(credential.is_usable());
        assert!(!Credential::Unusable.is_usable());
    }
}
