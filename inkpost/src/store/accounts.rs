use chrono::{DateTime, Utc};
use inkpost_core::authorization::UserId;
use inkpost_core::models::{AccountState, Credential, User};
use inkpost_core::validation::FieldErrors;
use tracing::info;

use super::{StoreError, StoreResult, Tables};

pub const USERNAME_TAKEN: &str = "A user with that username already exists.";

#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub credential: Credential,
    pub is_staff: bool,
}

/// Fields of an account that a write may change, `None` keeps the value
#[derive(Debug, Clone, Default)]
pub struct UserChanges {
    pub username: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub credential: Option<Credential>,
}

impl Tables {
    pub fn user(&self, id: UserId) -> Option<&User> {
        self.users.get(&id)
    }

    pub fn user_by_username(&self, username: &str) -> Option<&User> {
        self.users.values().find(|user| user.username == username)
    }

    pub fn users(&self) -> impl Iterator<Item = &User> {
        self.users.values()
    }

    fn check_username(&self, username: &str, except: Option<UserId>) -> FieldErrors {
        let taken = self
            .users
            .values()
            .any(|user| user.username == username && Some(user.id) != except);
        if taken {
            FieldErrors::single("username", USERNAME_TAKEN)
        } else {
            FieldErrors::new()
        }
    }

    pub fn insert_user(&mut self, new_user: NewUser) -> StoreResult<User> {
        self.check_username(&new_user.username, None).into_result()?;

        let user = User {
            id: self.user_ids.next_id(),
            username: new_user.username,
            first_name: new_user.first_name,
            last_name: new_user.last_name,
            email: new_user.email,
            credential: new_user.credential,
            is_staff: new_user.is_staff,
            state: AccountState::Active,
            last_login: None,
            date_joined: Utc::now(),
        };
        self.users.insert(user.id, user.clone());
        Ok(user)
    }

    pub fn update_user(&mut self, id: UserId, changes: UserChanges) -> StoreResult<User> {
        if let Some(username) = &changes.username {
            self.check_username(username, Some(id)).into_result()?;
        }

        let user = self.users.get_mut(&id).ok_or(StoreError::NotFound)?;
        if let Some(username) = changes.username {
            user.username = username;
        }
        if let Some(first_name) = changes.first_name {
            user.first_name = first_name;
        }
        if let Some(last_name) = changes.last_name {
            user.last_name = last_name;
        }
        if let Some(email) = changes.email {
            user.email = email;
        }
        if let Some(credential) = changes.credential {
            user.credential = credential;
        }
        Ok(user.clone())
    }

    /// Soft delete: the row stays, the account can no longer authenticate.
    /// Deactivating an already deactivated account is a no-op.
    pub fn deactivate_user(&mut self, id: UserId) -> StoreResult<()> {
        let user = self.users.get_mut(&id).ok_or(StoreError::NotFound)?;
        user.state = AccountState::Deactivated;
        user.credential = Credential::Unusable;

        let before = self.tokens.len();
        self.tokens.retain(|_, owner| *owner != id);
        info!(
            "Deactivated account {} and revoked {} token(s)",
            id,
            before - self.tokens.len()
        );
        Ok(())
    }

    pub fn issue_token(&mut self, user_id: UserId, token: String) {
        self.tokens.insert(token, user_id);
    }

    /// Existing token of an account, login hands out the same token twice
    pub fn token_of(&self, user_id: UserId) -> Option<&str> {
        self.tokens
            .iter()
            .find(|(_, owner)| **owner == user_id)
            .map(|(token, _)| token.as_str())
    }

    pub fn user_for_token(&self, token: &str) -> Option<&User> {
        self.tokens.get(token).and_then(|id| self.users.get(id))
    }

    pub fn record_login(&mut self, id: UserId, at: DateTime<Utc>) {
        if let Some(user) = self.users.get_mut(&id) {
            user.last_login = Some(at);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::fixtures;

    #[test]
    fn test_usernames_are_unique() {
        let mut tables = Tables::default();
        fixtures::user(&mut tables, "alice");

        let err = tables
            .insert_user(fixtures::new_user("alice", false))
            .unwrap_err();
        match err {
            StoreError::Invalid(errors) => {
                assert_eq!(errors.get("username").unwrap(), [USERNAME_TAKEN]);
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_rename_to_own_username_is_allowed() {
        let mut tables = Tables::default();
        let alice = fixtures::user(&mut tables, "alice");
        fixtures::user(&mut tables, "bob");

        let changes = UserChanges {
            username: Some("alice".to_string()),
            first_name: Some("Alice".to_string()),
            ..Default::default()
        };
        let updated = tables.update_user(alice.id, changes).unwrap();
        assert_eq!(updated.first_name, "Alice");

        let changes = UserChanges {
            username: Some("bob".to_string()),
            ..Default::default()
        };
        assert!(tables.update_user(alice.id, changes).is_err());
    }

    #[test]
    fn test_deactivation_revokes_tokens_and_keeps_row() {
        let mut tables = Tables::default();
        let alice = fixtures::user(&mut tables, "alice");
        let bob = fixtures::user(&mut tables, "bob");
        tables.issue_token(alice.id, "alice-token".to_string());
        tables.issue_token(bob.id, "bob-token".to_string());

        tables.deactivate_user(alice.id).unwrap();
        tables.deactivate_user(alice.id).unwrap();

        let alice = tables.user(alice.id).unwrap();
        assert!(!alice.is_active());
        assert!(!alice.credential.is_usable());
        assert!(tables.user_for_token("alice-token").is_none());
        assert!(tables.user_for_token("bob-token").is_some());
        assert_eq!(tables.deactivate_user(999), Err(StoreError::NotFound));
    }
}
