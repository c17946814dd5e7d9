use serde::Serialize;

pub type UserId = i64;

/// Snapshot of an authenticated account taken when a request is resolved
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Identity {
    pub id: UserId,
    pub username: String,
    pub is_staff: bool,
}

/// The caller of a request
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Principal {
    #[default]
    Anonymous,
    User(Identity),
}

impl Principal {
    pub fn user(id: UserId, username: impl Into<String>, is_staff: bool) -> Self {
        Principal::User(Identity {
            id,
            username: username.into(),
            is_staff,
        })
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, Principal::User(_))
    }

    pub fn is_staff(&self) -> bool {
        matches!(self, Principal::User(identity) if identity.is_staff)
    }

    pub fn id(&self) -> Option<UserId> {
        match self {
            Principal::User(identity) => Some(identity.id),
            Principal::Anonymous => None,
        }
    }

    pub fn identity(&self) -> Option<&Identity> {
        match self {
            Principal::User(identity) => Some(identity),
            Principal::Anonymous => None,
        }
    }

    /// Name used in log lines
    pub fn display_name(&self) -> &str {
        match self {
            Principal::User(identity) => &identity.username,
            Principal::Anonymous => "anonymous",
        }
    }
}

/// The object an action is aimed at, reduced to what access control needs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    /// A resource owned by the given account
    OwnedBy(UserId),
    /// An account itself
    Account(UserId),
    /// A resource without owner
    Unowned,
}

/// Implemented by every entity that has exactly one author
pub trait Authored {
    fn author(&self) -> UserId;

    fn target(&self) -> Target {
        Target::OwnedBy(self.author())
    }
}
