use serde::{Deserialize, Serialize};

/// Actions a principal can attempt against a resource
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "utoipa", derive(utoipa::ToSchema))]
#[serde(rename_all = "snake_case")]
pub enum Action {
    Create,
    Read,
    List,
    Update,
    Delete,
}

impl Action {
    /// Get all available actions
    pub fn all() -> Vec<Action> {
        vec![
            Action::Create,
            Action::Read,
            Action::List,
            Action::Update,
            Action::Delete,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Create => "create",
            Action::Read => "read",
            Action::List => "list",
            Action::Update => "update",
            Action::Delete => "delete",
        }
    }

    /// Parse from string
    pub fn parse(s: &str) -> Option<Action> {
        match s.to_lowercase().as_str() {
            "create" => Some(Action::Create),
            "read" | "retrieve" => Some(Action::Read),
            "list" => Some(Action::List),
            "update" | "partial_update" => Some(Action::Update),
            "delete" | "destroy" => Some(Action::Delete),
            _ => None,
        }
    }

    /// Whether the action mutates state
    pub fn is_write(&self) -> bool {
        matches!(self, Action::Create | Action::Update | Action::Delete)
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How ownership works for a kind of resource
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ownership {
    /// Carries exactly one immutable author
    Owned,
    /// No owner, only admins may change it
    Administrative,
    /// The account of a principal itself
    Account,
}

/// Every kind of resource exposed by the API
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "utoipa", derive(utoipa::ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    User,
    Category,
    Tag,
    Blog,
    Comment,
    Reply,
    Like,
    Reaction,
}

impl ResourceKind {
    pub fn all() -> Vec<ResourceKind> {
        vec![
            ResourceKind::User,
            ResourceKind::Category,
            ResourceKind::Tag,
            ResourceKind::Blog,
            ResourceKind::Comment,
            ResourceKind::Reply,
            ResourceKind::Like,
            ResourceKind::Reaction,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::User => "user",
            ResourceKind::Category => "category",
            ResourceKind::Tag => "tag",
            ResourceKind::Blog => "blog",
            ResourceKind::Comment => "comment",
            ResourceKind::Reply => "reply",
            ResourceKind::Like => "like",
            ResourceKind::Reaction => "reaction",
        }
    }

    pub fn ownership(&self) -> Ownership {
        match self {
            ResourceKind::Blog
            | ResourceKind::Comment
            | ResourceKind::Reply
            | ResourceKind::Like
            | ResourceKind::Reaction => Ownership::Owned,
            ResourceKind::Category | ResourceKind::Tag => Ownership::Administrative,
            ResourceKind::User => Ownership::Account,
        }
    }
}

impl std::fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
