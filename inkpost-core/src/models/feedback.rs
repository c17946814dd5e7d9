use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::blog::BlogId;
use super::discussion::CommentId;
use crate::authorization::{Authored, UserId};

pub type LikeId = i64;
pub type ReactionId = i64;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Like {
    pub id: LikeId,
    pub author: UserId,
    pub blog: BlogId,
    pub created_at: DateTime<Utc>,
}

impl Authored for Like {
    fn author(&self) -> UserId {
        self.author
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "utoipa", derive(utoipa::ToSchema))]
pub enum ReactionType {
    Like,
    Love,
    Haha,
    #[serde(rename = "WOW")]
    Wow,
    #[serde(rename = "SAD")]
    Sad,
    Angry,
}

impl ReactionType {
    pub fn all() -> Vec<ReactionType> {
        vec![
            ReactionType::Like,
            ReactionType::Love,
            ReactionType::Haha,
            ReactionType::Wow,
            ReactionType::Sad,
            ReactionType::Angry,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ReactionType::Like => "Like",
            ReactionType::Love => "Love",
            ReactionType::Haha => "Haha",
            ReactionType::Wow => "WOW",
            ReactionType::Sad => "SAD",
            ReactionType::Angry => "Angry",
        }
    }

    /// Exact, case-sensitive match on the stored value
    pub fn parse(s: &str) -> Option<ReactionType> {
        ReactionType::all().into_iter().find(|t| t.as_str() == s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reaction {
    pub id: ReactionId,
    pub author: UserId,
    /// Cleared when the blog is deleted
    pub blog: Option<BlogId>,
    /// Cleared when the comment is deleted
    pub comment: Option<CommentId>,
    pub reaction_type: ReactionType,
    pub given_at: DateTime<Utc>,
}

impl Authored for Reaction {
    fn author(&self) -> UserId {
        self.author
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "utoipa", derive(utoipa::ToSchema))]
pub struct LikeWriteRequest {
    pub blog: Option<BlogId>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "utoipa", derive(utoipa::ToSchema))]
pub struct ReactionWriteRequest {
    pub blog: Option<BlogId>,
    pub comment: Option<CommentId>,
    /// One of `Like`, `Love`, `Haha`, `WOW`, `SAD`, `Angry`
    pub reaction_type: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reaction_type_round_trips_stored_values() {
        for reaction in ReactionType::all() {
            assert_eq!(ReactionType::parse(reaction.as_str()), Some(reaction));
            assert_eq!(
                serde_json::to_value(reaction).unwrap(),
                serde_json::Value::String(reaction.as_str().to_string())
            );
        }
    }

    #[test]
    fn test_reaction_type_is_case_sensitive() {
        assert_eq!(ReactionType::parse("wow"), None);
        assert_eq!(ReactionType::parse("Wow"), None);
        assert_eq!(ReactionType::parse("WOW"), Some(ReactionType::Wow));
    }
}
