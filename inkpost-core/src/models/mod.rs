//! Entities of the blogging domain and the payloads that write them

pub mod blog;
pub mod discussion;
pub mod feedback;
pub mod tag;
pub mod user;

pub use blog::{Blog, BlogId, BlogWriteRequest, Category, CategoryId, CategoryWriteRequest};
pub use discussion::{Comment, CommentId, CommentWriteRequest, Reply, ReplyId, ReplyWriteRequest};
pub use feedback::{
    Like, LikeId, LikeWriteRequest, Reaction, ReactionId, ReactionType, ReactionWriteRequest,
};
pub use tag::{Tag, TagId, TagWriteRequest};
pub use user::{AccountState, Credential, LoginRequest, User, UserWriteRequest};
