//! Which fields a response or request body carries
//!
//! The choice depends on the resource kind, the operation, the role of the
//! caller and whether the request is scoped to one author. All of it lives in
//! [`select_schema`] so handlers never branch on these themselves.

use serde::Serialize;

use crate::authorization::{Principal, ResourceKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    Member,
}

impl Role {
    pub fn of(principal: &Principal) -> Role {
        if principal.is_staff() {
            Role::Admin
        } else {
            Role::Member
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Scope {
    /// Every resource of a kind, rendered with foreign keys only
    AllResources,
    /// The resources of one author, rendered for a profile page
    ScopedToAuthor,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallerContext {
    pub role: Role,
    pub scope: Scope,
}

impl CallerContext {
    pub fn new(principal: &Principal, scope: Scope) -> Self {
        Self {
            role: Role::of(principal),
            scope,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    Create,
    Update,
    List,
    Retrieve,
}

impl Operation {
    pub fn is_write(&self) -> bool {
        matches!(self, Operation::Create | Operation::Update)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum FieldSet {
    UserCreate,
    UserUpdate,
    UserProfile,
    UserAdminProfile,
    CategoryDetail,
    CategoryWrite,
    BlogCard,
    BlogReference,
    CommentReference,
    CommentProfile,
    ReplyReference,
    ReplyProfile,
    LikeReference,
    LikeProfile,
    ReactionReference,
    ReactionProfile,
    TagReference,
}

impl FieldSet {
    /// Top level field names, in output order
    pub fn fields(&self) -> &'static [&'static str] {
        match self {
            FieldSet::UserCreate | FieldSet::UserUpdate => {
                &["username", "first_name", "last_name", "email", "password"]
            }
            FieldSet::UserProfile => &[
                "id",
                "username",
                "first_name",
                "last_name",
                "email",
                "last_login",
                "deletable",
                "blogs_amount",
                "blogs",
            ],
            FieldSet::UserAdminProfile => &[
                "id",
                "username",
                "first_name",
                "last_name",
                "email",
                "last_login",
                "deletable",
                "blogs_amount",
                "blogs",
                "is_active",
                "is_staff",
            ],
            FieldSet::CategoryDetail => &["id", "name", "blogs"],
            FieldSet::CategoryWrite => &["id", "name"],
            FieldSet::BlogCard => &[
                "id",
                "category_name",
                "title",
                "description",
                "is_public",
                "posted_at",
                "len_blog_title",
            ],
            FieldSet::BlogReference => &[
                "id",
                "title",
                "description",
                "author",
                "category",
                "is_public",
                "posted_at",
                "slug",
            ],
            FieldSet::CommentReference => &["id", "author", "blog", "text", "created_at"],
            FieldSet::CommentProfile => &[
                "author_name",
                "blog_title",
                "blog",
                "text",
                "created_at",
                "updated_at",
                "reactions",
                "replies",
            ],
            FieldSet::ReplyReference => {
                &["id", "author", "comment", "text", "created_at", "updated_at"]
            }
            FieldSet::ReplyProfile => &["author", "comment", "text", "created_at", "updated_at"],
            FieldSet::LikeReference => &["id", "author", "blog", "created_at"],
            FieldSet::LikeProfile => &["author", "blog", "created_at"],
            FieldSet::ReactionReference => {
                &["id", "author", "blog", "comment", "reaction_type", "given_at"]
            }
            FieldSet::ReactionProfile => {
                &["author", "blog", "comment", "reaction_type", "given_at"]
            }
            FieldSet::TagReference => &["id", "name", "blogs", "comments"],
        }
    }

    /// Field sets that take a plaintext password on input
    pub fn accepts_credential(&self) -> bool {
        matches!(self, FieldSet::UserCreate | FieldSet::UserUpdate)
    }

    /// Field sets that embed related objects instead of their ids
    pub fn is_nested(&self) -> bool {
        matches!(
            self,
            FieldSet::UserProfile
                | FieldSet::UserAdminProfile
                | FieldSet::CategoryDetail
                | FieldSet::CommentProfile
                | FieldSet::LikeProfile
                | FieldSet::ReactionProfile
        )
    }
}

/// Select the field set for a resource, operation and caller.
///
/// Writes take the write-oriented set of the resource. Reads scoped to one
/// author take the nested profile set, unscoped reads the flat reference set.
/// Blogs always read as cards, whatever the scope.
pub fn select_schema(kind: ResourceKind, operation: Operation, ctx: CallerContext) -> FieldSet {
    use Operation::*;
    use ResourceKind as K;
    use Role::*;
    use Scope::*;

    match (kind, operation, ctx.role, ctx.scope) {
        (K::User, Create, _, _) => FieldSet::UserCreate,
        (K::User, Update, _, _) => FieldSet::UserUpdate,
        (K::User, List | Retrieve, Admin, _) => FieldSet::UserAdminProfile,
        (K::User, List | Retrieve, Member, _) => FieldSet::UserProfile,

        (K::Category, Create | Update, _, _) => FieldSet::CategoryWrite,
        (K::Category, List | Retrieve, _, _) => FieldSet::CategoryDetail,

        (K::Tag, _, _, _) => FieldSet::TagReference,

        (K::Blog, Create | Update, _, _) => FieldSet::BlogReference,
        (K::Blog, List | Retrieve, _, _) => FieldSet::BlogCard,

        (K::Comment, List | Retrieve, _, ScopedToAuthor) => FieldSet::CommentProfile,
        (K::Comment, _, _, _) => FieldSet::CommentReference,

        (K::Reply, List | Retrieve, _, ScopedToAuthor) => FieldSet::ReplyProfile,
        (K::Reply, _, _, _) => FieldSet::ReplyReference,

        (K::Like, List | Retrieve, _, ScopedToAuthor) => FieldSet::LikeProfile,
        (K::Like, _, _, _) => FieldSet::LikeReference,

        (K::Reaction, List | Retrieve, _, ScopedToAuthor) => FieldSet::ReactionProfile,
        (K::Reaction, _, _, _) => FieldSet::ReactionReference,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx(role: Role, scope: Scope) -> CallerContext {
        CallerContext { role, scope }
    }

    const OPERATIONS: [Operation; 4] = [
        Operation::Create,
        Operation::Update,
        Operation::List,
        Operation::Retrieve,
    ];

    #[test]
    fn test_only_account_writes_accept_a_password() {
        for kind in ResourceKind::all() {
            for operation in OPERATIONS {
                for role in [Role::Admin, Role::Member] {
                    for scope in [Scope::AllResources, Scope::ScopedToAuthor] {
                        let set = select_schema(kind, operation, ctx(role, scope));
                        let expects = kind == ResourceKind::User && operation.is_write();
                        assert_eq!(set.accepts_credential(), expects, "{set:?}");
                        assert_eq!(set.fields().contains(&"password"), expects, "{set:?}");
                    }
                }
            }
        }
    }

    #[test]
    fn test_account_reads_depend_on_role() {
        let member = select_schema(
            ResourceKind::User,
            Operation::Retrieve,
            ctx(Role::Member, Scope::AllResources),
        );
        let admin = select_schema(
            ResourceKind::User,
            Operation::List,
            ctx(Role::Admin, Scope::AllResources),
        );
        assert_eq!(member, FieldSet::UserProfile);
        assert_eq!(admin, FieldSet::UserAdminProfile);
        assert!(member.fields().contains(&"deletable"));
        assert!(member.fields().contains(&"blogs_amount"));
        assert!(!member.fields().contains(&"is_active"));
        assert!(admin.fields().contains(&"is_active"));
    }

    #[test]
    fn test_author_scope_selects_nested_sets() {
        let member = Role::Member;
        let cases = [
            (ResourceKind::Comment, FieldSet::CommentReference, FieldSet::CommentProfile),
            (ResourceKind::Reply, FieldSet::ReplyReference, FieldSet::ReplyProfile),
            (ResourceKind::Like, FieldSet::LikeReference, FieldSet::LikeProfile),
            (ResourceKind::Reaction, FieldSet::ReactionReference, FieldSet::ReactionProfile),
        ];
        for (kind, flat, nested) in cases {
            assert_eq!(
                select_schema(kind, Operation::List, ctx(member, Scope::AllResources)),
                flat
            );
            assert_eq!(
                select_schema(kind, Operation::List, ctx(member, Scope::ScopedToAuthor)),
                nested
            );
            // writes never take the nested shape
            assert_eq!(
                select_schema(kind, Operation::Create, ctx(member, Scope::ScopedToAuthor)),
                flat
            );
        }
    }

    #[test]
    fn test_blogs_read_as_cards_and_write_as_references() {
        for scope in [Scope::AllResources, Scope::ScopedToAuthor] {
            assert_eq!(
                select_schema(ResourceKind::Blog, Operation::List, ctx(Role::Member, scope)),
                FieldSet::BlogCard
            );
        }
        assert_eq!(
            select_schema(
                ResourceKind::Blog,
                Operation::Update,
                ctx(Role::Admin, Scope::AllResources)
            ),
            FieldSet::BlogReference
        );
        assert!(FieldSet::BlogCard.fields().contains(&"len_blog_title"));
        assert!(FieldSet::BlogReference.fields().contains(&"slug"));
    }

    #[test]
    fn test_reference_sets_are_flat() {
        for set in [
            FieldSet::BlogReference,
            FieldSet::CommentReference,
            FieldSet::ReplyReference,
            FieldSet::LikeReference,
            FieldSet::ReactionReference,
            FieldSet::TagReference,
        ] {
            assert!(!set.is_nested(), "{set:?}");
        }
        assert!(FieldSet::CommentProfile.is_nested());
    }
}
