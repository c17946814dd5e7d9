pub mod blogs;
pub mod categories;
pub mod comments;
pub mod health;
pub mod likes;
pub mod login;
pub mod reactions;
pub mod replies;
pub mod tags;
pub mod users;

use inkpost_core::authorization::{Principal, ResourceKind};
use inkpost_core::representation::{select_schema, CallerContext, FieldSet, Operation, Scope};

fn field_set(
    kind: ResourceKind,
    operation: Operation,
    principal: &Principal,
    scope: Scope,
) -> FieldSet {
    select_schema(kind, operation, CallerContext::new(principal, scope))
}
