//! Access control for the blogging API
//!
//! Every request is reduced to a principal, an action, a resource kind and
//! optionally the object it targets; [`evaluate`] turns that into a decision.

pub mod action;
pub mod evaluator;
pub mod principal;

pub use action::{Action, Ownership, ResourceKind};
pub use evaluator::{evaluate, AccessDenied, Decision};
pub use principal::{Authored, Identity, Principal, Target, UserId};
