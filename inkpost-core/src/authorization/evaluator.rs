use thiserror::Error;

use super::action::{Action, Ownership, ResourceKind};
use super::principal::{Identity, Principal, Target};

/// Why a request was denied
///
/// The two reasons must stay apart: the first one means "log in", the second
/// one means "you are logged in but may not do this".
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum AccessDenied {
    #[error("Authentication credentials were not provided.")]
    Unauthenticated,
    #[error("You do not have permission to perform this action.")]
    Forbidden,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny(AccessDenied),
}

impl Decision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Decision::Allow)
    }

    pub fn into_result(self) -> Result<(), AccessDenied> {
        match self {
            Decision::Allow => Ok(()),
            Decision::Deny(reason) => Err(reason),
        }
    }
}

const FORBIDDEN: Decision = Decision::Deny(AccessDenied::Forbidden);

/// Decide whether `principal` may perform `action` on a resource of `kind`.
///
/// Rules are applied in order and the first match wins:
/// 1. anonymous callers are always denied as unauthenticated
/// 2. staff accounts are always allowed
/// 3. owned resources: anyone may create, read and list; only the author may
///    update or delete
/// 4. categories are readable by everyone, tags by nobody but staff; neither
///    can be changed by non-staff
/// 5. accounts: only staff may create, list or delete; a user may read and
///    update their own account
///
/// `target` is `None` for the request-level check that runs before the object
/// is loaded. Object actions that depend on ownership pass that check and are
/// decided once the loaded object is supplied.
pub fn evaluate(
    principal: &Principal,
    action: Action,
    kind: ResourceKind,
    target: Option<&Target>,
) -> Decision {
    let identity = match principal {
        Principal::Anonymous => return Decision::Deny(AccessDenied::Unauthenticated),
        Principal::User(identity) => identity,
    };

    if identity.is_staff {
        return Decision::Allow;
    }

    match kind.ownership() {
        Ownership::Owned => evaluate_owned(identity, action, target),
        Ownership::Administrative => evaluate_administrative(kind, action),
        Ownership::Account => evaluate_account(identity, action, target),
    }
}

fn evaluate_owned(identity: &Identity, action: Action, target: Option<&Target>) -> Decision {
    match action {
        Action::Create | Action::Read | Action::List => Decision::Allow,
        Action::Update | Action::Delete => match target {
            None => Decision::Allow,
            Some(Target::OwnedBy(author)) if *author == identity.id => Decision::Allow,
            Some(_) => FORBIDDEN,
        },
    }
}

fn evaluate_administrative(kind: ResourceKind, action: Action) -> Decision {
    match (kind, action) {
        (ResourceKind::Category, Action::Read | Action::List) => Decision::Allow,
        _ => FORBIDDEN,
    }
}

fn evaluate_account(identity: &Identity, action: Action, target: Option<&Target>) -> Decision {
    match action {
        Action::Create | Action::List | Action::Delete => FORBIDDEN,
        Action::Read | Action::Update => match target {
            None => Decision::Allow,
            Some(Target::Account(id)) if *id == identity.id => Decision::Allow,
            Some(_) => FORBIDDEN,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALICE: i64 = 1;
    const BOB: i64 = 2;

    fn alice() -> Principal {
        Principal::user(ALICE, "alice", false)
    }

    fn admin() -> Principal {
        Principal::user(99, "admin", true)
    }

    fn owned_kinds() -> Vec<ResourceKind> {
        ResourceKind::all()
            .into_iter()
            .filter(|kind| kind.ownership() == Ownership::Owned)
            .collect()
    }

    #[test]
    fn test_anonymous_is_unauthenticated_everywhere() {
        for kind in ResourceKind::all() {
            for action in Action::all() {
                for target in [
                    None,
                    Some(Target::OwnedBy(ALICE)),
                    Some(Target::Account(ALICE)),
                    Some(Target::Unowned),
                ] {
                    assert_eq!(
                        evaluate(&Principal::Anonymous, action, kind, target.as_ref()),
                        Decision::Deny(AccessDenied::Unauthenticated),
                        "{action} on {kind}"
                    );
                }
            }
        }
    }

    #[test]
    fn test_staff_is_allowed_everything() {
        for kind in ResourceKind::all() {
            for action in Action::all() {
                for target in [
                    None,
                    Some(Target::OwnedBy(BOB)),
                    Some(Target::Account(BOB)),
                    Some(Target::Unowned),
                ] {
                    assert!(
                        evaluate(&admin(), action, kind, target.as_ref()).is_allowed(),
                        "{action} on {kind}"
                    );
                }
            }
        }
    }

    #[test]
    fn test_owned_resources_open_for_create_and_read() {
        for kind in owned_kinds() {
            for action in [Action::Create, Action::Read, Action::List] {
                assert!(evaluate(&alice(), action, kind, None).is_allowed());
                assert!(evaluate(&alice(), action, kind, Some(&Target::OwnedBy(BOB))).is_allowed());
            }
        }
    }

    #[test]
    fn test_owned_resources_change_only_by_author() {
        for kind in owned_kinds() {
            for action in [Action::Update, Action::Delete] {
                let own = Target::OwnedBy(ALICE);
                assert!(evaluate(&alice(), action, kind, Some(&own)).is_allowed());
                assert_eq!(
                    evaluate(&alice(), action, kind, Some(&Target::OwnedBy(BOB))),
                    Decision::Deny(AccessDenied::Forbidden)
                );
                // request-level check defers to the object check
                assert!(evaluate(&alice(), action, kind, None).is_allowed());
            }
        }
    }

    #[test]
    fn test_category_is_read_only_for_members() {
        assert!(evaluate(&alice(), Action::List, ResourceKind::Category, None).is_allowed());
        assert!(evaluate(
            &alice(),
            Action::Read,
            ResourceKind::Category,
            Some(&Target::Unowned)
        )
        .is_allowed());
        for action in [Action::Create, Action::Update, Action::Delete] {
            assert_eq!(
                evaluate(&alice(), action, ResourceKind::Category, None),
                Decision::Deny(AccessDenied::Forbidden)
            );
        }
    }

    #[test]
    fn test_tag_is_closed_for_members() {
        for action in Action::all() {
            assert_eq!(
                evaluate(&alice(), action, ResourceKind::Tag, None),
                Decision::Deny(AccessDenied::Forbidden),
                "{action} on tag"
            );
        }
    }

    #[test]
    fn test_account_self_service() {
        let own = Target::Account(ALICE);
        let other = Target::Account(BOB);

        assert!(evaluate(&alice(), Action::Read, ResourceKind::User, Some(&own)).is_allowed());
        assert!(evaluate(&alice(), Action::Update, ResourceKind::User, Some(&own)).is_allowed());
        assert_eq!(
            evaluate(&alice(), Action::Read, ResourceKind::User, Some(&other)),
            Decision::Deny(AccessDenied::Forbidden)
        );
        assert_eq!(
            evaluate(&alice(), Action::Update, ResourceKind::User, Some(&other)),
            Decision::Deny(AccessDenied::Forbidden)
        );

        for action in [Action::Create, Action::List] {
            assert_eq!(
                evaluate(&alice(), action, ResourceKind::User, None),
                Decision::Deny(AccessDenied::Forbidden)
            );
        }
        // not even their own account
        assert_eq!(
            evaluate(&alice(), Action::Delete, ResourceKind::User, Some(&own)),
            Decision::Deny(AccessDenied::Forbidden)
        );
    }

    #[test]
    fn test_decision_into_result() {
        assert_eq!(Decision::Allow.into_result(), Ok(()));
        assert_eq!(
            Decision::Deny(AccessDenied::Forbidden).into_result(),
            Err(AccessDenied::Forbidden)
        );
        assert_eq!(
            AccessDenied::Unauthenticated.to_string(),
            "Authentication credentials were not provided."
        );
    }
}
