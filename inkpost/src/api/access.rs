use inkpost_core::authorization::{evaluate, Action, Decision, Principal, ResourceKind, Target};
use tracing::{debug, warn};

use crate::api::error::AppError;

/// Run the access control evaluator and turn a denial into an [`AppError`].
///
/// Handlers call this twice for object actions: once with `None` before the
/// object is loaded, then again with the loaded object's target.
pub fn authorize(
    principal: &Principal,
    action: Action,
    kind: ResourceKind,
    target: Option<&Target>,
) -> Result<(), AppError> {
    match evaluate(principal, action, kind, target) {
        Decision::Allow => {
            debug!(
                "Allowed {} on {} for {} (target: {:?})",
                action,
                kind,
                principal.display_name(),
                target
            );
            Ok(())
        }
        Decision::Deny(reason) => {
            warn!(
                "Denied {} on {} for {} (target: {:?}): {}",
                action,
                kind,
                principal.display_name(),
                target,
                reason
            );
            Err(reason.into())
        }
    }
}
