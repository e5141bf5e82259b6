//! Authorization gate: minimum-role and owner-or-role checks.

use uuid::Uuid;

use blog_core::error::AppError;
use blog_entity::user::UserRole;

use super::principal::Principal;

/// Verdict of an authorization check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// The request may proceed.
    Allow,
    /// The identity lacks the required role or ownership.
    Deny,
}

impl Decision {
    /// Whether the request may proceed.
    pub fn is_allowed(self) -> bool {
        self == Self::Allow
    }

    fn from_bool(allowed: bool) -> Self {
        if allowed { Self::Allow } else { Self::Deny }
    }
}

/// Decides whether a principal may perform an action.
///
/// Role order is `user < staff < superuser` (see [`UserRole::rank`]).
#[derive(Debug, Clone, Copy, Default)]
pub struct AuthorizationGate;

impl AuthorizationGate {
    /// Create a gate.
    pub fn new() -> Self {
        Self
    }

    /// Allow iff the principal's rank is at least `minimum`'s.
    pub fn require_role<P: Principal + ?Sized>(
        &self,
        principal: &P,
        minimum: UserRole,
    ) -> Decision {
        Decision::from_bool(principal.role().has_at_least(minimum))
    }

    /// Allow iff the principal owns the resource or passes [`Self::require_role`].
    pub fn require_owner_or_role<P: Principal + ?Sized>(
        &self,
        principal: &P,
        owner_id: Uuid,
        minimum: UserRole,
    ) -> Decision {
        if principal.subject() == owner_id {
            return Decision::Allow;
        }
        self.require_role(principal, minimum)
    }

    /// [`Self::require_role`], denying with a `Forbidden` error.
    pub fn enforce_role<P: Principal + ?Sized>(
        &self,
        principal: &P,
        minimum: UserRole,
    ) -> Result<(), AppError> {
        match self.require_role(principal, minimum) {
            Decision::Allow => Ok(()),
            Decision::Deny => Err(AppError::forbidden(format!(
                "Role '{}' is insufficient; minimum required: '{minimum}'",
                principal.role()
            ))),
        }
    }

    /// [`Self::require_owner_or_role`], denying with a `Forbidden` error.
    pub fn enforce_owner_or_role<P: Principal + ?Sized>(
        &self,
        principal: &P,
        owner_id: Uuid,
        minimum: UserRole,
    ) -> Result<(), AppError> {
        match self.require_owner_or_role(principal, owner_id, minimum) {
            Decision::Allow => Ok(()),
            Decision::Deny => Err(AppError::forbidden(
                "Not enough permissions to modify this resource",
            )),
        }
    }
}
