//! Ownership checks layered on top of the role guard.
//!
//! The route guard only answers "may this role call the endpoint at all".
//! Endpoints that expose one user's data additionally call
//! [`ensure_owner_or`] with the owning user id.

use crate::api::v1::extractors::AuthCtx;
use crate::error::AppError;
use crate::services::auth::RoleSet;

/// Admit the owning subject, or any caller whose role is in `privileged`.
pub fn ensure_owner_or(ctx: &AuthCtx, owner_id: i64, privileged: &RoleSet) -> Result<(), AppError> {
    if ctx.user_id == owner_id || privileged.contains(&ctx.role) {
        return Ok(());
    }

    tracing::debug!(
        user_id = ctx.user_id,
        owner_id,
        role = %ctx.role,
        "ownership check failed"
    );
    Err(AppError::forbidden(format!(
        "access denied: only the owner or roles {privileged} may access this resource"
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    fn admins() -> RoleSet {
        RoleSet::parse("ADMINISTRADOR").unwrap()
    }

    #[test]
    fn owner_is_admitted() {
        let ctx = AuthCtx::new(7, "CLIENTE");
        assert!(ensure_owner_or(&ctx, 7, &admins()).is_ok());
    }

    #[test]
    fn privileged_role_is_admitted_for_any_owner() {
        let ctx = AuthCtx::new(1, "administrador");
        assert!(ensure_owner_or(&ctx, 99, &admins()).is_ok());
    }

    #[test]
    fn other_users_are_forbidden() {
        let ctx = AuthCtx::new(8, "CLIENTE");
        let err = ensure_owner_or(&ctx, 7, &admins()).unwrap_err();
        assert_eq!(err.status(), StatusCode::FORBIDDEN);
    }
}
