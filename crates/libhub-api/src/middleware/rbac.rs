//! RBAC helpers for role-based route guarding.

use libhub_core::error::AppError;

use crate::extractors::AuthUser;

/// Checks that the authenticated user has the Admin role.
pub fn require_admin(auth: &AuthUser) -> Result<(), AppError> {
    if !auth.is_admin() {
        return Err(AppError::authorization(
            "You do not have permission to perform this action",
        ));
    }
    Ok(())
}

/// Checks that the authenticated user has the Student role.
pub fn require_student(auth: &AuthUser) -> Result<(), AppError> {
    if !auth.is_student() {
        return Err(AppError::authorization("Only students can view their own history"));
    }
    Ok(())
}
