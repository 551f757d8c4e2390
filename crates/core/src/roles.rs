//! Role names used across the API layer.

/// Full administrative access, including user management.
pub const ROLE_ADMIN: &str = "admin";

/// Regular account: owns and manages its own lockers, categories, and items.
pub const ROLE_USER: &str = "user";

/// Returns `true` if `role` is one of the known role names.
pub fn is_valid_role(role: &str) -> bool {
    role == ROLE_ADMIN || role == ROLE_USER
}
