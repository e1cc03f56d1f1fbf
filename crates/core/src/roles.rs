//! Well-known role names and allow-list matching.
//!
//! Role strings are stored verbatim in the `users` table and in session
//! payloads. All comparisons are case-insensitive so seed data written as
//! `"admin"` and `"Admin"` behave identically.

/// Default role assigned at signup.
pub const ROLE_USER: &str = "user";
/// Elevated role with user-management access.
pub const ROLE_ADMIN: &str = "Admin";
/// Highest role. SuperAdmin rows cannot be demoted, deactivated, or deleted.
pub const ROLE_SUPERADMIN: &str = "SuperAdmin";

/// Check whether `role` appears in `allowed`, ignoring ASCII case.
pub fn role_allowed(role: &str, allowed: &[&str]) -> bool {
    allowed.iter().any(|a| a.eq_ignore_ascii_case(role))
}

/// True when `role` is the SuperAdmin tier, in any casing.
pub fn is_superadmin(role: &str) -> bool {
    role.eq_ignore_ascii_case(ROLE_SUPERADMIN)
}
