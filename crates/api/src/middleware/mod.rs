//! Authentication extractor and role-based access middleware.
//!
//! - [`auth::AuthUser`] -- The authenticated, non-banned caller.
//! - [`rbac::require_roles`] -- Route-level role gate driven by a declared role set.

pub mod auth;
pub mod rbac;
