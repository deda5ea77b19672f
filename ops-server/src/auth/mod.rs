//! Authentication and authorization
//!
//! - [`JwtService`] - token issue and validation
//! - [`CurrentUser`] - caller context
//! - [`require_auth`] - authentication middleware
//! - [`require_admin`] - admin-only middleware
//! - [`ensure_store_access`] - per-store scope check
//! - [`password`] - argon2 hashing

pub mod extractor;
pub mod jwt;
pub mod middleware;
pub mod password;

pub use jwt::{Claims, CurrentUser, JwtConfig, JwtError, JwtService};
pub use middleware::{ensure_store_access, require_admin, require_auth};
