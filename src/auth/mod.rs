//! Authentication for the concierge service
//!
//! Provides:
//! - Sealed session tokens (JWT) bound to a user id, carried in a cookie
//! - Password hashing with Argon2

pub mod password;
pub mod session;

pub use password::{hash_password, verify_password};
pub use session::{SessionClaims, SessionSealer};
