//! Error types for the concierge service
//!
//! The external contract collapses almost everything to 404, so the
//! variants here exist for internal logging and for the few places that
//! must distinguish Forbidden from NotFound.

use thiserror::Error;

/// Service-wide error type
#[derive(Error, Debug)]
pub enum ServiceError {
    /// Missing or invalid identifier, empty lookup result, malformed input
    #[error("not found: {0}")]
    NotFound(String),

    /// Cross-user order access or state-machine violation (cancel/confirm
    /// after completion)
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// Underlying MongoDB failure
    #[error("database error: {0}")]
    Database(String),

    /// Session token sealing/unsealing failure
    #[error("session error: {0}")]
    Session(String),

    /// Startup configuration problem
    #[error("configuration error: {0}")]
    Config(String),
}

impl ServiceError {
    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound(what.into())
    }

    pub fn forbidden(why: impl Into<String>) -> Self {
        Self::Forbidden(why.into())
    }
}

impl From<std::io::Error> for ServiceError {
    fn from(e: std::io::Error) -> Self {
        Self::Config(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ServiceError>;
