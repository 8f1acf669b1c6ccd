//! Sealed session tokens
//!
//! The session is an HS256 JWT bound to a user id, carried in an http-only
//! cookie. Sealing and unsealing never touch the database; the routes that
//! care re-check the user against the store.

use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::error::ServiceError;

/// Claims carried inside a session token
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct SessionClaims {
    /// User id (hex ObjectId)
    pub sub: String,
    /// Login name, echoed back to the frontend
    pub user_name: String,
    /// Expiry (unix seconds)
    pub exp: i64,
    /// Issued at (unix seconds)
    pub iat: i64,
}

/// Seals and unseals session tokens with a shared secret
#[derive(Clone)]
pub struct SessionSealer {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl_seconds: u64,
}

impl SessionSealer {
    pub fn new(secret: &str, ttl_seconds: u64) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl_seconds,
        }
    }

    /// Seal a session token for the given user
    pub fn seal(&self, user_id: &str, user_name: &str) -> Result<String, ServiceError> {
        let now = Utc::now().timestamp();
        let claims = SessionClaims {
            sub: user_id.to_string(),
            user_name: user_name.to_string(),
            exp: now + self.ttl_seconds as i64,
            iat: now,
        };

        encode(&Header::default(), &claims, &self.encoding)
            .map_err(|e| ServiceError::Session(format!("Failed to seal session: {e}")))
    }

    /// Unseal and validate a session token
    pub fn unseal(&self, token: &str) -> Result<SessionClaims, ServiceError> {
        decode::<SessionClaims>(token, &self.decoding, &Validation::default())
            .map(|data| data.claims)
            .map_err(|e| ServiceError::Session(format!("Invalid session token: {e}")))
    }

    /// Token lifetime, used for the cookie Max-Age attribute
    pub fn ttl_seconds(&self) -> u64 {
        self.ttl_seconds
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seal_unseal_round_trip() {
        let sealer = SessionSealer::new("test-secret", 900);
        let token = sealer.seal("64b1f0c2a1b2c3d4e5f60718", "ramesh").unwrap();

        let claims = sealer.unseal(&token).unwrap();
        assert_eq!(claims.sub, "64b1f0c2a1b2c3d4e5f60718");
        assert_eq!(claims.user_name, "ramesh");
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn unseal_rejects_wrong_secret() {
        let sealer = SessionSealer::new("secret-a", 900);
        let token = sealer.seal("64b1f0c2a1b2c3d4e5f60718", "ramesh").unwrap();

        let other = SessionSealer::new("secret-b", 900);
        assert!(other.unseal(&token).is_err());
    }

    #[test]
    fn unseal_rejects_garbage() {
        let sealer = SessionSealer::new("test-secret", 900);
        assert!(sealer.unseal("not-a-token").is_err());
    }
}
