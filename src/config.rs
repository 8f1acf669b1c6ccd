//! Configuration for the concierge service
//!
//! CLI arguments and environment variable handling using clap.

use clap::Parser;
use std::net::SocketAddr;
use uuid::Uuid;

/// Concierge - customer-support chatbot backend
#[derive(Parser, Debug, Clone)]
#[command(name = "concierge")]
#[command(about = "Customer-support chatbot backend with contextual FAQ resolution")]
pub struct Args {
    /// Unique node identifier for this service instance
    #[arg(long, env = "NODE_ID", default_value_t = Uuid::new_v4())]
    pub node_id: Uuid,

    /// Address to listen on
    #[arg(long, env = "LISTEN", default_value = "0.0.0.0:8081")]
    pub listen: SocketAddr,

    /// MongoDB connection URI
    #[arg(long, env = "MONGODB_URI", default_value = "mongodb://localhost:27017")]
    pub mongodb_uri: String,

    /// MongoDB database name
    #[arg(long, env = "MONGODB_DB", default_value = "concierge")]
    pub mongodb_db: String,

    /// Secret for sealing session tokens (required in production)
    #[arg(long, env = "SESSION_SECRET")]
    pub session_secret: Option<String>,

    /// Session token lifetime in seconds
    #[arg(long, env = "SESSION_TTL_SECONDS", default_value = "900")]
    pub session_ttl_seconds: u64,

    /// Cookie name carrying the session token
    #[arg(long, env = "AUTH_TOKEN_NAME", default_value = "concierge_session")]
    pub auth_token_name: String,

    /// Frontend origin allowed for CORS (credentials enabled)
    #[arg(long, env = "FRONTEND_URL", default_value = "http://localhost:3000")]
    pub frontend_url: String,

    /// Enable development mode (in-memory store fallback, default secret)
    #[arg(long, env = "DEV_MODE", default_value = "false")]
    pub dev_mode: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: String,
}

impl Args {
    /// Get effective session secret (uses a fixed value in dev mode)
    pub fn session_secret(&self) -> Result<String, String> {
        match &self.session_secret {
            Some(s) => Ok(s.clone()),
            None if self.dev_mode => Ok("dev-only-insecure-secret".to_string()),
            None => Err("SESSION_SECRET is required in production mode".to_string()),
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if !self.dev_mode && self.session_secret.is_none() {
            return Err("SESSION_SECRET is required in production mode".to_string());
        }
        if self.session_ttl_seconds == 0 {
            return Err("SESSION_TTL_SECONDS must be greater than zero".to_string());
        }
        Ok(())
    }
}
