//! Concierge - customer-support chatbot backend
//!
//! REST service for an e-commerce storefront's support chatbot: contextual
//! FAQ resolution over a MongoDB document store, dynamic per-user answers,
//! cookie-session authentication, and an order lifecycle with compensating
//! writes.
//!
//! ## Modules
//!
//! - **faq**: contextual FAQ resolution, KYC gating, dynamic answers
//! - **orders**: place / confirm / cancel state machine
//! - **store**: `SupportStore` trait with MongoDB and in-memory backends
//! - **routes** / **server**: hyper http1 surface
//! - **seed**: explicit, idempotent demo-data seeding

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod faq;
pub mod orders;
pub mod routes;
pub mod seed;
pub mod server;
pub mod store;

pub use config::Args;
pub use error::{Result, ServiceError};
pub use server::{run, AppState};
