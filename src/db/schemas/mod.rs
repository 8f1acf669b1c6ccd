//! Database schemas for the concierge service
//!
//! Defines MongoDB document structures for the five entity collections:
//! users, products, orders, categories, and FAQs.

mod category;
mod faq;
mod metadata;
mod order;
mod product;
mod user;

pub use category::{CategoryDoc, CATEGORY_COLLECTION, ROOT_CATEGORY_NAME};
pub use faq::{FaqDoc, FAQ_COLLECTION};
pub use metadata::Metadata;
pub use order::{OrderDoc, OrderStatus, ORDER_COLLECTION};
pub use product::{ProductDoc, PRODUCT_COLLECTION};
pub use user::{KycStatus, UserDoc, USER_COLLECTION};
