//! Document store abstraction
//!
//! Every point read/write the service performs goes through the
//! `SupportStore` trait, so the FAQ pipeline and order lifecycle can be
//! exercised against an in-memory store (dev mode, unit tests) or MongoDB
//! (production).

pub mod memory;
pub mod mongo;

use async_trait::async_trait;
use bson::oid::ObjectId;

use crate::db::schemas::{CategoryDoc, FaqDoc, OrderDoc, OrderStatus, ProductDoc, UserDoc};
use crate::error::Result;

/// Point reads and single-document writes over the five entity collections.
///
/// No multi-document transactions: callers that touch two documents are
/// responsible for their own compensation (see `orders::lifecycle`).
#[async_trait]
pub trait SupportStore: Send + Sync {
    // --- users ---
    async fn user_by_id(&self, id: &ObjectId) -> Result<Option<UserDoc>>;
    async fn user_by_name(&self, name: &str) -> Result<Option<UserDoc>>;
    async fn insert_user(&self, user: UserDoc) -> Result<ObjectId>;
    /// Append an order id to the user's order list
    async fn push_user_order(&self, user_id: &ObjectId, order_id: &ObjectId) -> Result<()>;
    /// Remove an order id from the user's order list
    async fn pull_user_order(&self, user_id: &ObjectId, order_id: &ObjectId) -> Result<()>;

    // --- products ---
    async fn product_by_id(&self, id: &ObjectId) -> Result<Option<ProductDoc>>;
    async fn product_by_name(&self, name: &str) -> Result<Option<ProductDoc>>;
    async fn products_by_category(&self, category: &str) -> Result<Vec<ProductDoc>>;
    async fn insert_product(&self, product: ProductDoc) -> Result<ObjectId>;

    // --- orders ---
    async fn order_by_id(&self, id: &ObjectId) -> Result<Option<OrderDoc>>;
    async fn orders_by_user_and_category(
        &self,
        user_id: &ObjectId,
        category: &str,
    ) -> Result<Vec<OrderDoc>>;
    async fn insert_order(&self, order: OrderDoc) -> Result<ObjectId>;
    /// Replace status, FAQ linkage, and confirmation date in one write
    async fn update_order_status(
        &self,
        id: &ObjectId,
        status: OrderStatus,
        faq_ids: Vec<ObjectId>,
    ) -> Result<()>;
    /// Hard-delete an order document; returns false when nothing matched
    async fn delete_order(&self, id: &ObjectId) -> Result<bool>;

    // --- categories ---
    async fn category_by_id(&self, id: &ObjectId) -> Result<Option<CategoryDoc>>;
    async fn category_by_name(&self, name: &str) -> Result<Option<CategoryDoc>>;
    async fn insert_category(&self, category: CategoryDoc) -> Result<ObjectId>;

    // --- faqs ---
    async fn faq_by_id(&self, id: &ObjectId) -> Result<Option<FaqDoc>>;
    async fn faq_by_question(&self, question: &str) -> Result<Option<FaqDoc>>;
    /// FAQs whose category-path equals exactly the one given segment
    async fn faqs_by_exact_path(&self, segment: &str) -> Result<Vec<FaqDoc>>;
    /// FAQs whose category-path contains all the given segments, in any order
    async fn faqs_containing_all(&self, segments: &[&str]) -> Result<Vec<FaqDoc>>;
    async fn insert_faq(&self, faq: FaqDoc) -> Result<ObjectId>;
}

pub use memory::MemoryStore;
pub use mongo::MongoSupportStore;
