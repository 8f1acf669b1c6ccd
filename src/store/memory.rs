//! In-memory `SupportStore`
//!
//! Used by dev mode when MongoDB is unreachable and by unit tests. Locks are
//! never held across await points.

use async_trait::async_trait;
use bson::{oid::ObjectId, DateTime};
use std::collections::HashMap;
use std::sync::RwLock;

use crate::db::schemas::{CategoryDoc, FaqDoc, OrderDoc, OrderStatus, ProductDoc, UserDoc};
use crate::error::{Result, ServiceError};
use crate::store::SupportStore;

#[derive(Default)]
struct Tables {
    users: HashMap<ObjectId, UserDoc>,
    products: HashMap<ObjectId, ProductDoc>,
    orders: HashMap<ObjectId, OrderDoc>,
    categories: HashMap<ObjectId, CategoryDoc>,
    faqs: HashMap<ObjectId, FaqDoc>,
}

/// Memory-only store; same visibility rules as the Mongo store
/// (soft-deleted documents are invisible)
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock_err() -> ServiceError {
        ServiceError::Database("memory store lock poisoned".into())
    }
}

fn visible<T: Clone>(doc: Option<&T>, is_deleted: impl Fn(&T) -> bool) -> Option<T> {
    doc.filter(|d| !is_deleted(d)).cloned()
}

#[async_trait]
impl SupportStore for MemoryStore {
    async fn user_by_id(&self, id: &ObjectId) -> Result<Option<UserDoc>> {
        let t = self.tables.read().map_err(|_| Self::lock_err())?;
        Ok(visible(t.users.get(id), |u| u.metadata.is_deleted))
    }

    async fn user_by_name(&self, name: &str) -> Result<Option<UserDoc>> {
        let t = self.tables.read().map_err(|_| Self::lock_err())?;
        Ok(t.users
            .values()
            .find(|u| u.user_name == name && !u.metadata.is_deleted)
            .cloned())
    }

    async fn insert_user(&self, mut user: UserDoc) -> Result<ObjectId> {
        let id = ObjectId::new();
        user._id = Some(id);
        user.metadata.created_at = Some(DateTime::now());
        user.metadata.updated_at = Some(DateTime::now());
        let mut t = self.tables.write().map_err(|_| Self::lock_err())?;
        t.users.insert(id, user);
        Ok(id)
    }

    async fn push_user_order(&self, user_id: &ObjectId, order_id: &ObjectId) -> Result<()> {
        let mut t = self.tables.write().map_err(|_| Self::lock_err())?;
        if let Some(user) = t.users.get_mut(user_id) {
            user.order_ids.push(*order_id);
            user.metadata.updated_at = Some(DateTime::now());
        }
        Ok(())
    }

    async fn pull_user_order(&self, user_id: &ObjectId, order_id: &ObjectId) -> Result<()> {
        let mut t = self.tables.write().map_err(|_| Self::lock_err())?;
        if let Some(user) = t.users.get_mut(user_id) {
            user.order_ids.retain(|id| id != order_id);
            user.metadata.updated_at = Some(DateTime::now());
        }
        Ok(())
    }

    async fn product_by_id(&self, id: &ObjectId) -> Result<Option<ProductDoc>> {
        let t = self.tables.read().map_err(|_| Self::lock_err())?;
        Ok(visible(t.products.get(id), |p| p.metadata.is_deleted))
    }

    async fn product_by_name(&self, name: &str) -> Result<Option<ProductDoc>> {
        let t = self.tables.read().map_err(|_| Self::lock_err())?;
        Ok(t.products
            .values()
            .find(|p| p.name == name && !p.metadata.is_deleted)
            .cloned())
    }

    async fn products_by_category(&self, category: &str) -> Result<Vec<ProductDoc>> {
        let t = self.tables.read().map_err(|_| Self::lock_err())?;
        Ok(t.products
            .values()
            .filter(|p| p.category == category && !p.metadata.is_deleted)
            .cloned()
            .collect())
    }

    async fn insert_product(&self, mut product: ProductDoc) -> Result<ObjectId> {
        let id = ObjectId::new();
        product._id = Some(id);
        product.metadata.created_at = Some(DateTime::now());
        product.metadata.updated_at = Some(DateTime::now());
        let mut t = self.tables.write().map_err(|_| Self::lock_err())?;
        t.products.insert(id, product);
        Ok(id)
    }

    async fn order_by_id(&self, id: &ObjectId) -> Result<Option<OrderDoc>> {
        let t = self.tables.read().map_err(|_| Self::lock_err())?;
        Ok(visible(t.orders.get(id), |o| o.metadata.is_deleted))
    }

    async fn orders_by_user_and_category(
        &self,
        user_id: &ObjectId,
        category: &str,
    ) -> Result<Vec<OrderDoc>> {
        let t = self.tables.read().map_err(|_| Self::lock_err())?;
        Ok(t.orders
            .values()
            .filter(|o| {
                o.user_id == *user_id && o.category == category && !o.metadata.is_deleted
            })
            .cloned()
            .collect())
    }

    async fn insert_order(&self, mut order: OrderDoc) -> Result<ObjectId> {
        let id = ObjectId::new();
        order._id = Some(id);
        order.metadata.created_at = Some(DateTime::now());
        order.metadata.updated_at = Some(DateTime::now());
        let mut t = self.tables.write().map_err(|_| Self::lock_err())?;
        t.orders.insert(id, order);
        Ok(id)
    }

    async fn update_order_status(
        &self,
        id: &ObjectId,
        status: OrderStatus,
        faq_ids: Vec<ObjectId>,
    ) -> Result<()> {
        let mut t = self.tables.write().map_err(|_| Self::lock_err())?;
        if let Some(order) = t.orders.get_mut(id) {
            order.status = status;
            order.faq_ids = faq_ids;
            if status == OrderStatus::Completed {
                order.confirmed_at = Some(DateTime::now());
            }
            order.metadata.updated_at = Some(DateTime::now());
        }
        Ok(())
    }

    async fn delete_order(&self, id: &ObjectId) -> Result<bool> {
        let mut t = self.tables.write().map_err(|_| Self::lock_err())?;
        Ok(t.orders.remove(id).is_some())
    }

    async fn category_by_id(&self, id: &ObjectId) -> Result<Option<CategoryDoc>> {
        let t = self.tables.read().map_err(|_| Self::lock_err())?;
        Ok(visible(t.categories.get(id), |c| c.metadata.is_deleted))
    }

    async fn category_by_name(&self, name: &str) -> Result<Option<CategoryDoc>> {
        let t = self.tables.read().map_err(|_| Self::lock_err())?;
        Ok(t.categories
            .values()
            .find(|c| c.name == name && !c.metadata.is_deleted)
            .cloned())
    }

    async fn insert_category(&self, mut category: CategoryDoc) -> Result<ObjectId> {
        let id = ObjectId::new();
        category._id = Some(id);
        category.metadata.created_at = Some(DateTime::now());
        category.metadata.updated_at = Some(DateTime::now());
        let mut t = self.tables.write().map_err(|_| Self::lock_err())?;
        t.categories.insert(id, category);
        Ok(id)
    }

    async fn faq_by_id(&self, id: &ObjectId) -> Result<Option<FaqDoc>> {
        let t = self.tables.read().map_err(|_| Self::lock_err())?;
        Ok(visible(t.faqs.get(id), |f| f.metadata.is_deleted))
    }

    async fn faq_by_question(&self, question: &str) -> Result<Option<FaqDoc>> {
        let t = self.tables.read().map_err(|_| Self::lock_err())?;
        Ok(t.faqs
            .values()
            .find(|f| f.question_text == question && !f.metadata.is_deleted)
            .cloned())
    }

    async fn faqs_by_exact_path(&self, segment: &str) -> Result<Vec<FaqDoc>> {
        let t = self.tables.read().map_err(|_| Self::lock_err())?;
        Ok(t.faqs
            .values()
            .filter(|f| {
                !f.metadata.is_deleted
                    && f.category_path.len() == 1
                    && f.category_path[0] == segment
            })
            .cloned()
            .collect())
    }

    async fn faqs_containing_all(&self, segments: &[&str]) -> Result<Vec<FaqDoc>> {
        let t = self.tables.read().map_err(|_| Self::lock_err())?;
        Ok(t.faqs
            .values()
            .filter(|f| {
                !f.metadata.is_deleted
                    && segments
                        .iter()
                        .all(|s| f.category_path.iter().any(|seg| seg == s))
            })
            .cloned()
            .collect())
    }

    async fn insert_faq(&self, mut faq: FaqDoc) -> Result<ObjectId> {
        let id = ObjectId::new();
        faq._id = Some(id);
        faq.metadata.created_at = Some(DateTime::now());
        faq.metadata.updated_at = Some(DateTime::now());
        let mut t = self.tables.write().map_err(|_| Self::lock_err())?;
        t.faqs.insert(id, faq);
        Ok(id)
    }
}
