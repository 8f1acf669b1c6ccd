//! MongoDB-backed `SupportStore`

use async_trait::async_trait;
use bson::{doc, oid::ObjectId, DateTime};

use crate::db::schemas::{
    CategoryDoc, FaqDoc, OrderDoc, OrderStatus, ProductDoc, UserDoc, CATEGORY_COLLECTION,
    FAQ_COLLECTION, ORDER_COLLECTION, PRODUCT_COLLECTION, USER_COLLECTION,
};
use crate::db::{MongoClient, MongoCollection};
use crate::error::Result;
use crate::store::SupportStore;

/// Production store over MongoDB point reads/writes
#[derive(Clone)]
pub struct MongoSupportStore {
    mongo: MongoClient,
}

impl MongoSupportStore {
    pub fn new(mongo: MongoClient) -> Self {
        Self { mongo }
    }

    async fn users(&self) -> Result<MongoCollection<UserDoc>> {
        self.mongo.collection(USER_COLLECTION).await
    }

    async fn products(&self) -> Result<MongoCollection<ProductDoc>> {
        self.mongo.collection(PRODUCT_COLLECTION).await
    }

    async fn orders(&self) -> Result<MongoCollection<OrderDoc>> {
        self.mongo.collection(ORDER_COLLECTION).await
    }

    async fn categories(&self) -> Result<MongoCollection<CategoryDoc>> {
        self.mongo.collection(CATEGORY_COLLECTION).await
    }

    async fn faqs(&self) -> Result<MongoCollection<FaqDoc>> {
        self.mongo.collection(FAQ_COLLECTION).await
    }
}

#[async_trait]
impl SupportStore for MongoSupportStore {
    async fn user_by_id(&self, id: &ObjectId) -> Result<Option<UserDoc>> {
        self.users().await?.find_one(doc! { "_id": id }).await
    }

    async fn user_by_name(&self, name: &str) -> Result<Option<UserDoc>> {
        self.users().await?.find_one(doc! { "user_name": name }).await
    }

    async fn insert_user(&self, user: UserDoc) -> Result<ObjectId> {
        self.users().await?.insert_one(user).await
    }

    async fn push_user_order(&self, user_id: &ObjectId, order_id: &ObjectId) -> Result<()> {
        self.users()
            .await?
            .update_one(
                doc! { "_id": user_id },
                doc! {
                    "$push": { "order_ids": order_id },
                    "$set": { "metadata.updated_at": DateTime::now() }
                },
            )
            .await?;
        Ok(())
    }

    async fn pull_user_order(&self, user_id: &ObjectId, order_id: &ObjectId) -> Result<()> {
        self.users()
            .await?
            .update_one(
                doc! { "_id": user_id },
                doc! {
                    "$pull": { "order_ids": order_id },
                    "$set": { "metadata.updated_at": DateTime::now() }
                },
            )
            .await?;
        Ok(())
    }

    async fn product_by_id(&self, id: &ObjectId) -> Result<Option<ProductDoc>> {
        self.products().await?.find_one(doc! { "_id": id }).await
    }

    async fn product_by_name(&self, name: &str) -> Result<Option<ProductDoc>> {
        self.products().await?.find_one(doc! { "name": name }).await
    }

    async fn products_by_category(&self, category: &str) -> Result<Vec<ProductDoc>> {
        self.products()
            .await?
            .find_many(doc! { "category": category })
            .await
    }

    async fn insert_product(&self, product: ProductDoc) -> Result<ObjectId> {
        self.products().await?.insert_one(product).await
    }

    async fn order_by_id(&self, id: &ObjectId) -> Result<Option<OrderDoc>> {
        self.orders().await?.find_one(doc! { "_id": id }).await
    }

    async fn orders_by_user_and_category(
        &self,
        user_id: &ObjectId,
        category: &str,
    ) -> Result<Vec<OrderDoc>> {
        self.orders()
            .await?
            .find_many(doc! { "user_id": user_id, "category": category })
            .await
    }

    async fn insert_order(&self, order: OrderDoc) -> Result<ObjectId> {
        self.orders().await?.insert_one(order).await
    }

    async fn update_order_status(
        &self,
        id: &ObjectId,
        status: OrderStatus,
        faq_ids: Vec<ObjectId>,
    ) -> Result<()> {
        let confirmed_at = match status {
            OrderStatus::Completed => Some(DateTime::now()),
            OrderStatus::NotCompleted => None,
        };

        let mut set = doc! {
            "status": status.as_str(),
            "faq_ids": faq_ids,
            "metadata.updated_at": DateTime::now(),
        };
        if let Some(ts) = confirmed_at {
            set.insert("confirmed_at", ts);
        }

        self.orders()
            .await?
            .update_one(doc! { "_id": id }, doc! { "$set": set })
            .await?;
        Ok(())
    }

    async fn delete_order(&self, id: &ObjectId) -> Result<bool> {
        let result = self.orders().await?.delete_one(doc! { "_id": id }).await?;
        Ok(result.deleted_count > 0)
    }

    async fn category_by_id(&self, id: &ObjectId) -> Result<Option<CategoryDoc>> {
        self.categories().await?.find_one(doc! { "_id": id }).await
    }

    async fn category_by_name(&self, name: &str) -> Result<Option<CategoryDoc>> {
        self.categories().await?.find_one(doc! { "name": name }).await
    }

    async fn insert_category(&self, category: CategoryDoc) -> Result<ObjectId> {
        self.categories().await?.insert_one(category).await
    }

    async fn faq_by_id(&self, id: &ObjectId) -> Result<Option<FaqDoc>> {
        self.faqs().await?.find_one(doc! { "_id": id }).await
    }

    async fn faq_by_question(&self, question: &str) -> Result<Option<FaqDoc>> {
        self.faqs()
            .await?
            .find_one(doc! { "question_text": question })
            .await
    }

    async fn faqs_by_exact_path(&self, segment: &str) -> Result<Vec<FaqDoc>> {
        // Whole-array equality, not element containment
        self.faqs()
            .await?
            .find_many(doc! { "category_path": [segment] })
            .await
    }

    async fn faqs_containing_all(&self, segments: &[&str]) -> Result<Vec<FaqDoc>> {
        self.faqs()
            .await?
            .find_many(doc! { "category_path": { "$all": segments } })
            .await
    }

    async fn insert_faq(&self, faq: FaqDoc) -> Result<ObjectId> {
        self.faqs().await?.insert_one(faq).await
    }
}
