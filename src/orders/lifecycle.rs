//! Order state machine: NotCompleted -> Completed, one-way, terminal.
//!
//! Placement and cancellation each touch two documents (the order and the
//! owning user's order list) without a transaction. The invariant — every
//! id in a user's order list refers to an existing order owned by that
//! user, and vice versa — is maintained by compensating actions: the second
//! write failing rolls back the first.

use bson::{oid::ObjectId, DateTime};
use serde::Deserialize;
use tracing::{error, warn};

use crate::db::schemas::{OrderDoc, OrderStatus};
use crate::error::{Result, ServiceError};
use crate::store::SupportStore;

/// Path segments of the FAQ set linked to open orders
const OPEN_ORDER_PATH: [&str; 2] = ["Orders", "Not completed"];

/// Path segments of the FAQ set linked to confirmed orders
const COMPLETED_ORDER_PATH: [&str; 2] = ["Orders", "Completed"];

/// Order placement payload from the storefront
#[derive(Deserialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct PlaceOrderRequest {
    pub product_name: String,
    pub category: String,
}

async fn resolve_user_oid(store: &dyn SupportStore, user_id: &str) -> Result<ObjectId> {
    let oid = ObjectId::parse_str(user_id)
        .map_err(|_| ServiceError::not_found("invalid user id"))?;
    store
        .user_by_id(&oid)
        .await?
        .ok_or_else(|| ServiceError::not_found("user"))?;
    Ok(oid)
}

async fn faq_ids_for_path(store: &dyn SupportStore, segments: &[&str]) -> Result<Vec<ObjectId>> {
    let faqs = store.faqs_containing_all(segments).await?;
    Ok(faqs.iter().filter_map(|f| f._id).collect())
}

/// Place a new order for a user.
///
/// The order starts NotCompleted, linked to the Orders/"Not completed" FAQ
/// set, and its id is appended to the owner's order list. If the append
/// fails, the freshly inserted order is deleted so no orphan remains.
pub async fn place_order(
    store: &dyn SupportStore,
    user_id: &str,
    request: PlaceOrderRequest,
) -> Result<ObjectId> {
    let user_oid = resolve_user_oid(store, user_id).await?;
    let faq_ids = faq_ids_for_path(store, &OPEN_ORDER_PATH).await?;

    let order = OrderDoc {
        _id: None,
        user_id: user_oid,
        status: OrderStatus::NotCompleted,
        faq_ids,
        product_name: request.product_name,
        category: request.category,
        placed_at: Some(DateTime::now()),
        ..Default::default()
    };

    let order_id = store.insert_order(order).await?;

    if let Err(e) = store.push_user_order(&user_oid, &order_id).await {
        // Compensate: remove the orphaned order before reporting failure
        warn!(
            "Linking order {} to user {} failed, rolling back: {}",
            order_id, user_oid, e
        );
        if let Err(rollback) = store.delete_order(&order_id).await {
            error!(
                "Rollback of order {} failed, store needs repair: {}",
                order_id, rollback
            );
        }
        return Err(e);
    }

    Ok(order_id)
}

/// Confirm an order: re-link its FAQ set to Orders/"Completed" and stamp
/// the confirmation date.
///
/// Only the owner may confirm, and only while the order is NotCompleted;
/// confirming an already-Completed order is Forbidden rather than a silent
/// no-op so double confirmations surface as client bugs.
pub async fn confirm_order(
    store: &dyn SupportStore,
    user_id: &str,
    order_id: &str,
) -> Result<()> {
    let user_oid = resolve_user_oid(store, user_id).await?;
    let order_oid = ObjectId::parse_str(order_id)
        .map_err(|_| ServiceError::not_found("invalid order id"))?;

    let order = store
        .order_by_id(&order_oid)
        .await?
        .ok_or_else(|| ServiceError::not_found("order"))?;

    if order.user_id != user_oid {
        return Err(ServiceError::forbidden("order belongs to another user"));
    }
    if order.status == OrderStatus::Completed {
        return Err(ServiceError::forbidden("order is already completed"));
    }

    let faq_ids = faq_ids_for_path(store, &COMPLETED_ORDER_PATH).await?;
    store
        .update_order_status(&order_oid, OrderStatus::Completed, faq_ids)
        .await
}

/// Cancel an order: remove it from the owner's order list, then delete the
/// order document.
///
/// Permitted only while NotCompleted and only by the owner. If the delete
/// fails after the list pull, the id is pushed back so the list keeps
/// referring to existing orders.
pub async fn cancel_order(store: &dyn SupportStore, user_id: &str, order_id: &str) -> Result<()> {
    let order_oid = ObjectId::parse_str(order_id)
        .map_err(|_| ServiceError::not_found("invalid order id"))?;

    let order = store
        .order_by_id(&order_oid)
        .await?
        .ok_or_else(|| ServiceError::not_found("order"))?;

    if order.status == OrderStatus::Completed {
        return Err(ServiceError::forbidden("completed orders cannot be cancelled"));
    }

    let user_oid = ObjectId::parse_str(user_id)
        .map_err(|_| ServiceError::not_found("invalid user id"))?;
    if order.user_id != user_oid {
        return Err(ServiceError::forbidden("order belongs to another user"));
    }

    store.pull_user_order(&user_oid, &order_oid).await?;

    match store.delete_order(&order_oid).await {
        Ok(true) => Ok(()),
        Ok(false) => {
            // Already gone; the pull was the only effect needed
            Ok(())
        }
        Err(e) => {
            warn!(
                "Deleting order {} failed after unlinking, restoring link: {}",
                order_oid, e
            );
            if let Err(rollback) = store.push_user_order(&user_oid, &order_oid).await {
                error!(
                    "Restoring order link {} failed, store needs repair: {}",
                    order_oid, rollback
                );
            }
            Err(e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::schemas::{FaqDoc, UserDoc};
    use crate::store::MemoryStore;

    async fn seed_order_faqs(store: &MemoryStore) -> (ObjectId, ObjectId) {
        let open = store
            .insert_faq(FaqDoc {
                question_text: "When will my order be confirmed?".into(),
                category_path: vec!["Orders".into(), "Not completed".into()],
                ..Default::default()
            })
            .await
            .unwrap();
        let done = store
            .insert_faq(FaqDoc {
                question_text: "How do I download my invoice?".into(),
                category_path: vec!["Orders".into(), "Completed".into()],
                ..Default::default()
            })
            .await
            .unwrap();
        (open, done)
    }

    fn request() -> PlaceOrderRequest {
        PlaceOrderRequest {
            product_name: "Gold Saver".into(),
            category: "Gold".into(),
        }
    }

    #[tokio::test]
    async fn place_then_confirm_relinks_the_faq_set() {
        let store = MemoryStore::new();
        let (open_faq, done_faq) = seed_order_faqs(&store).await;
        let user = store
            .insert_user(UserDoc::new("asha".into(), "hash".into()))
            .await
            .unwrap();

        let order_id = place_order(&store, &user.to_hex(), request()).await.unwrap();

        let order = store.order_by_id(&order_id).await.unwrap().unwrap();
        assert_eq!(order.status, OrderStatus::NotCompleted);
        assert_eq!(order.faq_ids, vec![open_faq]);
        assert!(order.confirmed_at.is_none());

        let owner = store.user_by_id(&user).await.unwrap().unwrap();
        assert_eq!(owner.order_ids, vec![order_id]);

        confirm_order(&store, &user.to_hex(), &order_id.to_hex())
            .await
            .unwrap();

        let order = store.order_by_id(&order_id).await.unwrap().unwrap();
        assert_eq!(order.status, OrderStatus::Completed);
        assert_eq!(order.faq_ids, vec![done_faq]);
        assert!(order.confirmed_at.is_some());
    }

    #[tokio::test]
    async fn double_confirm_is_forbidden() {
        let store = MemoryStore::new();
        seed_order_faqs(&store).await;
        let user = store
            .insert_user(UserDoc::new("asha".into(), "hash".into()))
            .await
            .unwrap();

        let order_id = place_order(&store, &user.to_hex(), request()).await.unwrap();
        confirm_order(&store, &user.to_hex(), &order_id.to_hex())
            .await
            .unwrap();

        let again = confirm_order(&store, &user.to_hex(), &order_id.to_hex()).await;
        assert!(matches!(again, Err(ServiceError::Forbidden(_))));
    }

    #[tokio::test]
    async fn cancel_completed_order_is_forbidden() {
        let store = MemoryStore::new();
        seed_order_faqs(&store).await;
        let user = store
            .insert_user(UserDoc::new("asha".into(), "hash".into()))
            .await
            .unwrap();

        let order_id = place_order(&store, &user.to_hex(), request()).await.unwrap();
        confirm_order(&store, &user.to_hex(), &order_id.to_hex())
            .await
            .unwrap();

        let result = cancel_order(&store, &user.to_hex(), &order_id.to_hex()).await;
        assert!(matches!(result, Err(ServiceError::Forbidden(_))));
    }

    #[tokio::test]
    async fn cancel_by_non_owner_is_forbidden() {
        let store = MemoryStore::new();
        seed_order_faqs(&store).await;
        let owner = store
            .insert_user(UserDoc::new("asha".into(), "hash".into()))
            .await
            .unwrap();
        let outsider = store
            .insert_user(UserDoc::new("vik".into(), "hash".into()))
            .await
            .unwrap();

        let order_id = place_order(&store, &owner.to_hex(), request()).await.unwrap();

        let result = cancel_order(&store, &outsider.to_hex(), &order_id.to_hex()).await;
        assert!(matches!(result, Err(ServiceError::Forbidden(_))));

        // Order untouched
        assert!(store.order_by_id(&order_id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn cancel_removes_order_and_link() {
        let store = MemoryStore::new();
        seed_order_faqs(&store).await;
        let user = store
            .insert_user(UserDoc::new("asha".into(), "hash".into()))
            .await
            .unwrap();

        let order_id = place_order(&store, &user.to_hex(), request()).await.unwrap();
        cancel_order(&store, &user.to_hex(), &order_id.to_hex())
            .await
            .unwrap();

        assert!(store.order_by_id(&order_id).await.unwrap().is_none());
        let owner = store.user_by_id(&user).await.unwrap().unwrap();
        assert!(owner.order_ids.is_empty());

        // Double cancel: the order no longer exists
        let again = cancel_order(&store, &user.to_hex(), &order_id.to_hex()).await;
        assert!(matches!(again, Err(ServiceError::NotFound(_))));
    }
}
