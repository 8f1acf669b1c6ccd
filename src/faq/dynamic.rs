//! Dynamic answer resolver
//!
//! Some FAQs cannot carry a stored answer ("What is my account balance?")
//! and are computed per request from caller-supplied context parameters.
//! Dispatch happens on the FAQ's stable `dynamic_key`; each strategy reads
//! live state from the store.
//!
//! Internally the outcome is a tagged variant so "no such mapping" and
//! "computed but empty" stay distinguishable; the HTTP layer still reports
//! both as NotFound.

use bson::oid::ObjectId;
use serde::Serialize;
use std::collections::HashMap;

use crate::db::schemas::OrderStatus;
use crate::error::Result;
use crate::store::SupportStore;

/// Caller-supplied key/value parameters (the request's query string)
pub type Context = HashMap<String, String>;

/// A computed answer: a single line or a list of lines
#[derive(Serialize, Clone, Debug, PartialEq)]
#[serde(untagged)]
pub enum AnswerValue {
    Text(String),
    List(Vec<String>),
}

/// Outcome of dynamic resolution
#[derive(Debug, Clone, PartialEq)]
pub enum DynamicAnswer {
    /// No strategy registered for the key
    Unmapped,
    /// Strategy ran but produced nothing (missing context, empty state)
    Empty,
    /// Computed value
    Computed(AnswerValue),
}

/// Strategy keys understood by the resolver
pub const KEY_ACCOUNT_BALANCE: &str = "account-balance";
pub const KEY_KYC_STATUS: &str = "kyc-status";
pub const KEY_ORDER_STATUS: &str = "order-status";
pub const KEY_OPEN_ORDERS: &str = "open-orders";

fn context_oid(context: &Context, key: &str) -> Option<ObjectId> {
    context.get(key).and_then(|raw| ObjectId::parse_str(raw).ok())
}

/// Resolve a dynamic FAQ answer
pub async fn resolve(
    store: &dyn SupportStore,
    key: &str,
    context: &Context,
) -> Result<DynamicAnswer> {
    match key {
        KEY_ACCOUNT_BALANCE => account_balance(store, context).await,
        KEY_KYC_STATUS => kyc_status(store, context).await,
        KEY_ORDER_STATUS => order_status(store, context).await,
        KEY_OPEN_ORDERS => open_orders(store, context).await,
        _ => Ok(DynamicAnswer::Unmapped),
    }
}

async fn account_balance(store: &dyn SupportStore, context: &Context) -> Result<DynamicAnswer> {
    let Some(user_id) = context_oid(context, "user") else {
        return Ok(DynamicAnswer::Empty);
    };
    let Some(user) = store.user_by_id(&user_id).await? else {
        return Ok(DynamicAnswer::Empty);
    };

    Ok(DynamicAnswer::Computed(AnswerValue::Text(format!(
        "Your current account balance is \u{20b9}{:.2}.",
        user.account_balance
    ))))
}

async fn kyc_status(store: &dyn SupportStore, context: &Context) -> Result<DynamicAnswer> {
    let Some(user_id) = context_oid(context, "user") else {
        return Ok(DynamicAnswer::Empty);
    };
    let Some(user) = store.user_by_id(&user_id).await? else {
        return Ok(DynamicAnswer::Empty);
    };

    Ok(DynamicAnswer::Computed(AnswerValue::Text(format!(
        "Your KYC verification is currently: {}.",
        user.kyc.as_str()
    ))))
}

async fn order_status(store: &dyn SupportStore, context: &Context) -> Result<DynamicAnswer> {
    let (Some(user_id), Some(order_id)) =
        (context_oid(context, "user"), context_oid(context, "order"))
    else {
        return Ok(DynamicAnswer::Empty);
    };

    let Some(user) = store.user_by_id(&user_id).await? else {
        return Ok(DynamicAnswer::Empty);
    };
    // Ownership check keeps this consistent with order-specific-questions
    if !user.order_ids.contains(&order_id) {
        return Ok(DynamicAnswer::Empty);
    }
    let Some(order) = store.order_by_id(&order_id).await? else {
        return Ok(DynamicAnswer::Empty);
    };

    Ok(DynamicAnswer::Computed(AnswerValue::Text(format!(
        "Your order for {} is {}.",
        order.product_name,
        order.status.as_str()
    ))))
}

async fn open_orders(store: &dyn SupportStore, context: &Context) -> Result<DynamicAnswer> {
    let Some(user_id) = context_oid(context, "user") else {
        return Ok(DynamicAnswer::Empty);
    };
    let Some(user) = store.user_by_id(&user_id).await? else {
        return Ok(DynamicAnswer::Empty);
    };

    let mut lines = Vec::new();
    for order_id in &user.order_ids {
        if let Some(order) = store.order_by_id(order_id).await? {
            if order.status == OrderStatus::NotCompleted {
                lines.push(format!(
                    "{} (placed, awaiting confirmation)",
                    order.product_name
                ));
            }
        }
    }

    if lines.is_empty() {
        return Ok(DynamicAnswer::Empty);
    }
    Ok(DynamicAnswer::Computed(AnswerValue::List(lines)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::schemas::{KycStatus, OrderDoc, UserDoc};
    use crate::store::MemoryStore;

    fn ctx(pairs: &[(&str, &str)]) -> Context {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[tokio::test]
    async fn unknown_key_is_unmapped() {
        let store = MemoryStore::new();
        let answer = resolve(&store, "refund-window", &ctx(&[])).await.unwrap();
        assert_eq!(answer, DynamicAnswer::Unmapped);
    }

    #[tokio::test]
    async fn missing_context_is_empty_not_unmapped() {
        let store = MemoryStore::new();
        let answer = resolve(&store, KEY_ACCOUNT_BALANCE, &ctx(&[])).await.unwrap();
        assert_eq!(answer, DynamicAnswer::Empty);
    }

    #[tokio::test]
    async fn balance_reads_live_account_state() {
        let store = MemoryStore::new();
        let mut user = UserDoc::new("asha".into(), "hash".into());
        user.account_balance = 1250.5;
        let user_id = store.insert_user(user).await.unwrap();

        let answer = resolve(
            &store,
            KEY_ACCOUNT_BALANCE,
            &ctx(&[("user", &user_id.to_hex())]),
        )
        .await
        .unwrap();

        match answer {
            DynamicAnswer::Computed(AnswerValue::Text(text)) => {
                assert!(text.contains("1250.50"));
            }
            other => panic!("expected computed text, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn order_status_enforces_ownership() {
        let store = MemoryStore::new();
        let owner = store
            .insert_user(UserDoc::new("asha".into(), "hash".into()))
            .await
            .unwrap();
        let outsider = store
            .insert_user(UserDoc::new("vik".into(), "hash".into()))
            .await
            .unwrap();

        let order_id = store
            .insert_order(OrderDoc {
                user_id: owner,
                product_name: "Gold Saver".into(),
                ..Default::default()
            })
            .await
            .unwrap();
        store.push_user_order(&owner, &order_id).await.unwrap();

        let owned = resolve(
            &store,
            KEY_ORDER_STATUS,
            &ctx(&[("user", &owner.to_hex()), ("order", &order_id.to_hex())]),
        )
        .await
        .unwrap();
        assert!(matches!(owned, DynamicAnswer::Computed(_)));

        let foreign = resolve(
            &store,
            KEY_ORDER_STATUS,
            &ctx(&[("user", &outsider.to_hex()), ("order", &order_id.to_hex())]),
        )
        .await
        .unwrap();
        assert_eq!(foreign, DynamicAnswer::Empty);
    }

    #[tokio::test]
    async fn open_orders_lists_only_not_completed() {
        let store = MemoryStore::new();
        let mut user = UserDoc::new("asha".into(), "hash".into());
        user.kyc = KycStatus::Completed;
        let user_id = store.insert_user(user).await.unwrap();

        let open = store
            .insert_order(OrderDoc {
                user_id,
                product_name: "Gold Saver".into(),
                ..Default::default()
            })
            .await
            .unwrap();
        let done = store
            .insert_order(OrderDoc {
                user_id,
                product_name: "Blue Chip Fund".into(),
                status: crate::db::schemas::OrderStatus::Completed,
                ..Default::default()
            })
            .await
            .unwrap();
        store.push_user_order(&user_id, &open).await.unwrap();
        store.push_user_order(&user_id, &done).await.unwrap();

        let answer = resolve(&store, KEY_OPEN_ORDERS, &ctx(&[("user", &user_id.to_hex())]))
            .await
            .unwrap();
        match answer {
            DynamicAnswer::Computed(AnswerValue::List(lines)) => {
                assert_eq!(lines.len(), 1);
                assert!(lines[0].contains("Gold Saver"));
            }
            other => panic!("expected computed list, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn answer_value_wire_shapes() {
        let text = AnswerValue::Text("hello".into());
        assert_eq!(serde_json::to_string(&text).unwrap(), r#""hello""#);

        let list = AnswerValue::List(vec!["a".into(), "b".into()]);
        assert_eq!(serde_json::to_string(&list).unwrap(), r#"["a","b"]"#);
    }
}
