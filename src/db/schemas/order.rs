//! Order document schema

use bson::{doc, oid::ObjectId, DateTime, Document};
use mongodb::options::IndexOptions;
use serde::{Deserialize, Serialize};

use crate::db::mongo::{IntoIndexes, MutMetadata};
use crate::db::schemas::Metadata;

/// Collection name for orders
pub const ORDER_COLLECTION: &str = "orders";

/// Order completion state (one-way: NotCompleted -> Completed, terminal)
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OrderStatus {
    #[default]
    #[serde(rename = "Not completed")]
    NotCompleted,
    #[serde(rename = "Completed")]
    Completed,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::NotCompleted => "Not completed",
            OrderStatus::Completed => "Completed",
        }
    }
}

/// Order document stored in MongoDB
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct OrderDoc {
    /// MongoDB document ID
    #[serde(skip_serializing_if = "Option::is_none")]
    pub _id: Option<ObjectId>,

    /// Common metadata (created_at, updated_at, is_deleted)
    #[serde(default)]
    pub metadata: Metadata,

    /// Owning user
    pub user_id: ObjectId,

    /// Completion state
    #[serde(default)]
    pub status: OrderStatus,

    /// FAQ ids linked to this order; replaced wholesale on each status
    /// transition (Orders/"Not completed" set while open, Orders/"Completed"
    /// set once confirmed)
    #[serde(default)]
    pub faq_ids: Vec<ObjectId>,

    /// Product this order is for
    #[serde(default)]
    pub product_name: String,

    /// Category tag of the ordered product (storefront listing filter)
    #[serde(default)]
    pub category: String,

    /// When the order was placed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placed_at: Option<DateTime>,

    /// When the order was confirmed (set on transition to Completed)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confirmed_at: Option<DateTime>,
}

impl IntoIndexes for OrderDoc {
    fn into_indices() -> Vec<(Document, Option<IndexOptions>)> {
        vec![(
            doc! { "user_id": 1 },
            Some(
                IndexOptions::builder()
                    .name("order_user_index".to_string())
                    .build(),
            ),
        )]
    }
}

impl MutMetadata for OrderDoc {
    fn mut_metadata(&mut self) -> &mut Metadata {
        &mut self.metadata
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn order_status_wire_format() {
        assert_eq!(
            serde_json::to_string(&OrderStatus::NotCompleted).unwrap(),
            r#""Not completed""#
        );
        let parsed: OrderStatus = serde_json::from_str(r#""Completed""#).unwrap();
        assert_eq!(parsed, OrderStatus::Completed);
    }
}
