//! Product document schema

use bson::{doc, oid::ObjectId, Document};
use mongodb::options::IndexOptions;
use serde::{Deserialize, Serialize};

use crate::db::mongo::{IntoIndexes, MutMetadata};
use crate::db::schemas::Metadata;

/// Collection name for products
pub const PRODUCT_COLLECTION: &str = "products";

/// Product document stored in MongoDB
///
/// Read-only from the FAQ pipeline's perspective; pricing/valuation payload
/// shape varies by category so it stays a raw document.
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct ProductDoc {
    /// MongoDB document ID
    #[serde(skip_serializing_if = "Option::is_none")]
    pub _id: Option<ObjectId>,

    /// Common metadata (created_at, updated_at, is_deleted)
    #[serde(default)]
    pub metadata: Metadata,

    /// Display name, also used for the "<productName> General" path filter
    pub name: String,

    /// Category tag the storefront lists this product under
    pub category: String,

    /// Category-varying price/valuation payload
    #[serde(default)]
    pub display: Document,

    /// FAQ ids associated with this product
    #[serde(default)]
    pub faq_ids: Vec<ObjectId>,
}

impl IntoIndexes for ProductDoc {
    fn into_indices() -> Vec<(Document, Option<IndexOptions>)> {
        vec![
            (
                doc! { "name": 1 },
                Some(
                    IndexOptions::builder()
                        .unique(true)
                        .name("product_name_unique".to_string())
                        .build(),
                ),
            ),
            (
                doc! { "category": 1 },
                Some(
                    IndexOptions::builder()
                        .name("product_category_index".to_string())
                        .build(),
                ),
            ),
        ]
    }
}

impl MutMetadata for ProductDoc {
    fn mut_metadata(&mut self) -> &mut Metadata {
        &mut self.metadata
    }
}
