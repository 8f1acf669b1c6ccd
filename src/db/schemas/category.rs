//! Category document schema
//!
//! Categories form a tree rooted at the single node named "root". Listing
//! queries descend exactly one level per request.

use bson::{doc, oid::ObjectId, Document};
use mongodb::options::IndexOptions;
use serde::{Deserialize, Serialize};

use crate::db::mongo::{IntoIndexes, MutMetadata};
use crate::db::schemas::Metadata;

/// Collection name for categories
pub const CATEGORY_COLLECTION: &str = "categories";

/// Name of the tree root node
pub const ROOT_CATEGORY_NAME: &str = "root";

/// Category document stored in MongoDB
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct CategoryDoc {
    /// MongoDB document ID
    #[serde(skip_serializing_if = "Option::is_none")]
    pub _id: Option<ObjectId>,

    /// Common metadata (created_at, updated_at, is_deleted)
    #[serde(default)]
    pub metadata: Metadata,

    /// Category name
    pub name: String,

    /// Immediate children
    #[serde(default)]
    pub sub_category_ids: Vec<ObjectId>,

    /// FAQ ids attached directly to this node
    #[serde(default)]
    pub faq_ids: Vec<ObjectId>,

    /// Whether children exist (denormalized for the listing response)
    #[serde(default)]
    pub has_sub_category: bool,
}

impl IntoIndexes for CategoryDoc {
    fn into_indices() -> Vec<(Document, Option<IndexOptions>)> {
        vec![(
            doc! { "name": 1 },
            Some(
                IndexOptions::builder()
                    .unique(true)
                    .name("category_name_unique".to_string())
                    .build(),
            ),
        )]
    }
}

impl MutMetadata for CategoryDoc {
    fn mut_metadata(&mut self) -> &mut Metadata {
        &mut self.metadata
    }
}
