//! FAQ document schema

use bson::{doc, oid::ObjectId, Document};
use mongodb::options::IndexOptions;
use serde::{Deserialize, Serialize};

use crate::db::mongo::{IntoIndexes, MutMetadata};
use crate::db::schemas::Metadata;

/// Collection name for FAQs
pub const FAQ_COLLECTION: &str = "faqs";

/// FAQ document stored in MongoDB
///
/// `category_path` is the ordered list of category names from root to leaf;
/// listing queries match it by single-segment equality or by
/// contains-all-of semantics.
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct FaqDoc {
    /// MongoDB document ID
    #[serde(skip_serializing_if = "Option::is_none")]
    pub _id: Option<ObjectId>,

    /// Common metadata (created_at, updated_at, is_deleted)
    #[serde(default)]
    pub metadata: Metadata,

    /// Question text shown to the user
    pub question_text: String,

    /// Ordered category names from root to leaf
    #[serde(default)]
    pub category_path: Vec<String>,

    /// Stored answer; ignored when `is_dynamic` is set
    #[serde(default)]
    pub answer_text: String,

    /// Whether the answer must be computed per-request
    #[serde(default)]
    pub is_dynamic: bool,

    /// Key selecting the dynamic-answer strategy (present iff `is_dynamic`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dynamic_key: Option<String>,
}

impl IntoIndexes for FaqDoc {
    fn into_indices() -> Vec<(Document, Option<IndexOptions>)> {
        vec![
            (
                doc! { "category_path": 1 },
                Some(
                    IndexOptions::builder()
                        .name("faq_category_path_index".to_string())
                        .build(),
                ),
            ),
            (
                doc! { "question_text": 1 },
                Some(
                    IndexOptions::builder()
                        .unique(true)
                        .name("faq_question_unique".to_string())
                        .build(),
                ),
            ),
        ]
    }
}

impl MutMetadata for FaqDoc {
    fn mut_metadata(&mut self) -> &mut Metadata {
        &mut self.metadata
    }
}
