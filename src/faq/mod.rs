//! Contextual FAQ resolution
//!
//! The chatbot's core: given conversational context (category, product,
//! order, or question id) plus an optional user, assemble a deduplicated
//! list of FAQ entries, injecting the KYC nudge set where applicable and
//! computing dynamic answers per request.

pub mod dynamic;
pub mod kyc;
pub mod resolution;

use serde::Serialize;
use std::collections::HashSet;

use crate::db::schemas::FaqDoc;

/// A question-id/text pair as returned on the wire
#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
pub struct FaqEntry {
    #[serde(rename = "QuestionId")]
    pub question_id: String,
    #[serde(rename = "QuestionText")]
    pub question_text: String,
}

impl FaqEntry {
    pub fn from_doc(doc: &FaqDoc) -> Self {
        Self {
            question_id: doc._id.map(|o| o.to_hex()).unwrap_or_default(),
            question_text: doc.question_text.clone(),
        }
    }
}

/// One immediate child in a category listing
#[derive(Serialize, Clone, Debug)]
pub struct CategorySummary {
    #[serde(rename = "categoryId")]
    pub category_id: String,
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "hasSubCategory")]
    pub has_sub_category: bool,
}

/// Drop repeated entries, keyed on question id.
///
/// Keyed on the stable id rather than structural equality so a text change
/// between two lookups cannot smuggle a duplicate through.
pub fn dedup_entries(entries: Vec<FaqEntry>) -> Vec<FaqEntry> {
    let mut seen = HashSet::new();
    entries
        .into_iter()
        .filter(|e| seen.insert(e.question_id.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dedup_keeps_first_occurrence() {
        let entries = vec![
            FaqEntry {
                question_id: "a".into(),
                question_text: "How do I complete KYC?".into(),
            },
            FaqEntry {
                question_id: "b".into(),
                question_text: "Where is my order?".into(),
            },
            FaqEntry {
                question_id: "a".into(),
                question_text: "How do I complete KYC? (edited)".into(),
            },
        ];

        let deduped = dedup_entries(entries);
        assert_eq!(deduped.len(), 2);
        assert_eq!(deduped[0].question_id, "a");
        // First occurrence wins even when the text differs
        assert_eq!(deduped[0].question_text, "How do I complete KYC?");
        assert_eq!(deduped[1].question_id, "b");
    }
}
