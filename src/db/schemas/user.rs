//! User document schema
//!
//! Stores credentials, profile fields, KYC state, and the FAQ/order id
//! lists the resolution pipeline walks.

use bson::{doc, oid::ObjectId, Document};
use mongodb::options::IndexOptions;
use serde::{Deserialize, Serialize};

use crate::db::mongo::{IntoIndexes, MutMetadata};
use crate::db::schemas::Metadata;

/// Collection name for users
pub const USER_COLLECTION: &str = "users";

/// KYC (identity verification) completion state
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum KycStatus {
    #[default]
    #[serde(rename = "Not started")]
    NotStarted,
    #[serde(rename = "In progress")]
    InProgress,
    #[serde(rename = "Completed")]
    Completed,
}

impl KycStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            KycStatus::NotStarted => "Not started",
            KycStatus::InProgress => "In progress",
            KycStatus::Completed => "Completed",
        }
    }
}

/// User document stored in MongoDB
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct UserDoc {
    /// MongoDB document ID
    #[serde(skip_serializing_if = "Option::is_none")]
    pub _id: Option<ObjectId>,

    /// Common metadata (created_at, updated_at, is_deleted)
    #[serde(default)]
    pub metadata: Metadata,

    /// Login name
    pub user_name: String,

    /// Argon2 password hash
    pub password_hash: String,

    /// Date of birth (display string, profile endpoint only)
    #[serde(default)]
    pub dob: String,

    /// Mobile number
    #[serde(default)]
    pub mobile: String,

    /// Marital status
    #[serde(default)]
    pub marital_status: String,

    /// Gender
    #[serde(default)]
    pub gender: String,

    /// KYC completion state; gates the "My Account/KYC" FAQ injection
    #[serde(default)]
    pub kyc: KycStatus,

    /// Live account balance, read by the dynamic answer resolver
    #[serde(default)]
    pub account_balance: f64,

    /// Ordered list of FAQ ids attached to the account profile
    #[serde(default)]
    pub faq_ids: Vec<ObjectId>,

    /// Ids of orders owned by this user
    #[serde(default)]
    pub order_ids: Vec<ObjectId>,
}

impl UserDoc {
    pub fn new(user_name: String, password_hash: String) -> Self {
        Self {
            _id: None,
            metadata: Metadata::new(),
            user_name,
            password_hash,
            ..Default::default()
        }
    }
}

impl IntoIndexes for UserDoc {
    fn into_indices() -> Vec<(Document, Option<IndexOptions>)> {
        vec![(
            doc! { "user_name": 1 },
            Some(
                IndexOptions::builder()
                    .unique(true)
                    .name("user_name_unique".to_string())
                    .build(),
            ),
        )]
    }
}

impl MutMetadata for UserDoc {
    fn mut_metadata(&mut self) -> &mut Metadata {
        &mut self.metadata
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kyc_status_wire_format() {
        assert_eq!(
            serde_json::to_string(&KycStatus::NotStarted).unwrap(),
            r#""Not started""#
        );
        assert_eq!(
            serde_json::to_string(&KycStatus::Completed).unwrap(),
            r#""Completed""#
        );
        let parsed: KycStatus = serde_json::from_str(r#""In progress""#).unwrap();
        assert_eq!(parsed, KycStatus::InProgress);
    }
}
