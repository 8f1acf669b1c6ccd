//! KYC gate
//!
//! Users who have not completed identity verification get the
//! "My Account/KYC" FAQ set prepended to every FAQ-context response.
//!
//! The gate returns an explicit `Result` instead of swallowing store
//! failures; the resolution layer decides to fail open (log and inject
//! nothing) so the external contract is unchanged.

use bson::oid::ObjectId;

use crate::db::schemas::KycStatus;
use crate::error::Result;
use crate::faq::FaqEntry;
use crate::store::SupportStore;

/// Path segments every KYC-nudge FAQ carries
const KYC_PATH_SEGMENTS: [&str; 2] = ["My Account", "KYC"];

/// Fetch the KYC FAQ set for a user.
///
/// Empty when no user id is supplied, the id does not resolve to a user, or
/// the user's KYC status is Completed. A store failure is an error, not an
/// empty set.
pub async fn kyc_faqs(store: &dyn SupportStore, user_id: Option<&str>) -> Result<Vec<FaqEntry>> {
    let Some(user_id) = user_id else {
        return Ok(Vec::new());
    };

    // An unparseable id is an unresolvable user, not a failure
    let Ok(oid) = ObjectId::parse_str(user_id) else {
        return Ok(Vec::new());
    };

    let Some(user) = store.user_by_id(&oid).await? else {
        return Ok(Vec::new());
    };

    if user.kyc == KycStatus::Completed {
        return Ok(Vec::new());
    }

    let faqs = store.faqs_containing_all(&KYC_PATH_SEGMENTS).await?;
    Ok(faqs.iter().map(FaqEntry::from_doc).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::schemas::{FaqDoc, UserDoc};
    use crate::store::MemoryStore;

    async fn store_with_kyc_faq() -> (MemoryStore, ObjectId) {
        let store = MemoryStore::new();
        let faq_id = store
            .insert_faq(FaqDoc {
                question_text: "How do I complete my KYC?".into(),
                category_path: vec!["My Account".into(), "KYC".into()],
                answer_text: "Upload your documents from the account page.".into(),
                ..Default::default()
            })
            .await
            .unwrap();
        (store, faq_id)
    }

    #[tokio::test]
    async fn no_user_id_yields_empty() {
        let (store, _) = store_with_kyc_faq().await;
        assert!(kyc_faqs(&store, None).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn unresolvable_user_yields_empty() {
        let (store, _) = store_with_kyc_faq().await;
        assert!(kyc_faqs(&store, Some("not-an-oid")).await.unwrap().is_empty());
        let unknown = ObjectId::new().to_hex();
        assert!(kyc_faqs(&store, Some(&unknown)).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn incomplete_kyc_gets_the_nudge_set() {
        let (store, faq_id) = store_with_kyc_faq().await;
        let user_id = store
            .insert_user(UserDoc::new("asha".into(), "hash".into()))
            .await
            .unwrap();

        let faqs = kyc_faqs(&store, Some(&user_id.to_hex())).await.unwrap();
        assert_eq!(faqs.len(), 1);
        assert_eq!(faqs[0].question_id, faq_id.to_hex());
    }

    #[tokio::test]
    async fn completed_kyc_gets_nothing() {
        let (store, _) = store_with_kyc_faq().await;
        let mut user = UserDoc::new("asha".into(), "hash".into());
        user.kyc = KycStatus::Completed;
        let user_id = store.insert_user(user).await.unwrap();

        assert!(kyc_faqs(&store, Some(&user_id.to_hex()))
            .await
            .unwrap()
            .is_empty());
    }
}
