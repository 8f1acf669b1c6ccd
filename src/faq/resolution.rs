//! FAQ resolution service
//!
//! Selects the relevant FAQ set for each of the context shapes the chatbot
//! can be in, deduplicates by question id, and prepends the KYC nudge set
//! where applicable.
//!
//! Every lookup failure collapses to `NotFound` for the caller; the only
//! sanctioned partial result is the anonymous product filter. KYC gate
//! failures are logged and treated as "no KYC FAQs" so a store hiccup never
//! takes down an otherwise answerable request.

use bson::oid::ObjectId;
use tracing::warn;

use crate::db::schemas::{CategoryDoc, ROOT_CATEGORY_NAME};
use crate::error::{Result, ServiceError};
use crate::faq::{dedup_entries, kyc::kyc_faqs, CategorySummary, FaqEntry};
use crate::store::SupportStore;

/// Categories synthesized for internal bookkeeping, never listed at the root
const HIDDEN_ROOT_CHILDREN: [&str; 2] = ["Orders", "Products"];

/// Root child shown only to authenticated callers
const ACCOUNT_CATEGORY: &str = "My Account";

/// KYC injection with the fail-open policy applied
async fn kyc_prefix(store: &dyn SupportStore, user_id: Option<&str>) -> Vec<FaqEntry> {
    match kyc_faqs(store, user_id).await {
        Ok(entries) => entries,
        Err(e) => {
            warn!("KYC gate failed, serving response without KYC FAQs: {}", e);
            Vec::new()
        }
    }
}

fn parse_oid(raw: &str, what: &str) -> Result<ObjectId> {
    ObjectId::parse_str(raw).map_err(|_| ServiceError::not_found(format!("invalid {} id", what)))
}

/// Whether the caller resolves to a known user. Lookup failures count as
/// anonymous, matching the product-filter contract.
async fn resolves_to_user(store: &dyn SupportStore, user_id: Option<&str>) -> bool {
    let Some(raw) = user_id else { return false };
    let Ok(oid) = ObjectId::parse_str(raw) else {
        return false;
    };
    matches!(store.user_by_id(&oid).await, Ok(Some(_)))
}

/// FAQs whose category-path equals exactly the given single segment,
/// with KYC FAQs prepended when applicable.
pub async fn by_category_name(
    store: &dyn SupportStore,
    category_name: &str,
    user_id: Option<&str>,
) -> Result<Vec<FaqEntry>> {
    let faqs = store.faqs_by_exact_path(category_name).await?;

    let mut entries = kyc_prefix(store, user_id).await;
    entries.extend(faqs.iter().map(FaqEntry::from_doc));
    Ok(dedup_entries(entries))
}

/// General order-handling FAQs for a known user: path contains both
/// "Orders" and "General", in any order.
pub async fn order_general(store: &dyn SupportStore, user_id: &str) -> Result<Vec<FaqEntry>> {
    let oid = parse_oid(user_id, "user")?;
    store
        .user_by_id(&oid)
        .await?
        .ok_or_else(|| ServiceError::not_found("user"))?;

    let faqs = store.faqs_containing_all(&["Orders", "General"]).await?;

    let mut entries = kyc_prefix(store, Some(user_id)).await;
    entries.extend(faqs.iter().map(FaqEntry::from_doc));
    Ok(dedup_entries(entries))
}

/// Exactly the FAQs attached to the user's account profile. This set feeds
/// the KYC path, so no KYC injection happens here.
pub async fn account_questions(store: &dyn SupportStore, user_id: &str) -> Result<Vec<FaqEntry>> {
    let oid = parse_oid(user_id, "user")?;
    let user = store
        .user_by_id(&oid)
        .await?
        .ok_or_else(|| ServiceError::not_found("user"))?;

    let mut entries = Vec::with_capacity(user.faq_ids.len());
    for faq_id in &user.faq_ids {
        let faq = store
            .faq_by_id(faq_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("account faq"))?;
        entries.push(FaqEntry::from_doc(&faq));
    }
    Ok(dedup_entries(entries))
}

/// FAQs linked to a product. A resolvable caller gets the full set; an
/// anonymous caller only sees FAQs whose last path segment is
/// "<productName> General".
pub async fn product_questions(
    store: &dyn SupportStore,
    product_id: &str,
    user_id: Option<&str>,
) -> Result<Vec<FaqEntry>> {
    let oid = parse_oid(product_id, "product")?;
    let product = store
        .product_by_id(&oid)
        .await?
        .ok_or_else(|| ServiceError::not_found("product"))?;

    let known_user = resolves_to_user(store, user_id).await;
    let general_leaf = format!("{} General", product.name);

    let mut entries = kyc_prefix(store, user_id).await;
    for faq_id in &product.faq_ids {
        let faq = store
            .faq_by_id(faq_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("product faq"))?;
        if known_user || faq.category_path.last().map(String::as_str) == Some(general_leaf.as_str()) {
            entries.push(FaqEntry::from_doc(&faq));
        }
    }
    Ok(dedup_entries(entries))
}

/// FAQs linked to one of the user's own orders. Fails closed: an order id
/// not present in the requesting user's order list is NotFound even when
/// the order exists for someone else.
pub async fn order_questions(
    store: &dyn SupportStore,
    user_id: &str,
    order_id: &str,
) -> Result<Vec<FaqEntry>> {
    let user_oid = parse_oid(user_id, "user")?;
    let order_oid = parse_oid(order_id, "order")?;

    let user = store
        .user_by_id(&user_oid)
        .await?
        .ok_or_else(|| ServiceError::not_found("user"))?;

    if !user.order_ids.contains(&order_oid) {
        return Err(ServiceError::not_found("order not in user's order list"));
    }

    let order = store
        .order_by_id(&order_oid)
        .await?
        .ok_or_else(|| ServiceError::not_found("order"))?;

    let mut entries = kyc_prefix(store, Some(user_id)).await;
    for faq_id in &order.faq_ids {
        let faq = store
            .faq_by_id(faq_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("order faq"))?;
        entries.push(FaqEntry::from_doc(&faq));
    }
    Ok(dedup_entries(entries))
}

fn summarize(category: &CategoryDoc) -> CategorySummary {
    CategorySummary {
        category_id: category._id.map(|o| o.to_hex()).unwrap_or_default(),
        name: category.name.clone(),
        has_sub_category: category.has_sub_category,
    }
}

/// Immediate children of a category node.
///
/// With no id the root's children are listed, always hiding the synthetic
/// "Orders" and "Products" nodes and additionally hiding "My Account" for
/// callers that do not resolve to a user.
pub async fn list_categories(
    store: &dyn SupportStore,
    category_id: Option<&str>,
    user_id: Option<&str>,
) -> Result<Vec<CategorySummary>> {
    let parent = match category_id {
        Some(raw) => {
            let oid = parse_oid(raw, "category")?;
            store
                .category_by_id(&oid)
                .await?
                .ok_or_else(|| ServiceError::not_found("category"))?
        }
        None => store
            .category_by_name(ROOT_CATEGORY_NAME)
            .await?
            .ok_or_else(|| ServiceError::not_found("root category"))?,
    };

    let listing_root = category_id.is_none();
    let authenticated = listing_root && resolves_to_user(store, user_id).await;

    let mut listing = Vec::with_capacity(parent.sub_category_ids.len());
    for child_id in &parent.sub_category_ids {
        let child = store
            .category_by_id(child_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("sub category"))?;

        if listing_root {
            if HIDDEN_ROOT_CHILDREN.contains(&child.name.as_str()) {
                continue;
            }
            if !authenticated && child.name == ACCOUNT_CATEGORY {
                continue;
            }
        }
        listing.push(summarize(&child));
    }
    Ok(listing)
}

/// FAQs attached directly to a category node
pub async fn by_category_id(store: &dyn SupportStore, category_id: &str) -> Result<Vec<FaqEntry>> {
    let oid = parse_oid(category_id, "category")?;
    let category = store
        .category_by_id(&oid)
        .await?
        .ok_or_else(|| ServiceError::not_found("category"))?;

    let mut entries = Vec::with_capacity(category.faq_ids.len());
    for faq_id in &category.faq_ids {
        let faq = store
            .faq_by_id(faq_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("category faq"))?;
        entries.push(FaqEntry::from_doc(&faq));
    }
    Ok(dedup_entries(entries))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::schemas::{FaqDoc, KycStatus, OrderDoc, ProductDoc, UserDoc};
    use crate::store::MemoryStore;

    async fn add_faq(store: &MemoryStore, question: &str, path: &[&str]) -> ObjectId {
        store
            .insert_faq(FaqDoc {
                question_text: question.into(),
                category_path: path.iter().map(|s| s.to_string()).collect(),
                answer_text: format!("Answer to: {}", question),
                ..Default::default()
            })
            .await
            .unwrap()
    }

    async fn add_user(store: &MemoryStore, name: &str, kyc: KycStatus) -> ObjectId {
        let mut user = UserDoc::new(name.into(), "hash".into());
        user.kyc = kyc;
        store.insert_user(user).await.unwrap()
    }

    #[tokio::test]
    async fn category_name_matches_whole_path_only() {
        let store = MemoryStore::new();
        let hit = add_faq(&store, "How do payments work?", &["Payments"]).await;
        // Multi-segment path containing the name must not match
        add_faq(&store, "Payment issue on an order?", &["Orders", "Payments"]).await;

        let entries = by_category_name(&store, "Payments", None).await.unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].question_id, hit.to_hex());
    }

    #[tokio::test]
    async fn kyc_set_prepended_for_incomplete_user() {
        let store = MemoryStore::new();
        let kyc = add_faq(&store, "How do I complete my KYC?", &["My Account", "KYC"]).await;
        let plain = add_faq(&store, "How do payments work?", &["Payments"]).await;
        let user = add_user(&store, "asha", KycStatus::InProgress).await;

        let entries = by_category_name(&store, "Payments", Some(&user.to_hex()))
            .await
            .unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].question_id, kyc.to_hex());
        assert_eq!(entries[1].question_id, plain.to_hex());
    }

    #[tokio::test]
    async fn kyc_set_absent_for_completed_user() {
        let store = MemoryStore::new();
        add_faq(&store, "How do I complete my KYC?", &["My Account", "KYC"]).await;
        let plain = add_faq(&store, "How do payments work?", &["Payments"]).await;
        let user = add_user(&store, "asha", KycStatus::Completed).await;

        let entries = by_category_name(&store, "Payments", Some(&user.to_hex()))
            .await
            .unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].question_id, plain.to_hex());
    }

    #[tokio::test]
    async fn order_general_uses_containment_not_order() {
        let store = MemoryStore::new();
        let a = add_faq(&store, "Where is my order?", &["Orders", "General"]).await;
        let b = add_faq(&store, "Can I change my address?", &["General", "Orders"]).await;
        add_faq(&store, "How do payments work?", &["Payments"]).await;
        let user = add_user(&store, "asha", KycStatus::Completed).await;

        let entries = order_general(&store, &user.to_hex()).await.unwrap();
        let ids: Vec<_> = entries.iter().map(|e| e.question_id.clone()).collect();
        assert_eq!(entries.len(), 2);
        assert!(ids.contains(&a.to_hex()));
        assert!(ids.contains(&b.to_hex()));
    }

    #[tokio::test]
    async fn account_questions_follow_user_list_without_kyc_injection() {
        let store = MemoryStore::new();
        let kyc = add_faq(&store, "How do I complete my KYC?", &["My Account", "KYC"]).await;
        let profile = add_faq(&store, "How do I change my mobile number?", &["My Account"]).await;

        let mut user = UserDoc::new("asha".into(), "hash".into());
        user.kyc = KycStatus::NotStarted;
        user.faq_ids = vec![profile, kyc];
        let user_id = store.insert_user(user).await.unwrap();

        let entries = account_questions(&store, &user_id.to_hex()).await.unwrap();
        // Exactly the profile list, in order, no extra injection and no dupes
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].question_id, profile.to_hex());
        assert_eq!(entries[1].question_id, kyc.to_hex());
    }

    #[tokio::test]
    async fn anonymous_product_queries_only_see_the_general_leaf() {
        let store = MemoryStore::new();
        let general = add_faq(
            &store,
            "What is Gold Saver?",
            &["Products", "Gold Saver General"],
        )
        .await;
        let detail = add_faq(
            &store,
            "What are Gold Saver redemption charges?",
            &["Products", "Gold Saver", "Charges"],
        )
        .await;

        let product_id = store
            .insert_product(ProductDoc {
                name: "Gold Saver".into(),
                category: "Gold".into(),
                faq_ids: vec![general, detail],
                ..Default::default()
            })
            .await
            .unwrap();

        let anon = product_questions(&store, &product_id.to_hex(), None)
            .await
            .unwrap();
        assert_eq!(anon.len(), 1);
        assert_eq!(anon[0].question_id, general.to_hex());

        let user = add_user(&store, "asha", KycStatus::Completed).await;
        let known = product_questions(&store, &product_id.to_hex(), Some(&user.to_hex()))
            .await
            .unwrap();
        assert_eq!(known.len(), 2);
    }

    #[tokio::test]
    async fn unresolvable_user_falls_back_to_anonymous_filter() {
        let store = MemoryStore::new();
        let general = add_faq(
            &store,
            "What is Gold Saver?",
            &["Products", "Gold Saver General"],
        )
        .await;
        let detail = add_faq(
            &store,
            "What are Gold Saver redemption charges?",
            &["Products", "Gold Saver", "Charges"],
        )
        .await;
        let product_id = store
            .insert_product(ProductDoc {
                name: "Gold Saver".into(),
                category: "Gold".into(),
                faq_ids: vec![general, detail],
                ..Default::default()
            })
            .await
            .unwrap();

        let ghost = ObjectId::new().to_hex();
        let entries = product_questions(&store, &product_id.to_hex(), Some(&ghost))
            .await
            .unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].question_id, general.to_hex());
    }

    #[tokio::test]
    async fn order_questions_fail_closed_on_foreign_order() {
        let store = MemoryStore::new();
        let faq = add_faq(&store, "Where is my order?", &["Orders", "Not completed"]).await;

        let owner = add_user(&store, "asha", KycStatus::Completed).await;
        let outsider = add_user(&store, "vik", KycStatus::Completed).await;

        let order_id = store
            .insert_order(OrderDoc {
                user_id: owner,
                faq_ids: vec![faq],
                ..Default::default()
            })
            .await
            .unwrap();
        store.push_user_order(&owner, &order_id).await.unwrap();

        let owned = order_questions(&store, &owner.to_hex(), &order_id.to_hex())
            .await
            .unwrap();
        assert_eq!(owned.len(), 1);

        let foreign = order_questions(&store, &outsider.to_hex(), &order_id.to_hex()).await;
        assert!(matches!(foreign, Err(ServiceError::NotFound(_))));
    }

    #[tokio::test]
    async fn kyc_overlap_is_deduplicated() {
        let store = MemoryStore::new();
        // One FAQ reachable both through the KYC gate and the order linkage
        let shared = add_faq(&store, "How do I complete my KYC?", &["My Account", "KYC"]).await;
        let plain = add_faq(&store, "Where is my order?", &["Orders", "Not completed"]).await;

        let user = add_user(&store, "asha", KycStatus::NotStarted).await;
        let order_id = store
            .insert_order(OrderDoc {
                user_id: user,
                faq_ids: vec![plain, shared],
                ..Default::default()
            })
            .await
            .unwrap();
        store.push_user_order(&user, &order_id).await.unwrap();

        let entries = order_questions(&store, &user.to_hex(), &order_id.to_hex())
            .await
            .unwrap();
        assert_eq!(entries.len(), 2);
        // KYC set comes first, and the overlapping id appears exactly once
        assert_eq!(entries[0].question_id, shared.to_hex());
        assert_eq!(entries[1].question_id, plain.to_hex());
    }

    async fn category_tree(store: &MemoryStore) -> ObjectId {
        let mut child_ids = Vec::new();
        for name in ["Orders", "Products", "My Account", "Payments"] {
            let id = store
                .insert_category(crate::db::schemas::CategoryDoc {
                    name: name.into(),
                    has_sub_category: false,
                    ..Default::default()
                })
                .await
                .unwrap();
            child_ids.push(id);
        }
        store
            .insert_category(crate::db::schemas::CategoryDoc {
                name: ROOT_CATEGORY_NAME.into(),
                sub_category_ids: child_ids,
                has_sub_category: true,
                ..Default::default()
            })
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn root_listing_hides_synthetic_and_account_categories() {
        let store = MemoryStore::new();
        category_tree(&store).await;

        let anon = list_categories(&store, None, None).await.unwrap();
        let names: Vec<_> = anon.iter().map(|c| c.name.clone()).collect();
        assert_eq!(names, vec!["Payments"]);

        let user = add_user(&store, "asha", KycStatus::Completed).await;
        let authed = list_categories(&store, None, Some(&user.to_hex()))
            .await
            .unwrap();
        let names: Vec<_> = authed.iter().map(|c| c.name.clone()).collect();
        assert_eq!(names, vec!["My Account", "Payments"]);
    }

    #[tokio::test]
    async fn explicit_category_listing_returns_all_children() {
        let store = MemoryStore::new();
        let root_id = category_tree(&store).await;

        let listing = list_categories(&store, Some(&root_id.to_hex()), None)
            .await
            .unwrap();
        // Explicit-id listing applies no exclusions
        assert_eq!(listing.len(), 4);
    }

    #[tokio::test]
    async fn faqs_by_category_id_walk_the_attached_list() {
        let store = MemoryStore::new();
        let a = add_faq(&store, "How do payments work?", &["Payments"]).await;
        let b = add_faq(&store, "Is UPI supported?", &["Payments"]).await;
        let cat = store
            .insert_category(crate::db::schemas::CategoryDoc {
                name: "Payments".into(),
                faq_ids: vec![a, b, a],
                ..Default::default()
            })
            .await
            .unwrap();

        let entries = by_category_id(&store, &cat.to_hex()).await.unwrap();
        assert_eq!(entries.len(), 2);
    }
}
