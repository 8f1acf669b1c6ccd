//! Demo data seeding
//!
//! Invoked explicitly (the `concierge-seed` binary, or dev mode at startup),
//! never as a side effect of opening a connection. Idempotent: every entity
//! is upserted by its natural key (category name, FAQ question text, user
//! name, product name), so running the seeder against an already-seeded
//! store changes nothing.
//!
//! Entities are created in dependency order (FAQs, then the category tree
//! bottom-up, then users and products) so link lists can be written in one
//! insert without follow-up updates.

use bson::{doc, oid::ObjectId};
use tracing::info;

use crate::auth::hash_password;
use crate::db::schemas::{
    CategoryDoc, FaqDoc, KycStatus, ProductDoc, UserDoc, ROOT_CATEGORY_NAME,
};
use crate::error::Result;
use crate::faq::dynamic::{
    KEY_ACCOUNT_BALANCE, KEY_KYC_STATUS, KEY_OPEN_ORDERS, KEY_ORDER_STATUS,
};
use crate::store::SupportStore;

/// What a seeding run did
#[derive(Debug, Default, Clone, Copy)]
pub struct SeedSummary {
    pub created: usize,
    pub existing: usize,
}

impl SeedSummary {
    fn mark_created(&mut self, id: ObjectId) -> ObjectId {
        self.created += 1;
        id
    }

    fn mark_existing(&mut self, id: ObjectId) -> ObjectId {
        self.existing += 1;
        id
    }
}

struct FaqSeed<'a> {
    question: &'a str,
    path: &'a [&'a str],
    answer: &'a str,
    dynamic_key: Option<&'a str>,
}

async fn ensure_faq(
    store: &dyn SupportStore,
    summary: &mut SeedSummary,
    seed: FaqSeed<'_>,
) -> Result<ObjectId> {
    if let Some(faq) = store.faq_by_question(seed.question).await? {
        return Ok(summary.mark_existing(faq._id.unwrap_or_default()));
    }

    let id = store
        .insert_faq(FaqDoc {
            question_text: seed.question.to_string(),
            category_path: seed.path.iter().map(|s| s.to_string()).collect(),
            answer_text: seed.answer.to_string(),
            is_dynamic: seed.dynamic_key.is_some(),
            dynamic_key: seed.dynamic_key.map(str::to_string),
            ..Default::default()
        })
        .await?;
    Ok(summary.mark_created(id))
}

async fn ensure_category(
    store: &dyn SupportStore,
    summary: &mut SeedSummary,
    name: &str,
    sub_category_ids: Vec<ObjectId>,
    faq_ids: Vec<ObjectId>,
) -> Result<ObjectId> {
    if let Some(category) = store.category_by_name(name).await? {
        return Ok(summary.mark_existing(category._id.unwrap_or_default()));
    }

    let has_sub_category = !sub_category_ids.is_empty();
    let id = store
        .insert_category(CategoryDoc {
            name: name.to_string(),
            sub_category_ids,
            faq_ids,
            has_sub_category,
            ..Default::default()
        })
        .await?;
    Ok(summary.mark_created(id))
}

struct UserSeed<'a> {
    name: &'a str,
    password: &'a str,
    kyc: KycStatus,
    account_balance: f64,
    dob: &'a str,
    mobile: &'a str,
    marital_status: &'a str,
    gender: &'a str,
    faq_ids: Vec<ObjectId>,
}

async fn ensure_user(
    store: &dyn SupportStore,
    summary: &mut SeedSummary,
    seed: UserSeed<'_>,
) -> Result<ObjectId> {
    if let Some(user) = store.user_by_name(seed.name).await? {
        return Ok(summary.mark_existing(user._id.unwrap_or_default()));
    }

    let mut user = UserDoc::new(seed.name.to_string(), hash_password(seed.password)?);
    user.kyc = seed.kyc;
    user.account_balance = seed.account_balance;
    user.dob = seed.dob.to_string();
    user.mobile = seed.mobile.to_string();
    user.marital_status = seed.marital_status.to_string();
    user.gender = seed.gender.to_string();
    user.faq_ids = seed.faq_ids;

    let id = store.insert_user(user).await?;
    Ok(summary.mark_created(id))
}

async fn ensure_product(
    store: &dyn SupportStore,
    summary: &mut SeedSummary,
    name: &str,
    category: &str,
    display: bson::Document,
    faq_ids: Vec<ObjectId>,
) -> Result<ObjectId> {
    if let Some(product) = store.product_by_name(name).await? {
        return Ok(summary.mark_existing(product._id.unwrap_or_default()));
    }

    let id = store
        .insert_product(ProductDoc {
            name: name.to_string(),
            category: category.to_string(),
            display,
            faq_ids,
            ..Default::default()
        })
        .await?;
    Ok(summary.mark_created(id))
}

/// Seed the demo dataset
pub async fn run(store: &dyn SupportStore) -> Result<SeedSummary> {
    let mut summary = SeedSummary::default();
    let s = &mut summary;

    // --- FAQs ---
    let kyc_how = ensure_faq(store, s, FaqSeed {
        question: "How do I complete my KYC?",
        path: &["My Account", "KYC"],
        answer: "Upload your PAN and address proof from the account page; verification takes one working day.",
        dynamic_key: None,
    }).await?;
    let kyc_why = ensure_faq(store, s, FaqSeed {
        question: "Why is KYC required?",
        path: &["My Account", "KYC"],
        answer: "Identity verification is mandated by regulation before you can place orders.",
        dynamic_key: None,
    }).await?;
    let kyc_status = ensure_faq(store, s, FaqSeed {
        question: "What is my KYC status?",
        path: &["My Account", "KYC"],
        answer: "",
        dynamic_key: Some(KEY_KYC_STATUS),
    }).await?;

    let acct_mobile = ensure_faq(store, s, FaqSeed {
        question: "How do I change my mobile number?",
        path: &["My Account"],
        answer: "Open account settings, choose Edit next to the mobile number, and confirm via OTP.",
        dynamic_key: None,
    }).await?;
    let acct_balance = ensure_faq(store, s, FaqSeed {
        question: "What is my account balance?",
        path: &["My Account"],
        answer: "",
        dynamic_key: Some(KEY_ACCOUNT_BALANCE),
    }).await?;

    let orders_place = ensure_faq(store, s, FaqSeed {
        question: "How do I place an order?",
        path: &["Orders", "General"],
        answer: "Pick a product, choose an amount, and confirm from the order review screen.",
        dynamic_key: None,
    }).await?;
    let orders_open = ensure_faq(store, s, FaqSeed {
        question: "Which of my orders are awaiting confirmation?",
        path: &["Orders", "General"],
        answer: "",
        dynamic_key: Some(KEY_OPEN_ORDERS),
    }).await?;

    let order_when = ensure_faq(store, s, FaqSeed {
        question: "When will my order be confirmed?",
        path: &["Orders", "Not completed"],
        answer: "Orders placed before 2pm are confirmed the same working day.",
        dynamic_key: None,
    }).await?;
    let order_status = ensure_faq(store, s, FaqSeed {
        question: "What is the status of my order?",
        path: &["Orders", "Not completed"],
        answer: "",
        dynamic_key: Some(KEY_ORDER_STATUS),
    }).await?;

    let order_invoice = ensure_faq(store, s, FaqSeed {
        question: "How do I download my invoice?",
        path: &["Orders", "Completed"],
        answer: "Open the order from your order history and choose Download invoice.",
        dynamic_key: None,
    }).await?;
    let order_cancel_done = ensure_faq(store, s, FaqSeed {
        question: "Can I cancel a completed order?",
        path: &["Orders", "Completed"],
        answer: "No. Completed orders are final and can no longer be cancelled.",
        dynamic_key: None,
    }).await?;

    let pay_how = ensure_faq(store, s, FaqSeed {
        question: "How do payments work?",
        path: &["Payments"],
        answer: "Payments are collected through UPI or your linked bank account at order confirmation.",
        dynamic_key: None,
    }).await?;
    let pay_upi = ensure_faq(store, s, FaqSeed {
        question: "Is UPI supported?",
        path: &["Payments"],
        answer: "Yes, all UPI handles are supported.",
        dynamic_key: None,
    }).await?;

    let gold_general = ensure_faq(store, s, FaqSeed {
        question: "What is Gold Saver?",
        path: &["Products", "Gold Saver General"],
        answer: "Gold Saver lets you buy 24K digital gold in amounts as small as ten rupees.",
        dynamic_key: None,
    }).await?;
    let gold_charges = ensure_faq(store, s, FaqSeed {
        question: "What are Gold Saver redemption charges?",
        path: &["Products", "Gold Saver", "Charges"],
        answer: "Redemption to physical gold carries minting and delivery charges shown at checkout.",
        dynamic_key: None,
    }).await?;
    let fund_general = ensure_faq(store, s, FaqSeed {
        question: "What is Blue Chip Fund?",
        path: &["Products", "Blue Chip Fund General"],
        answer: "Blue Chip Fund is a large-cap equity fund tracking established companies.",
        dynamic_key: None,
    }).await?;

    // --- Category tree (bottom-up) ---
    let kyc_node = ensure_category(
        store,
        s,
        "KYC",
        vec![],
        vec![kyc_how, kyc_why, kyc_status],
    )
    .await?;
    let account_node = ensure_category(
        store,
        s,
        "My Account",
        vec![kyc_node],
        vec![acct_mobile, acct_balance],
    )
    .await?;
    let orders_node = ensure_category(
        store,
        s,
        "Orders",
        vec![],
        vec![orders_place, orders_open, order_when, order_status, order_invoice, order_cancel_done],
    )
    .await?;
    let products_node = ensure_category(
        store,
        s,
        "Products",
        vec![],
        vec![gold_general, gold_charges, fund_general],
    )
    .await?;
    let payments_node =
        ensure_category(store, s, "Payments", vec![], vec![pay_how, pay_upi]).await?;
    ensure_category(
        store,
        s,
        ROOT_CATEGORY_NAME,
        vec![orders_node, products_node, account_node, payments_node],
        vec![],
    )
    .await?;

    // --- Users ---
    ensure_user(store, s, UserSeed {
        name: "ramesh",
        password: "ramesh@demo1",
        kyc: KycStatus::Completed,
        account_balance: 25000.50,
        dob: "1988-04-12",
        mobile: "9876543210",
        marital_status: "Married",
        gender: "Male",
        faq_ids: vec![acct_mobile, acct_balance, kyc_status],
    }).await?;
    ensure_user(store, s, UserSeed {
        name: "asha",
        password: "asha@demo1",
        kyc: KycStatus::InProgress,
        account_balance: 1200.0,
        dob: "1994-11-02",
        mobile: "9123456780",
        marital_status: "Single",
        gender: "Female",
        faq_ids: vec![acct_mobile, acct_balance, kyc_status, kyc_how],
    }).await?;

    // --- Products ---
    ensure_product(
        store,
        s,
        "Gold Saver",
        "Gold",
        doc! { "pricePerGram": 6214.50, "purity": "24K" },
        vec![gold_general, gold_charges],
    )
    .await?;
    ensure_product(
        store,
        s,
        "Blue Chip Fund",
        "Mutual Funds",
        doc! { "nav": 45.20, "risk": "Moderate", "minSip": 500 },
        vec![fund_general],
    )
    .await?;

    info!(
        "Seeding complete: {} created, {} already present",
        summary.created, summary.existing
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    #[tokio::test]
    async fn second_run_changes_nothing() {
        let store = MemoryStore::new();

        let first = run(&store).await.unwrap();
        assert!(first.created > 0);
        assert_eq!(first.existing, 0);

        let second = run(&store).await.unwrap();
        assert_eq!(second.created, 0);
        assert_eq!(second.existing, first.created);
    }

    #[tokio::test]
    async fn seeded_tree_supports_the_root_listing_contract() {
        let store = MemoryStore::new();
        run(&store).await.unwrap();

        let listing = crate::faq::resolution::list_categories(&store, None, None)
            .await
            .unwrap();
        let names: Vec<_> = listing.iter().map(|c| c.name.clone()).collect();
        // Orders and Products hidden, My Account hidden for anonymous callers
        assert_eq!(names, vec!["Payments"]);

        let user = store.user_by_name("ramesh").await.unwrap().unwrap();
        let authed =
            crate::faq::resolution::list_categories(&store, None, Some(&user._id.unwrap().to_hex()))
                .await
                .unwrap();
        let names: Vec<_> = authed.iter().map(|c| c.name.clone()).collect();
        assert_eq!(names, vec!["My Account", "Payments"]);
    }

    #[tokio::test]
    async fn seeded_kyc_set_reaches_in_progress_users() {
        let store = MemoryStore::new();
        run(&store).await.unwrap();

        let asha = store.user_by_name("asha").await.unwrap().unwrap();
        let entries = crate::faq::kyc::kyc_faqs(&store, Some(&asha._id.unwrap().to_hex()))
            .await
            .unwrap();
        assert_eq!(entries.len(), 3);

        let ramesh = store.user_by_name("ramesh").await.unwrap().unwrap();
        let entries = crate::faq::kyc::kyc_faqs(&store, Some(&ramesh._id.unwrap().to_hex()))
            .await
            .unwrap();
        assert!(entries.is_empty());
    }
}
