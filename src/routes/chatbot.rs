//! Chatbot FAQ routes
//!
//! Thin HTTP shims over `faq::resolution` and `faq::dynamic`. Wire field
//! names (`QuestionId`, `QuestionText`, `Answer`, `categoryId`, `Name`,
//! `hasSubCategory`) are part of the frontend contract and never change.

use bytes::Bytes;
use http_body_util::Full;
use hyper::{Response, StatusCode};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::warn;

use crate::error::{Result, ServiceError};
use crate::faq::dynamic::{self, AnswerValue, DynamicAnswer};
use crate::faq::resolution;
use crate::routes::{empty_response, error_response, json_response};
use crate::server::AppState;

#[derive(Serialize)]
struct AnswerResponse {
    #[serde(rename = "Answer")]
    answer: AnswerValue,
}

fn opt(params: &HashMap<String, String>, key: &str) -> Option<String> {
    params.get(key).cloned()
}

/// GET /search-on-category?categoryName=&user?=
pub async fn handle_search_on_category(
    state: Arc<AppState>,
    params: &HashMap<String, String>,
) -> Response<Full<Bytes>> {
    let Some(category_name) = params.get("categoryName") else {
        return empty_response(StatusCode::NOT_FOUND);
    };
    let user = opt(params, "user");

    match resolution::by_category_name(state.store.as_ref(), category_name, user.as_deref()).await
    {
        Ok(entries) => json_response(StatusCode::OK, &entries),
        Err(e) => error_response(e),
    }
}

/// GET /user-specific-order-details?user=
pub async fn handle_user_order_details(
    state: Arc<AppState>,
    params: &HashMap<String, String>,
) -> Response<Full<Bytes>> {
    let Some(user) = params.get("user") else {
        return empty_response(StatusCode::NOT_FOUND);
    };

    match resolution::order_general(state.store.as_ref(), user).await {
        Ok(entries) => json_response(StatusCode::OK, &entries),
        Err(e) => error_response(e),
    }
}

/// GET /user-account-questions?user=
pub async fn handle_account_questions(
    state: Arc<AppState>,
    params: &HashMap<String, String>,
) -> Response<Full<Bytes>> {
    let Some(user) = params.get("user") else {
        return empty_response(StatusCode::NOT_FOUND);
    };

    match resolution::account_questions(state.store.as_ref(), user).await {
        Ok(entries) => json_response(StatusCode::OK, &entries),
        Err(e) => error_response(e),
    }
}

/// GET /product-specific-questions?product=&user?=
pub async fn handle_product_questions(
    state: Arc<AppState>,
    params: &HashMap<String, String>,
) -> Response<Full<Bytes>> {
    let Some(product) = params.get("product") else {
        return empty_response(StatusCode::NOT_FOUND);
    };
    let user = opt(params, "user");

    match resolution::product_questions(state.store.as_ref(), product, user.as_deref()).await {
        Ok(entries) => json_response(StatusCode::OK, &entries),
        Err(e) => error_response(e),
    }
}

/// GET /order-specific-questions?user=&order=
pub async fn handle_order_questions(
    state: Arc<AppState>,
    params: &HashMap<String, String>,
) -> Response<Full<Bytes>> {
    let (Some(user), Some(order)) = (params.get("user"), params.get("order")) else {
        return empty_response(StatusCode::NOT_FOUND);
    };

    match resolution::order_questions(state.store.as_ref(), user, order).await {
        Ok(entries) => json_response(StatusCode::OK, &entries),
        Err(e) => error_response(e),
    }
}

/// GET /get-answer-by-questionId/:questionId
///
/// Static FAQs answer from their stored text. Dynamic FAQs dispatch on
/// their `dynamic_key` with the query string as context; an unmapped key or
/// an empty computation both answer 404.
pub async fn handle_answer(
    state: Arc<AppState>,
    question_id: &str,
    params: &HashMap<String, String>,
) -> Response<Full<Bytes>> {
    let result: Result<AnswerValue> = async {
        let oid = bson::oid::ObjectId::parse_str(question_id)
            .map_err(|_| ServiceError::not_found("invalid question id"))?;
        let faq = state
            .store
            .faq_by_id(&oid)
            .await?
            .ok_or_else(|| ServiceError::not_found("question"))?;

        if !faq.is_dynamic {
            return Ok(AnswerValue::Text(faq.answer_text));
        }

        let Some(key) = faq.dynamic_key.as_deref() else {
            warn!("Dynamic FAQ {} has no dynamic_key", question_id);
            return Err(ServiceError::not_found("answer"));
        };
        match dynamic::resolve(state.store.as_ref(), key, params).await? {
            DynamicAnswer::Computed(value) => Ok(value),
            DynamicAnswer::Unmapped => {
                warn!("No answer strategy registered for key '{}'", key);
                Err(ServiceError::not_found("answer"))
            }
            DynamicAnswer::Empty => Err(ServiceError::not_found("answer")),
        }
    }
    .await;

    match result {
        Ok(answer) => json_response(StatusCode::OK, &AnswerResponse { answer }),
        Err(e) => error_response(e),
    }
}

/// GET /get-all-categories?id?=&user?=
pub async fn handle_all_categories(
    state: Arc<AppState>,
    params: &HashMap<String, String>,
) -> Response<Full<Bytes>> {
    let id = opt(params, "id");
    let user = opt(params, "user");

    match resolution::list_categories(state.store.as_ref(), id.as_deref(), user.as_deref()).await
    {
        Ok(listing) => json_response(StatusCode::OK, &listing),
        Err(e) => error_response(e),
    }
}

/// GET /get-question-by-category/:categoryId
pub async fn handle_questions_by_category(
    state: Arc<AppState>,
    category_id: &str,
) -> Response<Full<Bytes>> {
    match resolution::by_category_id(state.store.as_ref(), category_id).await {
        Ok(entries) => json_response(StatusCode::OK, &entries),
        Err(e) => error_response(e),
    }
}
