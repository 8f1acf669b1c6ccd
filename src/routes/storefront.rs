//! Storefront REST routes
//!
//! Profile, product, and order endpoints backing the shop frontend. Order
//! reads are owner-scoped: a mismatched `user` query answers 404, never
//! revealing that the order exists for someone else.

use bson::oid::ObjectId;
use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use hyper::body::Incoming;
use hyper::{Request, Response, StatusCode};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::warn;

use crate::db::schemas::{OrderDoc, ProductDoc};
use crate::error::{Result, ServiceError};
use crate::orders::{self, PlaceOrderRequest};
use crate::routes::{empty_response, error_response, json_response, parse_query};
use crate::server::AppState;

/// Profile projection, credentials and id lists excluded
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct UserDetails {
    user_name: String,
    dob: String,
    mobile: String,
    marital_status: String,
    gender: String,
    kyc: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ProductView {
    product_id: String,
    name: String,
    category: String,
    display: bson::Document,
}

impl ProductView {
    fn from_doc(doc: &ProductDoc) -> Self {
        Self {
            product_id: doc._id.map(|o| o.to_hex()).unwrap_or_default(),
            name: doc.name.clone(),
            category: doc.category.clone(),
            display: doc.display.clone(),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct OrderView {
    order_id: String,
    product_name: String,
    category: String,
    status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    placed_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    confirmed_at: Option<String>,
}

impl OrderView {
    fn from_doc(doc: &OrderDoc) -> Self {
        Self {
            order_id: doc._id.map(|o| o.to_hex()).unwrap_or_default(),
            product_name: doc.product_name.clone(),
            category: doc.category.clone(),
            status: doc.status.as_str().to_string(),
            placed_at: doc.placed_at.and_then(|d| d.try_to_rfc3339_string().ok()),
            confirmed_at: doc.confirmed_at.and_then(|d| d.try_to_rfc3339_string().ok()),
        }
    }
}

fn parse_oid(raw: &str, what: &str) -> Result<ObjectId> {
    ObjectId::parse_str(raw).map_err(|_| ServiceError::not_found(format!("invalid {} id", what)))
}

async fn parse_json_body<T: for<'de> Deserialize<'de>>(req: Request<Incoming>) -> Result<T> {
    let body = req
        .collect()
        .await
        .map_err(|e| ServiceError::not_found(format!("failed to read body: {}", e)))?;

    let bytes = body.to_bytes();
    if bytes.len() > 10240 {
        return Err(ServiceError::not_found("request body too large"));
    }

    serde_json::from_slice(&bytes)
        .map_err(|e| ServiceError::not_found(format!("invalid JSON body: {}", e)))
}

/// GET /getUserDetails/:userId
pub async fn handle_user_details(state: Arc<AppState>, user_id: &str) -> Response<Full<Bytes>> {
    let result: Result<UserDetails> = async {
        let oid = parse_oid(user_id, "user")?;
        let user = state
            .store
            .user_by_id(&oid)
            .await?
            .ok_or_else(|| ServiceError::not_found("user"))?;
        Ok(UserDetails {
            user_name: user.user_name,
            dob: user.dob,
            mobile: user.mobile,
            marital_status: user.marital_status,
            gender: user.gender,
            kyc: user.kyc.as_str().to_string(),
        })
    }
    .await;

    match result {
        Ok(details) => json_response(StatusCode::OK, &details),
        Err(e) => error_response(e),
    }
}

/// GET /getAllProducts?category=
pub async fn handle_all_products(
    state: Arc<AppState>,
    params: &HashMap<String, String>,
) -> Response<Full<Bytes>> {
    let Some(category) = params.get("category") else {
        return empty_response(StatusCode::NOT_FOUND);
    };

    match state.store.products_by_category(category).await {
        Ok(products) if !products.is_empty() => {
            let views: Vec<_> = products.iter().map(ProductView::from_doc).collect();
            json_response(StatusCode::OK, &views)
        }
        Ok(_) => empty_response(StatusCode::NOT_FOUND),
        Err(e) => error_response(e),
    }
}

/// GET /getProductDetails/:productId
pub async fn handle_product_details(
    state: Arc<AppState>,
    product_id: &str,
) -> Response<Full<Bytes>> {
    let result: Result<ProductView> = async {
        let oid = parse_oid(product_id, "product")?;
        let product = state
            .store
            .product_by_id(&oid)
            .await?
            .ok_or_else(|| ServiceError::not_found("product"))?;
        Ok(ProductView::from_doc(&product))
    }
    .await;

    match result {
        Ok(view) => json_response(StatusCode::OK, &view),
        Err(e) => error_response(e),
    }
}

/// GET /getAllOrders?category=&user=
pub async fn handle_all_orders(
    state: Arc<AppState>,
    params: &HashMap<String, String>,
) -> Response<Full<Bytes>> {
    let (Some(category), Some(user)) = (params.get("category"), params.get("user")) else {
        return empty_response(StatusCode::NOT_FOUND);
    };

    let result: Result<Vec<OrderView>> = async {
        let user_oid = parse_oid(user, "user")?;
        let orders = state
            .store
            .orders_by_user_and_category(&user_oid, category)
            .await?;
        if orders.is_empty() {
            return Err(ServiceError::not_found("no orders"));
        }
        Ok(orders.iter().map(OrderView::from_doc).collect())
    }
    .await;

    match result {
        Ok(views) => json_response(StatusCode::OK, &views),
        Err(e) => error_response(e),
    }
}

/// GET /getOrderDetails/:orderId?user=
pub async fn handle_order_details(
    state: Arc<AppState>,
    order_id: &str,
    params: &HashMap<String, String>,
) -> Response<Full<Bytes>> {
    let Some(user) = params.get("user") else {
        return empty_response(StatusCode::NOT_FOUND);
    };

    let result: Result<OrderView> = async {
        let order_oid = parse_oid(order_id, "order")?;
        let user_oid = parse_oid(user, "user")?;
        let order = state
            .store
            .order_by_id(&order_oid)
            .await?
            .ok_or_else(|| ServiceError::not_found("order"))?;
        // Ownership mismatch reads as absence
        if order.user_id != user_oid {
            return Err(ServiceError::not_found("order"));
        }
        Ok(OrderView::from_doc(&order))
    }
    .await;

    match result {
        Ok(view) => json_response(StatusCode::OK, &view),
        Err(e) => error_response(e),
    }
}

/// POST /placeOrder?user=  body: `{productName, category}`
pub async fn handle_place_order(
    state: Arc<AppState>,
    req: Request<Incoming>,
) -> Response<Full<Bytes>> {
    let params = parse_query(req.uri().query());
    let Some(user) = params.get("user").cloned() else {
        return empty_response(StatusCode::NOT_FOUND);
    };

    let body: PlaceOrderRequest = match parse_json_body(req).await {
        Ok(b) => b,
        Err(e) => {
            warn!("placeOrder body rejected: {}", e);
            return empty_response(StatusCode::NOT_FOUND);
        }
    };

    match orders::place_order(state.store.as_ref(), &user, body).await {
        Ok(_) => empty_response(StatusCode::CREATED),
        Err(e) => error_response(e),
    }
}

/// Confirmation payload from the storefront
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConfirmOrderRequest {
    order_id: String,
}

/// PATCH /confirmOrder?user=  body: `{orderId}`
pub async fn handle_confirm_order(
    state: Arc<AppState>,
    req: Request<Incoming>,
) -> Response<Full<Bytes>> {
    let params = parse_query(req.uri().query());
    let Some(user) = params.get("user").cloned() else {
        return empty_response(StatusCode::NOT_FOUND);
    };

    let body: ConfirmOrderRequest = match parse_json_body(req).await {
        Ok(b) => b,
        Err(e) => {
            warn!("confirmOrder body rejected: {}", e);
            return empty_response(StatusCode::NOT_FOUND);
        }
    };

    match orders::confirm_order(state.store.as_ref(), &user, &body.order_id).await {
        Ok(()) => empty_response(StatusCode::NO_CONTENT),
        Err(e) => error_response(e),
    }
}

/// DELETE /cancelOrder/:orderId?user=
pub async fn handle_cancel_order(
    state: Arc<AppState>,
    order_id: &str,
    params: &HashMap<String, String>,
) -> Response<Full<Bytes>> {
    let Some(user) = params.get("user") else {
        return empty_response(StatusCode::NOT_FOUND);
    };

    match orders::cancel_order(state.store.as_ref(), user, order_id).await {
        Ok(()) => empty_response(StatusCode::OK),
        Err(e) => error_response(e),
    }
}
