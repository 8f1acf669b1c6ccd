//! HTTP route handlers
//!
//! One module per surface: auth (cookie sessions), storefront (users,
//! products, orders), chatbot (FAQ resolution), health. Shared response
//! helpers live here.
//!
//! The external error contract is blunt on purpose: any internal failure a
//! route cannot answer collapses to an empty-body 404, cross-user and
//! state-machine violations to an empty-body 403. Causes are logged at warn
//! before being discarded.

pub mod auth_routes;
pub mod chatbot;
pub mod health;
pub mod storefront;

use bytes::Bytes;
use http_body_util::Full;
use hyper::{Response, StatusCode};
use serde::Serialize;
use std::collections::HashMap;
use tracing::warn;

use crate::error::ServiceError;

/// JSON response with the given status
pub fn json_response<T: Serialize>(status: StatusCode, body: &T) -> Response<Full<Bytes>> {
    let json = serde_json::to_string(body).unwrap_or_else(|_| "{}".to_string());

    Response::builder()
        .status(status)
        .header("Content-Type", "application/json")
        .body(Full::new(Bytes::from(json)))
        .unwrap()
}

/// Empty-body response with the given status
pub fn empty_response(status: StatusCode) -> Response<Full<Bytes>> {
    Response::builder()
        .status(status)
        .body(Full::new(Bytes::new()))
        .unwrap()
}

/// Map a service error onto the external contract: Forbidden keeps its 403,
/// everything else is logged and collapsed to an empty 404.
pub fn error_response(err: ServiceError) -> Response<Full<Bytes>> {
    match err {
        ServiceError::Forbidden(reason) => {
            warn!("Request forbidden: {}", reason);
            empty_response(StatusCode::FORBIDDEN)
        }
        other => {
            warn!("Request failed, answering 404: {}", other);
            empty_response(StatusCode::NOT_FOUND)
        }
    }
}

/// Parse a query string into a key/value map (last occurrence wins)
pub fn parse_query(query: Option<&str>) -> HashMap<String, String> {
    let Some(query) = query else {
        return HashMap::new();
    };

    query
        .split('&')
        .filter_map(|pair| {
            let (k, v) = pair.split_once('=')?;
            let key = urlencoding::decode(k).ok()?.into_owned();
            let value = urlencoding::decode(v).ok()?.into_owned();
            Some((key, value))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_parsing_decodes_percent_escapes() {
        let params = parse_query(Some("categoryName=My%20Account&user=abc"));
        assert_eq!(params.get("categoryName").unwrap(), "My Account");
        assert_eq!(params.get("user").unwrap(), "abc");
    }

    #[test]
    fn query_parsing_tolerates_junk() {
        let params = parse_query(Some("novalue&x=1"));
        assert_eq!(params.len(), 1);
        assert_eq!(params.get("x").unwrap(), "1");
        assert!(parse_query(None).is_empty());
    }

    #[test]
    fn forbidden_keeps_its_status() {
        let resp = error_response(ServiceError::forbidden("nope"));
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);

        let resp = error_response(ServiceError::not_found("gone"));
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let resp = error_response(ServiceError::Database("boom".into()));
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }
}
