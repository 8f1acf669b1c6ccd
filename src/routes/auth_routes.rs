//! Cookie-session authentication routes
//!
//! GET /login?userName=&userPass= — verify credentials, set the session
//! cookie, return `{userId, userName}`. Credential mismatch answers a bare
//! 404 so login failures are indistinguishable from unknown users.
//! GET /logout — clear the cookie, `{logout: true}`.
//! GET /checkAuth?user= — validate the cookie against the claimed user id.

use bson::oid::ObjectId;
use bytes::Bytes;
use http_body_util::Full;
use hyper::header::COOKIE;
use hyper::{HeaderMap, Response, StatusCode};
use serde::Serialize;
use serde_json::json;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{info, warn};

use crate::auth::verify_password;
use crate::routes::{empty_response, json_response};
use crate::server::AppState;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct LoginResponse {
    user_id: String,
    user_name: String,
}

/// Pull one cookie value out of the Cookie header
fn cookie_value<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    let raw = headers.get(COOKIE)?.to_str().ok()?;
    raw.split(';').find_map(|pair| {
        let (k, v) = pair.trim().split_once('=')?;
        (k == name).then_some(v)
    })
}

fn session_cookie(state: &AppState, token: &str, max_age: u64) -> String {
    format!(
        "{}={}; Max-Age={}; Path=/; HttpOnly; SameSite=Lax",
        state.args.auth_token_name, token, max_age
    )
}

/// GET /login
pub async fn handle_login(
    state: Arc<AppState>,
    params: &HashMap<String, String>,
) -> Response<Full<Bytes>> {
    let (Some(user_name), Some(user_pass)) = (params.get("userName"), params.get("userPass"))
    else {
        return empty_response(StatusCode::NOT_FOUND);
    };

    let user = match state.store.user_by_name(user_name).await {
        Ok(Some(u)) => u,
        Ok(None) => {
            warn!("Login failed, unknown user: {}", user_name);
            return empty_response(StatusCode::NOT_FOUND);
        }
        Err(e) => {
            warn!("Login lookup failed: {}", e);
            return empty_response(StatusCode::NOT_FOUND);
        }
    };

    match verify_password(user_pass, &user.password_hash) {
        Ok(true) => {}
        Ok(false) => {
            warn!("Login failed, bad password: {}", user_name);
            return empty_response(StatusCode::NOT_FOUND);
        }
        Err(e) => {
            warn!("Password verification error: {}", e);
            return empty_response(StatusCode::NOT_FOUND);
        }
    }

    let user_id = user._id.map(|o| o.to_hex()).unwrap_or_default();
    let token = match state.sealer.seal(&user_id, &user.user_name) {
        Ok(t) => t,
        Err(e) => {
            warn!("Failed to seal session for {}: {}", user_name, e);
            return empty_response(StatusCode::NOT_FOUND);
        }
    };

    info!("Login successful: {}", user_name);

    let body = LoginResponse {
        user_id,
        user_name: user.user_name.clone(),
    };
    let mut response = json_response(StatusCode::OK, &body);
    let cookie = session_cookie(&state, &token, state.sealer.ttl_seconds());
    if let Ok(value) = cookie.parse() {
        response.headers_mut().insert(hyper::header::SET_COOKIE, value);
    }
    response
}

/// GET /logout
pub fn handle_logout(state: Arc<AppState>) -> Response<Full<Bytes>> {
    let mut response = json_response(StatusCode::OK, &json!({ "logout": true }));
    let cookie = session_cookie(&state, "", 0);
    if let Ok(value) = cookie.parse() {
        response.headers_mut().insert(hyper::header::SET_COOKIE, value);
    }
    response
}

/// GET /checkAuth
///
/// Valid only when the cookie unseals AND its subject matches the `user`
/// query id AND that user still exists.
pub async fn handle_check_auth(
    state: Arc<AppState>,
    headers: &HeaderMap,
    params: &HashMap<String, String>,
) -> Response<Full<Bytes>> {
    let denied = || json_response(StatusCode::UNAUTHORIZED, &json!({ "auth": false }));

    let Some(claimed_id) = params.get("user") else {
        return denied();
    };
    let Some(token) = cookie_value(headers, &state.args.auth_token_name) else {
        return denied();
    };
    let claims = match state.sealer.unseal(token) {
        Ok(c) => c,
        Err(e) => {
            warn!("Session validation failed: {}", e);
            return denied();
        }
    };
    if claims.sub != *claimed_id {
        return denied();
    }

    let Ok(oid) = ObjectId::parse_str(claimed_id) else {
        return denied();
    };
    match state.store.user_by_id(&oid).await {
        Ok(Some(_)) => json_response(StatusCode::OK, &json!({ "auth": true })),
        _ => denied(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hyper::header::HeaderValue;

    #[test]
    fn cookie_extraction_handles_multiple_cookies() {
        let mut headers = HeaderMap::new();
        headers.insert(
            COOKIE,
            HeaderValue::from_static("theme=dark; concierge_session=tok123; lang=en"),
        );
        assert_eq!(cookie_value(&headers, "concierge_session"), Some("tok123"));
        assert_eq!(cookie_value(&headers, "missing"), None);
    }
}
