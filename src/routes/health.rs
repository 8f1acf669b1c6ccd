//! Liveness and version endpoints

use bytes::Bytes;
use http_body_util::Full;
use hyper::{Response, StatusCode};
use serde_json::json;
use std::sync::Arc;

use crate::routes::json_response;
use crate::server::AppState;

/// GET /health
pub fn health_check(state: Arc<AppState>) -> Response<Full<Bytes>> {
    json_response(
        StatusCode::OK,
        &json!({
            "status": "ok",
            "node_id": state.args.node_id.to_string(),
        }),
    )
}

/// GET /version
///
/// Build information for deployment verification, captured by build.rs.
pub fn version_info() -> Response<Full<Bytes>> {
    json_response(
        StatusCode::OK,
        &json!({
            "version": env!("CARGO_PKG_VERSION"),
            "git_commit": env!("GIT_COMMIT_SHORT"),
            "git_commit_full": env!("GIT_COMMIT_FULL"),
            "build_timestamp": env!("BUILD_TIMESTAMP"),
        }),
    )
}
