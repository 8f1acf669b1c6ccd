//! HTTP server implementation
//!
//! hyper http1 with TokioIo, one task per connection, manual method+path
//! routing. All bodies are buffered JSON so responses stay `Full<Bytes>`.

use bytes::Bytes;
use http_body_util::Full;
use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Method, Request, Response, StatusCode};
use hyper_util::rt::TokioIo;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{error, info, warn};

use crate::auth::SessionSealer;
use crate::config::Args;
use crate::error::Result;
use crate::routes::{self, empty_response, parse_query};
use crate::store::SupportStore;

/// Shared application state
pub struct AppState {
    pub args: Args,
    pub store: Arc<dyn SupportStore>,
    pub sealer: SessionSealer,
}

impl AppState {
    pub fn new(args: Args, store: Arc<dyn SupportStore>, sealer: SessionSealer) -> Self {
        Self {
            args,
            store,
            sealer,
        }
    }

    #[cfg(test)]
    pub fn for_tests(store: impl SupportStore + 'static) -> Arc<Self> {
        use clap::Parser;
        Arc::new(Self {
            args: Args::parse_from(["concierge"]),
            store: Arc::new(store),
            sealer: SessionSealer::new("test-secret", 900),
        })
    }
}

/// Start the HTTP server
pub async fn run(state: Arc<AppState>) -> Result<()> {
    let listener = TcpListener::bind(state.args.listen).await?;

    info!(
        "Concierge listening on {} as node {}",
        state.args.listen, state.args.node_id
    );

    if state.args.dev_mode {
        warn!("Development mode enabled - in-memory store fallback active");
    }

    loop {
        match listener.accept().await {
            Ok((stream, addr)) => {
                let state = Arc::clone(&state);
                tokio::spawn(async move {
                    let io = TokioIo::new(stream);

                    let service = service_fn(move |req| {
                        let state = Arc::clone(&state);
                        async move { handle_request(state, req).await }
                    });

                    if let Err(err) = http1::Builder::new()
                        .preserve_header_case(true)
                        .serve_connection(io, service)
                        .await
                    {
                        error!("Error serving connection from {}: {:?}", addr, err);
                    }
                });
            }
            Err(e) => {
                error!("Error accepting connection: {:?}", e);
            }
        }
    }
}

/// CORS preflight for the configured frontend origin
fn preflight_response(origin: &str) -> Response<Full<Bytes>> {
    Response::builder()
        .status(StatusCode::NO_CONTENT)
        .header("Access-Control-Allow-Origin", origin)
        .header("Access-Control-Allow-Credentials", "true")
        .header(
            "Access-Control-Allow-Methods",
            "GET, POST, PATCH, DELETE, OPTIONS",
        )
        .header("Access-Control-Allow-Headers", "Content-Type")
        .header("Access-Control-Max-Age", "86400")
        .body(Full::new(Bytes::new()))
        .unwrap()
}

/// The frontend authenticates with a cookie, so every response carries the
/// credentialed CORS pair rather than a wildcard.
fn apply_cors(response: &mut Response<Full<Bytes>>, origin: &str) {
    if let Ok(value) = origin.parse() {
        response
            .headers_mut()
            .insert("Access-Control-Allow-Origin", value);
    }
    response.headers_mut().insert(
        "Access-Control-Allow-Credentials",
        hyper::header::HeaderValue::from_static("true"),
    );
}

/// Route incoming HTTP requests
async fn handle_request(
    state: Arc<AppState>,
    req: Request<Incoming>,
) -> std::result::Result<Response<Full<Bytes>>, hyper::Error> {
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let params = parse_query(req.uri().query());

    info!("{} {}", method, path);

    let mut response = match (method, path.as_str()) {
        (Method::OPTIONS, _) => preflight_response(&state.args.frontend_url),

        (Method::GET, "/health") | (Method::GET, "/healthz") => {
            routes::health::health_check(Arc::clone(&state))
        }
        (Method::GET, "/version") => routes::health::version_info(),

        // Session
        (Method::GET, "/login") => {
            routes::auth_routes::handle_login(Arc::clone(&state), &params).await
        }
        (Method::GET, "/logout") => routes::auth_routes::handle_logout(Arc::clone(&state)),
        (Method::GET, "/checkAuth") => {
            routes::auth_routes::handle_check_auth(Arc::clone(&state), req.headers(), &params)
                .await
        }

        // Storefront
        (Method::GET, p) if p.starts_with("/getUserDetails/") => {
            let user_id = p.strip_prefix("/getUserDetails/").unwrap_or("");
            routes::storefront::handle_user_details(Arc::clone(&state), user_id).await
        }
        (Method::GET, "/getAllProducts") => {
            routes::storefront::handle_all_products(Arc::clone(&state), &params).await
        }
        (Method::GET, p) if p.starts_with("/getProductDetails/") => {
            let product_id = p.strip_prefix("/getProductDetails/").unwrap_or("");
            routes::storefront::handle_product_details(Arc::clone(&state), product_id).await
        }
        (Method::GET, "/getAllOrders") => {
            routes::storefront::handle_all_orders(Arc::clone(&state), &params).await
        }
        (Method::GET, p) if p.starts_with("/getOrderDetails/") => {
            let order_id = p.strip_prefix("/getOrderDetails/").unwrap_or("");
            routes::storefront::handle_order_details(Arc::clone(&state), order_id, &params).await
        }

        // Order lifecycle
        (Method::POST, "/placeOrder") => {
            routes::storefront::handle_place_order(Arc::clone(&state), req).await
        }
        (Method::PATCH, "/confirmOrder") => {
            routes::storefront::handle_confirm_order(Arc::clone(&state), req).await
        }
        (Method::DELETE, p) if p.starts_with("/cancelOrder/") => {
            let order_id = p.strip_prefix("/cancelOrder/").unwrap_or("");
            routes::storefront::handle_cancel_order(Arc::clone(&state), order_id, &params).await
        }

        // Chatbot
        (Method::GET, "/search-on-category") => {
            routes::chatbot::handle_search_on_category(Arc::clone(&state), &params).await
        }
        (Method::GET, "/user-specific-order-details") => {
            routes::chatbot::handle_user_order_details(Arc::clone(&state), &params).await
        }
        (Method::GET, "/user-account-questions") => {
            routes::chatbot::handle_account_questions(Arc::clone(&state), &params).await
        }
        (Method::GET, "/product-specific-questions") => {
            routes::chatbot::handle_product_questions(Arc::clone(&state), &params).await
        }
        (Method::GET, "/order-specific-questions") => {
            routes::chatbot::handle_order_questions(Arc::clone(&state), &params).await
        }
        (Method::GET, p) if p.starts_with("/get-answer-by-questionId/") => {
            let question_id = p.strip_prefix("/get-answer-by-questionId/").unwrap_or("");
            routes::chatbot::handle_answer(Arc::clone(&state), question_id, &params).await
        }
        (Method::GET, "/get-all-categories") => {
            routes::chatbot::handle_all_categories(Arc::clone(&state), &params).await
        }
        (Method::GET, p) if p.starts_with("/get-question-by-category/") => {
            let category_id = p.strip_prefix("/get-question-by-category/").unwrap_or("");
            routes::chatbot::handle_questions_by_category(Arc::clone(&state), category_id).await
        }

        _ => empty_response(StatusCode::NOT_FOUND),
    };

    apply_cors(&mut response, &state.args.frontend_url);
    Ok(response)
}
