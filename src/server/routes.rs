//! Application routing
//!
//! Routers for the chat relay and for the restart server's greeting.

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};

use crate::api::{chat, greeting, health};
use crate::middleware::{log_request, REQUEST_ID_HEADER, TRACE_ID_HEADER};
use crate::server::state::AppState;

/// Create the chat relay router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/chat", post(chat::relay_chat))
        .route("/health", get(health::health_check))
        .layer(create_cors_layer())
        .layer(middleware::from_fn(log_request))
        .with_state(state)
}

/// Create the restart server's router
pub fn create_greeting_router() -> Router {
    Router::new()
        .route("/", get(greeting::hello))
        .layer(middleware::from_fn(log_request))
}

/// Create CORS layer with permissive settings
fn create_cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
        .expose_headers([
            TRACE_ID_HEADER.parse().unwrap(),
            REQUEST_ID_HEADER.parse().unwrap(),
        ])
}
