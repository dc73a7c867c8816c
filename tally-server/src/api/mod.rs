//! API route modules
//!
//! # Structure
//!
//! - [`printer`] - connection management, discovery and printing
//! - [`health`] - liveness check

use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::core::ServerState;

pub mod health;
pub mod printer;

/// Build a router with all routes registered (no middleware, no state)
pub fn build_router() -> Router<ServerState> {
    Router::new().merge(printer::router()).merge(health::router())
}

/// Build the fully configured application with middleware and state
pub fn build_app(state: &ServerState) -> Router {
    build_router()
        // CORS - the operator UI runs on a different origin in development
        .layer(CorsLayer::permissive())
        // Request logging
        .layer(TraceLayer::new_for_http())
        .with_state(state.clone())
}
