//! Printer API module
//!
//! Connection management, discovery and printing endpoints.

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/printer", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/ports", get(handler::list_ports))
        .route("/connect/serial", post(handler::connect_serial))
        .route("/discover", post(handler::discover))
        .route("/connect/network", post(handler::connect_network))
        .route("/disconnect", post(handler::disconnect))
        .route("/print", post(handler::print))
        .route("/status", get(handler::status))
}
