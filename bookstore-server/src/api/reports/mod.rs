//! Sales Report API Module

mod handler;

use axum::{
    Router, middleware,
    routing::{get, post},
};
use shared::models::Role;

use crate::auth::{require_permission, require_role};
use crate::core::ServerState;

/// Sales report router
pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/sales-reports", routes())
}

fn routes() -> Router<ServerState> {
    let read_routes = Router::new()
        .route("/", get(handler::list))
        .layer(middleware::from_fn(require_role(&[Role::Manager])));

    let generate_routes = Router::new()
        .route("/generate", post(handler::generate))
        .layer(middleware::from_fn(require_permission("generate:reports")));

    read_routes.merge(generate_routes)
}
