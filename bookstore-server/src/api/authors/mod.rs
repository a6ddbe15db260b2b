//! Author API Module

mod handler;

use axum::{
    Router, middleware,
    routing::{delete, get, post, put},
};
use shared::models::Role;

use crate::auth::{require_admin, require_permission, require_role};
use crate::core::ServerState;

/// Author router
pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/authors", routes())
}

fn routes() -> Router<ServerState> {
    let read_routes = Router::new()
        .route("/", get(handler::list))
        .route("/{id}", get(handler::get_by_id))
        .layer(middleware::from_fn(require_permission("read:authors")));

    let manage_routes = Router::new()
        .route("/", post(handler::create))
        .route("/{id}", put(handler::update))
        .layer(middleware::from_fn(require_role(&[Role::Manager])));

    let delete_routes = Router::new()
        .route("/{id}", delete(handler::delete))
        .layer(middleware::from_fn(require_admin));

    read_routes.merge(manage_routes).merge(delete_routes)
}
