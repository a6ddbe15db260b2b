//! Book API Module

mod handler;

use axum::{
    Router, middleware,
    routing::{delete, get, post, put},
};
use shared::models::Role;

use crate::auth::{require_permission, require_role};
use crate::core::ServerState;

/// Book router
pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/books", routes())
}

fn routes() -> Router<ServerState> {
    // 读取路由：read:books
    let read_routes = Router::new()
        .route("/", get(handler::list))
        .route("/{id}", get(handler::get_by_id))
        .layer(middleware::from_fn(require_permission("read:books")));

    // 管理路由：管理员或经理
    let manage_routes = Router::new()
        .route("/", post(handler::create))
        .route("/{id}", put(handler::update))
        .layer(middleware::from_fn(require_role(&[Role::Manager])));

    // 删除路由：仅管理员
    let delete_routes = Router::new()
        .route("/{id}", delete(handler::delete))
        .layer(middleware::from_fn(require_role(&[Role::Admin])));

    read_routes.merge(manage_routes).merge(delete_routes)
}
