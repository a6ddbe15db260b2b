//! Customer API Module

mod handler;

use axum::{
    Router, middleware,
    routing::{delete, get, put},
};
use shared::models::Role;

use crate::auth::{require_admin, require_role};
use crate::core::ServerState;

/// Customer router
pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/customers", routes())
}

fn routes() -> Router<ServerState> {
    // 员工及以上可查看和登记客户
    let staff_routes = Router::new()
        .route("/", get(handler::list).post(handler::create))
        .route("/{id}", get(handler::get_by_id))
        .layer(middleware::from_fn(require_role(&[
            Role::Manager,
            Role::Employee,
        ])));

    let manage_routes = Router::new()
        .route("/{id}", put(handler::update))
        .layer(middleware::from_fn(require_role(&[Role::Manager])));

    let delete_routes = Router::new()
        .route("/{id}", delete(handler::delete))
        .layer(middleware::from_fn(require_admin));

    staff_routes.merge(manage_routes).merge(delete_routes)
}
