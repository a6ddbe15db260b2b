//! Order API Module
//!
//! | 路径 | 方法 | 检查 |
//! |------|------|------|
//! | /api/orders | GET | 管理员 / 经理 / 员工 |
//! | /api/orders | POST | write:orders |
//! | /api/orders/{id} | GET | read:orders |
//! | /api/orders/{id} | PUT, DELETE | 订单所属客户或管理员 |

mod handler;

use axum::{
    Router,
    extract::Request,
    middleware,
    routing::{get, post, put},
};
use shared::models::Role;
use tokio_util::sync::CancellationToken;

use crate::auth::{require_owner_or_admin, require_permission, require_role};
use crate::core::ServerState;
use crate::utils::Cancellation;

/// Order router
///
/// 所有权检查需要访问 OrderStore，因此这里要拿到 state
pub fn router(state: &ServerState) -> Router<ServerState> {
    Router::new().nest("/api/orders", routes(state))
}

fn routes(state: &ServerState) -> Router<ServerState> {
    let list_routes = Router::new()
        .route("/", get(handler::list))
        .layer(middleware::from_fn(require_role(&[
            Role::Manager,
            Role::Employee,
        ])));

    let create_routes = Router::new()
        .route("/", post(handler::create))
        .layer(middleware::from_fn(require_permission("write:orders")));

    let read_routes = Router::new()
        .route("/{id}", get(handler::get_by_id))
        .layer(middleware::from_fn(require_permission("read:orders")));

    let owner_routes = Router::new()
        .route("/{id}", put(handler::update).delete(handler::delete))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            require_owner_or_admin(order_owner),
        ));

    list_routes
        .merge(create_routes)
        .merge(read_routes)
        .merge(owner_routes)
}

/// 从路径最后一段解析订单 ID，返回订单所属客户
fn order_owner(state: &ServerState, req: &Request) -> Option<i64> {
    let id: i64 = req.uri().path().rsplit('/').next()?.parse().ok()?;
    let cancel = req
        .extensions()
        .get::<Cancellation>()
        .map(|c| c.0.clone())
        .unwrap_or_else(CancellationToken::new);
    state.orders.owner_of(id, &cancel).ok().flatten()
}
