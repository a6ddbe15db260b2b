//! Order API Handlers
//!
//! Stock is reserved, restored and re-reserved inside
//! [`OrderStore`](crate::stores::OrderStore); handlers only validate.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::{DateTime, Utc};
use shared::models::{Order, OrderPayload};
use tokio_util::sync::CancellationToken;

use crate::core::ServerState;
use crate::utils::validation::validate_order;
use crate::utils::{AppError, AppResult, Cancellation};

/// List all orders
pub async fn list(
    State(state): State<ServerState>,
    Cancellation(cancel): Cancellation,
) -> AppResult<Json<Vec<Order>>> {
    Ok(Json(state.orders.list(&cancel)?))
}

/// Get order by id
pub async fn get_by_id(
    State(state): State<ServerState>,
    Cancellation(cancel): Cancellation,
    Path(id): Path<i64>,
) -> AppResult<Json<Order>> {
    Ok(Json(state.orders.get(id, &cancel)?))
}

/// Create an order, reserving stock for every item
pub async fn create(
    State(state): State<ServerState>,
    Cancellation(cancel): Cancellation,
    Json(payload): Json<OrderPayload>,
) -> AppResult<(StatusCode, Json<Order>)> {
    let order = build_order(&state, 0, payload, Utc::now(), &cancel)?;
    let order = state.orders.create(order, &cancel)?;
    Ok((StatusCode::CREATED, Json(order)))
}

/// Replace an order, moving stock from the old items to the new ones
pub async fn update(
    State(state): State<ServerState>,
    Cancellation(cancel): Cancellation,
    Path(id): Path<i64>,
    Json(payload): Json<OrderPayload>,
) -> AppResult<Json<Order>> {
    let existing = state.orders.get(id, &cancel)?;
    let order = build_order(&state, id, payload, existing.created_at, &cancel)?;
    let order = state.orders.update(id, order, &cancel)?;
    Ok(Json(order))
}

/// Delete an order and restore its stock
pub async fn delete(
    State(state): State<ServerState>,
    Cancellation(cancel): Cancellation,
    Path(id): Path<i64>,
) -> AppResult<StatusCode> {
    state.orders.delete(id, &cancel)?;
    Ok(StatusCode::NO_CONTENT)
}

/// Validate a payload and turn it into an order record
///
/// `created_at` from the payload wins over `default_created_at`.
fn build_order(
    state: &ServerState,
    id: i64,
    payload: OrderPayload,
    default_created_at: DateTime<Utc>,
    cancel: &CancellationToken,
) -> AppResult<Order> {
    let status = validate_order(&payload)?;
    if !state.customers.exists(payload.customer_id, cancel)? {
        return Err(AppError::validation(format!(
            "customer {} does not exist",
            payload.customer_id
        ))
        .with_detail("field", "customer_id"));
    }

    Ok(Order {
        id,
        customer_id: payload.customer_id,
        items: payload.items,
        total_price: payload.total_price,
        created_at: payload.created_at.unwrap_or(default_created_at),
        status,
    })
}
