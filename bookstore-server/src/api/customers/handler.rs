//! Customer API Handlers

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::Utc;
use shared::models::{Customer, CustomerPayload};

use crate::core::ServerState;
use crate::utils::validation::validate_customer;
use crate::utils::{AppResult, Cancellation};

/// List all customers
pub async fn list(
    State(state): State<ServerState>,
    Cancellation(cancel): Cancellation,
) -> AppResult<Json<Vec<Customer>>> {
    Ok(Json(state.customers.list(&cancel)?))
}

/// Get customer by id
pub async fn get_by_id(
    State(state): State<ServerState>,
    Cancellation(cancel): Cancellation,
    Path(id): Path<i64>,
) -> AppResult<Json<Customer>> {
    Ok(Json(state.customers.get(id, &cancel)?))
}

/// Create a new customer; email must be unused
pub async fn create(
    State(state): State<ServerState>,
    Cancellation(cancel): Cancellation,
    Json(payload): Json<CustomerPayload>,
) -> AppResult<(StatusCode, Json<Customer>)> {
    validate_customer(&payload)?;
    let customer = state
        .customers
        .create(payload.into_customer(0, Utc::now()), &cancel)?;
    Ok((StatusCode::CREATED, Json(customer)))
}

/// Replace a customer, keeping its registration time
pub async fn update(
    State(state): State<ServerState>,
    Cancellation(cancel): Cancellation,
    Path(id): Path<i64>,
    Json(payload): Json<CustomerPayload>,
) -> AppResult<Json<Customer>> {
    validate_customer(&payload)?;
    let existing = state.customers.get(id, &cancel)?;
    let customer = state.customers.update(
        id,
        payload.into_customer(id, existing.created_at),
        &cancel,
    )?;
    Ok(Json(customer))
}

/// Delete a customer
pub async fn delete(
    State(state): State<ServerState>,
    Cancellation(cancel): Cancellation,
    Path(id): Path<i64>,
) -> AppResult<StatusCode> {
    state.customers.delete(id, &cancel)?;
    Ok(StatusCode::NO_CONTENT)
}
