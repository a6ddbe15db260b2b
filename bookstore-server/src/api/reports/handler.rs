//! Sales Report API Handlers

use axum::{Json, extract::State, http::StatusCode};
use shared::models::SalesReport;

use crate::core::ServerState;
use crate::reports::generate_report;
use crate::utils::{AppResult, Cancellation};

/// Report history, newest first
pub async fn list(
    State(state): State<ServerState>,
    Cancellation(cancel): Cancellation,
) -> AppResult<Json<Vec<SalesReport>>> {
    Ok(Json(state.reports.history(&cancel)?))
}

/// Generate a report over the configured window now
pub async fn generate(
    State(state): State<ServerState>,
    Cancellation(cancel): Cancellation,
) -> AppResult<(StatusCode, Json<SalesReport>)> {
    let report = generate_report(
        &state.orders,
        &state.books,
        state.config.report_window(),
        &cancel,
    )?;
    state.reports.record(report.clone())?;

    tracing::info!(
        total_orders = report.total_orders,
        total_revenue = report.total_revenue,
        "Sales report generated on demand"
    );
    Ok((StatusCode::CREATED, Json(report)))
}
