//! Author API Handlers

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use shared::models::{Author, AuthorPayload};

use crate::core::ServerState;
use crate::utils::validation::validate_author;
use crate::utils::{AppResult, Cancellation};

/// List all authors
pub async fn list(
    State(state): State<ServerState>,
    Cancellation(cancel): Cancellation,
) -> AppResult<Json<Vec<Author>>> {
    Ok(Json(state.authors.list(&cancel)?))
}

/// Get author by id
pub async fn get_by_id(
    State(state): State<ServerState>,
    Cancellation(cancel): Cancellation,
    Path(id): Path<i64>,
) -> AppResult<Json<Author>> {
    Ok(Json(state.authors.get(id, &cancel)?))
}

/// Create a new author
pub async fn create(
    State(state): State<ServerState>,
    Cancellation(cancel): Cancellation,
    Json(payload): Json<AuthorPayload>,
) -> AppResult<(StatusCode, Json<Author>)> {
    validate_author(&payload)?;
    let author = state.authors.create(payload.into_author(0), &cancel)?;
    Ok((StatusCode::CREATED, Json(author)))
}

/// Replace an author
pub async fn update(
    State(state): State<ServerState>,
    Cancellation(cancel): Cancellation,
    Path(id): Path<i64>,
    Json(payload): Json<AuthorPayload>,
) -> AppResult<Json<Author>> {
    validate_author(&payload)?;
    let author = state.authors.update(id, payload.into_author(id), &cancel)?;
    Ok(Json(author))
}

/// Delete an author that no book references
pub async fn delete(
    State(state): State<ServerState>,
    Cancellation(cancel): Cancellation,
    Path(id): Path<i64>,
) -> AppResult<StatusCode> {
    state.authors.delete(id, &state.books, &cancel)?;
    Ok(StatusCode::NO_CONTENT)
}
