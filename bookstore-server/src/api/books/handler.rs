//! Book API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use shared::models::{Book, BookPayload, SearchCriteria};

use crate::core::ServerState;
use crate::utils::validation::{validate_book, validate_search};
use crate::utils::{AppError, AppResult, Cancellation};

/// List books, or search when any criteria is given
///
/// Query parameters: `title`, `author`, `genre` (repeatable or comma
/// separated), `min_price`, `max_price`.
pub async fn list(
    State(state): State<ServerState>,
    Cancellation(cancel): Cancellation,
    Query(params): Query<Vec<(String, String)>>,
) -> AppResult<Json<Vec<Book>>> {
    let criteria = parse_criteria(&params)?;
    if criteria.is_empty() {
        return Ok(Json(state.books.list(&cancel)?));
    }

    validate_search(&criteria)?;
    let books = state.books.search(&criteria, &state.authors, &cancel)?;
    Ok(Json(books))
}

/// Get book by id
pub async fn get_by_id(
    State(state): State<ServerState>,
    Cancellation(cancel): Cancellation,
    Path(id): Path<i64>,
) -> AppResult<Json<Book>> {
    Ok(Json(state.books.get(id, &cancel)?))
}

/// Create a new book
pub async fn create(
    State(state): State<ServerState>,
    Cancellation(cancel): Cancellation,
    Json(payload): Json<BookPayload>,
) -> AppResult<(StatusCode, Json<Book>)> {
    validate_book(&payload)?;
    let book = state
        .books
        .create_with_author(payload.into_book(0), &state.authors, &cancel)?;
    Ok((StatusCode::CREATED, Json(book)))
}

/// Replace a book
pub async fn update(
    State(state): State<ServerState>,
    Cancellation(cancel): Cancellation,
    Path(id): Path<i64>,
    Json(payload): Json<BookPayload>,
) -> AppResult<Json<Book>> {
    validate_book(&payload)?;
    let book = state
        .books
        .update_with_author(id, payload.into_book(id), &state.authors, &cancel)?;
    Ok(Json(book))
}

/// Delete a book
pub async fn delete(
    State(state): State<ServerState>,
    Cancellation(cancel): Cancellation,
    Path(id): Path<i64>,
) -> AppResult<StatusCode> {
    state.books.delete(id, &cancel)?;
    Ok(StatusCode::NO_CONTENT)
}

fn parse_price(raw: &str, field: &str) -> AppResult<f64> {
    raw.trim().parse::<f64>().map_err(|_| {
        AppError::validation(format!("{field} must be a number")).with_detail("field", field)
    })
}

/// Build [`SearchCriteria`] from raw query pairs; unknown keys are ignored
fn parse_criteria(params: &[(String, String)]) -> AppResult<SearchCriteria> {
    let mut criteria = SearchCriteria::default();
    for (key, value) in params {
        let split = || {
            value
                .split(',')
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_string)
        };
        match key.as_str() {
            "title" => criteria.titles.extend(split()),
            "author" => criteria.authors.extend(split()),
            "genre" => criteria.genres.extend(split()),
            "min_price" if !value.trim().is_empty() => {
                criteria.min_price = Some(parse_price(value, "min_price")?)
            }
            "max_price" if !value.trim().is_empty() => {
                criteria.max_price = Some(parse_price(value, "max_price")?)
            }
            _ => {}
        }
    }
    Ok(criteria)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(raw: &[(&str, &str)]) -> Vec<(String, String)> {
        raw.iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_parse_repeated_and_comma_separated() {
        let criteria = parse_criteria(&pairs(&[
            ("genre", "fantasy, scifi"),
            ("genre", "horror"),
            ("author", "Tolkien"),
            ("page", "2"),
        ]))
        .unwrap();
        assert_eq!(criteria.genres, vec!["fantasy", "scifi", "horror"]);
        assert_eq!(criteria.authors, vec!["Tolkien"]);
        assert!(criteria.titles.is_empty());
    }

    #[test]
    fn test_parse_price_bounds() {
        let criteria =
            parse_criteria(&pairs(&[("min_price", "5"), ("max_price", "12.5")])).unwrap();
        assert_eq!(criteria.min_price, Some(5.0));
        assert_eq!(criteria.max_price, Some(12.5));

        let err = parse_criteria(&pairs(&[("min_price", "cheap")])).unwrap_err();
        assert_eq!(err.code, shared::ErrorCode::ValidationFailed);
    }

    #[test]
    fn test_no_params_is_empty() {
        assert!(parse_criteria(&[]).unwrap().is_empty());
    }
}
