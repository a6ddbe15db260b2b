//! 统一错误处理
//!
//! 错误类型定义在 `shared::error`，这里负责把服务端内部错误
//! ([`StoreError`]、[`JwtError`]) 转换为 [`AppError`]。
//!
//! | StoreError | ErrorCode | HTTP |
//! |------------|-----------|------|
//! | NotFound | *NotFound | 404 |
//! | BookMissing | OrderBookMissing | 400 |
//! | AuthorMissing | ValidationFailed (field author_id) | 400 |
//! | AuthorHasBooks | AuthorHasBooks | 409 |
//! | InsufficientStock | InsufficientStock | 400 |
//! | Conflict | AlreadyExists | 409 |
//! | Validation | ValidationFailed | 400 |
//! | Persistence | PersistenceFailed | 500 |
//! | Cancelled | Cancelled | 499 |

pub use shared::error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};

use crate::auth::JwtError;
use crate::stores::StoreError;

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        let message = err.to_string();
        match err {
            StoreError::NotFound { entity, id } => {
                let code = match entity {
                    "book" => ErrorCode::BookNotFound,
                    "author" => ErrorCode::AuthorNotFound,
                    "customer" => ErrorCode::CustomerNotFound,
                    "order" => ErrorCode::OrderNotFound,
                    "user" => ErrorCode::UserNotFound,
                    _ => ErrorCode::NotFound,
                };
                AppError::with_message(code, message).with_detail("id", id)
            }
            StoreError::BookMissing(book_id) => {
                AppError::with_message(ErrorCode::OrderBookMissing, message)
                    .with_detail("book_id", book_id)
            }
            StoreError::AuthorMissing(_) => {
                AppError::validation(message).with_detail("field", "author_id")
            }
            StoreError::AuthorHasBooks { books, .. } => {
                AppError::with_message(ErrorCode::AuthorHasBooks, message).with_detail("books", books)
            }
            StoreError::InsufficientStock {
                book_id,
                requested,
                available,
            } => AppError::with_message(ErrorCode::InsufficientStock, message)
                .with_detail("book_id", book_id)
                .with_detail("requested", requested)
                .with_detail("available", available),
            StoreError::Conflict(msg) => AppError::conflict(msg),
            StoreError::Validation(msg) => AppError::validation(msg),
            StoreError::Persistence(msg) => {
                AppError::with_message(ErrorCode::PersistenceFailed, message)
                    .with_detail("cause", msg)
            }
            StoreError::Cancelled => AppError::new(ErrorCode::Cancelled),
        }
    }
}

impl From<JwtError> for AppError {
    fn from(err: JwtError) -> Self {
        match err {
            JwtError::MissingToken => AppError::unauthorized(),
            JwtError::ExpiredToken => AppError::token_expired(),
            JwtError::InvalidToken(msg) => AppError::invalid_token(msg),
            JwtError::InvalidSignature => AppError::invalid_token("Invalid token signature"),
            JwtError::GenerationFailed(msg) => AppError::internal(msg),
            JwtError::ConfigError(msg) => AppError::with_message(ErrorCode::ConfigError, msg),
        }
    }
}
