//! Error codes and the HTTP error envelope shared by server and clients
//!
//! ```
//! use shared::error::{ApiResponse, AppError, ErrorCode};
//!
//! let err = AppError::new(ErrorCode::InsufficientStock)
//!     .with_detail("book_id", 7)
//!     .with_detail("available", 0);
//! let body = ApiResponse::error(&err);
//! assert_eq!(body.code, 4003);
//! ```

mod category;
mod codes;
mod types;

pub use category::ErrorCategory;
pub use codes::{ErrorCode, InvalidErrorCode};
pub use types::{ApiResponse, AppError, AppResult, ErrorDetails};
