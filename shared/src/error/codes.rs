//! Numeric error codes
//!
//! The thousands digit names the domain: 0 general, 1 auth, 2 permission,
//! 4 order, 6 catalog, 8 customer/user, 9 system. Each code fixes its HTTP
//! status and default message in the table below.

use http::StatusCode;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Non-standard "Client Closed Request"
const CLIENT_CLOSED_REQUEST: u16 = 499;

macro_rules! error_codes {
    ($( $(#[$doc:meta])* $name:ident = $value:literal, $status:expr, $message:literal; )+) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(into = "u16", try_from = "u16")]
        #[repr(u16)]
        pub enum ErrorCode {
            $( $(#[$doc])* $name = $value, )+
        }

        impl ErrorCode {
            /// Every code, in table order
            pub const ALL: &'static [ErrorCode] = &[$(ErrorCode::$name),+];

            pub const fn message(&self) -> &'static str {
                match self {
                    $( ErrorCode::$name => $message, )+
                }
            }

            pub fn http_status(&self) -> StatusCode {
                match self {
                    $( ErrorCode::$name => $status, )+
                }
            }
        }

        impl TryFrom<u16> for ErrorCode {
            type Error = InvalidErrorCode;

            fn try_from(value: u16) -> Result<Self, Self::Error> {
                match value {
                    $( $value => Ok(ErrorCode::$name), )+
                    other => Err(InvalidErrorCode(other)),
                }
            }
        }
    };
}

error_codes! {
    ValidationFailed = 2, StatusCode::BAD_REQUEST, "Validation failed";
    NotFound = 3, StatusCode::NOT_FOUND, "Resource not found";
    /// Unique key (email) already taken
    AlreadyExists = 4, StatusCode::CONFLICT, "Resource already exists";

    /// No bearer token on a protected route
    NotAuthenticated = 1001, StatusCode::UNAUTHORIZED, "Missing authorization token";
    InvalidCredentials = 1002, StatusCode::UNAUTHORIZED, "Invalid email or password";
    TokenExpired = 1003, StatusCode::UNAUTHORIZED, "Authentication token has expired";
    TokenInvalid = 1004, StatusCode::UNAUTHORIZED, "Authentication token is invalid";

    PermissionDenied = 2001, StatusCode::FORBIDDEN, "Insufficient permissions";
    RoleRequired = 2002, StatusCode::FORBIDDEN, "Insufficient role";
    AdminRequired = 2003, StatusCode::FORBIDDEN, "Administrator role is required";
    NotResourceOwner = 2004, StatusCode::FORBIDDEN, "You are not the owner of this resource";

    OrderNotFound = 4001, StatusCode::NOT_FOUND, "Order not found";
    /// Requested quantity exceeds stock
    InsufficientStock = 4003, StatusCode::BAD_REQUEST, "Insufficient stock";
    /// An order item names a book that does not exist
    OrderBookMissing = 4004, StatusCode::BAD_REQUEST, "Book does not exist";

    BookNotFound = 6001, StatusCode::NOT_FOUND, "Book not found";
    AuthorNotFound = 6101, StatusCode::NOT_FOUND, "Author not found";
    /// Author still referenced by at least one book
    AuthorHasBooks = 6102, StatusCode::CONFLICT, "Cannot delete author with existing books";

    CustomerNotFound = 8001, StatusCode::NOT_FOUND, "Customer not found";
    UserNotFound = 8101, StatusCode::NOT_FOUND, "User not found";
    PasswordTooShort = 8103, StatusCode::BAD_REQUEST, "Password must be between 8 and 100 characters";

    InternalError = 9001, StatusCode::INTERNAL_SERVER_ERROR, "Internal server error";
    /// In-memory change committed but the snapshot write failed
    PersistenceFailed = 9002, StatusCode::INTERNAL_SERVER_ERROR, "Change applied but could not be persisted";
    ConfigError = 9005, StatusCode::INTERNAL_SERVER_ERROR, "Configuration error";
    Cancelled = 9006, client_closed_request(), "Operation cancelled";
}

fn client_closed_request() -> StatusCode {
    StatusCode::from_u16(CLIENT_CLOSED_REQUEST).unwrap_or(StatusCode::BAD_REQUEST)
}

impl ErrorCode {
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "E{:04}", self.code())
    }
}

impl From<ErrorCode> for u16 {
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// A number outside the code table
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("invalid error code: {0}")]
pub struct InvalidErrorCode(pub u16);
