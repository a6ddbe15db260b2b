//! Error domains derived from the thousands digit of a code

use super::codes::ErrorCode;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    General,
    Auth,
    Permission,
    Order,
    Catalog,
    Customer,
    System,
}

impl ErrorCategory {
    /// Unassigned thousands (3xxx, 5xxx, 7xxx) fall back to `General`
    pub fn from_code(code: u16) -> Self {
        match code / 1000 {
            1 => Self::Auth,
            2 => Self::Permission,
            4 => Self::Order,
            6 => Self::Catalog,
            8 => Self::Customer,
            9.. => Self::System,
            _ => Self::General,
        }
    }
}

impl ErrorCode {
    pub fn category(&self) -> ErrorCategory {
        ErrorCategory::from_code(self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_by_thousands() {
        assert_eq!(ErrorCategory::from_code(2), ErrorCategory::General);
        assert_eq!(ErrorCategory::from_code(3500), ErrorCategory::General);
        assert_eq!(ErrorCategory::from_code(1004), ErrorCategory::Auth);
        assert_eq!(ErrorCategory::from_code(9006), ErrorCategory::System);
        assert_eq!(ErrorCategory::from_code(12000), ErrorCategory::System);
    }

    #[test]
    fn test_codes_land_in_their_domain() {
        assert_eq!(ErrorCode::NotResourceOwner.category(), ErrorCategory::Permission);
        assert_eq!(ErrorCode::OrderBookMissing.category(), ErrorCategory::Order);
        assert_eq!(ErrorCode::AuthorHasBooks.category(), ErrorCategory::Catalog);
        assert_eq!(ErrorCode::PasswordTooShort.category(), ErrorCategory::Customer);
    }

    #[test]
    fn test_category_serializes_snake_case() {
        assert_eq!(
            serde_json::to_string(&ErrorCategory::Catalog).unwrap(),
            "\"catalog\""
        );
    }
}
