//! Customer Model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Postal address (embedded in [`Customer`])
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Address {
    pub street: String,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    pub country: String,
}

/// Customer entity
///
/// `email` is unique across customers (compared case-insensitively).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub address: Address,
    pub created_at: DateTime<Utc>,
}

/// Create / replace customer payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomerPayload {
    pub name: String,
    pub email: String,
    pub address: Address,
}

impl CustomerPayload {
    /// Build the stored record; `created_at` is owned by the store
    pub fn into_customer(self, id: i64, created_at: DateTime<Utc>) -> Customer {
        Customer {
            id,
            name: self.name,
            email: self.email,
            address: self.address,
            created_at,
        }
    }
}
