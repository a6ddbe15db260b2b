//! Author Model

use serde::{Deserialize, Serialize};

/// Author entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Author {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub bio: String,
}

impl Author {
    /// "First Last"
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Create / replace author payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthorPayload {
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub bio: String,
}

impl AuthorPayload {
    pub fn into_author(self, id: i64) -> Author {
        Author {
            id,
            first_name: self.first_name,
            last_name: self.last_name,
            bio: self.bio,
        }
    }
}
