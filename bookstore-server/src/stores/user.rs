//! User store (login accounts)

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shared::models::{Role, UserResponse};
use tokio_util::sync::CancellationToken;

use super::collection::{Collection, Entity, check_cancelled};
use super::error::{StoreError, StoreResult};
use super::snapshot::Snapshot;

/// Login account, persisted with its argon2 hash
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Verify password using argon2
    pub fn verify_password(&self, password: &str) -> Result<bool, argon2::password_hash::Error> {
        use argon2::{
            Argon2,
            password_hash::{PasswordHash, PasswordVerifier},
        };

        let parsed_hash = PasswordHash::new(&self.password_hash)?;
        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }

    /// Hash password using argon2
    pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
        use argon2::{
            Argon2,
            password_hash::{PasswordHasher, SaltString, rand_core::OsRng},
        };

        let salt = SaltString::generate(&mut OsRng);
        let password_hash = Argon2::default().hash_password(password.as_bytes(), &salt)?;
        Ok(password_hash.to_string())
    }

    pub fn to_response(&self) -> UserResponse {
        UserResponse {
            id: self.id,
            name: self.name.clone(),
            email: self.email.clone(),
            role: self.role,
            created_at: self.created_at,
        }
    }
}

impl Entity for User {
    const NAME: &'static str = "user";

    fn id(&self) -> i64 {
        self.id
    }

    fn set_id(&mut self, id: i64) {
        self.id = id;
    }
}

#[derive(Debug)]
pub struct UserStore {
    users: Collection<User>,
}

impl UserStore {
    pub fn new(snapshot: Arc<dyn Snapshot<User>>) -> Self {
        Self {
            users: Collection::new(snapshot),
        }
    }

    pub fn load_snapshot(&self) -> StoreResult<usize> {
        self.users.load_snapshot()
    }

    /// Insert a new account; email must be unused (case-insensitive)
    pub fn create(&self, user: User, cancel: &CancellationToken) -> StoreResult<User> {
        check_cancelled(cancel)?;
        let (created, pending) = {
            let mut table = self.users.write();
            if table
                .values()
                .any(|u| u.email.eq_ignore_ascii_case(&user.email))
            {
                return Err(StoreError::Conflict(format!(
                    "user with email {} already exists",
                    user.email
                )));
            }
            let created = table.insert_new(user);
            (created, table.pending())
        };
        self.users.flush(pending)?;
        tracing::info!(user_id = created.id, role = %created.role, "User registered");
        Ok(created)
    }

    pub fn get(&self, id: i64, cancel: &CancellationToken) -> StoreResult<User> {
        self.users.get(id, cancel)
    }

    pub fn find_by_email(&self, email: &str, cancel: &CancellationToken) -> StoreResult<Option<User>> {
        check_cancelled(cancel)?;
        Ok(self
            .users
            .read()
            .values()
            .find(|u| u.email.eq_ignore_ascii_case(email))
            .cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stores::snapshot::MemorySnapshot;

    fn user(email: &str, password: &str) -> User {
        User {
            id: 0,
            name: "Test User".into(),
            email: email.into(),
            password_hash: User::hash_password(password).unwrap(),
            role: Role::User,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_password_hash_and_verify() {
        let u = user("a@example.com", "correct horse");
        assert_ne!(u.password_hash, "correct horse");
        assert!(u.verify_password("correct horse").unwrap());
        assert!(!u.verify_password("wrong").unwrap());
    }

    #[test]
    fn test_unique_email_and_lookup() {
        let store = UserStore::new(Arc::new(MemorySnapshot::<User>::new()));
        let cancel = CancellationToken::new();
        store.create(user("a@example.com", "password1"), &cancel).unwrap();

        let err = store
            .create(user("A@Example.com", "password2"), &cancel)
            .unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)));

        let found = store.find_by_email("a@EXAMPLE.com", &cancel).unwrap();
        assert_eq!(found.map(|u| u.id), Some(1));
        assert!(store.find_by_email("b@example.com", &cancel).unwrap().is_none());
    }
}
