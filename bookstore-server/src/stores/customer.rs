//! Customer store
//!
//! Email is unique across customers, compared case-insensitively. The
//! uniqueness check and the insert happen under the same write lock.

use std::sync::Arc;

use shared::models::Customer;
use tokio_util::sync::CancellationToken;

use super::collection::{Collection, Entity, Table, check_cancelled};
use super::error::{StoreError, StoreResult};
use super::snapshot::Snapshot;

impl Entity for Customer {
    const NAME: &'static str = "customer";

    fn id(&self) -> i64 {
        self.id
    }

    fn set_id(&mut self, id: i64) {
        self.id = id;
    }
}

/// Conflict if another customer (not `except`) already uses `email`
fn ensure_email_free(table: &Table<Customer>, email: &str, except: Option<i64>) -> StoreResult<()> {
    let taken = table
        .values()
        .any(|c| Some(c.id) != except && c.email.eq_ignore_ascii_case(email));
    if taken {
        return Err(StoreError::Conflict(format!("email {email} already registered")));
    }
    Ok(())
}

#[derive(Debug)]
pub struct CustomerStore {
    customers: Collection<Customer>,
}

impl CustomerStore {
    pub fn new(snapshot: Arc<dyn Snapshot<Customer>>) -> Self {
        Self {
            customers: Collection::new(snapshot),
        }
    }

    pub fn load_snapshot(&self) -> StoreResult<usize> {
        self.customers.load_snapshot()
    }

    pub fn create(&self, customer: Customer, cancel: &CancellationToken) -> StoreResult<Customer> {
        check_cancelled(cancel)?;
        let (created, pending) = {
            let mut table = self.customers.write();
            ensure_email_free(&table, &customer.email, None)?;
            let created = table.insert_new(customer);
            (created, table.pending())
        };
        self.customers.flush(pending)?;
        tracing::info!(customer_id = created.id, "Customer created");
        Ok(created)
    }

    pub fn get(&self, id: i64, cancel: &CancellationToken) -> StoreResult<Customer> {
        self.customers.get(id, cancel)
    }

    pub fn list(&self, cancel: &CancellationToken) -> StoreResult<Vec<Customer>> {
        self.customers.list(cancel)
    }

    pub fn update(
        &self,
        id: i64,
        customer: Customer,
        cancel: &CancellationToken,
    ) -> StoreResult<Customer> {
        check_cancelled(cancel)?;
        let (updated, pending) = {
            let mut table = self.customers.write();
            if !table.contains(id) {
                return Err(StoreError::NotFound {
                    entity: Customer::NAME,
                    id,
                });
            }
            ensure_email_free(&table, &customer.email, Some(id))?;
            let updated = table.replace(id, customer)?;
            (updated, table.pending())
        };
        self.customers.flush(pending)?;
        tracing::info!(customer_id = id, "Customer updated");
        Ok(updated)
    }

    pub fn delete(&self, id: i64, cancel: &CancellationToken) -> StoreResult<()> {
        self.customers.delete(id, cancel)?;
        tracing::info!(customer_id = id, "Customer deleted");
        Ok(())
    }

    pub fn exists(&self, id: i64, cancel: &CancellationToken) -> StoreResult<bool> {
        check_cancelled(cancel)?;
        Ok(self.customers.read().contains(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stores::snapshot::MemorySnapshot;
    use chrono::Utc;
    use shared::models::Address;

    fn customer(name: &str, email: &str) -> Customer {
        Customer {
            id: 0,
            name: name.into(),
            email: email.into(),
            address: Address {
                street: "12 Harbour Road".into(),
                city: "Rabat".into(),
                state: "Rabat-Sale".into(),
                postal_code: "10000".into(),
                country: "Morocco".into(),
            },
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_duplicate_email_is_conflict() {
        let store = CustomerStore::new(Arc::new(MemorySnapshot::<Customer>::new()));
        let cancel = CancellationToken::new();
        store.create(customer("Amal", "amal@example.com"), &cancel).unwrap();

        let err = store
            .create(customer("Other", "AMAL@example.com"), &cancel)
            .unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)));
        assert_eq!(store.list(&cancel).unwrap().len(), 1);
    }

    #[test]
    fn test_update_keeps_own_email_but_rejects_others() {
        let store = CustomerStore::new(Arc::new(MemorySnapshot::<Customer>::new()));
        let cancel = CancellationToken::new();
        let a = store.create(customer("Amal", "amal@example.com"), &cancel).unwrap();
        store.create(customer("Badr", "badr@example.com"), &cancel).unwrap();

        let renamed = store
            .update(a.id, customer("Amal B.", "amal@example.com"), &cancel)
            .unwrap();
        assert_eq!(renamed.name, "Amal B.");

        let err = store
            .update(a.id, customer("Amal", "badr@example.com"), &cancel)
            .unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)));

        let err = store
            .update(42, customer("Nobody", "nobody@example.com"), &cancel)
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound { entity: "customer", id: 42 }));
    }
}
