//! Shared test helpers for storage module tests.
//!
//! This module provides common utilities for database setup and test data creation
//! used across storage and writer tests.

use tempfile::TempDir;

use crate::models::CustomerRecord;
use crate::storage::{CustomerStore, StoreOptions};

/// Creates a store backed by a fresh database file in a temporary directory.
///
/// The directory must outlive the store, so it is returned alongside it.
/// A file is used instead of `sqlite::memory:` because every pooled
/// in-memory connection would see its own empty database.
pub async fn create_test_store() -> (TempDir, CustomerStore) {
    create_test_store_with(&StoreOptions::default()).await
}

/// Creates a store whose pool holds a single connection.
///
/// SQLite caches the schema per connection, so a schema change made through
/// the pool is only guaranteed to be seen by the next `prepare` when both run
/// on the same connection.
pub async fn create_single_connection_store() -> (TempDir, CustomerStore) {
    create_test_store_with(&StoreOptions {
        max_connections: 1,
        ..StoreOptions::default()
    })
    .await
}

async fn create_test_store_with(options: &StoreOptions) -> (TempDir, CustomerStore) {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let store = CustomerStore::open(&dir.path().join("test.db"), options)
        .await
        .expect("Failed to open test store");
    (dir, store)
}

/// Creates a record whose fields are derived from `id`.
pub fn sample_record(id: &str) -> CustomerRecord {
    CustomerRecord {
        id: id.to_string(),
        name: format!("Customer {id}"),
        email: format!("customer{id}@example.com"),
        company: "Acme".to_string(),
        city: "NYC".to_string(),
        country: "US".to_string(),
        birthday: "1990-01-01".to_string(),
    }
}
