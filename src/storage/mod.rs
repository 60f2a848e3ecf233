// storage/mod.rs
// Customer table access: pool setup, migrations, transactions and the write gate

mod gate;
mod migrations;
mod pool;
mod store;
mod transaction;

#[cfg(test)]
pub(crate) mod test_helpers;

// Re-export commonly used items
pub use gate::{WriteGate, WriteGuard};
pub use migrations::run_migrations;
pub use pool::StoreOptions;
pub use store::CustomerStore;
pub use transaction::{InsertTransaction, OpenTransaction, INSERT_CUSTOMER_SQL};
