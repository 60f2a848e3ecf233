//! Insert transactions.
//!
//! A transaction moves through `Open` (after begin) and `Prepared` (after the
//! insert statement is prepared) before it ends in `Committed` or `Aborted`.
//! The states are separate types, so a statement cannot run before it is
//! prepared and nothing can run after commit or rollback. No state retries.

use log::trace;
use sqlx::sqlite::SqliteStatement;
use sqlx::{Executor, Sqlite, Statement, Transaction};

use crate::error_handling::{StoreError, StoreOp};
use crate::models::CustomerRecord;

/// Insert statement used by every policy.
///
/// The column list follows file order (id, name, email, ...), which is not
/// the table's declaration order (id, email, name, ...). Binding is
/// positional against this list.
pub const INSERT_CUSTOMER_SQL: &str =
    "INSERT INTO customers (id, name, email, company, city, country, birthday) VALUES (?, ?, ?, ?, ?, ?, ?)";

/// A begun transaction with no statement prepared yet.
pub struct OpenTransaction {
    tx: Transaction<'static, Sqlite>,
}

impl OpenTransaction {
    pub(crate) fn new(tx: Transaction<'static, Sqlite>) -> Self {
        Self { tx }
    }

    /// Prepares the insert statement inside this transaction.
    ///
    /// On failure the transaction is dropped, which rolls it back.
    pub async fn prepare_insert(mut self) -> Result<InsertTransaction, StoreError> {
        let statement = Executor::prepare(&mut *self.tx, INSERT_CUSTOMER_SQL)
            .await
            .map_err(StoreError::at(StoreOp::Prepare))?;
        Ok(InsertTransaction {
            tx: self.tx,
            statement,
            executed: 0,
        })
    }
}

/// A transaction with the insert statement prepared.
pub struct InsertTransaction {
    tx: Transaction<'static, Sqlite>,
    statement: SqliteStatement<'static>,
    executed: u64,
}

impl InsertTransaction {
    /// Executes the prepared insert with `record` bound positionally.
    pub async fn execute(&mut self, record: &CustomerRecord) -> Result<(), StoreError> {
        let mut query = self.statement.query();
        for field in record.fields() {
            query = query.bind(field);
        }
        query
            .execute(&mut *self.tx)
            .await
            .map_err(StoreError::at(StoreOp::Execute))?;
        self.executed += 1;
        Ok(())
    }

    /// Inserts executed so far.
    pub fn executed(&self) -> u64 {
        self.executed
    }

    /// Commits and releases the statement, returning the rows inserted.
    pub async fn commit(self) -> Result<u64, StoreError> {
        let executed = self.executed;
        self.tx
            .commit()
            .await
            .map_err(StoreError::at(StoreOp::Commit))?;
        trace!("Committed {} inserts", executed);
        Ok(executed)
    }

    /// Rolls back every insert executed in this transaction.
    pub async fn rollback(self) -> Result<(), StoreError> {
        self.tx
            .rollback()
            .await
            .map_err(StoreError::at(StoreOp::Rollback))
    }
}
