//! Customer store.

use std::path::Path;

use log::{debug, info};
use sqlx::{Row, SqlitePool};

use crate::error_handling::{StoreError, StoreOp};
use crate::models::CustomerRecord;

use super::migrations::run_migrations;
use super::pool::{init_db_pool_with_path, StoreOptions};
use super::transaction::OpenTransaction;

/// Handle to the SQLite database holding the `customers` table.
///
/// Cloning is cheap; clones share one connection pool. Concurrent callers are
/// serialized only by SQLite's own locking unless they go through a
/// [`WriteGate`](super::WriteGate).
#[derive(Clone, Debug)]
pub struct CustomerStore {
    pool: SqlitePool,
}

impl CustomerStore {
    /// Opens (creating if needed) the database at `db_path` and applies the
    /// schema migrations.
    pub async fn open(db_path: &Path, options: &StoreOptions) -> Result<Self, StoreError> {
        let pool = init_db_pool_with_path(db_path, options).await?;
        run_migrations(&pool).await?;
        Ok(Self { pool })
    }

    /// The underlying connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Begins a new transaction on a pooled connection.
    pub async fn begin(&self) -> Result<OpenTransaction, StoreError> {
        let tx = self
            .pool
            .begin()
            .await
            .map_err(StoreError::at(StoreOp::Begin))?;
        Ok(OpenTransaction::new(tx))
    }

    /// Deletes every row from `customers`, returning how many were removed.
    pub async fn truncate(&self) -> Result<u64, StoreError> {
        let result = sqlx::query("DELETE FROM customers")
            .execute(&self.pool)
            .await
            .map_err(StoreError::at(StoreOp::Truncate))?;
        debug!("Truncated customers ({} rows removed)", result.rows_affected());
        Ok(result.rows_affected())
    }

    /// Number of rows in `customers`.
    pub async fn count(&self) -> Result<u64, StoreError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM customers")
            .fetch_one(&self.pool)
            .await
            .map_err(StoreError::at(StoreOp::Count))?;
        Ok(u64::try_from(count).unwrap_or_default())
    }

    /// Every row in `customers`, in no particular order.
    pub async fn fetch_all(&self) -> Result<Vec<CustomerRecord>, StoreError> {
        let rows = sqlx::query(
            "SELECT id, name, email, company, city, country, birthday FROM customers",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(StoreError::at(StoreOp::Fetch))?;

        rows.iter()
            .map(|row| -> Result<CustomerRecord, sqlx::Error> {
                Ok(CustomerRecord {
                    id: row.try_get("id")?,
                    name: row.try_get("name")?,
                    email: row.try_get("email")?,
                    company: row.try_get("company")?,
                    city: row.try_get("city")?,
                    country: row.try_get("country")?,
                    birthday: row.try_get("birthday")?,
                })
            })
            .collect::<Result<Vec<_>, sqlx::Error>>()
            .map_err(StoreError::at(StoreOp::Fetch))
    }

    /// Closes every pooled connection.
    pub async fn close(&self) {
        self.pool.close().await;
        info!("Database connections closed");
    }
}
