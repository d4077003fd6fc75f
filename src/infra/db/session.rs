//! Database session: one unit of work bound to one transaction.

use sea_orm::{DatabaseConnection, DatabaseTransaction, TransactionTrait};

use crate::errors::{AppError, AppResult};
use crate::infra::repositories::{BaseEntity, BaseRepository};

/// Transaction-scoped session.
///
/// Nothing is visible to other connections until [`Session::commit`].
/// Dropping a session without committing rolls the transaction back.
pub struct Session {
    txn: DatabaseTransaction,
}

impl Session {
    /// Begin a new transaction on the pool.
    pub async fn begin(db: &DatabaseConnection) -> AppResult<Self> {
        let txn = db.begin().await.map_err(|e| {
            tracing::error!("Error beginning transaction: {}", e);
            AppError::operation("begin transaction", e)
        })?;
        Ok(Self { txn })
    }

    /// Get the transaction for direct queries
    pub fn transaction(&self) -> &DatabaseTransaction {
        &self.txn
    }

    /// Repository for `E` bound to this session
    pub fn repository<E>(&self) -> BaseRepository<'_, E, DatabaseTransaction>
    where
        E: BaseEntity,
        E::Model: Send + Sync,
    {
        BaseRepository::new(&self.txn)
    }

    /// Commit the transaction
    pub async fn commit(self) -> AppResult<()> {
        self.txn.commit().await.map_err(|e| {
            tracing::error!("Error committing transaction: {}", e);
            AppError::operation("commit transaction", e)
        })
    }

    /// Roll the transaction back
    pub async fn rollback(self) -> AppResult<()> {
        self.txn.rollback().await.map_err(|e| {
            tracing::error!("Error rolling back transaction: {}", e);
            AppError::operation("rollback transaction", e)
        })
    }
}
