//! Unit of work shared by the repositories taking part in one service call.
//!
//! Writes are staged in a transaction that is opened on first use and stays
//! open until [`Session::save`] commits it or [`Session::discard`] rolls it
//! back. Dropping a session with staged work rolls it back. Reads go through
//! the staged transaction when there is one, so they observe pending writes.

use sea_orm::{DatabaseConnection, DatabaseTransaction, DbErr, TransactionTrait};
use tokio::sync::{MappedMutexGuard, Mutex, MutexGuard};
use tracing::debug;

/// One session per logical unit of work; not meant to be shared by concurrent callers.
pub struct Session {
    db: DatabaseConnection,
    staged: Mutex<Option<DatabaseTransaction>>,
}

impl Session {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            db,
            staged: Mutex::new(None),
        }
    }

    /// The pooled connection, bypassing any staged work.
    pub fn pool(&self) -> &DatabaseConnection {
        &self.db
    }

    /// Lock the staged transaction slot for a read.
    pub(crate) async fn staged(&self) -> MutexGuard<'_, Option<DatabaseTransaction>> {
        self.staged.lock().await
    }

    /// The transaction writes are staged in, opened on first use.
    pub async fn stage(&self) -> Result<MappedMutexGuard<'_, DatabaseTransaction>, DbErr> {
        let mut slot = self.staged.lock().await;
        let tx = match slot.take() {
            Some(tx) => tx,
            None => {
                debug!("opening unit of work");
                self.db.begin().await?
            }
        };
        Ok(MutexGuard::map(slot, move |slot| slot.insert(tx)))
    }

    pub async fn has_staged(&self) -> bool {
        self.staged.lock().await.is_some()
    }

    /// Commit staged writes. A no-op when nothing was staged.
    pub async fn save(&self) -> Result<(), DbErr> {
        match self.staged.lock().await.take() {
            Some(tx) => {
                tx.commit().await?;
                debug!("unit of work committed");
                Ok(())
            }
            None => Ok(()),
        }
    }

    /// Roll back staged writes.
    pub async fn discard(&self) -> Result<(), DbErr> {
        match self.staged.lock().await.take() {
            Some(tx) => {
                tx.rollback().await?;
                debug!("unit of work discarded");
                Ok(())
            }
            None => Ok(()),
        }
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("staged", &self.staged.try_lock().map(|s| s.is_some()).ok())
            .finish()
    }
}
