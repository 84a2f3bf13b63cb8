use std::sync::Mutex;

use deadpool::managed::{Manager, Metrics, RecycleResult};

use crate::error::DbError;

/// Deadpool manager that hands out one pre-opened connection and reuses it
/// for every checkout.
///
/// `create` empties the slot on first call and errors on any later call, so a
/// pool built over this manager can never dial a second connection; `recycle`
/// always accepts, so checkouts keep returning the same underlying session.
pub struct SingleConnectionManager<C> {
    slot: Mutex<Option<C>>,
}

impl<C> SingleConnectionManager<C> {
    #[must_use]
    pub fn new(conn: C) -> Self {
        Self {
            slot: Mutex::new(Some(conn)),
        }
    }
}

impl<C: Send> Manager for SingleConnectionManager<C> {
    type Type = C;
    type Error = DbError;

    async fn create(&self) -> Result<C, DbError> {
        let conn = {
            let mut slot = match self.slot.lock() {
                Ok(guard) => guard,
                Err(poisoned) => poisoned.into_inner(),
            };
            slot.take()
        };

        conn.ok_or_else(|| {
            DbError::EngineError(
                "the engine's single connection is no longer available".to_string(),
            )
        })
    }

    async fn recycle(&self, _conn: &mut C, _metrics: &Metrics) -> RecycleResult<DbError> {
        Ok(())
    }
}
