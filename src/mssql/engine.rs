use std::fmt;
use std::time::Duration;

use deadpool::Runtime;
use deadpool::managed::{Object, Pool, Timeouts};
use tracing::debug;

use super::client::MssqlClient;
use crate::error::DbError;
use crate::pool::SingleConnectionManager;

type EnginePool = Pool<SingleConnectionManager<MssqlClient>>;

/// A pooled execution engine over exactly one live SQL Server connection.
///
/// The pool has max size 1 and its manager can only ever hand out the
/// connection it was built with, so every checkout reuses the same session.
/// Dropping usable state requires going through [`Engine::dispose`], which
/// consumes the engine; use-after-dispose is a compile error rather than a
/// runtime null check.
pub struct Engine {
    pool: EnginePool,
}

impl Engine {
    /// Wrap an already-open connection in a pool of size 1.
    ///
    /// Construction is deterministic, so there is no retry here: a failure
    /// would fail identically on every attempt.
    ///
    /// # Errors
    /// Returns `DbError::EngineError` if the pool cannot be built.
    pub fn from_connection(client: MssqlClient) -> Result<Self, DbError> {
        let pool = Pool::builder(SingleConnectionManager::new(client))
            .max_size(1)
            .runtime(Runtime::Tokio1)
            .build()
            .map_err(|e| DbError::EngineError(format!("failed to build engine pool: {e}")))?;

        Ok(Self { pool })
    }

    /// Check the connection out of the pool.
    ///
    /// # Errors
    /// Returns `DbError::EngineError` if the connection is gone (for example
    /// after a checkout marked it broken).
    pub async fn acquire(&self) -> Result<Object<SingleConnectionManager<MssqlClient>>, DbError> {
        self.pool.get().await.map_err(DbError::from)
    }

    /// Tear the engine down, closing the underlying TDS session gracefully.
    ///
    /// The connection is pulled back out of the pool so the server sees a
    /// proper logout instead of a dropped socket. If the connection is no
    /// longer available (broken and discarded earlier), the pool is closed
    /// and there is nothing left to do.
    ///
    /// # Errors
    /// Returns `DbError::MssqlError` if the logout itself fails.
    pub async fn dispose(self) -> Result<(), DbError> {
        let timeouts = Timeouts {
            wait: Some(Duration::ZERO),
            ..Timeouts::default()
        };

        match self.pool.timeout_get(&timeouts).await {
            Ok(conn) => {
                let client = Object::take(conn);
                self.pool.close();
                client.close().await?;
            }
            Err(err) => {
                debug!(
                    "engine disposed without a live connection to close: {}",
                    DbError::from(err)
                );
                self.pool.close();
            }
        }

        Ok(())
    }
}

impl fmt::Debug for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let status = self.pool.status();
        f.debug_struct("Engine")
            .field("size", &status.size)
            .field("available", &status.available)
            .finish()
    }
}
