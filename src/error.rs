use deadpool::managed::PoolError;
use thiserror::Error;

/// Error type for every fallible operation in the crate.
///
/// All failure paths return this through `Result`; nothing is swallowed into
/// an absent value the caller has to remember to check.
#[derive(Debug, Error)]
pub enum DbError {
    #[error(transparent)]
    MssqlError(#[from] tiberius::error::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("SQL execution error: {0}")]
    ExecutionError(String),

    #[error("Engine error: {0}")]
    EngineError(String),

    #[error("Other database error: {0}")]
    Other(String),
}

impl DbError {
    /// Whether a retry has any chance of succeeding.
    ///
    /// Connection-level failures (refused, reset, timed out, DNS) are treated
    /// as transient. Authentication, TLS and protocol failures are permanent;
    /// unknown errors default to not retrying.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            DbError::MssqlError(e) => mssql_error_is_transient(e),
            DbError::ConnectionError(_) => true,
            _ => false,
        }
    }
}

/// Server error codes worth retrying: deadlock victim, Azure SQL throttling
/// and failover codes. Everything else, login failure 18456 included, is
/// permanent.
const TRANSIENT_SERVER_CODES: &[u32] = &[
    1205, 10928, 10929, 40197, 40501, 40613, 49918, 49919, 49920,
];

fn mssql_error_is_transient(err: &tiberius::error::Error) -> bool {
    use tiberius::error::Error;

    match err {
        Error::Io { .. } => true,
        Error::Routing { .. } => true,
        Error::Server(token) => TRANSIENT_SERVER_CODES.contains(&token.code()),
        _ => false,
    }
}

impl From<PoolError<DbError>> for DbError {
    fn from(err: PoolError<DbError>) -> Self {
        match err {
            PoolError::Backend(e) => e,
            PoolError::Timeout(_) => {
                DbError::EngineError("timed out waiting for the engine connection".to_string())
            }
            PoolError::Closed => DbError::EngineError("engine pool is closed".to_string()),
            other => DbError::EngineError(format!("engine pool error: {other}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_errors_are_transient() {
        let err = DbError::MssqlError(tiberius::error::Error::Io {
            kind: std::io::ErrorKind::ConnectionRefused,
            message: "connection refused".to_string(),
        });
        assert!(err.is_retryable());
    }

    #[test]
    fn tls_errors_are_permanent() {
        let err = DbError::MssqlError(tiberius::error::Error::Tls(
            "certificate verify failed".to_string(),
        ));
        assert!(!err.is_retryable());
    }

    #[test]
    fn connection_errors_are_transient() {
        assert!(DbError::ConnectionError("TCP connection error".to_string()).is_retryable());
    }

    #[test]
    fn config_and_execution_errors_are_permanent() {
        assert!(!DbError::ConfigError("missing password".to_string()).is_retryable());
        assert!(!DbError::ExecutionError("syntax error".to_string()).is_retryable());
    }

    #[test]
    fn pool_backend_errors_pass_through() {
        let inner = DbError::EngineError("already taken".to_string());
        let err = DbError::from(PoolError::Backend(inner));
        assert!(matches!(err, DbError::EngineError(msg) if msg == "already taken"));
    }

    #[test]
    fn closed_pool_maps_to_engine_error() {
        let err = DbError::from(PoolError::<DbError>::Closed);
        assert!(matches!(err, DbError::EngineError(_)));
    }
}
