use std::net::ToSocketAddrs;

use tiberius::Client;
use tokio::net::TcpStream;
use tokio::time::timeout;
use tokio_util::compat::{Compat, TokioAsyncWriteCompatExt};
use tracing::debug;

use crate::config::DbConfig;
use crate::error::DbError;
use crate::retry::{RetryPolicy, with_retries};

/// Type alias for SQL Server client
pub type MssqlClient = Client<Compat<TcpStream>>;

/// Open a single connection to SQL Server.
///
/// TCP and DNS failures map to [`DbError::ConnectionError`] so the retry
/// layer treats them as transient; driver-level failures keep their
/// structured Tiberius error so authentication and TLS problems stay
/// classified as permanent.
///
/// # Errors
/// Returns `DbError::ConnectionError` if the host cannot be resolved or
/// dialed within the configured connect timeout, `DbError::MssqlError` if
/// the TDS handshake or login fails.
pub async fn connect(config: &DbConfig) -> Result<MssqlClient, DbError> {
    let addr_iter = (config.server.as_str(), config.port)
        .to_socket_addrs()
        .map_err(|e| {
            DbError::ConnectionError(format!("failed to resolve {}: {e}", config.addr()))
        })?;

    let server_addr = addr_iter.into_iter().next().ok_or_else(|| {
        DbError::ConnectionError(format!("no address found for {}", config.addr()))
    })?;

    let tcp = timeout(config.connect_timeout, TcpStream::connect(server_addr))
        .await
        .map_err(|_| {
            DbError::ConnectionError(format!(
                "connect to {} timed out after {:?}",
                config.addr(),
                config.connect_timeout
            ))
        })?
        .map_err(|e| DbError::ConnectionError(format!("TCP connection error: {e}")))?;

    // Make compatible with Tiberius
    let tcp = tcp.compat_write();

    let client = Client::connect(config.to_tiberius_config(), tcp).await?;
    debug!("connected to {config}");
    Ok(client)
}

/// Open a connection, retrying transient failures per the policy.
///
/// # Errors
/// Returns the last error once the policy is exhausted, or immediately for a
/// permanent failure such as bad credentials.
pub async fn connect_with_retry(
    config: &DbConfig,
    policy: &RetryPolicy,
) -> Result<MssqlClient, DbError> {
    with_retries(policy, "connect to SQL Server", || connect(config)).await
}
