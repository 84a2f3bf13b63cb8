use tracing::warn;

use crate::error::DbError;
use crate::mssql::{Engine, build_result_set};
use crate::results::ResultSet;
use crate::types::RowValues;

/// Run one query through the engine and return the materialized table.
///
/// The engine is consumed and disposed on both the success and the failure
/// path, so the connection can never outlive its single use. A disposal
/// failure is logged but does not mask the query outcome.
///
/// # Errors
/// Returns the acquisition or execution error; never a disposal error.
pub async fn fetch_table(
    engine: Engine,
    sql: &str,
    params: &[RowValues],
) -> Result<ResultSet, DbError> {
    let result = match engine.acquire().await {
        Ok(mut conn) => build_result_set(&mut conn, sql, params).await,
        Err(e) => Err(e),
    };

    if let Err(e) = engine.dispose().await {
        warn!("failed to dispose the engine cleanly: {e}");
    }

    result
}
