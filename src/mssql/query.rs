use std::sync::Arc;

use chrono::NaiveDateTime;
use futures_util::TryStreamExt;
use tiberius::Query;

use super::client::MssqlClient;
use crate::error::DbError;
use crate::results::ResultSet;
use crate::types::RowValues;

/// Execute a query and materialize every row into a [`ResultSet`].
///
/// # Errors
/// Returns `DbError::ExecutionError` if execution, column metadata or row
/// streaming fails, or if the statement produces no result set at all.
pub async fn build_result_set(
    client: &mut MssqlClient,
    query: &str,
    params: &[RowValues],
) -> Result<ResultSet, DbError> {
    let query_builder = bind_query_params(query, params);

    let mut stream = query_builder
        .query(client)
        .await
        .map_err(|e| DbError::ExecutionError(format!("SQL Server query error: {e}")))?;

    let columns_opt = stream
        .columns()
        .await
        .map_err(|e| DbError::ExecutionError(format!("SQL Server column fetch error: {e}")))?;

    let columns = columns_opt.ok_or_else(|| {
        DbError::ExecutionError("no columns returned from query".to_string())
    })?;

    let column_names: Arc<Vec<String>> =
        Arc::new(columns.iter().map(|col| col.name().to_string()).collect());

    let col_count = column_names.len();
    let mut result_set = ResultSet::new(column_names, 16);

    let mut rows = stream.into_row_stream();
    while let Some(row) = rows
        .try_next()
        .await
        .map_err(|e| DbError::ExecutionError(format!("SQL Server row fetch error: {e}")))?
    {
        let mut row_values = Vec::with_capacity(col_count);
        for i in 0..col_count {
            row_values.push(extract_value(&row, i).unwrap_or(RowValues::Null));
        }
        result_set.add_row_values(row_values);
    }

    Ok(result_set)
}

/// Execute a batch of SQL statements, discarding any results.
///
/// # Errors
/// Returns `DbError::ExecutionError` if execution fails.
pub async fn execute_batch(client: &mut MssqlClient, query: &str) -> Result<(), DbError> {
    let query_builder = Query::new(query);
    query_builder
        .execute(client)
        .await
        .map_err(|e| DbError::ExecutionError(format!("SQL Server batch execution error: {e}")))?;

    Ok(())
}

/// Bind parameters directly to the query for SQL Server.
/// Return a query builder with parameters already bound.
pub fn bind_query_params<'a>(query: &'a str, params: &[RowValues]) -> Query<'a> {
    let mut query_builder = Query::new(query);

    for param in params {
        match param {
            RowValues::Int(i) => query_builder.bind(*i),
            RowValues::Float(f) => query_builder.bind(*f),
            RowValues::Text(s) => query_builder.bind(s.clone()),
            RowValues::Bool(b) => query_builder.bind(*b),
            RowValues::Timestamp(dt) => {
                query_builder.bind(dt.format("%Y-%m-%dT%H:%M:%S%.f").to_string());
            }
            RowValues::Null => query_builder.bind(Option::<String>::None),
            RowValues::JSON(jsval) => query_builder.bind(jsval.to_string()),
            RowValues::Blob(bytes) => query_builder.bind(bytes.clone()),
        }
    }

    query_builder
}

/// Extract the value at a column index, probing the wire types SQL Server
/// actually sends for this schema. Unknown types come back as NULL.
fn extract_value(row: &tiberius::Row, idx: usize) -> Option<RowValues> {
    if let Ok(Some(val)) = row.try_get::<i32, _>(idx) {
        return Some(RowValues::Int(i64::from(val)));
    }

    if let Ok(Some(val)) = row.try_get::<i64, _>(idx) {
        return Some(RowValues::Int(val));
    }

    if let Ok(Some(val)) = row.try_get::<f32, _>(idx) {
        return Some(RowValues::Float(f64::from(val)));
    }

    if let Ok(Some(val)) = row.try_get::<f64, _>(idx) {
        return Some(RowValues::Float(val));
    }

    if let Ok(Some(val)) = row.try_get::<bool, _>(idx) {
        return Some(RowValues::Bool(val));
    }

    if let Ok(Some(val)) = row.try_get::<NaiveDateTime, _>(idx) {
        return Some(RowValues::Timestamp(val));
    }

    if let Ok(Some(val)) = row.try_get::<&str, _>(idx) {
        return Some(RowValues::Text(val.to_string()));
    }

    if let Ok(Some(val)) = row.try_get::<&[u8], _>(idx) {
        return Some(RowValues::Blob(val.to_vec()));
    }

    None
}
