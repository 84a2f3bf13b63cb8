//! One-shot loader for the SpotifyRock tracks dataset.
//!
//! Connects to SQL Server over TDS, runs a single fixed five-table join and
//! materializes the result into an in-memory, column-labeled table. The
//! pipeline is strictly linear: configuration, a retried connection, a
//! pool-of-one engine around that connection, one query, disposal.

pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod mssql;
pub mod pool;
pub mod queries;
pub mod results;
pub mod retry;
pub mod runner;
pub mod types;

pub use config::DbConfig;
pub use error::DbError;
pub use mssql::{Engine, MssqlClient, build_result_set, connect, connect_with_retry};
pub use results::{CustomDbRow, ResultSet};
pub use retry::RetryPolicy;
pub use runner::fetch_table;
pub use types::RowValues;
