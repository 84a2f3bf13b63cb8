// MSSQL module - SQL Server connectivity for the track loader
//
// This module is split into several sub-modules:
// - client: raw Tiberius connection setup, with and without retry
// - engine: the single-connection pooled execution engine
// - query: query binding, result extraction and batch execution

pub mod client;
pub mod engine;
pub mod query;

// Re-export the public API
pub use client::{MssqlClient, connect, connect_with_retry};
pub use engine::Engine;
pub use query::{build_result_set, execute_batch};
