//! trackload - one-shot export of the SpotifyRock tracks join.

use std::time::Instant;

use clap::Parser;
use serde::Serialize;
use tracing::{error, info};

use trackload::DbError;
use trackload::cli::Cli;
use trackload::logging;
use trackload::mssql::{Engine, connect_with_retry};
use trackload::queries::TRACKS_JOIN_SQL;
use trackload::runner::fetch_table;

#[derive(Serialize)]
struct RunReport {
    rows: usize,
    columns: usize,
    elapsed_seconds: f64,
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    logging::init_stderr_logging();

    if let Err(e) = run().await {
        error!("{e}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), DbError> {
    let cli = Cli::parse();
    let config = cli.to_db_config()?;
    let policy = cli.retry_policy();

    info!("connecting to {config}");
    let client = connect_with_retry(&config, &policy).await?;
    let engine = Engine::from_connection(client)?;

    let started = Instant::now();
    let table = fetch_table(engine, TRACKS_JOIN_SQL, &[]).await?;
    let elapsed = started.elapsed();

    let (rows, columns) = table.shape();
    info!("loaded {rows} rows x {columns} columns");

    if cli.json {
        let report = RunReport {
            rows,
            columns,
            elapsed_seconds: elapsed.as_secs_f64(),
        };
        let rendered =
            serde_json::to_string(&report).map_err(|e| DbError::Other(e.to_string()))?;
        println!("{rendered}");
    } else {
        println!("({rows}, {columns})");
        println!("Time to run the query: {:.3} seconds", elapsed.as_secs_f64());
    }

    Ok(())
}
