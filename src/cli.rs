//! Command-line argument parsing.

use std::time::Duration;

use clap::Parser;

use crate::config::DbConfig;
use crate::error::DbError;
use crate::retry::RetryPolicy;

/// Load the SpotifyRock tracks join from SQL Server and print its shape.
#[derive(Parser, Debug)]
#[command(name = "trackload")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// SQL Server hostname
    #[arg(long, value_name = "HOST", default_value = "spotifyrockdb.database.windows.net")]
    pub server: String,

    /// Database name
    #[arg(short = 'd', long, value_name = "DATABASE", default_value = "SpotifyRockDB")]
    pub database: String,

    /// Login user
    #[arg(short = 'U', long, value_name = "USER", default_value = "sqladmin")]
    pub user: String,

    /// Login password; falls back to the PASSWORD environment variable
    #[arg(long, value_name = "PASSWORD", env = "PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// TDS port
    #[arg(short = 'p', long, value_name = "PORT", default_value_t = 1433)]
    pub port: u16,

    /// Accept the server TLS certificate without validation
    #[arg(long)]
    pub trust_server_certificate: bool,

    /// Connect timeout in seconds
    #[arg(long, value_name = "SECS", default_value_t = 600)]
    pub connect_timeout: u64,

    /// Maximum connection attempts
    #[arg(long, value_name = "N", default_value_t = 10)]
    pub max_retries: u32,

    /// Base delay between connection attempts in seconds
    #[arg(long, value_name = "SECS", default_value_t = 3)]
    pub retry_delay: u64,

    /// Print the result shape and timing as a JSON object
    #[arg(long)]
    pub json: bool,
}

impl Cli {
    /// Resolve the database configuration.
    ///
    /// # Errors
    /// Returns `DbError::ConfigError` when no password was provided on the
    /// command line or through the `PASSWORD` environment variable.
    pub fn to_db_config(&self) -> Result<DbConfig, DbError> {
        let password = self.password.clone().ok_or_else(|| {
            DbError::ConfigError(
                "database password not provided; set the PASSWORD environment variable or pass --password"
                    .to_string(),
            )
        })?;

        Ok(
            DbConfig::new(&self.server, &self.database, &self.user, password)
                .with_port(self.port)
                .with_trust_server_certificate(self.trust_server_certificate)
                .with_connect_timeout(Duration::from_secs(self.connect_timeout)),
        )
    }

    #[must_use]
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.max_retries, Duration::from_secs(self.retry_delay))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cli_with_password(password: Option<&str>) -> Cli {
        Cli {
            server: "db.example.com".to_string(),
            database: "SpotifyRockDB".to_string(),
            user: "sqladmin".to_string(),
            password: password.map(str::to_string),
            port: 1433,
            trust_server_certificate: false,
            connect_timeout: 600,
            max_retries: 10,
            retry_delay: 3,
            json: false,
        }
    }

    #[test]
    fn missing_password_is_a_hard_config_error() {
        let cli = cli_with_password(None);
        let err = cli.to_db_config().unwrap_err();
        assert!(matches!(err, DbError::ConfigError(_)));
        assert!(err.to_string().contains("PASSWORD"));
    }

    #[test]
    fn password_flows_into_the_config() {
        let cli = cli_with_password(Some("hunter2"));
        let config = cli.to_db_config().unwrap();
        assert_eq!(config.server, "db.example.com");
        assert_eq!(config.port, 1433);
        assert_eq!(config.connect_timeout, Duration::from_secs(600));
    }

    #[test]
    fn retry_knobs_map_onto_the_policy() {
        let mut cli = cli_with_password(Some("x"));
        cli.max_retries = 4;
        cli.retry_delay = 7;
        let policy = cli.retry_policy();
        assert_eq!(policy.max_attempts, 4);
        assert_eq!(policy.base_delay, Duration::from_secs(7));
    }

    #[test]
    fn flag_parsing_keeps_the_documented_defaults() {
        let cli = Cli::parse_from(["trackload", "--password", "x"]);
        assert_eq!(cli.server, "spotifyrockdb.database.windows.net");
        assert_eq!(cli.database, "SpotifyRockDB");
        assert_eq!(cli.user, "sqladmin");
        assert_eq!(cli.port, 1433);
        assert_eq!(cli.max_retries, 10);
        assert_eq!(cli.retry_delay, 3);
        assert!(!cli.json);
    }
}
