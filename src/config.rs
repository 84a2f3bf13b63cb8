use std::fmt;
use std::time::Duration;

use tiberius::{AuthMethod, Config as TiberiusConfig, EncryptionLevel};

/// Default SQL Server TDS port.
pub const DEFAULT_PORT: u16 = 1433;

/// Default connect timeout, matching the 600 second timeout the tool has
/// always shipped with.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(600);

/// Connection configuration for the target SQL Server.
///
/// Built once at startup and passed explicitly into every stage of the
/// pipeline; nothing here is read from global state after construction.
#[derive(Clone)]
pub struct DbConfig {
    pub server: String,
    pub database: String,
    pub user: String,
    password: String,
    pub port: u16,
    pub trust_server_certificate: bool,
    pub connect_timeout: Duration,
}

impl DbConfig {
    #[must_use]
    pub fn new(
        server: impl Into<String>,
        database: impl Into<String>,
        user: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            server: server.into(),
            database: database.into(),
            user: user.into(),
            password: password.into(),
            port: DEFAULT_PORT,
            trust_server_certificate: false,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
        }
    }

    #[must_use]
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Accept whatever certificate the server presents. Off by default; the
    /// connection always requires TLS either way.
    #[must_use]
    pub fn with_trust_server_certificate(mut self, trust: bool) -> Self {
        self.trust_server_certificate = trust;
        self
    }

    #[must_use]
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// The `host:port` pair the TCP stream dials.
    #[must_use]
    pub fn addr(&self) -> String {
        format!("{}:{}", self.server, self.port)
    }

    /// Build the Tiberius driver configuration.
    #[must_use]
    pub fn to_tiberius_config(&self) -> TiberiusConfig {
        let mut config = TiberiusConfig::new();
        config.host(&self.server);
        config.port(self.port);
        config.database(&self.database);
        config.authentication(AuthMethod::sql_server(&self.user, &self.password));
        config.encryption(EncryptionLevel::Required);
        if self.trust_server_certificate {
            config.trust_cert();
        }
        config
    }
}

impl fmt::Display for DbConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}@{}:{}/{}",
            self.user, self.server, self.port, self.database
        )
    }
}

// Manual impl so the password cannot leak into logs or error chains.
impl fmt::Debug for DbConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DbConfig")
            .field("server", &self.server)
            .field("database", &self.database)
            .field("user", &self.user)
            .field("port", &self.port)
            .field("trust_server_certificate", &self.trust_server_certificate)
            .field("connect_timeout", &self.connect_timeout)
            .finish_non_exhaustive()
    }
}
