//! Pooled async PostgreSQL connections for the repositories.
//!
//! Connections come from `diesel-async` through `bb8`. The pool opens no
//! connection up front, so a database that is briefly down at start-up
//! surfaces as a repository `Connection` error on the first round rather
//! than a failed boot.
//!
//! Every connection is opened through `tokio-postgres` with a rustls
//! connector, so `sslmode` in the URL or [`DatabaseSslMode`] decides whether
//! the session is encrypted.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use diesel::{ConnectionError, ConnectionResult};
use diesel_async::AsyncPgConnection;
use diesel_async::pooled_connection::bb8::{Pool, PooledConnection, RunError};
use diesel_async::pooled_connection::{AsyncDieselConnectionManager, ManagerConfig};
use futures_util::future::BoxFuture;
use rustls::{ClientConfig, RootCertStore};
use tokio_postgres::config::SslMode;
use tokio_postgres_rustls::MakeRustlsConnect;

/// Errors raised by the database pool.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PoolError {
    /// No connection could be checked out.
    #[error("failed to get connection from pool: {message}")]
    Checkout { message: String },

    /// The pool could not be constructed.
    #[error("failed to build connection pool: {message}")]
    Build { message: String },
}

impl PoolError {
    /// Create a checkout error.
    pub fn checkout(message: impl Into<String>) -> Self {
        Self::Checkout {
            message: message.into(),
        }
    }

    /// Create a build error.
    pub fn build(message: impl Into<String>) -> Self {
        Self::Build {
            message: message.into(),
        }
    }
}

/// How the pool negotiates TLS with PostgreSQL.
///
/// Accepts the libpq `sslmode` names. `verify-ca` and `verify-full` behave
/// like `require` because rustls always checks the certificate chain and
/// host name against the webpki roots.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatabaseSslMode {
    /// Plain TCP only.
    Disable,
    /// Use TLS when the server offers it, plain TCP otherwise.
    Prefer,
    /// Refuse to connect without TLS.
    Require,
}

impl DatabaseSslMode {
    fn as_tokio_postgres(self) -> SslMode {
        match self {
            Self::Disable => SslMode::Disable,
            Self::Prefer => SslMode::Prefer,
            Self::Require => SslMode::Require,
        }
    }
}

/// Raised when an `sslmode` name is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error(
    "unknown database ssl mode `{0}`; expected disable, allow, prefer, require, verify-ca or verify-full"
)]
pub struct UnknownSslMode(pub String);

impl FromStr for DatabaseSslMode {
    type Err = UnknownSslMode;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "disable" => Ok(Self::Disable),
            "allow" | "prefer" => Ok(Self::Prefer),
            "require" | "verify-ca" | "verify-full" => Ok(Self::Require),
            _ => Err(UnknownSslMode(raw.trim().to_owned())),
        }
    }
}

impl fmt::Display for DatabaseSslMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Disable => "disable",
            Self::Prefer => "prefer",
            Self::Require => "require",
        })
    }
}

/// Database pool settings.
#[derive(Debug, Clone)]
pub struct PoolConfig {
    database_url: String,
    max_size: u32,
    connection_timeout: Duration,
    ssl_mode: Option<DatabaseSslMode>,
}

impl PoolConfig {
    /// Settings for `database_url` with four connections and a ten second
    /// checkout timeout. A round needs one connection at a time.
    pub fn new(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            max_size: 4,
            connection_timeout: Duration::from_secs(10),
            ssl_mode: None,
        }
    }

    /// Set the maximum number of pooled connections.
    pub fn with_max_size(mut self, max_size: u32) -> Self {
        self.max_size = max_size;
        self
    }

    /// Set how long a checkout may wait.
    pub fn with_connection_timeout(mut self, timeout: Duration) -> Self {
        self.connection_timeout = timeout;
        self
    }

    /// Override the URL's `sslmode`. Without an override the URL decides,
    /// and an absent `sslmode` means `prefer`.
    pub fn with_ssl_mode(mut self, ssl_mode: Option<DatabaseSslMode>) -> Self {
        self.ssl_mode = ssl_mode;
        self
    }

    /// Database URL.
    pub fn database_url(&self) -> &str {
        &self.database_url
    }

    /// TLS override, if any.
    pub fn ssl_mode(&self) -> Option<DatabaseSslMode> {
        self.ssl_mode
    }
}

fn tls_connector() -> Result<MakeRustlsConnect, PoolError> {
    let roots = RootCertStore {
        roots: webpki_roots::TLS_SERVER_ROOTS.to_vec(),
    };
    let tls = ClientConfig::builder_with_provider(Arc::new(
        rustls::crypto::ring::default_provider(),
    ))
    .with_safe_default_protocol_versions()
    .map_err(|err| PoolError::build(format!("tls setup: {err}")))?
    .with_root_certificates(roots)
    .with_no_client_auth();
    Ok(MakeRustlsConnect::new(tls))
}

fn establish(
    url: &str,
    ssl_mode: Option<DatabaseSslMode>,
    tls: MakeRustlsConnect,
) -> BoxFuture<'_, ConnectionResult<AsyncPgConnection>> {
    Box::pin(async move {
        let mut config = url
            .parse::<tokio_postgres::Config>()
            .map_err(|err| ConnectionError::InvalidConnectionUrl(err.to_string()))?;
        if let Some(mode) = ssl_mode {
            config.ssl_mode(mode.as_tokio_postgres());
        }
        let (client, connection) = config
            .connect(tls)
            .await
            .map_err(|err| ConnectionError::BadConnection(err.to_string()))?;
        AsyncPgConnection::try_from_client_and_connection(client, connection).await
    })
}

/// Async PostgreSQL pool shared by the repositories.
#[derive(Clone)]
pub struct DbPool {
    inner: Pool<AsyncPgConnection>,
}

impl DbPool {
    /// Build the pool.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::Build`] when the pool cannot be constructed.
    pub async fn new(config: PoolConfig) -> Result<Self, PoolError> {
        let tls = tls_connector()?;
        let ssl_mode = config.ssl_mode;
        let mut manager_config = ManagerConfig::<AsyncPgConnection>::default();
        manager_config.custom_setup = Box::new(move |url| establish(url, ssl_mode, tls.clone()));
        let manager = AsyncDieselConnectionManager::<AsyncPgConnection>::new_with_config(
            config.database_url,
            manager_config,
        );
        let inner = Pool::builder()
            .max_size(config.max_size)
            .min_idle(None)
            .connection_timeout(config.connection_timeout)
            .build(manager)
            .await
            .map_err(|err| PoolError::build(err.to_string()))?;
        Ok(Self { inner })
    }

    /// Check out a connection.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::Checkout`] when the database cannot be reached or
    /// no connection frees up within the configured timeout.
    pub async fn get(&self) -> Result<PooledConnection<'_, AsyncPgConnection>, PoolError> {
        self.inner.get().await.map_err(|err| match err {
            RunError::TimedOut => PoolError::checkout("timed out waiting for a connection"),
            RunError::User(err) => PoolError::checkout(err.to_string()),
        })
    }
}
