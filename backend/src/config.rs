//! Matcher settings loaded via OrthoConfig.
//!
//! Every field may come from a `--flag`, a `MATCHER_*` environment variable
//! or a configuration file. [`MatcherSettings::resolve`] validates the raw
//! values into a [`MatcherConfig`] before any store is contacted.

use std::ffi::OsString;
use std::net::SocketAddr;
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;
use url::Url;

use crate::domain::{TrioAnchor, UnknownTrioAnchor};
use crate::outbound::persistence::{DatabaseSslMode, UnknownSslMode};

const DEFAULT_CACHE_HOST: &str = "127.0.0.1";
const DEFAULT_CACHE_PORT: u16 = 6379;
const DEFAULT_POOL_KEY_PREFIX: &str = "POOL-";
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;
const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";

/// Problems found while loading or validating settings.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SettingsError {
    /// Settings sources could not be read or merged.
    #[error("failed to load settings: {message}")]
    Load { message: String },
    /// No database URL was supplied.
    #[error("database url is required (set MATCHER_DATABASE_URL)")]
    MissingDatabaseUrl,
    /// The database TLS mode named no libpq `sslmode`.
    #[error(transparent)]
    DatabaseSslMode(#[from] UnknownSslMode),
    /// The cache host or password could not form a URL.
    #[error("invalid cache address: {message}")]
    InvalidCacheUrl { message: String },
    /// The notification URL did not parse.
    #[error("invalid match url `{value}`: {message}")]
    InvalidMatchUrl { value: String, message: String },
    /// The bind address did not parse.
    #[error("invalid bind address `{value}`: {message}")]
    InvalidBindAddr { value: String, message: String },
    /// The trio anchor named no known rule.
    #[error(transparent)]
    TrioAnchor(#[from] UnknownTrioAnchor),
}

/// Raw matcher settings.
#[derive(Debug, Clone, Default, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "MATCHER")]
pub struct MatcherSettings {
    /// PostgreSQL connection URL.
    pub database_url: Option<String>,
    /// libpq-style `sslmode` overriding the one in the database URL.
    pub database_ssl_mode: Option<String>,
    /// Redis host.
    pub cache_host: Option<String>,
    /// Redis port.
    pub cache_port: Option<u16>,
    /// Redis password, if the cache requires one.
    pub cache_password: Option<String>,
    /// Prefix of the per-guild pool set key.
    pub pool_key_prefix: Option<String>,
    /// Webhook notified after each round. Notification is skipped when unset.
    pub match_url: Option<String>,
    /// Timeout for the notification request, in seconds.
    pub request_timeout_secs: Option<u64>,
    /// Which pair absorbs an odd leftover candidate.
    pub trio_anchor: Option<String>,
    /// Listen address of the HTTP trigger.
    pub bind_addr: Option<String>,
}

impl MatcherSettings {
    /// Load settings from the environment and configuration files only,
    /// ignoring process arguments. Used where the binary parses its own
    /// flags.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::Load`] when a source is malformed.
    pub fn load_without_cli(bin_name: &str) -> Result<Self, SettingsError> {
        Self::load_from_iter([OsString::from(bin_name)]).map_err(|err| SettingsError::Load {
            message: err.to_string(),
        })
    }

    /// Redis host, defaulting to the loopback address.
    pub fn cache_host(&self) -> &str {
        self.cache_host.as_deref().unwrap_or(DEFAULT_CACHE_HOST)
    }

    /// Redis port.
    pub fn cache_port(&self) -> u16 {
        self.cache_port.unwrap_or(DEFAULT_CACHE_PORT)
    }

    /// Pool key prefix.
    pub fn pool_key_prefix(&self) -> &str {
        self.pool_key_prefix
            .as_deref()
            .unwrap_or(DEFAULT_POOL_KEY_PREFIX)
    }

    /// Notification timeout.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(
            self.request_timeout_secs
                .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS),
        )
    }

    /// Assemble `redis://[:password@]host:port`.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::InvalidCacheUrl`] when the host or password
    /// cannot be expressed in a URL.
    pub fn cache_url(&self) -> Result<Url, SettingsError> {
        let invalid = |message: String| SettingsError::InvalidCacheUrl { message };
        let mut url = Url::parse(&format!(
            "redis://{host}:{port}",
            host = self.cache_host(),
            port = self.cache_port()
        ))
        .map_err(|err| invalid(err.to_string()))?;
        if let Some(password) = self.cache_password.as_deref().filter(|pw| !pw.is_empty()) {
            url.set_password(Some(password))
                .map_err(|()| invalid("password cannot be set on this host".to_owned()))?;
        }
        Ok(url)
    }

    /// Validate every setting.
    ///
    /// # Errors
    ///
    /// Returns the first [`SettingsError`] found.
    pub fn resolve(&self) -> Result<MatcherConfig, SettingsError> {
        let database_url = self
            .database_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .ok_or(SettingsError::MissingDatabaseUrl)?
            .to_owned();

        let database_ssl_mode = self
            .database_ssl_mode
            .as_deref()
            .filter(|raw| !raw.trim().is_empty())
            .map(str::parse::<DatabaseSslMode>)
            .transpose()?;

        let match_url = self
            .match_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .map(|value| {
                Url::parse(value).map_err(|err| SettingsError::InvalidMatchUrl {
                    value: value.to_owned(),
                    message: err.to_string(),
                })
            })
            .transpose()?;

        let trio_anchor = match self.trio_anchor.as_deref() {
            Some(raw) => raw.parse::<TrioAnchor>()?,
            None => TrioAnchor::default(),
        };

        let raw_bind = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        let bind_addr =
            raw_bind
                .parse::<SocketAddr>()
                .map_err(|err| SettingsError::InvalidBindAddr {
                    value: raw_bind.to_owned(),
                    message: err.to_string(),
                })?;

        Ok(MatcherConfig {
            database_url,
            database_ssl_mode,
            cache_url: self.cache_url()?,
            pool_key_prefix: self.pool_key_prefix().to_owned(),
            match_url,
            request_timeout: self.request_timeout(),
            trio_anchor,
            bind_addr,
        })
    }
}

/// Validated settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatcherConfig {
    /// PostgreSQL connection URL.
    pub database_url: String,
    /// TLS override for database sessions; `None` defers to the URL.
    pub database_ssl_mode: Option<DatabaseSslMode>,
    /// Redis URL including any password.
    pub cache_url: Url,
    /// Prefix of the per-guild pool set key.
    pub pool_key_prefix: String,
    /// Webhook notified after each round, when configured.
    pub match_url: Option<Url>,
    /// Timeout for the notification request.
    pub request_timeout: Duration,
    /// Which pair absorbs an odd leftover candidate.
    pub trio_anchor: TrioAnchor,
    /// Listen address of the HTTP trigger.
    pub bind_addr: SocketAddr,
}
