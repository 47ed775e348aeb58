//! Client configuration.
//!
//! All connection settings live in one [`ClientConfig`] value, built once and
//! handed to the client. Defaults match the hosted service.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// Environment variable holding the database secret.
pub const ENV_SECRET: &str = "FAUNA_SECRET";
/// Environment variable holding the database domain.
pub const ENV_DOMAIN: &str = "FAUNA_DOMAIN";
/// Environment variable overriding the port.
pub const ENV_PORT: &str = "FAUNA_PORT";
/// Environment variable overriding the scheme.
pub const ENV_SCHEME: &str = "FAUNA_SCHEME";
/// Environment variable overriding the timeout, in seconds.
pub const ENV_TIMEOUT: &str = "FAUNA_TIMEOUT";

/// Default HTTPS port.
pub const DEFAULT_PORT: u16 = 443;
/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);
/// Largest page the service will return in one request.
pub const MAX_PAGE_SIZE: u32 = 100_000;

/// URL scheme used to reach the database.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scheme {
    /// Plain HTTP, for local development containers.
    Http,
    /// HTTPS.
    #[default]
    Https,
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Http => write!(f, "http"),
            Self::Https => write!(f, "https"),
        }
    }
}

impl FromStr for Scheme {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "http" => Ok(Self::Http),
            "https" => Ok(Self::Https),
            other => Err(Error::Config(format!("unsupported scheme: {other}"))),
        }
    }
}

/// Connection settings for one database.
#[derive(Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Database secret, sent as a bearer token.
    pub secret: String,
    /// Database domain, e.g. `db.fauna.com`.
    pub domain: String,
    /// TCP port.
    pub port: u16,
    /// URL scheme.
    pub scheme: Scheme,
    /// Reuse connections between requests.
    pub keep_alive: bool,
    /// Overall timeout for one request.
    #[serde(with = "duration_secs")]
    pub timeout: Duration,
    /// Page size requested for each schema listing.
    pub page_size: u32,
}

impl ClientConfig {
    /// Create a configuration with default port, scheme, and timeout.
    pub fn new(secret: impl Into<String>, domain: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            domain: domain.into(),
            port: DEFAULT_PORT,
            scheme: Scheme::Https,
            keep_alive: false,
            timeout: DEFAULT_TIMEOUT,
            page_size: MAX_PAGE_SIZE,
        }
    }

    /// Read the configuration from `FAUNA_*` environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a configuration from any key lookup (environment, tests).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let secret = lookup(ENV_SECRET).unwrap_or_default();
        let domain = lookup(ENV_DOMAIN).unwrap_or_default();
        let mut config = Self::new(secret, domain);

        if let Some(port) = lookup(ENV_PORT) {
            config.port = port
                .parse()
                .map_err(|_| Error::Config(format!("{ENV_PORT} is not a port: {port}")))?;
        }
        if let Some(scheme) = lookup(ENV_SCHEME) {
            config.scheme = scheme.parse()?;
        }
        if let Some(timeout) = lookup(ENV_TIMEOUT) {
            let secs: u64 = timeout
                .parse()
                .map_err(|_| Error::Config(format!("{ENV_TIMEOUT} is not seconds: {timeout}")))?;
            config.timeout = Duration::from_secs(secs);
        }

        config.validate()?;
        Ok(config)
    }

    /// Set the port.
    #[must_use]
    pub fn port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Set the scheme.
    #[must_use]
    pub fn scheme(mut self, scheme: Scheme) -> Self {
        self.scheme = scheme;
        self
    }

    /// Set the request timeout.
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Enable or disable connection reuse.
    #[must_use]
    pub fn keep_alive(mut self, keep_alive: bool) -> Self {
        self.keep_alive = keep_alive;
        self
    }

    /// Set the listing page size, capped at the service maximum.
    #[must_use]
    pub fn page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size.clamp(1, MAX_PAGE_SIZE);
        self
    }

    /// Check that the credential and address are present.
    pub fn validate(&self) -> Result<()> {
        if self.secret.trim().is_empty() {
            return Err(Error::Config(format!("secret key not set ({ENV_SECRET})")));
        }
        if self.domain.trim().is_empty() {
            return Err(Error::Config(format!("database domain not set ({ENV_DOMAIN})")));
        }
        if self.domain.contains("://") || self.domain.contains('/') {
            return Err(Error::Config(format!(
                "domain must be a host name, got {}",
                self.domain
            )));
        }
        Ok(())
    }

    /// Endpoint that accepts queries.
    pub fn endpoint(&self) -> String {
        format!("{}://{}:{}/", self.scheme, self.domain, self.port)
    }

    /// Copy of this configuration with the secret masked, for display.
    #[must_use]
    pub fn redacted(&self) -> Self {
        Self {
            secret: mask(&self.secret),
            ..self.clone()
        }
    }
}

// Never print the secret through Debug.
impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("secret", &mask(&self.secret))
            .field("domain", &self.domain)
            .field("port", &self.port)
            .field("scheme", &self.scheme)
            .field("keep_alive", &self.keep_alive)
            .field("timeout", &self.timeout)
            .field("page_size", &self.page_size)
            .finish()
    }
}

fn mask(secret: &str) -> String {
    let visible: String = secret.chars().take(4).collect();
    if secret.chars().count() <= 4 {
        "****".to_string()
    } else {
        format!("{visible}****")
    }
}

mod duration_secs {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u64(d.as_secs())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        Ok(Duration::from_secs(u64::deserialize(d)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ClientConfig::new("fnSECRET", "db.fauna.com");
        assert_eq!(config.port, 443);
        assert_eq!(config.scheme, Scheme::Https);
        assert!(!config.keep_alive);
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.endpoint(), "https://db.fauna.com:443/");
    }

    #[test]
    fn test_builder_setters() {
        let config = ClientConfig::new("s", "localhost")
            .scheme(Scheme::Http)
            .port(8443)
            .keep_alive(true)
            .page_size(0);
        assert_eq!(config.endpoint(), "http://localhost:8443/");
        assert!(config.keep_alive);
        assert_eq!(config.page_size, 1);
    }

    #[test]
    fn test_from_lookup() {
        let config = ClientConfig::from_lookup(lookup(&[
            (ENV_SECRET, "fnSECRET"),
            (ENV_DOMAIN, "db.us.fauna.com"),
            (ENV_TIMEOUT, "30"),
        ]))
        .unwrap();
        assert_eq!(config.domain, "db.us.fauna.com");
        assert_eq!(config.timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_missing_secret_is_config_error() {
        let err = ClientConfig::from_lookup(lookup(&[(ENV_DOMAIN, "db.fauna.com")])).unwrap_err();
        assert!(matches!(err, Error::Config(ref m) if m.contains(ENV_SECRET)));
    }

    #[test]
    fn test_missing_domain_is_config_error() {
        let err = ClientConfig::from_lookup(lookup(&[(ENV_SECRET, "s")])).unwrap_err();
        assert!(matches!(err, Error::Config(ref m) if m.contains(ENV_DOMAIN)));
    }

    #[test]
    fn test_bad_port() {
        let err = ClientConfig::from_lookup(lookup(&[
            (ENV_SECRET, "s"),
            (ENV_DOMAIN, "d"),
            (ENV_PORT, "https"),
        ]))
        .unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_domain_with_scheme_rejected() {
        let config = ClientConfig::new("s", "https://db.fauna.com");
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_secret_never_in_debug() {
        let config = ClientConfig::new("fnAEsecretvalue", "db.fauna.com");
        let debug = format!("{config:?}");
        assert!(!debug.contains("secretvalue"));
        assert_eq!(config.redacted().secret, "fnAE****");
    }
}
