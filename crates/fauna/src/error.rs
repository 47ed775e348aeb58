//! Error types for Fauna client operations.
//!
//! Errors are categorized so callers can tell a flaky network from a bad
//! secret. The client itself never retries.

use std::fmt;

/// Result type alias for Fauna client operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Categories of client errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Connection, DNS, TLS, or timeout failure (transient).
    Network,
    /// Secret missing, invalid, or lacking permission.
    Auth,
    /// The service rejected the query.
    Service,
    /// Response could not be decoded.
    Format,
    /// Client configuration is incomplete or invalid.
    Config,
}

impl ErrorCategory {
    /// Whether a fresh attempt could plausibly succeed.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Network)
    }

    /// Get a user-friendly description of this error category.
    #[must_use]
    pub fn description(&self) -> &'static str {
        match self {
            Self::Network => "Network connectivity issue",
            Self::Auth => "Authentication failed",
            Self::Service => "Query rejected by the database",
            Self::Format => "Unexpected response format",
            Self::Config => "Invalid client configuration",
        }
    }

    /// Get actionable advice for resolving this error category.
    #[must_use]
    pub fn advice(&self) -> &'static str {
        match self {
            Self::Network => "Check the database domain and your connection, then start a new sync",
            Self::Auth => "Check FAUNA_SECRET and that the key has the admin role",
            Self::Service => "Check the declared attributes for the resource named in the error",
            Self::Format => "The database may be running an incompatible API version",
            Self::Config => "Set FAUNA_SECRET and FAUNA_DOMAIN or pass --secret/--domain",
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.description())
    }
}

/// Errors that can occur while talking to the database.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Configuration is missing a required value or holds an invalid one.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// HTTP request failed before a response was received.
    #[error("HTTP request failed: {0}")]
    Transport(String),

    /// The service answered with an error document.
    #[error("query failed (HTTP {status}): {code}: {description}")]
    Service {
        /// HTTP status code.
        status: u16,
        /// Error code reported by the service.
        code: String,
        /// Error description reported by the service.
        description: String,
    },

    /// Response body or document shape was not what the client expects.
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

impl Error {
    /// Get the error category.
    #[must_use]
    pub fn category(&self) -> ErrorCategory {
        match self {
            Error::Config(_) => ErrorCategory::Config,
            Error::Transport(_) => ErrorCategory::Network,
            Error::Service { status, code, .. } => {
                if *status == 401 || *status == 403 || code == "unauthorized" {
                    ErrorCategory::Auth
                } else if *status >= 500 {
                    ErrorCategory::Network
                } else {
                    ErrorCategory::Service
                }
            }
            Error::InvalidResponse(_) => ErrorCategory::Format,
        }
    }

    /// Whether this error is typically transient.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        self.category().is_retryable()
    }
}

impl From<ureq::Error> for Error {
    fn from(err: ureq::Error) -> Self {
        match err {
            ureq::Error::StatusCode(code) => Self::Service {
                status: code,
                code: "http_error".to_string(),
                description: format!("HTTP {code}"),
            },
            other => Self::Transport(other.to_string()),
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::InvalidResponse(err.to_string())
    }
}
