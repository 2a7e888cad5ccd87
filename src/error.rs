//! Error types for the email-discover crate.
//!
//! Discovery strategies classify every failure before it crosses their
//! boundary: errors never escape a strategy unclassified. The values here
//! are the *causes* carried inside the [`NetworkError`] and
//! [`UnexpectedException`] variants of
//! [`AutoDiscoveryResult`](crate::AutoDiscoveryResult), plus the
//! configuration errors returned while building a
//! [`DiscoveryConfig`](crate::DiscoveryConfig).
//!
//! [`NetworkError`]: crate::AutoDiscoveryResult::NetworkError
//! [`UnexpectedException`]: crate::AutoDiscoveryResult::UnexpectedException

use std::time::Duration;
use thiserror::Error;

/// Result type alias using [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during settings discovery.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    // ─────────────────────────────────────────────────────────────────────────
    // Configuration / validation errors (NOT retryable)
    // ─────────────────────────────────────────────────────────────────────────
    /// Invalid email address format.
    #[error("invalid email format: {email}")]
    InvalidEmailFormat {
        /// The invalid email address.
        email: String,
    },

    /// Invalid configuration provided.
    #[error("invalid configuration: {message}")]
    InvalidConfig {
        /// Description of the configuration error.
        message: String,
    },

    // ─────────────────────────────────────────────────────────────────────────
    // Network errors (RETRYABLE), carried in `AutoDiscoveryResult::NetworkError`
    // ─────────────────────────────────────────────────────────────────────────
    /// The HTTP request for an autoconfig document failed at the I/O level
    /// (DNS failure, connection refused, TLS failure).
    #[error("failed to fetch autoconfig document from {url}")]
    HttpRequest {
        /// The URL that was being fetched.
        url: String,
        /// The underlying HTTP client error.
        #[source]
        source: reqwest::Error,
    },

    /// The server answered with a non-success HTTP status.
    #[error("autoconfig lookup at {url} returned HTTP {status}")]
    HttpStatus {
        /// The URL that was fetched.
        url: String,
        /// The HTTP status code.
        status: u16,
    },

    /// The fetch did not complete within the per-strategy timeout.
    #[error("autoconfig fetch from {url} timed out after {timeout:?}")]
    FetchTimeout {
        /// The URL that was being fetched.
        url: String,
        /// The timeout duration that was exceeded.
        timeout: Duration,
    },

    // ─────────────────────────────────────────────────────────────────────────
    // Unexpected errors (NOT retryable), carried in
    // `AutoDiscoveryResult::UnexpectedException`
    // ─────────────────────────────────────────────────────────────────────────
    /// The autoconfig document is not well-formed XML.
    #[error("malformed autoconfig XML")]
    MalformedXml {
        /// The underlying XML error.
        #[source]
        source: quick_xml::Error,
    },

    /// An assembled connection string did not parse back into a
    /// well-formed URI. Indicates a defect in a template or in the codec
    /// input, not an environmental problem.
    #[error("assembled connection string is not a valid URI: {uri}")]
    InvalidConnectionUri {
        /// The offending connection string.
        uri: String,
        /// The underlying URL parse error.
        #[source]
        source: url::ParseError,
    },

    /// A bundled directory entry produced a connection string that the
    /// protocol decoder cannot handle. Indicates malformed bundled data.
    #[error("cannot decode connection string with scheme '{scheme}': {message}")]
    UnsupportedConnectionUri {
        /// The scheme of the undecodable connection string.
        scheme: String,
        /// Description of what was wrong.
        message: String,
    },

    /// A strategy task panicked. Strategies are required to classify all
    /// failures, so this always indicates a defect.
    #[error("discovery strategy '{strategy}' panicked")]
    StrategyPanic {
        /// Name of the offending strategy.
        strategy: &'static str,
    },
}

impl Error {
    /// Returns `true` if this error represents a transient failure that might succeed on retry.
    ///
    /// Callers are expected to offer a retry for retryable failures and
    /// to surface diagnostics for the rest.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::HttpRequest { .. } | Error::HttpStatus { .. } | Error::FetchTimeout { .. } => {
                true
            }

            Error::InvalidEmailFormat { .. }
            | Error::InvalidConfig { .. }
            | Error::MalformedXml { .. }
            | Error::InvalidConnectionUri { .. }
            | Error::UnsupportedConnectionUri { .. }
            | Error::StrategyPanic { .. } => false,
        }
    }

    /// Returns the error category for metrics/logging purposes.
    #[must_use]
    pub fn category(&self) -> ErrorCategory {
        match self {
            Error::InvalidEmailFormat { .. } | Error::InvalidConfig { .. } => {
                ErrorCategory::Configuration
            }

            Error::HttpRequest { .. } | Error::HttpStatus { .. } => ErrorCategory::Network,

            Error::FetchTimeout { .. } => ErrorCategory::Timeout,

            Error::MalformedXml { .. } => ErrorCategory::Parse,

            Error::InvalidConnectionUri { .. }
            | Error::UnsupportedConnectionUri { .. }
            | Error::StrategyPanic { .. } => ErrorCategory::Defect,
        }
    }
}

/// Error categories for metrics and logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Configuration or validation errors.
    Configuration,
    /// Network connectivity errors.
    Network,
    /// Timeout errors.
    Timeout,
    /// Document parsing errors.
    Parse,
    /// Client-side defects (bad bundled data, panics).
    Defect,
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorCategory::Configuration => write!(f, "configuration"),
            ErrorCategory::Network => write!(f, "network"),
            ErrorCategory::Timeout => write!(f, "timeout"),
            ErrorCategory::Parse => write!(f, "parse"),
            ErrorCategory::Defect => write!(f, "defect"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_classification() {
        // Configuration errors are not retryable
        let err = Error::InvalidEmailFormat {
            email: "bad".into(),
        };
        assert!(!err.is_retryable());

        // HTTP status errors are retryable (server may recover)
        let err = Error::HttpStatus {
            url: "https://example.com/config".into(),
            status: 503,
        };
        assert!(err.is_retryable());

        // Fetch timeouts are retryable
        let err = Error::FetchTimeout {
            url: "https://example.com/config".into(),
            timeout: Duration::from_secs(10),
        };
        assert!(err.is_retryable());

        // Defects are not retryable
        let err = Error::StrategyPanic {
            strategy: "autoconfig",
        };
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_error_categories() {
        let err = Error::InvalidConfig {
            message: "bad".into(),
        };
        assert_eq!(err.category(), ErrorCategory::Configuration);

        let err = Error::HttpStatus {
            url: "https://example.com/config".into(),
            status: 404,
        };
        assert_eq!(err.category(), ErrorCategory::Network);

        let err = Error::UnsupportedConnectionUri {
            scheme: "gopher".into(),
            message: "unknown mail protocol".into(),
        };
        assert_eq!(err.category(), ErrorCategory::Defect);
    }
}
