//! Configuration for settings discovery.
//!
//! Use [`DiscoveryConfigBuilder`] to create a configuration with sensible
//! defaults:
//!
//! ```
//! use email_discover::DiscoveryConfig;
//!
//! let config = DiscoveryConfig::builder()
//!     .build()
//!     .expect("valid config");
//! ```

use crate::directory::ProviderDirectory;
use crate::error::{Error, Result};
use email_address::EmailAddress;
use std::time::Duration;

/// Configuration for the discovery service.
///
/// Create using [`DiscoveryConfig::builder()`].
#[derive(Debug, Clone)]
pub struct DiscoveryConfig {
    /// Timeout configuration.
    pub timeouts: TimeoutConfig,
    /// Provider directory consulted by the local strategy.
    pub directory: ProviderDirectory,
}

/// Timeout configuration for discovery operations.
#[derive(Debug, Clone)]
pub struct TimeoutConfig {
    /// Upper bound on a whole discovery run across all strategies.
    pub total: Duration,
    /// Timeout for a single remote document fetch.
    pub fetch: Duration,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            total: Duration::from_secs(20),
            fetch: Duration::from_secs(10),
        }
    }
}

impl DiscoveryConfig {
    /// Creates a new configuration builder.
    ///
    /// # Example
    ///
    /// ```
    /// use email_discover::DiscoveryConfig;
    /// use std::time::Duration;
    ///
    /// let config = DiscoveryConfig::builder()
    ///     .total_timeout(Duration::from_secs(30))
    ///     .build()
    ///     .expect("valid config");
    /// ```
    #[must_use]
    pub fn builder() -> DiscoveryConfigBuilder {
        DiscoveryConfigBuilder::default()
    }
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            timeouts: TimeoutConfig::default(),
            directory: ProviderDirectory::bundled(),
        }
    }
}

/// Validates an email address format.
///
/// Returns the validated `EmailAddress` if valid, or an error if invalid.
pub(crate) fn validate_email(email: &str) -> Result<EmailAddress> {
    EmailAddress::parse_with_options(email, email_address::Options::default()).map_err(|_| {
        Error::InvalidEmailFormat {
            email: email.to_string(),
        }
    })
}

/// Builder for [`DiscoveryConfig`].
#[derive(Debug, Default)]
pub struct DiscoveryConfigBuilder {
    timeouts: Option<TimeoutConfig>,
    directory: Option<ProviderDirectory>,
}

impl DiscoveryConfigBuilder {
    /// Sets timeout configuration.
    #[must_use]
    pub fn timeouts(mut self, timeouts: TimeoutConfig) -> Self {
        self.timeouts = Some(timeouts);
        self
    }

    /// Sets the upper bound on a whole discovery run.
    ///
    /// Default is 20 seconds.
    #[must_use]
    pub fn total_timeout(mut self, timeout: Duration) -> Self {
        self.timeouts
            .get_or_insert_with(TimeoutConfig::default)
            .total = timeout;
        self
    }

    /// Sets the timeout for a single remote document fetch.
    ///
    /// Default is 10 seconds. Must not exceed the total timeout.
    #[must_use]
    pub fn fetch_timeout(mut self, timeout: Duration) -> Self {
        self.timeouts
            .get_or_insert_with(TimeoutConfig::default)
            .fetch = timeout;
        self
    }

    /// Sets a custom provider directory for the local strategy.
    ///
    /// If not set, the bundled directory is used.
    ///
    /// # Example
    ///
    /// ```
    /// use email_discover::{DiscoveryConfig, ProviderDirectory, ProviderEntry};
    ///
    /// let mut directory = ProviderDirectory::bundled();
    /// directory.register(ProviderEntry {
    ///     id: "corp".into(),
    ///     label: "Corp Mail".into(),
    ///     domain: "corp.example".into(),
    ///     incoming_uri: "imap+ssl+://mail.corp.example".into(),
    ///     incoming_username: "$email".into(),
    ///     outgoing_uri: "smtp+tls+://mail.corp.example".into(),
    ///     outgoing_username: Some("$email".into()),
    /// });
    ///
    /// let config = DiscoveryConfig::builder()
    ///     .directory(directory)
    ///     .build()
    ///     .expect("valid config");
    /// ```
    #[must_use]
    pub fn directory(mut self, directory: ProviderDirectory) -> Self {
        self.directory = Some(directory);
        self
    }

    /// Builds the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the timeouts are inconsistent.
    pub fn build(self) -> Result<DiscoveryConfig> {
        let timeouts = self.timeouts.unwrap_or_default();

        if timeouts.total.is_zero() {
            return Err(Error::InvalidConfig {
                message: "total timeout must be non-zero".into(),
            });
        }
        if timeouts.fetch > timeouts.total {
            return Err(Error::InvalidConfig {
                message: "fetch timeout must not exceed total timeout".into(),
            });
        }

        Ok(DiscoveryConfig {
            timeouts,
            directory: self.directory.unwrap_or_else(ProviderDirectory::bundled),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults() {
        let config = DiscoveryConfig::builder().build().unwrap();

        assert_eq!(config.timeouts.total, Duration::from_secs(20));
        assert_eq!(config.timeouts.fetch, Duration::from_secs(10));
        assert!(!config.directory.is_empty());
    }

    #[test]
    fn test_builder_custom_timeouts() {
        let config = DiscoveryConfig::builder()
            .total_timeout(Duration::from_secs(60))
            .fetch_timeout(Duration::from_secs(15))
            .build()
            .unwrap();

        assert_eq!(config.timeouts.total, Duration::from_secs(60));
        assert_eq!(config.timeouts.fetch, Duration::from_secs(15));
    }

    #[test]
    fn test_builder_rejects_zero_total_timeout() {
        let result = DiscoveryConfig::builder()
            .total_timeout(Duration::ZERO)
            .build();
        assert!(matches!(result, Err(Error::InvalidConfig { .. })));
    }

    #[test]
    fn test_builder_rejects_fetch_longer_than_total() {
        let result = DiscoveryConfig::builder()
            .total_timeout(Duration::from_secs(5))
            .fetch_timeout(Duration::from_secs(10))
            .build();
        assert!(matches!(result, Err(Error::InvalidConfig { .. })));
    }

    #[test]
    fn test_validate_email() {
        assert!(validate_email("user@example.com").is_ok());
        assert!(validate_email("not-an-email").is_err());
        assert!(validate_email("").is_err());
    }
}
