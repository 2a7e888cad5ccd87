//! Discovery orchestrator.
//!
//! [`AutoDiscoveryService`] fans an email address out to all registered
//! strategies concurrently and reduces their outcomes to a single
//! [`AutoDiscoveryResult`]:
//!
//! - the first `Settings` observed wins immediately and all other
//!   in-flight strategies are aborted;
//! - otherwise, after all strategies finish: the first
//!   `UnexpectedException` observed, else the first `NetworkError`
//!   observed, else `NoUsableSettingsFound`;
//! - one end-to-end deadline bounds the whole call, and strategies still
//!   running at the deadline are aborted and treated as non-responses.
//!
//! # Example
//!
//! ```no_run
//! use email_discover::{AutoDiscoveryService, DiscoveryConfig};
//!
//! # async fn example() -> Result<(), email_discover::Error> {
//! let service = AutoDiscoveryService::new(DiscoveryConfig::default())?;
//! let result = service.discover_address("user@gmail.com").await?;
//! if result.is_settings() {
//!     println!("found settings");
//! }
//! # Ok(())
//! # }
//! ```

use crate::autoconfig::AutoconfigDiscovery;
use crate::config::{validate_email, DiscoveryConfig};
use crate::decoder::DefaultUriDecoder;
use crate::directory::DirectoryDiscovery;
use crate::error::{Error, Result};
use crate::result::AutoDiscoveryResult;
use crate::strategy::DiscoveryStrategy;
use email_address::EmailAddress;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinSet;
use tracing::{debug, error, instrument, warn};

/// Concurrent, first-success-wins settings discovery over a set of
/// strategies.
pub struct AutoDiscoveryService {
    strategies: Vec<Arc<dyn DiscoveryStrategy>>,
    total_timeout: Duration,
}

impl std::fmt::Debug for AutoDiscoveryService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<&str> = self.strategies.iter().map(|s| s.name()).collect();
        f.debug_struct("AutoDiscoveryService")
            .field("strategies", &names)
            .field("total_timeout", &self.total_timeout)
            .finish()
    }
}

impl AutoDiscoveryService {
    /// Creates the service with the standard strategies: the bundled
    /// provider directory and remote autoconfig lookup.
    ///
    /// # Errors
    ///
    /// Returns an error if the remote strategy's HTTP client cannot be
    /// constructed.
    pub fn new(config: DiscoveryConfig) -> Result<Self> {
        let directory = DirectoryDiscovery::new(config.directory, Arc::new(DefaultUriDecoder));
        let autoconfig = AutoconfigDiscovery::new(config.timeouts.fetch)?;

        Ok(Self {
            strategies: vec![Arc::new(directory), Arc::new(autoconfig)],
            total_timeout: config.timeouts.total,
        })
    }

    /// Creates the service over an explicit set of strategies.
    #[must_use]
    pub fn from_strategies(
        strategies: Vec<Arc<dyn DiscoveryStrategy>>,
        total_timeout: Duration,
    ) -> Self {
        Self {
            strategies,
            total_timeout,
        }
    }

    /// Validates the address, then runs discovery.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidEmailFormat`] if the address does not
    /// parse; this is caller misuse, not a discovery outcome.
    pub async fn discover_address(&self, email: &str) -> Result<AutoDiscoveryResult> {
        let email = validate_email(email)?;
        Ok(self.discover(&email).await)
    }

    /// Runs all strategies concurrently and reduces their outcomes.
    ///
    /// Never returns an error and never panics past this boundary: every
    /// failure is classified into one of the result variants.
    #[instrument(
        name = "AutoDiscoveryService::discover",
        skip_all,
        fields(domain = %email.domain())
    )]
    pub async fn discover(&self, email: &EmailAddress) -> AutoDiscoveryResult {
        if self.strategies.is_empty() {
            return AutoDiscoveryResult::NoUsableSettingsFound;
        }

        let mut tasks = JoinSet::new();
        let mut names: HashMap<tokio::task::Id, &'static str> = HashMap::new();

        for strategy in &self.strategies {
            let strategy = Arc::clone(strategy);
            let email = email.clone();
            let name = strategy.name();
            let handle = tasks.spawn(async move { strategy.discover(&email).await });
            names.insert(handle.id(), name);
        }

        let deadline = tokio::time::Instant::now() + self.total_timeout;

        // First-observed result of each failure class; a later arrival of
        // the same class never displaces an earlier one.
        let mut first_network: Option<AutoDiscoveryResult> = None;
        let mut first_unexpected: Option<AutoDiscoveryResult> = None;

        while !tasks.is_empty() {
            let joined = match tokio::time::timeout_at(deadline, tasks.join_next()).await {
                Ok(Some(joined)) => joined,
                Ok(None) => break,
                Err(_elapsed) => {
                    warn!(
                        still_running = tasks.len(),
                        timeout = ?self.total_timeout,
                        "discovery deadline reached, aborting remaining strategies"
                    );
                    break;
                }
            };

            let result = match joined {
                Ok(result) => result,
                Err(join_error) if join_error.is_cancelled() => continue,
                Err(join_error) => {
                    let strategy = names.get(&join_error.id()).copied().unwrap_or("unknown");
                    error!(strategy, "discovery strategy panicked");
                    AutoDiscoveryResult::UnexpectedException(Error::StrategyPanic { strategy })
                }
            };

            match result {
                settings @ AutoDiscoveryResult::Settings { .. } => {
                    // Single-assignment commit: the first Settings seen
                    // here wins; everything still in flight is moot.
                    tasks.abort_all();
                    return settings;
                }
                network @ AutoDiscoveryResult::NetworkError(_) => {
                    if first_network.is_none() {
                        first_network = Some(network);
                    }
                }
                unexpected @ AutoDiscoveryResult::UnexpectedException(_) => {
                    if first_unexpected.is_none() {
                        first_unexpected = Some(unexpected);
                    }
                }
                AutoDiscoveryResult::NoUsableSettingsFound => {
                    debug!("strategy found no usable settings");
                }
            }
        }

        tasks.abort_all();

        first_unexpected
            .or(first_network)
            .unwrap_or(AutoDiscoveryResult::NoUsableSettingsFound)
    }
}
