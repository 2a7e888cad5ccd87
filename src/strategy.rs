//! The discovery strategy abstraction.
//!
//! A strategy is one independent method of producing candidate server
//! settings for an email address. Strategies run concurrently, have no
//! visibility into their siblings, and classify every failure into an
//! [`AutoDiscoveryResult`] before returning: a strategy never panics
//! past its boundary or hangs past its timeout.

use crate::result::{AutoDiscoveryResult, Trust};
use async_trait::async_trait;
use email_address::EmailAddress;

/// One independent way of discovering server settings for an address.
///
/// Implementations must be cheap to share (`Send + Sync`) because the
/// orchestrator runs one task per strategy.
#[async_trait]
pub trait DiscoveryStrategy: Send + Sync {
    /// Short stable name, used as the `source` tag on produced settings
    /// and in log output.
    fn name(&self) -> &'static str;

    /// Trust level of this strategy's data source.
    fn trust(&self) -> Trust;

    /// Runs discovery for the given (already validated) address.
    ///
    /// Always resolves to exactly one result variant; never panics for
    /// expected failure modes.
    async fn discover(&self, email: &EmailAddress) -> AutoDiscoveryResult;
}
