//! Result classification for discovery.
//!
//! Every strategy execution terminates in exactly one
//! [`AutoDiscoveryResult`], and the orchestrator reduces the set of
//! strategy results to a single one of these without re-wrapping. The
//! taxonomy matters to the calling UI:
//!
//! - [`NoUsableSettingsFound`](AutoDiscoveryResult::NoUsableSettingsFound)
//!   is expected and non-exceptional ("this domain isn't configured"):
//!   fall through to manual entry.
//! - [`NetworkError`](AutoDiscoveryResult::NetworkError) is environmental
//!   and potentially transient: offer a retry.
//! - [`UnexpectedException`](AutoDiscoveryResult::UnexpectedException)
//!   indicates a client defect or a document violating assumptions:
//!   surface diagnostics. It must never be downgraded to "no settings".

use crate::error::Error;
use crate::settings::{IncomingServerSettings, OutgoingServerSettings};

/// How much the producing strategy's source can be trusted.
///
/// Settings from the application's own bundled directory are trusted;
/// settings from a third-party-hosted document are not, and the UI is
/// expected to warn before auto-filling credentials-adjacent fields from
/// them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Trust {
    /// Sourced from data the application ships and maintains.
    Trusted,
    /// Sourced from a remote, third-party-controlled document.
    Untrusted,
}

/// The outcome of a discovery call (or of a single strategy execution).
#[derive(Debug)]
pub enum AutoDiscoveryResult {
    /// Usable settings were found. Carries exactly one incoming and one
    /// outgoing descriptor; the producing strategy has already picked the
    /// single best candidate if its source offered several.
    Settings {
        /// Incoming (retrieval) server settings.
        incoming: IncomingServerSettings,
        /// Outgoing (submission) server settings.
        outgoing: OutgoingServerSettings,
        /// Trust level of the producing strategy's source.
        trust: Trust,
        /// Name of the strategy that produced the settings.
        source: &'static str,
    },

    /// The strategy (or the whole call) completed but had nothing
    /// applicable: unknown domain, or a document missing a required
    /// server block.
    NoUsableSettingsFound,

    /// An I/O-level failure (timeout, DNS failure, connection refused,
    /// non-2xx HTTP response), distinguishable from "domain has no
    /// config".
    NetworkError(Error),

    /// Any other failure: malformed XML beyond tolerance, malformed
    /// bundled data, a panicking strategy.
    UnexpectedException(Error),
}

impl AutoDiscoveryResult {
    /// Returns `true` if usable settings were found.
    #[must_use]
    pub fn is_settings(&self) -> bool {
        matches!(self, AutoDiscoveryResult::Settings { .. })
    }

    /// Returns the carried error cause, if any.
    #[must_use]
    pub fn error(&self) -> Option<&Error> {
        match self {
            AutoDiscoveryResult::NetworkError(e)
            | AutoDiscoveryResult::UnexpectedException(e) => Some(e),
            AutoDiscoveryResult::Settings { .. }
            | AutoDiscoveryResult::NoUsableSettingsFound => None,
        }
    }
}
