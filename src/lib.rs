//! # email-discover
//!
//! Async mail server settings discovery: turn an email address into ready-to-use
//! incoming (IMAP) and outgoing (SMTP) server settings.
//!
//! Discovery runs several independent strategies concurrently and commits to the
//! first one that finds usable settings:
//! - a **provider directory** lookup against a bundled, read-only list of known
//!   providers (no network), and
//! - a **remote autoconfig** fetch of the XML document the domain publishes at
//!   its well-known location.
//!
//! ## Features
//!
//! - **`observability`**: Enables OpenTelemetry integration for distributed tracing.
//!   Without this feature, tracing spans are still emitted but require no OTEL dependencies.
//!
//! ## Quick Start
//!
//! ```no_run
//! use email_discover::{AutoDiscoveryResult, AutoDiscoveryService, DiscoveryConfig};
//!
//! # async fn example() -> email_discover::Result<()> {
//! let service = AutoDiscoveryService::new(DiscoveryConfig::default())?;
//!
//! match service.discover_address("user@gmail.com").await? {
//!     AutoDiscoveryResult::Settings { incoming, outgoing, trust, source } => {
//!         println!("{source} ({trust:?}): {} / {}", incoming.hostname(), outgoing.hostname());
//!     }
//!     AutoDiscoveryResult::NoUsableSettingsFound => {
//!         println!("fall through to manual setup");
//!     }
//!     AutoDiscoveryResult::NetworkError(cause) => {
//!         println!("transient, offer retry: {cause}");
//!     }
//!     AutoDiscoveryResult::UnexpectedException(cause) => {
//!         println!("report a defect: {cause}");
//!     }
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Custom Directory Entries
//!
//! ```
//! use email_discover::{DiscoveryConfig, ProviderDirectory, ProviderEntry};
//!
//! let mut directory = ProviderDirectory::bundled();
//! directory.register(ProviderEntry {
//!     id: "corp".into(),
//!     label: "Corp Mail".into(),
//!     domain: "corp.example".into(),
//!     incoming_uri: "imap+ssl+://mail.corp.example".into(),
//!     incoming_username: "$email".into(),
//!     outgoing_uri: "smtp+tls+://mail.corp.example".into(),
//!     outgoing_username: Some("$email".into()),
//! });
//!
//! let config = DiscoveryConfig::builder()
//!     .directory(directory)
//!     .build()
//!     .expect("valid config");
//! ```
//!
//! ## Error Handling
//!
//! Strategies never let a failure escape unclassified: every execution ends in
//! exactly one [`AutoDiscoveryResult`] variant. The carried [`Error`] implements
//! `std::error::Error`; use [`Error::is_retryable`] to decide whether an
//! operation is worth repeating:
//!
//! ```
//! use email_discover::Error;
//!
//! fn handle_error(error: &Error) {
//!     if error.is_retryable() {
//!         println!("Transient error, can retry: {}", error);
//!     } else {
//!         println!("Permanent error: {}", error);
//!     }
//! }
//! ```
//!
//! ## Observability
//!
//! The crate uses `tracing` for instrumentation. All major operations emit spans
//! with structured fields suitable for distributed tracing.
//!
//! ### Span Naming Convention
//!
//! - `AutoDiscoveryService::discover` - A whole discovery run
//! - `DirectoryDiscovery::discover` - Bundled directory lookup
//! - `AutoconfigDiscovery::discover` - Remote document fetch and parse
//!
//! ### Standard Fields
//!
//! - `domain` - Email domain being looked up
//! - `url` - Remote document URL
//! - `provider` - Matched directory entry id
//!
//! Enable the `observability` feature for OpenTelemetry integration.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

// Public modules
pub mod autoconfig;
pub mod config;
pub mod directory;
pub mod error;
pub mod result;
pub mod settings;
pub mod strategy;
pub mod uri;

// Internal modules
mod decoder;
mod service;

// Re-exports for ergonomic API
pub use autoconfig::{autoconfig_url, AutoconfigDiscovery};
pub use config::{DiscoveryConfig, DiscoveryConfigBuilder, TimeoutConfig};
pub use decoder::{DefaultUriDecoder, UriDecoder};
pub use directory::{DirectoryDiscovery, ProviderDirectory, ProviderEntry};
pub use email_address::EmailAddress;
pub use error::{Error, ErrorCategory, Result};
pub use result::{AutoDiscoveryResult, Trust};
pub use service::AutoDiscoveryService;
pub use settings::{
    AuthenticationType, ConnectionSecurity, ImapServerSettings, IncomingServerSettings,
    OutgoingServerSettings, SmtpServerSettings,
};
pub use strategy::DiscoveryStrategy;
