//! Provider directory discovery from a bundled, read-only directory.
//!
//! This strategy answers purely from data the application ships, with
//! no network access. A directory maps email domains to URI templates; on a match
//! the templates are instantiated with the percent-encoded parts of the
//! address and decoded into server settings.
//!
//! # Example
//!
//! ```
//! use email_discover::directory::ProviderDirectory;
//!
//! let directory = ProviderDirectory::bundled();
//! assert!(directory.find("gmail.com").is_some());
//! assert!(directory.find("GMAIL.COM").is_some()); // case-insensitive
//! assert!(directory.find("unknown.example").is_none());
//! ```

use crate::decoder::{self, DefaultUriDecoder, UriDecoder};
use crate::error::Error;
use crate::result::{AutoDiscoveryResult, Trust};
use crate::settings::{IncomingServerSettings, OutgoingServerSettings};
use crate::strategy::DiscoveryStrategy;
use crate::uri::{build_connection_uri, encode_component};
use async_trait::async_trait;
use email_address::EmailAddress;
use once_cell::sync::Lazy;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::sync::Arc;
use tracing::{debug, instrument, warn};
use url::Url;

/// The provider directory shipped with the crate.
static BUNDLED_XML: &str = include_str!("providers.xml");

/// Parsed once, shared read-only by all concurrent strategy instances.
/// A malformed bundled resource must never crash discovery, so parse
/// failures degrade to an empty directory.
static BUNDLED_ENTRIES: Lazy<Vec<ProviderEntry>> = Lazy::new(|| {
    match parse_providers_xml(BUNDLED_XML) {
        Ok(entries) => entries,
        Err(error) => {
            warn!(error = %error, "failed to parse bundled provider directory");
            Vec::new()
        }
    }
});

/// One known provider: a domain plus URI/username templates.
///
/// Templates may contain the placeholders `$email`, `$user` (the local
/// part) and `$domain`, which are substituted with percent-encoded
/// values at instantiation time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderEntry {
    /// Stable identifier of the provider.
    pub id: String,
    /// Human-readable provider name, shown by the UI.
    pub label: String,
    /// The email domain this entry serves.
    pub domain: String,
    /// Incoming connection URI template (scheme, host, optional port).
    pub incoming_uri: String,
    /// Incoming username template.
    pub incoming_username: String,
    /// Outgoing connection URI template.
    pub outgoing_uri: String,
    /// Outgoing username template. `None` means the outgoing server has
    /// no fixed username.
    pub outgoing_username: Option<String>,
}

/// An ordered collection of [`ProviderEntry`] values.
///
/// Lookups are a first-match-wins linear scan over the insertion order,
/// matching domains case-insensitively. The directory is expected to
/// hold at most one entry per domain; if duplicates sneak in, the first
/// one deterministically wins.
#[derive(Debug, Clone, Default)]
pub struct ProviderDirectory {
    entries: Vec<ProviderEntry>,
}

impl ProviderDirectory {
    /// Creates an empty directory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a directory holding the bundled provider entries.
    #[must_use]
    pub fn bundled() -> Self {
        Self {
            entries: BUNDLED_ENTRIES.clone(),
        }
    }

    /// Appends a custom entry. Entries registered earlier take precedence
    /// on domain collisions.
    pub fn register(&mut self, entry: ProviderEntry) {
        self.entries.push(entry);
    }

    /// Finds the first entry whose domain matches, case-insensitively.
    #[must_use]
    pub fn find(&self, domain: &str) -> Option<&ProviderEntry> {
        self.entries
            .iter()
            .find(|entry| entry.domain.eq_ignore_ascii_case(domain))
    }

    /// Returns the number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the directory has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Discovery strategy backed by a [`ProviderDirectory`].
pub struct DirectoryDiscovery {
    directory: ProviderDirectory,
    decoder: Arc<dyn UriDecoder>,
}

impl DirectoryDiscovery {
    /// Creates the strategy over the bundled directory with the built-in
    /// decoder.
    #[must_use]
    pub fn bundled() -> Self {
        Self::new(ProviderDirectory::bundled(), Arc::new(DefaultUriDecoder))
    }

    /// Creates the strategy over a custom directory and decoder.
    #[must_use]
    pub fn new(directory: ProviderDirectory, decoder: Arc<dyn UriDecoder>) -> Self {
        Self { directory, decoder }
    }

    /// Instantiates one entry for an address.
    ///
    /// `Ok(None)` means the entry is genuinely unusable (a URI-syntax
    /// failure while substituting); `Err` means the directory data itself
    /// is malformed and must surface as an unexpected failure.
    fn instantiate(
        &self,
        entry: &ProviderEntry,
        email: &EmailAddress,
    ) -> Result<Option<(IncomingServerSettings, OutgoingServerSettings)>, Error> {
        let incoming_user_info = expand_template(&entry.incoming_username, email);
        let Some(incoming_uri) =
            assemble_from_template(&entry.incoming_uri, &incoming_user_info)?
        else {
            return Ok(None);
        };

        let outgoing_user_info = entry
            .outgoing_username
            .as_deref()
            .map(|template| expand_template(template, email))
            .unwrap_or_default();
        let Some(outgoing_uri) =
            assemble_from_template(&entry.outgoing_uri, &outgoing_user_info)?
        else {
            return Ok(None);
        };

        let incoming = match self.decoder.decode_incoming(&incoming_uri) {
            Ok(settings) => settings,
            Err(Error::InvalidConnectionUri { uri, .. }) => {
                debug!(uri, "directory entry produced an unparsable incoming URI");
                return Ok(None);
            }
            Err(other) => return Err(other),
        };
        let outgoing = match self.decoder.decode_outgoing(&outgoing_uri) {
            Ok(settings) => settings,
            Err(Error::InvalidConnectionUri { uri, .. }) => {
                debug!(uri, "directory entry produced an unparsable outgoing URI");
                return Ok(None);
            }
            Err(other) => return Err(other),
        };

        Ok(Some((incoming, outgoing)))
    }
}

#[async_trait]
impl DiscoveryStrategy for DirectoryDiscovery {
    fn name(&self) -> &'static str {
        "directory"
    }

    fn trust(&self) -> Trust {
        Trust::Trusted
    }

    #[instrument(name = "DirectoryDiscovery::discover", skip_all, fields(domain = %email.domain()))]
    async fn discover(&self, email: &EmailAddress) -> AutoDiscoveryResult {
        let local_part = email.local_part();
        let domain = email.domain();
        if local_part.is_empty() || domain.is_empty() {
            return AutoDiscoveryResult::NoUsableSettingsFound;
        }

        let Some(entry) = self.directory.find(domain) else {
            debug!("domain not in provider directory");
            return AutoDiscoveryResult::NoUsableSettingsFound;
        };

        debug!(provider = %entry.id, "matched provider directory entry");

        match self.instantiate(entry, email) {
            Ok(Some((incoming, outgoing))) => AutoDiscoveryResult::Settings {
                incoming,
                outgoing,
                trust: self.trust(),
                source: self.name(),
            },
            Ok(None) => AutoDiscoveryResult::NoUsableSettingsFound,
            Err(error) => AutoDiscoveryResult::UnexpectedException(error),
        }
    }
}

impl std::fmt::Debug for DirectoryDiscovery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DirectoryDiscovery")
            .field("entries", &self.directory.len())
            .finish_non_exhaustive()
    }
}

/// Substitutes `$email`, `$user` and `$domain` with percent-encoded
/// values. Encoding happens before substitution so structural characters
/// in the address cannot reshape the URI, and encoded values are never
/// re-encoded.
fn expand_template(template: &str, email: &EmailAddress) -> String {
    template
        .replace("$email", &encode_component(email.as_str()))
        .replace("$user", &encode_component(email.local_part()))
        .replace("$domain", &encode_component(email.domain()))
}

/// Combines a URI template with an expanded user-info segment.
///
/// `Ok(None)` on URI-syntax failures (the narrow class the local
/// strategy tolerates); `Err` when the template uses a scheme with no
/// known default port, which indicates malformed bundled data.
fn assemble_from_template(uri_template: &str, user_info: &str) -> Result<Option<String>, Error> {
    let template = match Url::parse(uri_template) {
        Ok(url) => url,
        Err(error) => {
            debug!(template = uri_template, error = %error, "unparsable URI template");
            return Ok(None);
        }
    };

    let scheme = template.scheme();
    let Some(host) = template.host_str() else {
        debug!(template = uri_template, "URI template without host");
        return Ok(None);
    };
    let port = match template.port().or_else(|| decoder::default_port(scheme)) {
        Some(port) => port,
        None => {
            return Err(Error::UnsupportedConnectionUri {
                scheme: scheme.to_string(),
                message: "template has no port and the scheme has no default".into(),
            })
        }
    };

    match build_connection_uri(scheme, user_info, host, port) {
        Ok(uri) => Ok(Some(uri)),
        Err(Error::InvalidConnectionUri { uri, .. }) => {
            debug!(uri, "substituted connection string failed parse-back");
            Ok(None)
        }
        Err(other) => Err(other),
    }
}

/// Parses a providers XML document into entries.
///
/// Entries missing a required attribute or server block are skipped with
/// a warning; a document that is not well-formed XML fails as a whole.
fn parse_providers_xml(xml: &str) -> Result<Vec<ProviderEntry>, quick_xml::Error> {
    #[derive(Default)]
    struct PartialEntry {
        id: Option<String>,
        label: Option<String>,
        domain: Option<String>,
        incoming_uri: Option<String>,
        incoming_username: Option<String>,
        outgoing_uri: Option<String>,
        outgoing_username: Option<String>,
    }

    impl PartialEntry {
        fn finish(self) -> Option<ProviderEntry> {
            Some(ProviderEntry {
                id: self.id?,
                label: self.label?,
                domain: self.domain?,
                incoming_uri: self.incoming_uri?,
                incoming_username: self.incoming_username?,
                outgoing_uri: self.outgoing_uri?,
                outgoing_username: self.outgoing_username,
            })
        }
    }

    fn attribute(
        element: &BytesStart<'_>,
        name: &str,
    ) -> Result<Option<String>, quick_xml::Error> {
        Ok(element
            .try_get_attribute(name)?
            .map(|attr| attr.unescape_value().map(|value| value.into_owned()))
            .transpose()?)
    }

    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);

    let mut entries = Vec::new();
    let mut current: Option<PartialEntry> = None;

    loop {
        match reader.read_event()? {
            Event::Start(element) | Event::Empty(element) => match element.name().as_ref() {
                b"provider" => {
                    current = Some(PartialEntry {
                        id: attribute(&element, "id")?,
                        label: attribute(&element, "label")?,
                        domain: attribute(&element, "domain")?,
                        ..PartialEntry::default()
                    });
                }
                b"incoming" => {
                    if let Some(partial) = current.as_mut() {
                        partial.incoming_uri = attribute(&element, "uri")?;
                        partial.incoming_username = attribute(&element, "username")?;
                    }
                }
                b"outgoing" => {
                    if let Some(partial) = current.as_mut() {
                        partial.outgoing_uri = attribute(&element, "uri")?;
                        partial.outgoing_username = attribute(&element, "username")?;
                    }
                }
                _ => {}
            },
            Event::End(element) if element.name().as_ref() == b"provider" => {
                if let Some(partial) = current.take() {
                    match partial.finish() {
                        Some(entry) => entries.push(entry),
                        None => warn!("skipping incomplete provider directory entry"),
                    }
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(entries)
}
