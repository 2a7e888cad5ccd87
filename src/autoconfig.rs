//! Remote autoconfig discovery.
//!
//! Fetches a provider-hosted XML configuration document from the
//! domain's well-known location and parses it into server settings. The
//! document is third-party-controlled, so parsing is tolerant but
//! bounded: truncation fails soft (no usable settings), while XML that
//! is ill-formed beyond tolerance is reported as an unexpected failure
//! rather than silently treated as "domain not configured".
//!
//! The wire format is a `clientConfig` root holding one-or-more
//! `emailProvider` blocks, each with an `incomingServer type="imap"`
//! block and one-or-more `outgoingServer type="smtp"` blocks; outgoing
//! blocks carry an `addThisServer` boolean and the first flagged one is
//! selected.

use crate::error::Error;
use crate::result::{AutoDiscoveryResult, Trust};
use crate::settings::{
    AuthenticationType, ConnectionSecurity, ImapServerSettings, IncomingServerSettings,
    OutgoingServerSettings, SmtpServerSettings,
};
use crate::strategy::DiscoveryStrategy;
use async_trait::async_trait;
use email_address::EmailAddress;
use quick_xml::events::Event;
use quick_xml::Reader;
use std::time::Duration;
use tracing::{debug, instrument};

/// Derives the well-known autoconfig lookup URL for an address.
///
/// This is a pure function with no network access. The shape is a wire
/// contract and must match exactly for interoperability with
/// third-party-hosted documents.
///
/// # Example
///
/// ```
/// use email_discover::autoconfig::autoconfig_url;
/// use email_discover::EmailAddress;
/// use std::str::FromStr;
///
/// let email = EmailAddress::from_str("test@metacode.biz").unwrap();
/// assert_eq!(
///     autoconfig_url(&email),
///     "https://metacode.biz/.well-known/autoconfig/mail/config-v1.1.xml?emailaddress=test%40metacode.biz"
/// );
/// ```
#[must_use]
pub fn autoconfig_url(email: &EmailAddress) -> String {
    format!(
        "https://{}/.well-known/autoconfig/mail/config-v1.1.xml?emailaddress={}",
        email.domain(),
        urlencoding::encode(email.as_str())
    )
}

/// Discovery strategy fetching the domain's autoconfig document over
/// HTTPS.
#[derive(Debug, Clone)]
pub struct AutoconfigDiscovery {
    client: reqwest::Client,
    fetch_timeout: Duration,
    lookup_url: Option<String>,
}

impl AutoconfigDiscovery {
    /// Creates the strategy with a bounded per-fetch timeout.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] if the HTTP client cannot be
    /// constructed.
    pub fn new(fetch_timeout: Duration) -> Result<Self, Error> {
        let client = reqwest::Client::builder()
            .timeout(fetch_timeout)
            .build()
            .map_err(|e| Error::InvalidConfig {
                message: format!("failed to build HTTP client: {e}"),
            })?;

        Ok(Self {
            client,
            fetch_timeout,
            lookup_url: None,
        })
    }

    /// Overrides the lookup URL instead of deriving it from the domain.
    ///
    /// Useful for internal autoconfig mirrors and for tests against a
    /// local server.
    #[must_use]
    pub fn with_lookup_url(mut self, url: impl Into<String>) -> Self {
        self.lookup_url = Some(url.into());
        self
    }

    fn url_for(&self, email: &EmailAddress) -> String {
        self.lookup_url
            .clone()
            .unwrap_or_else(|| autoconfig_url(email))
    }
}

#[async_trait]
impl DiscoveryStrategy for AutoconfigDiscovery {
    fn name(&self) -> &'static str {
        "autoconfig"
    }

    fn trust(&self) -> Trust {
        Trust::Untrusted
    }

    #[instrument(name = "AutoconfigDiscovery::discover", skip_all, fields(domain = %email.domain()))]
    async fn discover(&self, email: &EmailAddress) -> AutoDiscoveryResult {
        let url = self.url_for(email);
        debug!(url, "fetching autoconfig document");

        let response = match self.client.get(&url).send().await {
            Ok(response) => response,
            Err(source) if source.is_timeout() => {
                return AutoDiscoveryResult::NetworkError(Error::FetchTimeout {
                    url,
                    timeout: self.fetch_timeout,
                });
            }
            Err(source) => {
                return AutoDiscoveryResult::NetworkError(Error::HttpRequest { url, source });
            }
        };

        let status = response.status();
        if !status.is_success() {
            return AutoDiscoveryResult::NetworkError(Error::HttpStatus {
                url,
                status: status.as_u16(),
            });
        }

        let body = match response.text().await {
            Ok(body) => body,
            Err(source) => {
                return AutoDiscoveryResult::NetworkError(Error::HttpRequest { url, source });
            }
        };

        match parse_autoconfig(&body, email) {
            Ok(Some((incoming, outgoing))) => AutoDiscoveryResult::Settings {
                incoming,
                outgoing,
                trust: self.trust(),
                source: self.name(),
            },
            Ok(None) => {
                debug!("autoconfig document had no usable configuration");
                AutoDiscoveryResult::NoUsableSettingsFound
            }
            Err(error) => AutoDiscoveryResult::UnexpectedException(error),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// XML parsing
// ─────────────────────────────────────────────────────────────────────────────

/// A server block as found in the document, before validation.
#[derive(Debug, Default)]
struct RawServerBlock {
    hostname: Option<String>,
    port: Option<String>,
    socket_type: Option<String>,
    username: Option<String>,
    /// Every `authentication` occurrence in document order; duplicates
    /// preserved (order encodes preference).
    authentication: Vec<String>,
    add_this_server: Option<bool>,
}

fn malformed(source: quick_xml::Error) -> Error {
    Error::MalformedXml { source }
}

/// Parses an autoconfig document.
///
/// `Ok(None)` means the document is tolerably wrong: no provider block,
/// truncated mid-block, or missing a required server. `Err` means the
/// XML is ill-formed beyond tolerance and must surface as an unexpected
/// failure.
pub(crate) fn parse_autoconfig(
    xml: &str,
    email: &EmailAddress,
) -> Result<Option<(IncomingServerSettings, OutgoingServerSettings)>, Error> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);

    // Scan for the first emailProvider block, skipping unrelated
    // siblings.
    loop {
        match reader.read_event().map_err(malformed)? {
            Event::Eof => return Ok(None),
            Event::Start(element) if element.name().as_ref() == b"emailProvider" => break,
            _ => {}
        }
    }

    let mut incoming_block: Option<RawServerBlock> = None;
    let mut outgoing_blocks: Vec<RawServerBlock> = Vec::new();

    // Inside the provider block until its close tag. Reaching the end of
    // the document with the block still open means truncation, which
    // fails soft.
    loop {
        match reader.read_event().map_err(malformed)? {
            Event::Eof => return Ok(None),
            Event::Start(element) => {
                let name = element.name().as_ref().to_vec();
                let server_type = attribute_value(&element, "type")?;

                match name.as_slice() {
                    b"incomingServer"
                        if server_type.as_deref() == Some("imap")
                            && incoming_block.is_none() =>
                    {
                        match parse_server_block(&mut reader)? {
                            Some(block) => incoming_block = Some(block),
                            None => return Ok(None),
                        }
                    }
                    b"outgoingServer" if server_type.as_deref() == Some("smtp") => {
                        match parse_server_block(&mut reader)? {
                            Some(block) => outgoing_blocks.push(block),
                            None => return Ok(None),
                        }
                    }
                    _ => {
                        if skip_subtree(&mut reader)?.is_none() {
                            return Ok(None);
                        }
                    }
                }
            }
            Event::End(element) if element.name().as_ref() == b"emailProvider" => break,
            _ => {}
        }
    }

    let Some(incoming) = incoming_block.and_then(|block| finish_incoming(&block, email)) else {
        return Ok(None);
    };

    // First block flagged addThisServer=true wins; unflagged documents
    // fail selection.
    let Some(outgoing) = outgoing_blocks
        .iter()
        .find(|block| block.add_this_server == Some(true))
        .and_then(|block| finish_outgoing(block, email))
    else {
        return Ok(None);
    };

    Ok(Some((incoming, outgoing)))
}

/// Parses the children of a server block whose opening tag has already
/// been consumed. `Ok(None)` signals a truncated document.
fn parse_server_block(reader: &mut Reader<&[u8]>) -> Result<Option<RawServerBlock>, Error> {
    let mut block = RawServerBlock::default();
    let mut depth = 1usize;

    loop {
        match reader.read_event().map_err(malformed)? {
            Event::Eof => return Ok(None),
            Event::Start(element) => {
                let name = element.name().as_ref().to_vec();
                let is_field = depth == 1
                    && matches!(
                        name.as_slice(),
                        b"hostname"
                            | b"port"
                            | b"socketType"
                            | b"username"
                            | b"authentication"
                            | b"addThisServer"
                    );

                if is_field {
                    let Some(text) = read_element_text(reader)? else {
                        return Ok(None);
                    };
                    match name.as_slice() {
                        b"hostname" => block.hostname = Some(text),
                        b"port" => block.port = Some(text),
                        b"socketType" => block.socket_type = Some(text),
                        b"username" => block.username = Some(text),
                        b"authentication" => block.authentication.push(text),
                        b"addThisServer" => {
                            block.add_this_server = Some(text.eq_ignore_ascii_case("true"));
                        }
                        _ => {}
                    }
                } else {
                    depth += 1;
                }
            }
            Event::End(_) => {
                depth -= 1;
                if depth == 0 {
                    return Ok(Some(block));
                }
            }
            _ => {}
        }
    }
}

/// Reads the text content of an element whose opening tag has already
/// been consumed, tolerating comments and nested markup. `Ok(None)`
/// signals a truncated document.
fn read_element_text(reader: &mut Reader<&[u8]>) -> Result<Option<String>, Error> {
    let mut text = String::new();
    let mut depth = 1usize;

    loop {
        match reader.read_event().map_err(malformed)? {
            Event::Eof => return Ok(None),
            Event::Text(t) if depth == 1 => {
                text.push_str(&t.unescape().map_err(malformed)?);
            }
            Event::Start(_) => depth += 1,
            Event::End(_) => {
                depth -= 1;
                if depth == 0 {
                    return Ok(Some(text.trim().to_string()));
                }
            }
            _ => {}
        }
    }
}

/// Skips a subtree whose opening tag has already been consumed.
/// `Ok(None)` signals a truncated document.
fn skip_subtree(reader: &mut Reader<&[u8]>) -> Result<Option<()>, Error> {
    let mut depth = 1usize;

    loop {
        match reader.read_event().map_err(malformed)? {
            Event::Eof => return Ok(None),
            Event::Start(_) => depth += 1,
            Event::End(_) => {
                depth -= 1;
                if depth == 0 {
                    return Ok(Some(()));
                }
            }
            _ => {}
        }
    }
}

fn attribute_value(
    element: &quick_xml::events::BytesStart<'_>,
    name: &str,
) -> Result<Option<String>, Error> {
    element
        .try_get_attribute(name)
        .map_err(|e| malformed(e.into()))?
        .map(|attr| {
            attr.unescape_value()
                .map(|value| value.into_owned())
                .map_err(malformed)
        })
        .transpose()
}

// ─────────────────────────────────────────────────────────────────────────────
// Validation and placeholder resolution
// ─────────────────────────────────────────────────────────────────────────────

/// Resolves the wire-format placeholders against the caller's address.
/// These values land in settings fields, not in URIs, so no
/// percent-encoding is applied.
fn resolve_placeholders(value: &str, email: &EmailAddress) -> String {
    value
        .replace("%EMAILADDRESS%", email.as_str())
        .replace("%EMAILLOCALPART%", email.local_part())
        .replace("%EMAILDOMAIN%", email.domain())
}

fn parse_socket_type(value: &str) -> Option<ConnectionSecurity> {
    match value {
        "plain" => Some(ConnectionSecurity::PlainText),
        "SSL" => Some(ConnectionSecurity::Tls),
        "STARTTLS" => Some(ConnectionSecurity::StartTls),
        _ => None,
    }
}

fn parse_authentication(value: &str) -> Option<AuthenticationType> {
    match value {
        "OAuth2" => Some(AuthenticationType::OAuth2),
        "password-cleartext" => Some(AuthenticationType::PasswordCleartext),
        "password-encrypted" => Some(AuthenticationType::PasswordEncrypted),
        "NTLM" => Some(AuthenticationType::Ntlm),
        "GSSAPI" => Some(AuthenticationType::Gssapi),
        "none" => Some(AuthenticationType::None),
        _ => None,
    }
}

fn validated_hostname(raw: &str, email: &EmailAddress) -> Option<String> {
    let hostname = resolve_placeholders(raw, email);
    if hostname.is_empty() || hostname.contains(char::is_whitespace) {
        debug!(hostname, "rejecting server block with invalid hostname");
        return None;
    }
    Some(hostname)
}

fn validated_port(raw: &str) -> Option<u16> {
    raw.parse::<u16>().ok().filter(|port| *port >= 1)
}

/// Known authentication mechanisms in document order; empty and unknown
/// entries are tolerated and skipped.
fn validated_authentication(raw: &[String]) -> Option<Vec<AuthenticationType>> {
    let types: Vec<AuthenticationType> = raw
        .iter()
        .filter(|value| !value.is_empty())
        .filter_map(|value| parse_authentication(value))
        .collect();
    if types.is_empty() {
        None
    } else {
        Some(types)
    }
}

fn finish_incoming(block: &RawServerBlock, email: &EmailAddress) -> Option<IncomingServerSettings> {
    Some(IncomingServerSettings::Imap(ImapServerSettings {
        hostname: validated_hostname(block.hostname.as_deref()?, email)?,
        port: validated_port(block.port.as_deref()?)?,
        connection_security: parse_socket_type(block.socket_type.as_deref()?)?,
        authentication_types: validated_authentication(&block.authentication)?,
        username: resolve_placeholders(block.username.as_deref()?, email),
    }))
}

fn finish_outgoing(block: &RawServerBlock, email: &EmailAddress) -> Option<OutgoingServerSettings> {
    Some(OutgoingServerSettings::Smtp(SmtpServerSettings {
        hostname: validated_hostname(block.hostname.as_deref()?, email)?,
        port: validated_port(block.port.as_deref()?)?,
        connection_security: parse_socket_type(block.socket_type.as_deref()?)?,
        authentication_types: validated_authentication(&block.authentication)?,
        username: resolve_placeholders(block.username.as_deref()?, email),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn address(raw: &str) -> EmailAddress {
        EmailAddress::from_str(raw).unwrap()
    }

    const MINIMAL: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<clientConfig version="1.1">
  <emailProvider id="domain.example">
    <domain>domain.example</domain>
    <incomingServer type="imap">
      <hostname>imap.domain.example</hostname>
      <port>993</port>
      <socketType>SSL</socketType>
      <authentication>password-cleartext</authentication>
      <username>%EMAILADDRESS%</username>
    </incomingServer>
    <outgoingServer type="smtp">
      <hostname>smtp.domain.example</hostname>
      <port>587</port>
      <socketType>STARTTLS</socketType>
      <authentication>password-cleartext</authentication>
      <username>%EMAILADDRESS%</username>
      <addThisServer>true</addThisServer>
    </outgoingServer>
  </emailProvider>
</clientConfig>"#;

    #[test]
    fn test_autoconfig_url_is_exact() {
        let email = address("test@metacode.biz");
        assert_eq!(
            autoconfig_url(&email),
            "https://metacode.biz/.well-known/autoconfig/mail/config-v1.1.xml?emailaddress=test%40metacode.biz"
        );
    }

    #[test]
    fn test_minimal_document() {
        let email = address("user@domain.example");
        let (incoming, outgoing) = parse_autoconfig(MINIMAL, &email).unwrap().unwrap();

        let IncomingServerSettings::Imap(imap) = incoming;
        assert_eq!(imap.hostname, "imap.domain.example");
        assert_eq!(imap.port, 993);
        assert_eq!(imap.connection_security, ConnectionSecurity::Tls);
        assert_eq!(
            imap.authentication_types,
            vec![AuthenticationType::PasswordCleartext]
        );
        assert_eq!(imap.username, "user@domain.example");

        let OutgoingServerSettings::Smtp(smtp) = outgoing;
        assert_eq!(smtp.hostname, "smtp.domain.example");
        assert_eq!(smtp.port, 587);
        assert_eq!(smtp.connection_security, ConnectionSecurity::StartTls);
        assert_eq!(smtp.username, "user@domain.example");
    }

    #[test]
    fn test_placeholder_resolution_in_hostname_and_username() {
        let xml = MINIMAL
            .replace("imap.domain.example", "%EMAILLOCALPART%.domain.example")
            .replace(
                "<username>%EMAILADDRESS%</username>\n      <addThisServer>",
                "<username>%EMAILDOMAIN%</username>\n      <addThisServer>",
            );

        let email = address("user@domain.example");
        let (incoming, outgoing) = parse_autoconfig(&xml, &email).unwrap().unwrap();

        let IncomingServerSettings::Imap(imap) = incoming;
        assert_eq!(imap.hostname, "user.domain.example");

        let OutgoingServerSettings::Smtp(smtp) = outgoing;
        assert_eq!(smtp.username, "domain.example");
    }

    #[test]
    fn test_first_flagged_outgoing_server_wins() {
        let xml = r#"<clientConfig version="1.1">
  <emailProvider id="domain.example">
    <incomingServer type="imap">
      <hostname>imap.domain.example</hostname>
      <port>993</port>
      <socketType>SSL</socketType>
      <authentication>OAuth2</authentication>
      <username>%EMAILADDRESS%</username>
    </incomingServer>
    <outgoingServer type="smtp">
      <hostname>unflagged.domain.example</hostname>
      <port>587</port>
      <socketType>STARTTLS</socketType>
      <authentication>password-cleartext</authentication>
      <username>%EMAILADDRESS%</username>
      <addThisServer>false</addThisServer>
    </outgoingServer>
    <outgoingServer type="smtp">
      <hostname>first-flagged.domain.example</hostname>
      <port>465</port>
      <socketType>SSL</socketType>
      <authentication>password-cleartext</authentication>
      <username>%EMAILADDRESS%</username>
      <addThisServer>true</addThisServer>
    </outgoingServer>
    <outgoingServer type="smtp">
      <hostname>second-flagged.domain.example</hostname>
      <port>587</port>
      <socketType>STARTTLS</socketType>
      <authentication>password-cleartext</authentication>
      <username>%EMAILADDRESS%</username>
      <addThisServer>true</addThisServer>
    </outgoingServer>
  </emailProvider>
</clientConfig>"#;

        let email = address("user@domain.example");
        let (_, outgoing) = parse_autoconfig(xml, &email).unwrap().unwrap();

        let OutgoingServerSettings::Smtp(smtp) = outgoing;
        assert_eq!(smtp.hostname, "first-flagged.domain.example");
        assert_eq!(smtp.port, 465);
    }

    #[test]
    fn test_no_flagged_outgoing_server_fails_selection() {
        let xml = MINIMAL.replace(
            "<addThisServer>true</addThisServer>",
            "<addThisServer>false</addThisServer>",
        );
        let email = address("user@domain.example");
        assert!(parse_autoconfig(&xml, &email).unwrap().is_none());
    }

    #[test]
    fn test_incoming_only_document_is_not_usable() {
        let xml = r#"<clientConfig version="1.1">
  <emailProvider id="domain.example">
    <incomingServer type="imap">
      <hostname>imap.domain.example</hostname>
      <port>993</port>
      <socketType>SSL</socketType>
      <authentication>password-cleartext</authentication>
      <username>%EMAILADDRESS%</username>
    </incomingServer>
  </emailProvider>
</clientConfig>"#;
        let email = address("user@domain.example");
        assert!(parse_autoconfig(xml, &email).unwrap().is_none());
    }

    #[test]
    fn test_truncated_document_fails_soft() {
        // Cut the document mid-block: must be "no usable settings", not
        // a parse error.
        let truncated = &MINIMAL[..MINIMAL.find("<socketType>").unwrap()];
        let email = address("user@domain.example");
        assert!(parse_autoconfig(truncated, &email).unwrap().is_none());
    }

    #[test]
    fn test_missing_provider_block_fails_soft() {
        let xml = r#"<clientConfig version="1.1"><somethingElse/></clientConfig>"#;
        let email = address("user@domain.example");
        assert!(parse_autoconfig(xml, &email).unwrap().is_none());
    }

    #[test]
    fn test_mismatched_tags_are_unexpected() {
        let xml = r#"<clientConfig><emailProvider></wrongClose></clientConfig>"#;
        let email = address("user@domain.example");
        assert!(matches!(
            parse_autoconfig(xml, &email),
            Err(Error::MalformedXml { .. })
        ));
    }

    #[test]
    fn test_unknown_socket_type_rejects_block() {
        let xml = MINIMAL.replace("<socketType>SSL</socketType>", "<socketType>TLS</socketType>");
        let email = address("user@domain.example");
        assert!(parse_autoconfig(&xml, &email).unwrap().is_none());
    }

    #[test]
    fn test_out_of_range_port_rejects_block() {
        let xml = MINIMAL.replace("<port>993</port>", "<port>100000</port>");
        let email = address("user@domain.example");
        assert!(parse_autoconfig(&xml, &email).unwrap().is_none());
    }

    #[test]
    fn test_authentication_order_and_duplicates_preserved() {
        let xml = MINIMAL.replace(
            "<authentication>password-cleartext</authentication>\n      <username>%EMAILADDRESS%</username>\n    </incomingServer>",
            "<authentication>OAuth2</authentication>\n      <authentication>password-cleartext</authentication>\n      <authentication>OAuth2</authentication>\n      <username>%EMAILADDRESS%</username>\n    </incomingServer>",
        );
        let email = address("user@domain.example");
        let (incoming, _) = parse_autoconfig(&xml, &email).unwrap().unwrap();

        let IncomingServerSettings::Imap(imap) = incoming;
        assert_eq!(
            imap.authentication_types,
            vec![
                AuthenticationType::OAuth2,
                AuthenticationType::PasswordCleartext,
                AuthenticationType::OAuth2,
            ]
        );
    }

    #[test]
    fn test_empty_and_unknown_authentication_entries_skipped() {
        let xml = MINIMAL.replace(
            "<authentication>password-cleartext</authentication>\n      <username>%EMAILADDRESS%</username>\n    </incomingServer>",
            "<authentication></authentication>\n      <authentication>smartcard</authentication>\n      <authentication>password-cleartext</authentication>\n      <username>%EMAILADDRESS%</username>\n    </incomingServer>",
        );
        let email = address("user@domain.example");
        let (incoming, _) = parse_autoconfig(&xml, &email).unwrap().unwrap();

        let IncomingServerSettings::Imap(imap) = incoming;
        assert_eq!(
            imap.authentication_types,
            vec![AuthenticationType::PasswordCleartext]
        );
    }

    #[test]
    fn test_unrelated_siblings_and_nested_markup_tolerated() {
        // Unrelated subtrees before and inside the provider block are
        // skipped, non-imap server blocks are passed over, and markup
        // nested inside a field does not derail text collection.
        let xml = r#"<clientConfig version="1.1">
  <clientConfigUpdate url="https://updates.domain.example"/>
  <emailProvider id="domain.example">
    <displayName>Example <short>Mail</short></displayName>
    <incomingServer type="pop3">
      <hostname>pop.domain.example</hostname>
      <port>995</port>
    </incomingServer>
    <incomingServer type="imap">
      <hostname>imap.domain.example<sub>ignored</sub></hostname>
      <port>993</port>
      <socketType>SSL</socketType>
      <authentication>password-cleartext</authentication>
      <username>%EMAILADDRESS%</username>
    </incomingServer>
    <outgoingServer type="smtp">
      <hostname>smtp.domain.example</hostname>
      <port>587</port>
      <socketType>STARTTLS</socketType>
      <authentication>password-cleartext</authentication>
      <username>%EMAILADDRESS%</username>
      <addThisServer>true</addThisServer>
    </outgoingServer>
  </emailProvider>
</clientConfig>"#;

        let email = address("user@domain.example");
        let (incoming, outgoing) = parse_autoconfig(xml, &email).unwrap().unwrap();

        let IncomingServerSettings::Imap(imap) = incoming;
        assert_eq!(imap.hostname, "imap.domain.example");
        assert_eq!(imap.port, 993);

        let OutgoingServerSettings::Smtp(smtp) = outgoing;
        assert_eq!(smtp.hostname, "smtp.domain.example");
    }

    #[test]
    fn test_comments_between_elements_tolerated() {
        let xml = MINIMAL.replace(
            "<hostname>imap.domain.example</hostname>",
            "<hostname><!-- comment -->imap.domain.example</hostname>",
        );
        let email = address("user@domain.example");
        let (incoming, _) = parse_autoconfig(&xml, &email).unwrap().unwrap();
        let IncomingServerSettings::Imap(imap) = incoming;
        assert_eq!(imap.hostname, "imap.domain.example");
    }

    #[test]
    fn test_pop3_incoming_server_is_skipped() {
        let xml = MINIMAL.replace(
            r#"<incomingServer type="imap">"#,
            r#"<incomingServer type="pop3">"#,
        );
        let email = address("user@domain.example");
        // The only incoming block is pop3, which this client does not
        // take from autoconfig documents.
        assert!(parse_autoconfig(&xml, &email).unwrap().is_none());
    }

    #[test]
    fn test_idempotent_parsing() {
        let email = address("user@domain.example");
        let first = parse_autoconfig(MINIMAL, &email).unwrap().unwrap();
        let second = parse_autoconfig(MINIMAL, &email).unwrap().unwrap();
        assert_eq!(first, second);
    }
}
