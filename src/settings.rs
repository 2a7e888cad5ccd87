//! Server settings model produced by discovery.
//!
//! These are immutable value types describing how to connect to a mail
//! server: hostname, port, transport security, the ordered list of
//! authentication mechanisms the server accepts, and the username to log
//! in with. They carry no behavior and are created fresh per discovery
//! call.
//!
//! The incoming/outgoing wrappers are open variant sets (`#[non_exhaustive]`)
//! rather than closed enums: new providers can require new protocols, and
//! downstream code is expected to match on the protocol it supports and
//! treat everything else as unusable.

/// Transport security mode for a server connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConnectionSecurity {
    /// No transport security. Parsed for completeness, but not offered to
    /// users in practice.
    PlainText,
    /// Plain connection upgraded via STARTTLS.
    StartTls,
    /// Implicit TLS from the first byte.
    Tls,
}

/// An authentication mechanism a server accepts.
///
/// Lists of these are ordered: position expresses preference (e.g.
/// OAuth2 before password) and duplicates are preserved as found in the
/// source document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum AuthenticationType {
    /// OAuth 2.0 bearer tokens.
    OAuth2,
    /// Password sent over the encrypted channel.
    PasswordCleartext,
    /// Challenge/response password scheme (CRAM-MD5 and friends).
    PasswordEncrypted,
    /// NTLM single sign-on.
    Ntlm,
    /// Kerberos via GSSAPI.
    Gssapi,
    /// No authentication required (e.g. an SMTP relay restricted by IP).
    None,
}

/// Settings for an incoming (mail retrieval) server.
///
/// Open to new protocols; currently only IMAP is produced by the bundled
/// strategies.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum IncomingServerSettings {
    /// An IMAP server.
    Imap(ImapServerSettings),
}

/// Settings for an outgoing (mail submission) server.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum OutgoingServerSettings {
    /// An SMTP submission server.
    Smtp(SmtpServerSettings),
}

/// Connection settings for an IMAP server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImapServerSettings {
    /// Server hostname.
    pub hostname: String,
    /// Server port (1-65535).
    pub port: u16,
    /// Transport security mode.
    pub connection_security: ConnectionSecurity,
    /// Accepted authentication mechanisms, in order of preference.
    /// Never empty.
    pub authentication_types: Vec<AuthenticationType>,
    /// Login username. Already resolved against the email address that
    /// drove discovery.
    pub username: String,
}

/// Connection settings for an SMTP submission server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SmtpServerSettings {
    /// Server hostname.
    pub hostname: String,
    /// Server port (1-65535).
    pub port: u16,
    /// Transport security mode.
    pub connection_security: ConnectionSecurity,
    /// Accepted authentication mechanisms, in order of preference.
    /// Never empty.
    pub authentication_types: Vec<AuthenticationType>,
    /// Login username. May be empty when the server needs no fixed
    /// username (authentication handled elsewhere or not required).
    pub username: String,
}

impl IncomingServerSettings {
    /// Returns the hostname regardless of protocol.
    #[must_use]
    pub fn hostname(&self) -> &str {
        match self {
            IncomingServerSettings::Imap(s) => &s.hostname,
        }
    }

    /// Returns the port regardless of protocol.
    #[must_use]
    pub fn port(&self) -> u16 {
        match self {
            IncomingServerSettings::Imap(s) => s.port,
        }
    }
}

impl OutgoingServerSettings {
    /// Returns the hostname regardless of protocol.
    #[must_use]
    pub fn hostname(&self) -> &str {
        match self {
            OutgoingServerSettings::Smtp(s) => &s.hostname,
        }
    }

    /// Returns the port regardless of protocol.
    #[must_use]
    pub fn port(&self) -> u16 {
        match self {
            OutgoingServerSettings::Smtp(s) => s.port,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accessors_through_variants() {
        let incoming = IncomingServerSettings::Imap(ImapServerSettings {
            hostname: "imap.example.com".into(),
            port: 993,
            connection_security: ConnectionSecurity::Tls,
            authentication_types: vec![AuthenticationType::PasswordCleartext],
            username: "user@example.com".into(),
        });

        assert_eq!(incoming.hostname(), "imap.example.com");
        assert_eq!(incoming.port(), 993);

        let outgoing = OutgoingServerSettings::Smtp(SmtpServerSettings {
            hostname: "smtp.example.com".into(),
            port: 587,
            connection_security: ConnectionSecurity::StartTls,
            authentication_types: vec![
                AuthenticationType::OAuth2,
                AuthenticationType::PasswordCleartext,
            ],
            username: String::new(),
        });

        assert_eq!(outgoing.hostname(), "smtp.example.com");
        assert_eq!(outgoing.port(), 587);
    }
}
