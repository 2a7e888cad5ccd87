//! Protocol-specific connection string decoding.
//!
//! A [`UriDecoder`] turns the connection strings assembled by
//! [`crate::uri`] into protocol-native server settings. Mail-protocol
//! backends can plug in their own decoder; the crate ships
//! [`DefaultUriDecoder`] for the scheme family used by the bundled
//! provider directory:
//!
//! | scheme      | protocol | security  | default port |
//! |-------------|----------|-----------|--------------|
//! | `imap+ssl+` | IMAP     | TLS       | 993          |
//! | `imap+tls+` | IMAP     | STARTTLS  | 143          |
//! | `imap`      | IMAP     | plaintext | 143          |
//! | `smtp+ssl+` | SMTP     | TLS       | 465          |
//! | `smtp+tls+` | SMTP     | STARTTLS  | 587          |
//! | `smtp`      | SMTP     | plaintext | 587          |

use crate::error::Error;
use crate::settings::{
    AuthenticationType, ConnectionSecurity, ImapServerSettings, IncomingServerSettings,
    OutgoingServerSettings, SmtpServerSettings,
};
use url::Url;

/// Decodes connection strings into server settings, one protocol family
/// per scheme.
pub trait UriDecoder: Send + Sync {
    /// Decodes an incoming-server connection string.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidConnectionUri`] if the string is not a well-formed
    /// URI; [`Error::UnsupportedConnectionUri`] if it is well-formed but
    /// uses a scheme (or shape) this decoder does not handle.
    fn decode_incoming(&self, uri: &str) -> Result<IncomingServerSettings, Error>;

    /// Decodes an outgoing-server connection string.
    ///
    /// # Errors
    ///
    /// Same contract as [`UriDecoder::decode_incoming`].
    fn decode_outgoing(&self, uri: &str) -> Result<OutgoingServerSettings, Error>;
}

/// Default port for a connection scheme, if the scheme is known.
pub(crate) fn default_port(scheme: &str) -> Option<u16> {
    match scheme {
        "imap+ssl+" => Some(993),
        "imap+tls+" | "imap" => Some(143),
        "smtp+ssl+" => Some(465),
        "smtp+tls+" | "smtp" => Some(587),
        _ => None,
    }
}

fn security_for_scheme(scheme: &str) -> Option<ConnectionSecurity> {
    match scheme {
        "imap+ssl+" | "smtp+ssl+" => Some(ConnectionSecurity::Tls),
        "imap+tls+" | "smtp+tls+" => Some(ConnectionSecurity::StartTls),
        "imap" | "smtp" => Some(ConnectionSecurity::PlainText),
        _ => None,
    }
}

/// The built-in decoder for the `imap`/`smtp` scheme family.
///
/// Username is taken from the URI's user-info segment and percent-decoded;
/// an absent user-info segment yields an empty username. Servers reached
/// through these URIs authenticate with a password, so the decoded
/// settings advertise [`AuthenticationType::PasswordCleartext`].
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultUriDecoder;

struct DecodedParts {
    hostname: String,
    port: u16,
    connection_security: ConnectionSecurity,
    username: String,
}

impl DefaultUriDecoder {
    fn decode(uri: &str, expected_protocol: &str) -> Result<DecodedParts, Error> {
        let parsed = Url::parse(uri).map_err(|source| Error::InvalidConnectionUri {
            uri: uri.to_string(),
            source,
        })?;

        let scheme = parsed.scheme().to_string();
        if !scheme.starts_with(expected_protocol) {
            return Err(Error::UnsupportedConnectionUri {
                scheme,
                message: format!("expected a {expected_protocol} scheme"),
            });
        }

        let connection_security =
            security_for_scheme(&scheme).ok_or_else(|| Error::UnsupportedConnectionUri {
                scheme: scheme.clone(),
                message: "unknown connection security suffix".into(),
            })?;

        let hostname = parsed
            .host_str()
            .ok_or(Error::InvalidConnectionUri {
                uri: uri.to_string(),
                source: url::ParseError::EmptyHost,
            })?
            .to_string();

        // Non-special schemes carry no default port in the URL itself.
        let port = match parsed.port().or_else(|| default_port(&scheme)) {
            Some(port) => port,
            None => {
                return Err(Error::UnsupportedConnectionUri {
                    scheme,
                    message: "no port given and no default known".into(),
                })
            }
        };

        let username = urlencoding::decode(parsed.username())
            .map_err(|_| Error::UnsupportedConnectionUri {
                scheme: scheme.clone(),
                message: "user-info is not valid UTF-8 after percent-decoding".into(),
            })?
            .into_owned();

        Ok(DecodedParts {
            hostname,
            port,
            connection_security,
            username,
        })
    }
}

impl UriDecoder for DefaultUriDecoder {
    fn decode_incoming(&self, uri: &str) -> Result<IncomingServerSettings, Error> {
        let parts = Self::decode(uri, "imap")?;
        Ok(IncomingServerSettings::Imap(ImapServerSettings {
            hostname: parts.hostname,
            port: parts.port,
            connection_security: parts.connection_security,
            authentication_types: vec![AuthenticationType::PasswordCleartext],
            username: parts.username,
        }))
    }

    fn decode_outgoing(&self, uri: &str) -> Result<OutgoingServerSettings, Error> {
        let parts = Self::decode(uri, "smtp")?;
        Ok(OutgoingServerSettings::Smtp(SmtpServerSettings {
            hostname: parts.hostname,
            port: parts.port,
            connection_security: parts.connection_security,
            authentication_types: vec![AuthenticationType::PasswordCleartext],
            username: parts.username,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_incoming_with_explicit_port() {
        let settings = DefaultUriDecoder
            .decode_incoming("imap+ssl+://user%40example.com@imap.example.com:1993")
            .unwrap();
        let IncomingServerSettings::Imap(imap) = settings;
        assert_eq!(imap.hostname, "imap.example.com");
        assert_eq!(imap.port, 1993);
        assert_eq!(imap.connection_security, ConnectionSecurity::Tls);
        assert_eq!(imap.username, "user@example.com");
    }

    #[test]
    fn test_decode_incoming_uses_scheme_default_port() {
        let settings = DefaultUriDecoder
            .decode_incoming("imap+ssl+://user@imap.example.com")
            .unwrap();
        let IncomingServerSettings::Imap(imap) = settings;
        assert_eq!(imap.port, 993);

        let settings = DefaultUriDecoder
            .decode_incoming("imap+tls+://user@imap.example.com")
            .unwrap();
        let IncomingServerSettings::Imap(imap) = settings;
        assert_eq!(imap.port, 143);
        assert_eq!(imap.connection_security, ConnectionSecurity::StartTls);
    }

    #[test]
    fn test_decode_outgoing_without_user_info() {
        let settings = DefaultUriDecoder
            .decode_outgoing("smtp+tls+://smtp.example.com")
            .unwrap();
        let OutgoingServerSettings::Smtp(smtp) = settings;
        assert_eq!(smtp.hostname, "smtp.example.com");
        assert_eq!(smtp.port, 587);
        assert_eq!(smtp.connection_security, ConnectionSecurity::StartTls);
        assert_eq!(smtp.username, "");
    }

    #[test]
    fn test_decode_rejects_wrong_protocol_family() {
        let result = DefaultUriDecoder.decode_incoming("smtp+ssl+://smtp.example.com");
        assert!(matches!(
            result,
            Err(Error::UnsupportedConnectionUri { .. })
        ));
    }

    #[test]
    fn test_decode_rejects_malformed_uri() {
        let result = DefaultUriDecoder.decode_incoming("not a uri");
        assert!(matches!(result, Err(Error::InvalidConnectionUri { .. })));
    }
}
