//! Connection URI assembly.
//!
//! Builds the scheme-qualified connection strings that protocol decoders
//! consume, e.g. `imap+ssl+://user%40example.com@imap.example.com:993`.
//!
//! Percent-encoding is applied to the substitution *values* before they
//! are placed into a template, never to the assembled string. This
//! prevents double-encoding and stops URI-structural characters (`:`,
//! `@`, `/`) in a user-supplied email address from reshaping the URI.

use crate::error::Error;
use url::Url;

/// Percent-encodes a single value for embedding into a connection URI
/// user-info segment.
#[must_use]
pub fn encode_component(value: &str) -> String {
    urlencoding::encode(value).into_owned()
}

/// Builds a connection string from its parts.
///
/// `user_info` must already contain percent-encoded credentials and may
/// be empty (outgoing servers without a fixed username omit the
/// authority's user-info segment entirely).
///
/// # Errors
///
/// Returns [`Error::InvalidConnectionUri`] if the assembled string fails
/// to parse back into a well-formed URI (e.g. the host contains illegal
/// characters). Callers must treat this as an unexpected failure, not as
/// "no usable settings".
pub fn build_connection_uri(
    scheme: &str,
    user_info: &str,
    host: &str,
    port: u16,
) -> Result<String, Error> {
    let uri = if user_info.is_empty() {
        format!("{scheme}://{host}:{port}")
    } else {
        format!("{scheme}://{user_info}@{host}:{port}")
    };

    // Parse-back validation. A failure here means a template or input was
    // malformed in a way the encoding step could not have produced.
    match Url::parse(&uri) {
        Ok(parsed) if parsed.host_str().is_some() => Ok(uri),
        Ok(_) => Err(Error::InvalidConnectionUri {
            uri,
            source: url::ParseError::EmptyHost,
        }),
        Err(source) => Err(Error::InvalidConnectionUri { uri, source }),
    }
}
