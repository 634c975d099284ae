//! Error taxonomy for the lookup pipeline.
//!
//! Every outcome of a lookup that is not a success is one of these four
//! variants. The HTTP boundary maps them onto status codes; the library
//! never decides status codes itself.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum LookupError {
    /// Input was not an 8-digit CEP. Raised before any network call.
    #[error("invalid zipcode")]
    InvalidZipcode,

    /// The CEP is well-formed but the postal service does not know it.
    #[error("can not find zipcode")]
    ZipcodeNotFound,

    /// Network-level failure talking to an upstream.
    #[error("request to {service} failed: {source}")]
    Transport {
        service: &'static str,
        #[source]
        source: reqwest::Error,
    },

    /// The upstream answered, but the body matched none of the expected
    /// shapes (or came back with an unexpected status).
    #[error("unexpected response from {service}: {detail}")]
    UnexpectedResponse {
        service: &'static str,
        detail: String,
    },
}

impl LookupError {
    pub(crate) fn transport(service: &'static str, source: reqwest::Error) -> Self {
        Self::Transport { service, source }
    }

    pub(crate) fn unexpected(service: &'static str, detail: impl Into<String>) -> Self {
        Self::UnexpectedResponse {
            service,
            detail: detail.into(),
        }
    }
}

/// Cap an upstream body for inclusion in error detail, cutting on a char
/// boundary so multi-byte payloads cannot panic the slice.
pub(crate) fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() <= MAX {
        return body.to_string();
    }
    let mut end = MAX;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &body[..end])
}
