//! The client identity attached to every request.
//!
//! A [`ClientIdentity`] is supplied once when the client is constructed and
//! is immutable afterwards; every request issued through the transport core
//! reuses it. The API key is held as a [`SecretString`] so it never appears
//! in `Debug` output and is only exposed when the `Authorization` header is
//! built.

use std::time::Duration;

use bon::Builder;
use secrecy::{ExposeSecret, SecretString};

/// An API key for the skin-generation service.
#[derive(Debug, Clone)]
pub struct ApiKey(pub SecretString);

impl From<&str> for ApiKey {
    fn from(value: &str) -> Self {
        Self(value.into())
    }
}

impl From<String> for ApiKey {
    fn from(value: String) -> Self {
        Self(value.into())
    }
}

impl From<SecretString> for ApiKey {
    fn from(value: SecretString) -> Self {
        Self(value)
    }
}

impl ExposeSecret<str> for ApiKey {
    fn expose_secret(&self) -> &str {
        self.0.expose_secret()
    }
}

/// The immutable identity a client presents to the API.
///
/// If an API key is present, every outgoing request carries
/// `Authorization: Bearer <key>` and `Accept: application/json`; if absent,
/// neither header is sent. The user agent is optional and, when unset, the
/// `User-Agent` header is omitted entirely.
#[derive(Debug, Clone, Builder)]
pub struct ClientIdentity {
    /// The `User-Agent` string sent with every request.
    #[builder(into)]
    user_agent: Option<String>,

    /// The API key used for bearer authentication.
    #[builder(into)]
    api_key: Option<ApiKey>,

    /// The connect timeout applied to every request.
    #[builder(default = Duration::from_secs(10))]
    timeout: Duration,

    /// Whether the HTTP client follows redirects.
    #[builder(default = true)]
    follow_redirects: bool,
}

impl ClientIdentity {
    /// Returns the configured user agent, if any.
    #[must_use]
    pub fn user_agent(&self) -> Option<&str> {
        self.user_agent.as_deref()
    }

    /// Returns the configured API key, if any.
    #[must_use]
    pub fn api_key(&self) -> Option<&ApiKey> {
        self.api_key.as_ref()
    }

    /// Returns the configured connect timeout.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Returns whether the HTTP client follows redirects.
    #[must_use]
    pub fn follow_redirects(&self) -> bool {
        self.follow_redirects
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let identity = ClientIdentity::builder().build();
        assert!(identity.user_agent().is_none());
        assert!(identity.api_key().is_none());
        assert_eq!(identity.timeout(), Duration::from_secs(10));
        assert!(identity.follow_redirects());
    }

    #[test]
    fn api_key_is_redacted_in_debug() {
        let identity = ClientIdentity::builder()
            .user_agent("skingen-tests/0.1")
            .api_key("msk_very_secret")
            .build();
        let rendered = format!("{identity:?}");
        assert!(!rendered.contains("msk_very_secret"));
        assert!(rendered.contains("skingen-tests/0.1"));
    }
}
