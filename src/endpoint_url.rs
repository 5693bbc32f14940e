//! A validated endpoint URL.
//!
//! [`EndpointUrl`] is a newtype over [`Uri`] that guarantees the URL has been
//! validated. It can be constructed from common string and URL types via
//! [`IntoEndpointUrl`], and per-endpoint URLs are derived from an API base
//! URL via [`EndpointUrl::join`].

use std::convert::Infallible;
use std::fmt;

use http::{Uri, uri::InvalidUri};
use serde::{Deserialize, Serialize};
use url::Url;

/// A validated endpoint URL.
///
/// This is a newtype over [`Uri`] which can be constructed from common
/// string and URL types via [`IntoEndpointUrl`]. Once constructed, it can be
/// freely cloned and passed between calls without re-validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointUrl(Uri);

impl Serialize for EndpointUrl {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0.to_string())
    }
}

impl<'de> Deserialize<'de> for EndpointUrl {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.into_endpoint_url().map_err(serde::de::Error::custom)
    }
}

impl fmt::Display for EndpointUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl EndpointUrl {
    /// Returns the inner [`Uri`].
    #[must_use]
    pub fn as_uri(&self) -> &Uri {
        &self.0
    }

    /// Consumes the [`EndpointUrl`] and returns the inner [`Uri`].
    #[must_use]
    pub fn into_uri(self) -> Uri {
        self.0
    }

    /// Derives a new endpoint URL by appending a path segment to this one.
    ///
    /// Trailing slashes on the base and leading slashes on `path` are
    /// collapsed, so `https://api.example.com/v2/` joined with `/skins`
    /// yields `https://api.example.com/v2/skins`.
    ///
    /// # Errors
    ///
    /// Returns an error if the joined string is not a valid URI, e.g. when
    /// `path` contains characters that are not legal in a URI path.
    pub fn join(&self, path: &str) -> Result<EndpointUrl, InvalidUri> {
        let base = self.0.to_string();
        format!("{}/{}", base.trim_end_matches('/'), path.trim_start_matches('/'))
            .parse::<Uri>()
            .map(EndpointUrl)
    }
}

/// Conversion trait for types that can be turned into an [`EndpointUrl`].
pub trait IntoEndpointUrl {
    /// The error type returned if the conversion fails.
    type Error;

    /// Attempts to convert this value into an [`EndpointUrl`].
    fn into_endpoint_url(self) -> Result<EndpointUrl, Self::Error>;
}

impl IntoEndpointUrl for EndpointUrl {
    type Error = Infallible;

    fn into_endpoint_url(self) -> Result<EndpointUrl, Self::Error> {
        Ok(self)
    }
}

impl IntoEndpointUrl for Uri {
    type Error = Infallible;

    fn into_endpoint_url(self) -> Result<EndpointUrl, Self::Error> {
        Ok(EndpointUrl(self))
    }
}

impl IntoEndpointUrl for Url {
    type Error = InvalidUri;

    fn into_endpoint_url(self) -> Result<EndpointUrl, Self::Error> {
        self.as_str().parse::<Uri>().map(EndpointUrl)
    }
}

impl IntoEndpointUrl for &str {
    type Error = InvalidUri;

    fn into_endpoint_url(self) -> Result<EndpointUrl, Self::Error> {
        self.parse::<Uri>().map(EndpointUrl)
    }
}

impl IntoEndpointUrl for String {
    type Error = InvalidUri;

    fn into_endpoint_url(self) -> Result<EndpointUrl, Self::Error> {
        self.parse::<Uri>().map(EndpointUrl)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn join_collapses_slashes() {
        let base = "https://api.example.com/v2/".into_endpoint_url().unwrap();
        let joined = base.join("/skins").unwrap();
        assert_eq!(joined.to_string(), "https://api.example.com/v2/skins");
    }

    #[test]
    fn join_without_slashes() {
        let base = "https://api.example.com/v2".into_endpoint_url().unwrap();
        let joined = base.join("queue/abc123").unwrap();
        assert_eq!(joined.to_string(), "https://api.example.com/v2/queue/abc123");
    }

    #[test]
    fn join_rejects_invalid_paths() {
        let base = "https://api.example.com".into_endpoint_url().unwrap();
        assert!(base.join("sk ins").is_err());
    }
}
