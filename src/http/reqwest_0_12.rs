use std::sync::LazyLock;

use super::{HttpClient, HttpResponse};
use crate::identity::ClientIdentity;

use bytes::Bytes;
use http::{HeaderMap, Request, StatusCode};

/// Builds a [`reqwest::Client`] honoring a [`ClientIdentity`]'s transport
/// settings: the connect timeout and the redirect policy.
///
/// Identity headers (`User-Agent`, `Authorization`, `Accept`) are attached
/// per request by the transport core, not baked into the client.
///
/// # Errors
///
/// Returns an error if the underlying TLS backend fails to initialize.
pub fn client_for_identity(identity: &ClientIdentity) -> reqwest::Result<reqwest::Client> {
    let mut builder = reqwest::Client::builder().connect_timeout(identity.timeout());
    if !identity.follow_redirects() {
        builder = builder.redirect(reqwest::redirect::Policy::none());
    }
    builder.build()
}

impl HttpClient for reqwest::Client {
    /// The response type is `reqwest::Response`.
    type Response = reqwest::Response;
    /// The error type is `reqwest::Error`.
    type Error = reqwest::Error;

    /// Executes an `http::Request` using the `reqwest::Client`.
    ///
    /// This method converts the generic `http::Request<Bytes>` into a
    /// `reqwest::Request` and then sends it. One call, one attempt.
    async fn execute(&self, request: Request<Bytes>) -> Result<Self::Response, Self::Error> {
        let (parts, body) = request.into_parts();
        let reqwest_request = self
            .request(parts.method, parts.uri.to_string())
            .headers(parts.headers)
            .body(body)
            .build()?;

        reqwest::Client::execute(self, reqwest_request).await
    }
}

impl HttpClient for LazyLock<reqwest::Client> {
    /// The response type is `reqwest::Response`.
    type Response = reqwest::Response;
    /// The error type is `reqwest::Error`.
    type Error = reqwest::Error;

    /// Executes an `http::Request` using a lazily initialized
    /// `reqwest::Client`.
    async fn execute(&self, request: Request<Bytes>) -> Result<Self::Response, Self::Error> {
        let (parts, body) = request.into_parts();
        let reqwest_request = self
            .request(parts.method, parts.uri.to_string())
            .headers(parts.headers)
            .body(body)
            .build()?;

        reqwest::Client::execute(self, reqwest_request).await
    }
}

impl HttpResponse for reqwest::Response {
    type Error = reqwest::Error;

    /// Returns the HTTP status code of the `reqwest::Response`.
    fn status(&self) -> StatusCode {
        self.status()
    }

    /// Returns the `reqwest::Response`'s headers.
    fn headers(&self) -> HeaderMap {
        self.headers().clone()
    }

    /// Consumes the `reqwest::Response` and asynchronously returns its body
    /// as `bytes::Bytes`.
    async fn body(self) -> Result<Bytes, Self::Error> {
        self.bytes().await
    }
}

impl crate::Error for reqwest::Error {
    fn is_retryable(&self) -> bool {
        self.is_connect() || self.is_timeout()
    }
}
