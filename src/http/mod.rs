//! HTTP client and response abstractions.
//!
//! This module defines traits that decouple the library from any specific HTTP
//! implementation. Users provide their own [`HttpClient`] (e.g. backed by
//! `reqwest`, `hyper`, or a WASM-compatible client) and the library operates
//! against these traits. The transport core hands every raw response to the
//! response wrapper unchanged; nothing in this module inspects status codes
//! or body content.

#[cfg(all(not(target_arch = "wasm32"), feature = "http-client-reqwest-0_12"))]
mod reqwest_0_12;
#[cfg(test)]
pub(crate) mod testing;

#[cfg(all(not(target_arch = "wasm32"), feature = "http-client-reqwest-0_12"))]
pub use reqwest_0_12::client_for_identity;

use bytes::Bytes;
use http::{HeaderMap, Request, StatusCode};

use crate::platform::{MaybeSend, MaybeSendSync};

/// Defines the common interface for HTTP requests.
pub trait HttpClient: MaybeSendSync {
    /// The error type returned by the client for a failed request.
    ///
    /// A failure here is a transport failure: the exchange could not be
    /// completed and no response classification took place.
    type Error: crate::Error;

    /// The associated response type returned by this HTTP client.
    type Response: HttpResponse;

    /// Executes an HTTP request and returns an owned response.
    ///
    /// The request body is provided as [`Bytes`]; implementations must not
    /// retry on failure — one call means one attempt on the wire.
    fn execute(
        &self,
        request: Request<Bytes>,
    ) -> impl Future<Output = Result<Self::Response, Self::Error>> + MaybeSend;
}

/// Defines the common interface for HTTP responses.
pub trait HttpResponse: MaybeSendSync {
    /// The error type when getting the response body.
    type Error: crate::Error;

    /// Returns the HTTP status code of the response.
    fn status(&self) -> StatusCode;

    /// Returns the response's HTTP headers.
    fn headers(&self) -> HeaderMap;

    /// Consumes the response and asynchronously returns its body as [`Bytes`].
    fn body(self) -> impl Future<Output = Result<Bytes, Self::Error>> + MaybeSend;
}
