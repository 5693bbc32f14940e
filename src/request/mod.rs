//! The transport core: builds and sends one HTTP exchange per call.
//!
//! [`RequestHandler`] issues the three request shapes the API uses — plain
//! GET, JSON POST, and multipart file upload — with the configured identity
//! headers, then hands every raw response to the response wrapper for
//! classification. It never inspects status codes or body content itself,
//! performs no retries, and keeps no mutable state across calls; concurrent
//! sends against one handler only share the immutable [`ClientIdentity`]
//! and the underlying client's connection pool.

pub mod multipart;

use std::collections::BTreeMap;

use bytes::Bytes;
use http::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE, USER_AGENT};
use http::{HeaderMap, HeaderValue, Method, Request};
use secrecy::ExposeSecret as _;
use serde::Serialize;
use snafu::prelude::*;

use crate::{
    EndpointUrl,
    http::{HttpClient, HttpResponse},
    identity::ClientIdentity,
    response::{RawResponse, ResponseError, WrappedResponse, wrap},
};

/// The error type of one send through a handler backed by client `C`,
/// producing typed results of type `R`.
pub type SendError<C, R> = RequestError<
    <C as HttpClient>::Error,
    <<C as HttpClient>::Response as HttpResponse>::Error,
    R,
>;

/// Issues requests with a fixed identity and wraps their responses.
#[derive(Debug)]
pub struct RequestHandler<C> {
    identity: ClientIdentity,
    http_client: C,
}

impl<C> RequestHandler<C> {
    /// Creates a handler from an identity and an HTTP client.
    ///
    /// The identity's transport settings (timeout, redirect policy) must
    /// already be reflected in `http_client`; see
    /// [`client_for_identity`](crate::http::client_for_identity) for the
    /// `reqwest` case.
    pub fn new(identity: ClientIdentity, http_client: C) -> Self {
        Self {
            identity,
            http_client,
        }
    }

    /// Returns the identity this handler attaches to every request.
    #[must_use]
    pub fn identity(&self) -> &ClientIdentity {
        &self.identity
    }

    /// Builds the headers every request carries.
    ///
    /// `User-Agent` only when the identity has one; with an API key,
    /// `Authorization: Bearer <key>` (marked sensitive) plus
    /// `Accept: application/json`; without a key, neither.
    fn identity_headers(&self) -> Result<HeaderMap, BuildRequestError> {
        let mut headers = HeaderMap::new();
        if let Some(user_agent) = self.identity.user_agent() {
            headers.insert(
                USER_AGENT,
                HeaderValue::from_str(user_agent).context(BadHeaderSnafu)?,
            );
        }
        if let Some(api_key) = self.identity.api_key() {
            let mut bearer =
                HeaderValue::from_str(&format!("Bearer {}", api_key.expose_secret()))
                    .context(BadHeaderSnafu)?;
            bearer.set_sensitive(true);
            headers.insert(AUTHORIZATION, bearer);
            headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        }
        Ok(headers)
    }

    /// Builds a GET request with identity headers and no body.
    ///
    /// # Errors
    ///
    /// Returns an error if an identity value is not a legal header value.
    pub fn build_get(&self, url: &EndpointUrl) -> Result<Request<Bytes>, BuildRequestError> {
        let (mut parts, ()) = Request::new(()).into_parts();
        parts.method = Method::GET;
        parts.uri = url.as_uri().clone();
        parts.headers = self.identity_headers()?;
        Ok(Request::from_parts(parts, Bytes::new()))
    }

    /// Builds a POST request carrying `body` JSON-encoded.
    ///
    /// # Errors
    ///
    /// Returns an error if `body` cannot be serialized or an identity value
    /// is not a legal header value.
    pub fn build_post_json<B: Serialize>(
        &self,
        url: &EndpointUrl,
        body: &B,
    ) -> Result<Request<Bytes>, BuildRequestError> {
        let encoded = serde_json::to_vec(body).context(SerializeBodySnafu)?;

        let (mut parts, ()) = Request::new(()).into_parts();
        parts.method = Method::POST;
        parts.uri = url.as_uri().clone();
        parts.headers = self.identity_headers()?;
        parts
            .headers
            .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        Ok(Request::from_parts(parts, encoded.into()))
    }

    /// Builds a POST request carrying one file plus extra string fields as
    /// `multipart/form-data`, under a freshly generated boundary.
    ///
    /// # Errors
    ///
    /// Returns an error if an identity value is not a legal header value.
    pub fn build_post_form_data_file(
        &self,
        url: &EndpointUrl,
        field_name: &str,
        filename: &str,
        file: &[u8],
        extra_fields: &BTreeMap<String, String>,
    ) -> Result<Request<Bytes>, BuildRequestError> {
        let encoded = multipart::encode_file_upload(field_name, filename, file, extra_fields);

        let (mut parts, ()) = Request::new(()).into_parts();
        parts.method = Method::POST;
        parts.uri = url.as_uri().clone();
        parts.headers = self.identity_headers()?;
        parts.headers.insert(
            CONTENT_TYPE,
            HeaderValue::from_str(&format!(
                "multipart/form-data; boundary={}",
                encoded.boundary
            ))
            .context(BadHeaderSnafu)?,
        );
        Ok(Request::from_parts(parts, encoded.body))
    }
}

impl<C: HttpClient> RequestHandler<C> {
    /// Issues a GET and wraps the response through `constructor`.
    ///
    /// # Errors
    ///
    /// See [`RequestError`] for the failure classes.
    pub async fn get_json<R, F>(
        &self,
        url: &EndpointUrl,
        constructor: F,
    ) -> Result<R, SendError<C, R>>
    where
        R: WrappedResponse,
        F: FnOnce(RawResponse) -> Result<R, serde_json::Error>,
    {
        let request = self.build_get(url).context(BuildRequestSnafu)?;
        self.send(request, constructor).await
    }

    /// Issues a JSON POST and wraps the response through `constructor`.
    ///
    /// # Errors
    ///
    /// See [`RequestError`] for the failure classes.
    pub async fn post_json<B, R, F>(
        &self,
        url: &EndpointUrl,
        body: &B,
        constructor: F,
    ) -> Result<R, SendError<C, R>>
    where
        B: Serialize,
        R: WrappedResponse,
        F: FnOnce(RawResponse) -> Result<R, serde_json::Error>,
    {
        let request = self.build_post_json(url, body).context(BuildRequestSnafu)?;
        self.send(request, constructor).await
    }

    /// Issues a multipart file upload and wraps the response through
    /// `constructor`.
    ///
    /// # Errors
    ///
    /// See [`RequestError`] for the failure classes.
    pub async fn post_form_data_file<R, F>(
        &self,
        url: &EndpointUrl,
        field_name: &str,
        filename: &str,
        file: &[u8],
        extra_fields: &BTreeMap<String, String>,
        constructor: F,
    ) -> Result<R, SendError<C, R>>
    where
        R: WrappedResponse,
        F: FnOnce(RawResponse) -> Result<R, serde_json::Error>,
    {
        let request = self
            .build_post_form_data_file(url, field_name, filename, file, extra_fields)
            .context(BuildRequestSnafu)?;
        self.send(request, constructor).await
    }

    /// One attempt on the wire, then classification. The raw response is
    /// handed to the wrapper whatever its status code.
    async fn send<R, F>(&self, request: Request<Bytes>, constructor: F) -> Result<R, SendError<C, R>>
    where
        R: WrappedResponse,
        F: FnOnce(RawResponse) -> Result<R, serde_json::Error>,
    {
        let response = self
            .http_client
            .execute(request)
            .await
            .context(TransportSnafu)?;
        let status = response.status();
        let headers = response.headers();
        let raw_body = response.body().await.context(ResponseBodyReadSnafu)?;

        wrap(status, &headers, &raw_body, constructor).context(ResponseSnafu)
    }
}

/// A failure while constructing a request, before anything touches the wire.
#[derive(Debug, Snafu)]
pub enum BuildRequestError {
    /// An identity value or boundary was not a legal header value.
    #[snafu(display("Provided header value was invalid"))]
    BadHeader {
        /// The underlying error.
        source: http::header::InvalidHeaderValue,
    },
    /// The JSON body could not be serialized.
    #[snafu(display("Failed to serialize request body"))]
    SerializeBody {
        /// The underlying error.
        source: serde_json::Error,
    },
}

impl crate::Error for BuildRequestError {
    fn is_retryable(&self) -> bool {
        false
    }
}

/// A classified failure of one send operation.
///
/// The three outcome classes of a completed exchange — transport failure,
/// parse failure, API-level failure — are `Transport`/`ResponseBodyRead`
/// and the two [`ResponseError`] variants. `BuildRequest` precedes the
/// exchange entirely.
#[derive(Debug, Snafu)]
pub enum RequestError<HttpReqErr: crate::Error, HttpRespErr: crate::Error, R: WrappedResponse> {
    /// The request could not be constructed.
    #[snafu(display("Failed to build HTTP request"))]
    BuildRequest {
        /// The underlying error.
        source: BuildRequestError,
    },
    /// The exchange could not be completed: connection failure, timeout, or
    /// interruption during send. The outcome of the remote operation is
    /// unknown.
    #[snafu(display("Failed to make HTTP request"))]
    Transport {
        /// The underlying client error.
        source: HttpReqErr,
    },
    /// The response arrived but its body stream failed mid-read.
    #[snafu(display("Failed to read response body"))]
    ResponseBodyRead {
        /// The underlying error.
        source: HttpRespErr,
    },
    /// The response was received in full but classified as a failure.
    Response {
        /// The parse or API-level failure.
        source: ResponseError<R>,
    },
}

impl<HttpReqErr, HttpRespErr, R> crate::Error for RequestError<HttpReqErr, HttpRespErr, R>
where
    HttpReqErr: crate::Error,
    HttpRespErr: crate::Error,
    R: WrappedResponse,
{
    fn is_retryable(&self) -> bool {
        match self {
            Self::BuildRequest { source } => source.is_retryable(),
            Self::Transport { source } => source.is_retryable(),
            Self::ResponseBodyRead { source } => source.is_retryable(),
            Self::Response { source } => source.is_retryable(),
        }
    }
}
