//! Canned [`HttpClient`] implementations for tests.
//!
//! No test in this crate touches the network; wire-level behavior is
//! asserted against these fakes through the same trait seam a real client
//! uses.

use std::convert::Infallible;
use std::sync::Mutex;

use bytes::Bytes;
use http::{HeaderMap, Request, StatusCode};
use snafu::Snafu;

use super::{HttpClient, HttpResponse};

/// A client that answers every request with the same canned response and
/// records the requests it saw.
#[derive(Debug)]
pub(crate) struct StaticClient {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: &'static str,
    pub seen: Mutex<Vec<Request<Bytes>>>,
}

impl StaticClient {
    pub fn new(status: StatusCode, body: &'static str) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
            body,
            seen: Mutex::new(Vec::new()),
        }
    }
}

#[derive(Debug)]
pub(crate) struct StaticResponse {
    status: StatusCode,
    headers: HeaderMap,
    body: &'static str,
}

impl HttpClient for StaticClient {
    type Error = Infallible;
    type Response = StaticResponse;

    async fn execute(&self, request: Request<Bytes>) -> Result<Self::Response, Self::Error> {
        self.seen.lock().unwrap().push(request);
        Ok(StaticResponse {
            status: self.status,
            headers: self.headers.clone(),
            body: self.body,
        })
    }
}

impl HttpClient for &StaticClient {
    type Error = Infallible;
    type Response = StaticResponse;

    async fn execute(&self, request: Request<Bytes>) -> Result<Self::Response, Self::Error> {
        <StaticClient as HttpClient>::execute(self, request).await
    }
}

impl HttpResponse for StaticResponse {
    type Error = Infallible;

    fn status(&self) -> StatusCode {
        self.status
    }

    fn headers(&self) -> HeaderMap {
        self.headers.clone()
    }

    async fn body(self) -> Result<Bytes, Self::Error> {
        Ok(Bytes::from_static(self.body.as_bytes()))
    }
}

/// The error produced by [`FailingClient`].
#[derive(Debug, Snafu)]
#[snafu(display("connection refused"))]
pub(crate) struct ConnectionRefused;

impl crate::Error for ConnectionRefused {
    fn is_retryable(&self) -> bool {
        true
    }
}

/// A client whose every exchange fails at the transport level.
#[derive(Debug)]
pub(crate) struct FailingClient;

impl HttpClient for FailingClient {
    type Error = ConnectionRefused;
    type Response = StaticResponse;

    async fn execute(&self, _request: Request<Bytes>) -> Result<Self::Response, Self::Error> {
        Err(ConnectionRefused)
    }
}
