//! Response wrapping and outcome classification.
//!
//! Every raw HTTP response — whatever its status code — flows through
//! [`wrap`], which parses the body as JSON, normalizes the headers, and
//! hands both to a caller-supplied result constructor. The constructor turns
//! the parsed body into an endpoint-specific typed result; [`wrap`] then
//! classifies the outcome:
//!
//! - the body is not valid JSON, or the constructor cannot deserialize its
//!   payload → [`ResponseError::Parse`], a protocol-level failure;
//! - the constructed result reports failure → [`ResponseError::Api`],
//!   carrying the full typed result for diagnostics;
//! - otherwise the typed result is returned as-is.
//!
//! Because the constructor — not the wrapper — owns payload deserialization
//! and the success determination, one transport pipeline serves every
//! endpoint schema without knowing any of them.

mod headers;

use std::collections::HashMap;
use std::fmt;

use bon::Builder;
use bytes::Bytes;
use http::StatusCode;
use serde::de::DeserializeOwned;
use serde_json::Value;
use snafu::prelude::*;

use crate::platform::MaybeSendSync;

pub use headers::normalize_headers;

/// The parsed, normalized form of one raw HTTP response, as handed to a
/// result constructor.
#[derive(Debug, Clone)]
pub struct RawResponse {
    /// The HTTP status code.
    pub status: StatusCode,
    /// Normalized headers: lower-cased names, multi-values joined with `", "`.
    pub headers: HashMap<String, String>,
    /// The response body, parsed as generic JSON.
    pub body: Value,
}

/// A typed result constructed from one response.
///
/// Implemented by [`ApiResponse`] and by any endpoint-specific result type a
/// caller supplies its own constructor for. The error taxonomy stays generic
/// over this trait so an API-level failure can carry the complete typed
/// result back to the caller.
pub trait WrappedResponse: fmt::Debug + MaybeSendSync + 'static {
    /// The HTTP status code of the response this result was built from.
    fn status(&self) -> StatusCode;

    /// Whether the response represents a successful operation.
    fn is_success(&self) -> bool;

    /// The error text carried by the response body, if any.
    fn error(&self) -> Option<&str>;
}

/// The stock typed result: status, normalized headers, an optional payload
/// of type `T`, and the success/error state read from the body.
///
/// Constructed exactly once per request — via [`ApiResponse::from_body`],
/// [`ApiResponse::from_field`], or the builder for custom constructors —
/// and immutable afterwards.
#[derive(Debug, Clone, PartialEq, Builder)]
pub struct ApiResponse<T> {
    status: StatusCode,
    #[builder(default)]
    headers: HashMap<String, String>,
    body: Option<T>,
    success: bool,
    #[builder(into)]
    error_code: Option<String>,
    #[builder(into)]
    error: Option<String>,
}

impl<T> ApiResponse<T> {
    /// Returns the deserialized payload, if the response carried one.
    #[must_use]
    pub fn body(&self) -> Option<&T> {
        self.body.as_ref()
    }

    /// Consumes the result and returns the payload, if any.
    #[must_use]
    pub fn into_body(self) -> Option<T> {
        self.body
    }

    /// Returns a normalized header value by its lower-case name.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).map(String::as_str)
    }

    /// Returns the full normalized header map.
    #[must_use]
    pub fn headers(&self) -> &HashMap<String, String> {
        &self.headers
    }

    /// Returns the machine-readable error code, if the body carried one.
    #[must_use]
    pub fn error_code(&self) -> Option<&str> {
        self.error_code.as_deref()
    }
}

impl<T: DeserializeOwned> ApiResponse<T> {
    /// Stock constructor for endpoints whose payload is the whole body.
    ///
    /// The payload is only deserialized for successful responses; failed
    /// responses keep their error state and an empty payload so a `500`
    /// with an unrelated body shape still classifies cleanly.
    ///
    /// # Errors
    ///
    /// Returns an error when the body of a successful response does not
    /// deserialize into `T`. The caller treats this as a parse failure.
    pub fn from_body(raw: RawResponse) -> Result<Self, serde_json::Error> {
        let (success, error_code, error) = classify(raw.status, &raw.body);
        let body = if success {
            Some(serde_json::from_value(raw.body)?)
        } else {
            None
        };
        Ok(Self {
            status: raw.status,
            headers: raw.headers,
            body,
            success,
            error_code,
            error,
        })
    }

    /// Returns a stock constructor for endpoints whose payload sits under a
    /// named top-level field, e.g. `{"success": true, "skin": {...}}`.
    pub fn from_field(
        field: &'static str,
    ) -> impl FnOnce(RawResponse) -> Result<Self, serde_json::Error> {
        move |mut raw: RawResponse| {
            let (success, error_code, error) = classify(raw.status, &raw.body);
            let body = match raw.body.get_mut(field).map(Value::take) {
                Some(value) if !value.is_null() => Some(serde_json::from_value(value)?),
                _ => None,
            };
            Ok(Self {
                status: raw.status,
                headers: raw.headers,
                body,
                success,
                error_code,
                error,
            })
        }
    }
}

impl<T: fmt::Debug + MaybeSendSync + 'static> WrappedResponse for ApiResponse<T> {
    fn status(&self) -> StatusCode {
        self.status
    }

    fn is_success(&self) -> bool {
        self.success
    }

    fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}

/// Reads the success flag and error details out of a parsed body.
///
/// An explicit boolean `success` field wins. Without one, the response is
/// successful when the status is 2xx and the body carries no `error` field
/// and no non-empty `errors` array. Error details are read from `errors[0]`,
/// then `error` (string or `{code, message}` object), then `message`.
fn classify(status: StatusCode, body: &Value) -> (bool, Option<String>, Option<String>) {
    let errors_first = body
        .get("errors")
        .and_then(Value::as_array)
        .and_then(|errors| errors.first());

    let success = body.get("success").and_then(Value::as_bool).unwrap_or_else(|| {
        status.is_success() && body.get("error").is_none() && errors_first.is_none()
    });
    if success {
        return (true, None, None);
    }

    let owned = |value: &Value| value.as_str().map(str::to_owned);
    if let Some(first) = errors_first {
        let code = first.get("code").and_then(|c| owned(c));
        let message = first.get("message").and_then(|m| owned(m));
        return (false, code, message);
    }
    match body.get("error") {
        Some(Value::String(message)) => return (false, None, Some(message.clone())),
        Some(error @ Value::Object(_)) => {
            let code = error.get("code").and_then(|c| owned(c));
            let message = error.get("message").and_then(|m| owned(m));
            return (false, code, message);
        }
        _ => {}
    }
    let message = body.get("message").and_then(|m| owned(m));
    (false, None, message)
}

/// Turns one raw response into a typed result or a classified failure.
///
/// # Errors
///
/// Returns [`ResponseError::Parse`] when the body is not valid JSON or the
/// constructor cannot deserialize it, and [`ResponseError::Api`] when the
/// constructed result reports failure.
pub fn wrap<R, F>(
    status: StatusCode,
    headers: &http::HeaderMap,
    raw_body: &Bytes,
    constructor: F,
) -> Result<R, ResponseError<R>>
where
    R: WrappedResponse,
    F: FnOnce(RawResponse) -> Result<R, serde_json::Error>,
{
    let body: Value = serde_json::from_slice(raw_body)
        .inspect_err(|source| {
            tracing::warn!(
                body = %String::from_utf8_lossy(raw_body),
                error = %source,
                "failed to parse response body"
            );
        })
        .context(ParseSnafu {
            body: String::from_utf8_lossy(raw_body),
        })?;

    let wrapped = constructor(RawResponse {
        status,
        headers: normalize_headers(headers),
        body,
    })
    .inspect_err(|source| {
        tracing::warn!(
            body = %String::from_utf8_lossy(raw_body),
            error = %source,
            "failed to deserialize response payload"
        );
    })
    .context(ParseSnafu {
        body: String::from_utf8_lossy(raw_body),
    })?;

    if wrapped.is_success() {
        Ok(wrapped)
    } else {
        let message = wrapped.error().unwrap_or("Request Failed").to_owned();
        ApiSnafu {
            message,
            response: wrapped,
        }
        .fail()
    }
}

/// A classified response failure.
#[derive(Debug, Snafu)]
pub enum ResponseError<R: WrappedResponse> {
    /// The body was received but is not valid structured data, or its
    /// payload could not be deserialized. Indicates a protocol or version
    /// mismatch rather than an API-level refusal.
    #[snafu(display("Failed to parse response body: {body}"))]
    Parse {
        /// The raw body text, kept for diagnosis.
        body: String,
        /// The underlying JSON error.
        source: serde_json::Error,
    },
    /// A well-formed response whose content signals that the remote
    /// operation did not succeed.
    #[snafu(display("{message}"))]
    Api {
        /// The error text from the body, or `"Request Failed"` when the
        /// body carried none.
        message: String,
        /// The complete typed result, so status, headers, and error details
        /// remain available for diagnostics.
        response: R,
    },
}

impl<R: WrappedResponse> crate::Error for ResponseError<R> {
    fn is_retryable(&self) -> bool {
        match self {
            Self::Parse { .. } => false,
            Self::Api { response, .. } => response.status().is_server_error(),
        }
    }
}
