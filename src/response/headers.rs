//! Response header normalization.

use std::collections::HashMap;

use http::HeaderMap;

/// Normalizes a response header map into lower-cased names with
/// multi-valued headers joined by `", "`.
///
/// Normalization is idempotent: header names arrive case-insensitive and
/// leave as a single lower-cased entry per name, so `Content-Type` and
/// `content-type` collapse into one key. Header values that are not valid
/// UTF-8 are replaced lossily.
#[must_use]
pub fn normalize_headers(headers: &HeaderMap) -> HashMap<String, String> {
    headers
        .keys()
        .map(|name| {
            let joined = headers
                .get_all(name)
                .iter()
                .map(|value| String::from_utf8_lossy(value.as_bytes()))
                .collect::<Vec<_>>()
                .join(", ");
            (name.as_str().to_owned(), joined)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use http::header::{HeaderName, HeaderValue};

    use super::*;

    #[test]
    fn lowercases_names_case_insensitively() {
        let mut upper = HeaderMap::new();
        upper.insert(
            HeaderName::from_bytes(b"Content-Type").unwrap(),
            HeaderValue::from_static("application/json"),
        );
        let mut lower = HeaderMap::new();
        lower.insert(
            HeaderName::from_bytes(b"content-type").unwrap(),
            HeaderValue::from_static("application/json"),
        );

        let normalized = normalize_headers(&upper);
        assert_eq!(normalized, normalize_headers(&lower));
        assert_eq!(normalized.len(), 1);
        assert_eq!(
            normalized.get("content-type").map(String::as_str),
            Some("application/json")
        );
    }

    #[test]
    fn joins_multi_valued_headers() {
        let mut headers = HeaderMap::new();
        headers.append("set-cookie", HeaderValue::from_static("a=1"));
        headers.append("set-cookie", HeaderValue::from_static("b=2"));

        let normalized = normalize_headers(&headers);
        assert_eq!(normalized.get("set-cookie").map(String::as_str), Some("a=1, b=2"));
    }

    #[test]
    fn idempotent_over_single_values() {
        let mut headers = HeaderMap::new();
        headers.insert("x-ratelimit-remaining", HeaderValue::from_static("58"));
        let first = normalize_headers(&headers);
        let second = normalize_headers(&headers);
        assert_eq!(first, second);
    }
}
