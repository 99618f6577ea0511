//
//  cf-client
//  api/response.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Response
//!
//! The transport fills a [`Response`] for every round trip that reached the
//! server, whatever the status code. The raw body is stored before any
//! wrapper gets a chance to turn the status into an error, so callers can
//! always report what the server said.

use percent_encoding::percent_decode_str;
use reqwest::header::HeaderMap;
use serde::de::DeserializeOwned;

use crate::api::common::{CcError, Result};

/// Header carrying advisory messages.
pub const WARNINGS_HEADER: &str = "x-cf-warnings";

/// Header carrying the router-assigned request identifier.
pub const REQUEST_ID_HEADER: &str = "x-vcap-request-id";

/// The outcome of a single round trip.
#[derive(Debug, Clone, Default)]
pub struct Response {
    /// HTTP status code; `0` until a response has been received
    pub status: u16,
    /// Protocol version as reported by the server, e.g. `HTTP/1.1`
    pub protocol: String,
    pub headers: HeaderMap,
    /// Body bytes exactly as received
    pub raw_body: Vec<u8>,
    /// Parsed `X-Cf-Warnings` entries
    pub warnings: Vec<String>,
    /// Value of the `Location` header, used for asynchronous job URLs
    pub resource_location_url: Option<String>,
}

impl Response {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` for 2xx statuses.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Decodes the raw body as JSON.
    ///
    /// # Errors
    ///
    /// Returns [`CcError::Decode`] if the body is not valid JSON for `T`.
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_slice(&self.raw_body).map_err(|e| CcError::Decode(e.to_string()))
    }

    /// Like [`Response::decode`], but treats an empty body as `T::default()`.
    pub fn decode_or_default<T: DeserializeOwned + Default>(&self) -> Result<T> {
        if self.raw_body.iter().all(u8::is_ascii_whitespace) {
            return Ok(T::default());
        }
        self.decode()
    }

    /// Returns all `X-Vcap-Request-Id` values.
    pub fn request_ids(&self) -> Vec<String> {
        self.headers
            .get_all(REQUEST_ID_HEADER)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .map(str::to_string)
            .collect()
    }
}

/// Parses warning header values.
///
/// Each value is split on commas; every piece is URL-decoded (with `+` as a
/// space) and trimmed. Empty pieces are dropped. Values from repeated headers
/// are concatenated in order.
///
/// # Example
///
/// ```rust
/// use cf_client::api::parse_warnings;
///
/// let warnings = parse_warnings(["42, Ed McMann, the 1942 doggers"]);
/// assert_eq!(warnings, vec!["42", "Ed McMann", "the 1942 doggers"]);
///
/// let encoded = parse_warnings(["a%2Cb,c+d"]);
/// assert_eq!(encoded, vec!["a,b", "c d"]);
/// ```
pub fn parse_warnings<'a, I>(values: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    values
        .into_iter()
        .flat_map(|value| value.split(','))
        .map(|piece| {
            let spaced = piece.replace('+', " ");
            percent_decode_str(&spaced).decode_utf8_lossy().trim().to_string()
        })
        .filter(|warning| !warning.is_empty())
        .collect()
}

/// Extracts warnings from a header map.
pub fn warnings_from_headers(headers: &HeaderMap) -> Vec<String> {
    parse_warnings(
        headers
            .get_all(WARNINGS_HEADER)
            .iter()
            .filter_map(|v| v.to_str().ok()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::HeaderValue;

    #[test]
    fn test_parse_warnings_trims_each_entry() {
        let warnings = parse_warnings(["42, Ed McMann, the 1942 doggers"]);
        assert_eq!(warnings, vec!["42", "Ed McMann", "the 1942 doggers"]);
    }

    #[test]
    fn test_parse_warnings_decodes_and_drops_empty() {
        let warnings = parse_warnings(["Deprecated%20endpoint, ,use%2Fv3"]);
        assert_eq!(warnings, vec!["Deprecated endpoint", "use/v3"]);
    }

    #[test]
    fn test_repeated_headers_are_concatenated() {
        let mut headers = HeaderMap::new();
        headers.append(WARNINGS_HEADER, HeaderValue::from_static("one,two"));
        headers.append(WARNINGS_HEADER, HeaderValue::from_static("three"));
        assert_eq!(warnings_from_headers(&headers), vec!["one", "two", "three"]);
    }

    #[test]
    fn test_decode_or_default_skips_empty_body() {
        let response = Response::new();
        let value: Option<serde_json::Value> = response.decode_or_default().unwrap();
        assert!(value.is_none());
    }

    #[test]
    fn test_decode_reports_malformed_json() {
        let response = Response {
            raw_body: b"{not json".to_vec(),
            ..Default::default()
        };
        assert!(matches!(
            response.decode::<serde_json::Value>(),
            Err(CcError::Decode(_))
        ));
    }

    #[test]
    fn test_request_ids() {
        let mut response = Response::new();
        response
            .headers
            .append(REQUEST_ID_HEADER, HeaderValue::from_static("id-1"));
        response
            .headers
            .append(REQUEST_ID_HEADER, HeaderValue::from_static("id-2"));
        assert_eq!(response.request_ids(), vec!["id-1", "id-2"]);
    }
}
