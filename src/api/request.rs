//
//  cf-client
//  api/request.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Request Descriptor
//!
//! A [`Request`] is everything the connection chain needs to perform one
//! round trip: method, fully resolved URL (query included), headers and an
//! optional body.
//!
//! Bodies come in two flavours:
//!
//! - [`RequestBody::Bytes`] is held in memory and can be replayed any number
//!   of times, which is what the retry and auth wrappers rely on.
//! - [`RequestBody::Pipe`] is the read half of a streaming upload. It can be
//!   sent exactly once; rewinding it afterwards fails with
//!   [`CcError::PipeSeek`].
//!
//! Whether a request may be retried is an explicit per-request flag. It
//! defaults from the method (idempotent verbs are eligible) and can be
//! overridden with [`Request::with_retry_eligible`].

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::Method;
use serde::Serialize;
use tokio::io::DuplexStream;
use tokio_util::io::ReaderStream;
use url::Url;

use crate::api::common::{CcError, Result};

/// Ordered multi-map of query parameters.
///
/// Keys keep their insertion order and every value is encoded as its own
/// `key=value` pair, which is how the v2 API expects repeated `q` filters.
///
/// # Example
///
/// ```rust
/// use cf_client::api::Query;
///
/// let query = Query::new()
///     .add("q", "name:my-broker")
///     .add("q", "space_guid:abc")
///     .add("results-per-page", "50");
///
/// assert_eq!(query.encode(), "q=name%3Amy-broker&q=space_guid%3Aabc&results-per-page=50");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    entries: Vec<(String, Vec<String>)>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a value under `key`, keeping earlier values.
    pub fn add(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.push(key, value);
        self
    }

    /// In-place variant of [`Query::add`].
    pub fn push(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, values)) => values.push(value),
            None => self.entries.push((key, vec![value])),
        }
    }

    /// Returns the values recorded for `key`.
    pub fn get(&self, key: &str) -> &[String] {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, values)| values.as_slice())
            .unwrap_or(&[])
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Encodes as `application/x-www-form-urlencoded`.
    pub fn encode(&self) -> String {
        let mut serializer = url::form_urlencoded::Serializer::new(String::new());
        for (key, values) in &self.entries {
            for value in values {
                serializer.append_pair(key, value);
            }
        }
        serializer.finish()
    }

    /// Appends every pair to the URL's query string.
    pub fn apply_to(&self, url: &mut Url) {
        if self.is_empty() {
            return;
        }
        let mut pairs = url.query_pairs_mut();
        for (key, values) in &self.entries {
            for value in values {
                pairs.append_pair(key, value);
            }
        }
    }
}

/// A single-use streaming body.
///
/// Holds the read half of an in-memory pipe until the transport takes it.
#[derive(Debug)]
pub struct PipeBody {
    reader: Option<DuplexStream>,
}

impl PipeBody {
    pub fn new(reader: DuplexStream) -> Self {
        Self {
            reader: Some(reader),
        }
    }

    /// Returns `true` once the transport has taken the stream.
    pub fn is_consumed(&self) -> bool {
        self.reader.is_none()
    }

    /// Takes the stream, leaving the body consumed.
    pub fn take_reader(&mut self) -> Option<DuplexStream> {
        self.reader.take()
    }
}

/// The body of a [`Request`].
#[derive(Debug, Default)]
pub enum RequestBody {
    /// No body
    #[default]
    Empty,
    /// In-memory, replayable body
    Bytes(Vec<u8>),
    /// Streaming body that can only be sent once
    Pipe(PipeBody),
}

impl RequestBody {
    /// Returns the in-memory bytes, if this body is replayable.
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Self::Bytes(bytes) => Some(bytes),
            _ => None,
        }
    }

    /// Returns `true` if the body can be sent again.
    pub fn is_replayable(&self) -> bool {
        !matches!(self, Self::Pipe(_))
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }
}

/// A request travelling through the connection chain.
///
/// Wrappers receive `&mut Request` and may add headers (auth, tracing) before
/// delegating inward.
///
/// # Example
///
/// ```rust
/// use cf_client::api::Request;
/// use reqwest::Method;
/// use url::Url;
///
/// let url = Url::parse("https://api.example.com/v2/service_brokers").unwrap();
/// let request = Request::new(Method::GET, url);
///
/// assert!(request.retry_eligible());
/// assert!(!Request::new(Method::POST, request.url.clone()).retry_eligible());
/// ```
#[derive(Debug)]
pub struct Request {
    pub method: Method,
    pub url: Url,
    pub headers: HeaderMap,
    pub body: RequestBody,
    retry_eligible: bool,
}

impl Request {
    /// Creates a request with an `Accept: application/json` header and the
    /// method's default retry eligibility.
    pub fn new(method: Method, url: Url) -> Self {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        let retry_eligible = is_idempotent(&method);
        Self {
            method,
            url,
            headers,
            body: RequestBody::Empty,
            retry_eligible,
        }
    }

    /// Whether the retry wrapper may re-issue this request on a 5xx.
    pub fn retry_eligible(&self) -> bool {
        self.retry_eligible
    }

    /// Overrides the method-derived retry eligibility.
    pub fn with_retry_eligible(mut self, eligible: bool) -> Self {
        self.retry_eligible = eligible;
        self
    }

    /// Appends query parameters to the URL.
    pub fn with_query(mut self, query: &Query) -> Self {
        query.apply_to(&mut self.url);
        self
    }

    /// Sets a header, replacing any existing value.
    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Serializes `body` as JSON and sets the content type.
    pub fn with_json_body<T: Serialize + ?Sized>(mut self, body: &T) -> Result<Self> {
        let bytes = serde_json::to_vec(body).map_err(|e| CcError::Decode(e.to_string()))?;
        self.headers
            .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        self.body = RequestBody::Bytes(bytes);
        Ok(self)
    }

    /// Encodes `form` as a URL-encoded body and sets the content type.
    pub fn with_form_body(mut self, form: &Query) -> Self {
        self.headers.insert(
            CONTENT_TYPE,
            HeaderValue::from_static("application/x-www-form-urlencoded"),
        );
        self.body = RequestBody::Bytes(form.encode().into_bytes());
        self
    }

    /// Replaces the body.
    pub fn with_body(mut self, body: RequestBody) -> Self {
        self.body = body;
        self
    }

    /// Returns the `Content-Type` header, or an empty string.
    pub fn content_type(&self) -> &str {
        self.headers
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
    }

    /// Prepares the body for another attempt.
    ///
    /// Replayable bodies need no work. A pipe that has already been handed to
    /// the transport cannot be rewound.
    pub fn reset_body(&mut self) -> Result<()> {
        match &self.body {
            RequestBody::Pipe(pipe) if pipe.is_consumed() => Err(CcError::PipeSeek(
                "the streaming body was already sent".to_string(),
            )),
            _ => Ok(()),
        }
    }

    /// Produces the body for one transport attempt.
    ///
    /// Bytes are copied so the request can be replayed; a pipe is taken and
    /// left consumed.
    pub(crate) fn take_transport_body(&mut self) -> Result<Option<reqwest::Body>> {
        match &mut self.body {
            RequestBody::Empty => Ok(None),
            RequestBody::Bytes(bytes) => Ok(Some(reqwest::Body::from(bytes.clone()))),
            RequestBody::Pipe(pipe) => match pipe.reader.take() {
                Some(reader) => Ok(Some(reqwest::Body::wrap_stream(ReaderStream::new(reader)))),
                None => Err(CcError::PipeSeek(
                    "the streaming body was already sent".to_string(),
                )),
            },
        }
    }
}

fn is_idempotent(method: &Method) -> bool {
    matches!(
        *method,
        Method::GET | Method::HEAD | Method::PUT | Method::DELETE | Method::OPTIONS
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url() -> Url {
        Url::parse("https://api.example.com/v2/apps").unwrap()
    }

    #[test]
    fn test_query_preserves_order_and_repeats() {
        let query = Query::new().add("b", "2").add("a", "1").add("b", "3");
        assert_eq!(query.encode(), "b=2&b=3&a=1");
        assert_eq!(query.get("b"), &["2".to_string(), "3".to_string()]);
        assert!(query.get("missing").is_empty());
    }

    #[test]
    fn test_with_query_appends_to_url() {
        let request = Request::new(Method::GET, url()).with_query(&Query::new().add("q", "name:x"));
        assert_eq!(request.url.as_str(), "https://api.example.com/v2/apps?q=name%3Ax");
    }

    #[test]
    fn test_retry_eligibility_defaults_from_method() {
        assert!(Request::new(Method::GET, url()).retry_eligible());
        assert!(Request::new(Method::PUT, url()).retry_eligible());
        assert!(Request::new(Method::DELETE, url()).retry_eligible());
        assert!(!Request::new(Method::POST, url()).retry_eligible());
        assert!(!Request::new(Method::PATCH, url()).retry_eligible());
        assert!(Request::new(Method::POST, url())
            .with_retry_eligible(true)
            .retry_eligible());
    }

    #[test]
    fn test_bytes_body_is_replayable() {
        let mut request = Request::new(Method::PUT, url())
            .with_json_body(&serde_json::json!({"name": "x"}))
            .unwrap();
        assert_eq!(request.content_type(), "application/json");
        assert!(request.take_transport_body().unwrap().is_some());
        assert!(request.reset_body().is_ok());
        assert!(request.take_transport_body().unwrap().is_some());
    }

    #[tokio::test]
    async fn test_pipe_body_cannot_be_rewound_after_send() {
        let (_writer, reader) = tokio::io::duplex(16);
        let mut request = Request::new(Method::PUT, url())
            .with_body(RequestBody::Pipe(PipeBody::new(reader)));

        assert!(request.reset_body().is_ok());
        assert!(request.take_transport_body().unwrap().is_some());
        assert!(matches!(request.reset_body(), Err(CcError::PipeSeek(_))));
        assert!(matches!(
            request.take_transport_body(),
            Err(CcError::PipeSeek(_))
        ));
    }

    #[test]
    fn test_form_body() {
        let request = Request::new(Method::POST, url())
            .with_form_body(&Query::new().add("grant_type", "refresh_token"));
        assert_eq!(request.content_type(), "application/x-www-form-urlencoded");
        assert_eq!(request.body.as_bytes().unwrap(), b"grant_type=refresh_token");
    }
}
