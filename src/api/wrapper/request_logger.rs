//
//  cf-client
//  api/wrapper/request_logger.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Request and response logging.

use std::io;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Local;
use reqwest::header::{HeaderMap, AUTHORIZATION};
use reqwest::StatusCode;

use crate::api::common::Result;
use crate::api::{Connection, ConnectionWrapper, Request, RequestBody, Response};
use crate::output::{redact_form, RequestLoggerOutput, REDACTED_VALUE};

/// Protocol shown on the request line.
const REQUEST_PROTOCOL: &str = "HTTP/1.1";

/// Renders each request and its response to a [`RequestLoggerOutput`].
///
/// The request is logged before it is sent. The response is logged whenever
/// one was received, including error responses. Nothing is logged for the
/// response when the transport failed before a status arrived.
///
/// Failures of the output are reported through
/// [`handle_internal_error`](RequestLoggerOutput::handle_internal_error)
/// and never change the result of the request.
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
/// use cf_client::api::wrapper::RequestLoggerWrapper;
/// use cf_client::output::TerminalRequestLogger;
///
/// let logger = RequestLoggerWrapper::new(Arc::new(TerminalRequestLogger::new()));
/// ```
pub struct RequestLoggerWrapper {
    output: Arc<dyn RequestLoggerOutput>,
}

impl RequestLoggerWrapper {
    pub fn new(output: Arc<dyn RequestLoggerOutput>) -> Self {
        Self { output }
    }

    fn display_request(&self, request: &Request) -> io::Result<()> {
        self.output.display_type("REQUEST", Local::now())?;

        let mut uri = request.url.path().to_string();
        if let Some(query) = request.url.query() {
            uri.push('?');
            uri.push_str(query);
        }
        self.output
            .display_request_header(request.method.as_str(), &uri, REQUEST_PROTOCOL)?;
        self.output
            .display_host(request.url.host_str().unwrap_or_default())?;
        self.display_sorted_headers(&request.headers)?;

        let content_type = request.content_type();
        match &request.body {
            RequestBody::Empty => Ok(()),
            RequestBody::Bytes(bytes) if content_type.contains("json") => {
                self.output.display_json_body(bytes)
            }
            RequestBody::Bytes(bytes) if content_type.contains("x-www-form-urlencoded") => {
                let form = redact_form(&String::from_utf8_lossy(bytes));
                self.output
                    .display_message(&format!("[{} {}]", content_type, form))
            }
            _ => self
                .output
                .display_message(&format!("[{} Content Hidden]", content_type)),
        }
    }

    fn display_response(&self, response: &Response) -> io::Result<()> {
        self.output.display_type("RESPONSE", Local::now())?;

        let status = match StatusCode::from_u16(response.status)
            .ok()
            .and_then(|code| code.canonical_reason())
        {
            Some(reason) => format!("{} {}", response.status, reason),
            None => response.status.to_string(),
        };
        self.output
            .display_response_header(&response.protocol, &status)?;
        self.display_sorted_headers(&response.headers)?;
        self.output.display_json_body(&response.raw_body)
    }

    fn display_sorted_headers(&self, headers: &HeaderMap) -> io::Result<()> {
        let mut names: Vec<_> = headers.keys().collect();
        names.sort_by_key(|name| name.as_str());

        for name in names {
            let display_name = canonical_header_name(name.as_str());
            for value in headers.get_all(name) {
                if *name == AUTHORIZATION {
                    self.output.display_header(&display_name, REDACTED_VALUE)?;
                } else {
                    let value = String::from_utf8_lossy(value.as_bytes());
                    self.output.display_header(&display_name, &value)?;
                }
            }
        }
        Ok(())
    }

    /// Runs one start/stop block, reporting any failure.
    fn block<F>(&self, display: F)
    where
        F: FnOnce() -> io::Result<()>,
    {
        let result = self
            .output
            .start()
            .and_then(|_| {
                let shown = display();
                let stopped = self.output.stop();
                shown.and(stopped)
            });
        if let Err(err) = result {
            self.output.handle_internal_error(&err);
        }
    }
}

/// `x-vcap-request-id` → `X-Vcap-Request-Id`.
fn canonical_header_name(name: &str) -> String {
    name.split('-')
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join("-")
}

#[async_trait]
impl ConnectionWrapper for RequestLoggerWrapper {
    async fn make(
        &self,
        inner: &dyn Connection,
        request: &mut Request,
        response: &mut Response,
    ) -> Result<()> {
        self.block(|| self.display_request(request));

        let result = inner.make(request, response).await;

        if response.status != 0 {
            self.block(|| self.display_response(response));
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::common::CcError;
    use crate::api::Query;
    use chrono::DateTime;
    use reqwest::header::{HeaderName, HeaderValue, CONTENT_TYPE};
    use reqwest::Method;
    use std::error::Error as StdError;
    use std::sync::Mutex;
    use url::Url;

    /// Records every call as a line of text.
    #[derive(Default)]
    struct Recording {
        calls: Mutex<Vec<String>>,
        fail_on: Option<&'static str>,
    }

    impl Recording {
        fn record(&self, call: String) -> io::Result<()> {
            let name = call.split(' ').next().unwrap_or_default().to_string();
            self.calls.lock().unwrap().push(call);
            if self.fail_on == Some(name.as_str()) {
                return Err(io::Error::new(io::ErrorKind::Other, "disk full"));
            }
            Ok(())
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }

        fn named(&self, prefix: &str) -> Vec<String> {
            self.calls()
                .into_iter()
                .filter(|c| c.starts_with(prefix))
                .collect()
        }
    }

    impl RequestLoggerOutput for Recording {
        fn start(&self) -> io::Result<()> {
            self.record("start".into())
        }
        fn stop(&self) -> io::Result<()> {
            self.record("stop".into())
        }
        fn display_type(&self, name: &str, _time: DateTime<Local>) -> io::Result<()> {
            self.record(format!("type {}", name))
        }
        fn display_request_header(&self, method: &str, uri: &str, protocol: &str) -> io::Result<()> {
            self.record(format!("request {} {} {}", method, uri, protocol))
        }
        fn display_response_header(&self, protocol: &str, status: &str) -> io::Result<()> {
            self.record(format!("response {} {}", protocol, status))
        }
        fn display_host(&self, host: &str) -> io::Result<()> {
            self.record(format!("host {}", host))
        }
        fn display_header(&self, name: &str, value: &str) -> io::Result<()> {
            self.record(format!("header {}: {}", name, value))
        }
        fn display_json_body(&self, body: &[u8]) -> io::Result<()> {
            self.record(format!("json {}", String::from_utf8_lossy(body)))
        }
        fn display_message(&self, message: &str) -> io::Result<()> {
            self.record(format!("message {}", message))
        }
        fn display_dump(&self, dump: &str) -> io::Result<()> {
            self.record(format!("dump {}", dump))
        }
        fn handle_internal_error(&self, error: &(dyn StdError + 'static)) {
            self.calls.lock().unwrap().push(format!("internal {}", error));
        }
    }

    /// Answers 200 with fixed headers, or fails without a status.
    struct Server {
        fail: bool,
    }

    #[async_trait]
    impl Connection for Server {
        async fn make(&self, _request: &mut Request, response: &mut Response) -> Result<()> {
            if self.fail {
                return Err(CcError::Request {
                    url: "https://foo.bar.com".into(),
                    message: "connection refused".into(),
                });
            }
            response.status = 200;
            response.protocol = "HTTP/1.1".into();
            for (name, value) in [("ccccc", "third"), ("aaaaa", "first"), ("bbbbb", "second")] {
                response.headers.insert(
                    HeaderName::from_static(name),
                    HeaderValue::from_static(value),
                );
            }
            response.raw_body = b"some-response-body".to_vec();
            Ok(())
        }
    }

    fn request() -> Request {
        let mut request = Request::new(
            Method::GET,
            Url::parse("https://foo.bar.com/banana").unwrap(),
        )
        .with_query(&Query::new().add("query1", "a").add("query2", "b"));
        request.headers.clear();
        for (name, value) in [("aghi", "bar"), ("abc", "json"), ("adef", "application/json")] {
            request
                .headers
                .insert(HeaderName::from_static(name), HeaderValue::from_static(value));
        }
        request
    }

    async fn run(output: Arc<Recording>, mut request: Request, fail: bool) -> Result<()> {
        let wrapper = RequestLoggerWrapper::new(output);
        wrapper
            .make(&Server { fail }, &mut request, &mut Response::new())
            .await
    }

    #[tokio::test]
    async fn test_logs_request_then_response() {
        let output = Arc::new(Recording::default());
        run(output.clone(), request(), false).await.unwrap();

        assert_eq!(
            output.calls(),
            vec![
                "start",
                "type REQUEST",
                "request GET /banana?query1=a&query2=b HTTP/1.1",
                "host foo.bar.com",
                "header Abc: json",
                "header Adef: application/json",
                "header Aghi: bar",
                "stop",
                "start",
                "type RESPONSE",
                "response HTTP/1.1 200 OK",
                "header Aaaaa: first",
                "header Bbbbb: second",
                "header Ccccc: third",
                "json some-response-body",
                "stop",
            ]
        );
    }

    #[tokio::test]
    async fn test_authorization_is_hidden() {
        let output = Arc::new(Recording::default());
        let mut req = request();
        req.headers.clear();
        req.headers
            .insert(AUTHORIZATION, HeaderValue::from_static("bearer secret"));

        run(output.clone(), req, false).await.unwrap();

        assert_eq!(
            output.named("header Authorization"),
            vec!["header Authorization: [PRIVATE DATA HIDDEN]"]
        );
    }

    #[tokio::test]
    async fn test_request_bodies_by_content_type() {
        let output = Arc::new(Recording::default());
        let req = request()
            .with_body(RequestBody::Bytes(b"foo".to_vec()))
            .with_header(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        run(output.clone(), req, false).await.unwrap();
        assert_eq!(output.named("json")[0], "json foo");

        let output = Arc::new(Recording::default());
        let req = request().with_form_body(&Query::new().add("refresh_token", "secret"));
        run(output.clone(), req, false).await.unwrap();
        assert_eq!(
            output.named("message"),
            vec!["message [application/x-www-form-urlencoded refresh_token=[PRIVATE DATA HIDDEN]]"]
        );

        let output = Arc::new(Recording::default());
        let req = request()
            .with_body(RequestBody::Bytes(b"foo".to_vec()))
            .with_header(CONTENT_TYPE, HeaderValue::from_static("banana"));
        run(output.clone(), req, false).await.unwrap();
        assert_eq!(output.named("message"), vec!["message [banana Content Hidden]"]);
        assert_eq!(output.named("json").len(), 1);
    }

    #[tokio::test]
    async fn test_output_failure_does_not_fail_request() {
        let output = Arc::new(Recording {
            fail_on: Some("host"),
            ..Default::default()
        });

        run(output.clone(), request(), false).await.unwrap();

        assert_eq!(output.named("internal"), vec!["internal disk full"]);
        assert_eq!(output.named("stop").len(), 2);
    }

    #[tokio::test]
    async fn test_transport_failure_logs_no_response() {
        let output = Arc::new(Recording::default());

        let err = run(output.clone(), request(), true).await.unwrap_err();

        assert!(matches!(err, CcError::Request { .. }));
        assert!(output.named("response").is_empty());
        assert_eq!(output.named("start").len(), 1);
    }
}
