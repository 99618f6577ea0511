//
//  cf-client
//  api/transport.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # HTTP Transport
//!
//! [`CloudControllerConnection`] is the innermost link of every chain. It
//! performs exactly one network round trip per call and never interprets the
//! status code: a 404 is a successful round trip as far as the transport is
//! concerned.
//!
//! ## Transport failures
//!
//! When no response is received the failure is classified by walking the
//! error's source chain:
//!
//! | Condition | Error |
//! |-----------|-------|
//! | Unknown certificate authority | [`CcError::UnverifiedServer`] |
//! | Certificate not valid for the hostname | [`CcError::SslValidationHostname`] |
//! | Anything else (DNS, refused, timeout) | [`CcError::Request`] |

use std::error::Error as StdError;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::LOCATION;
use reqwest::Client;
use url::Url;

use crate::api::common::{CcError, Result};
use crate::api::response::warnings_from_headers;
use crate::api::{Connection, Request, Response};

/// Settings for the underlying HTTP client.
#[derive(Debug, Clone)]
pub struct ConnectionConfig {
    /// Accept any certificate presented by the server
    pub skip_ssl_validation: bool,
    /// Upper bound for establishing the TCP/TLS connection
    pub dial_timeout: Duration,
    /// `User-Agent` sent with every request
    pub user_agent: String,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            skip_ssl_validation: false,
            dial_timeout: Duration::from_secs(5),
            user_agent: format!("{}/{}", crate::APP_NAME, crate::VERSION),
        }
    }
}

/// The HTTP execution primitive.
///
/// # Example
///
/// ```rust,no_run
/// use cf_client::api::{CloudControllerConnection, Connection, ConnectionConfig, Request, Response};
/// use reqwest::Method;
/// use url::Url;
///
/// # async fn run() -> cf_client::api::common::Result<()> {
/// let transport = CloudControllerConnection::new(&ConnectionConfig::default())?;
/// let mut request = Request::new(Method::GET, Url::parse("https://api.example.com/").unwrap());
/// let mut response = Response::new();
///
/// transport.make(&mut request, &mut response).await?;
/// println!("{} {}", response.status, String::from_utf8_lossy(&response.raw_body));
/// # Ok(())
/// # }
/// ```
pub struct CloudControllerConnection {
    http: Client,
}

impl CloudControllerConnection {
    /// Builds the HTTP client.
    ///
    /// # Errors
    ///
    /// Returns [`CcError::Request`] if the TLS backend cannot be initialised.
    pub fn new(config: &ConnectionConfig) -> Result<Self> {
        let http = Client::builder()
            .user_agent(config.user_agent.clone())
            .connect_timeout(config.dial_timeout)
            .danger_accept_invalid_certs(config.skip_ssl_validation)
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .map_err(|e| CcError::Request {
                url: String::new(),
                message: e.to_string(),
            })?;
        Ok(Self { http })
    }
}

#[async_trait]
impl Connection for CloudControllerConnection {
    async fn make(&self, request: &mut Request, response: &mut Response) -> Result<()> {
        let body = request.take_transport_body()?;

        let mut builder = self
            .http
            .request(request.method.clone(), request.url.clone())
            .headers(request.headers.clone());
        if let Some(body) = body {
            builder = builder.body(body);
        }

        let http_response = builder
            .send()
            .await
            .map_err(|e| classify_transport_error(&request.url, &e))?;

        response.status = http_response.status().as_u16();
        response.protocol = format!("{:?}", http_response.version());
        response.headers = http_response.headers().clone();
        response.warnings = warnings_from_headers(&response.headers);
        response.resource_location_url = response
            .headers
            .get(LOCATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        let bytes = http_response
            .bytes()
            .await
            .map_err(|e| classify_transport_error(&request.url, &e))?;
        response.raw_body = bytes.to_vec();

        Ok(())
    }
}

/// Maps a failed round trip onto the transport error kinds.
pub fn classify_transport_error(url: &Url, error: &(dyn StdError + 'static)) -> CcError {
    let chain = error_chain(error).to_lowercase();

    if chain.contains("unknownissuer")
        || chain.contains("unknown issuer")
        || chain.contains("unknown certificate authority")
        || chain.contains("certificate signed by unknown authority")
    {
        return CcError::UnverifiedServer {
            url: url.to_string(),
        };
    }

    if chain.contains("notvalidforname") || chain.contains("not valid for name") {
        return CcError::SslValidationHostname {
            message: error_chain(error),
        };
    }

    CcError::Request {
        url: url.to_string(),
        message: error_chain(error),
    }
}

fn error_chain(error: &(dyn StdError + 'static)) -> String {
    let mut parts = vec![error.to_string()];
    let mut source = error.source();
    while let Some(cause) = source {
        parts.push(cause.to_string());
        source = cause.source();
    }
    parts.join(": ")
}
